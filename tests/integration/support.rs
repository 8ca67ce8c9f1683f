use std::fs;
use std::path::{Path, PathBuf};

use spaark_loader::config::SpaarkConfig;
use spaark_loader::{loader_from_config, ClassLoader, ModelPriority};
use tempfile::TempDir;

/// Application tree with the framework under `<root>/spaark`
pub struct AppTree {
    pub temp: TempDir,
}

impl AppTree {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn framework_root(&self) -> PathBuf {
        self.root().join("spaark")
    }

    /// Write a unit file relative to the application root
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn config(&self) -> SpaarkConfig {
        let mut config = SpaarkConfig::default();
        config.app.root = self.root().to_path_buf();
        config
    }

    pub fn loader(&self) -> ClassLoader {
        loader_from_config(&self.config()).unwrap()
    }

    pub fn loader_with_priority(&self, priority: ModelPriority) -> ClassLoader {
        let mut config = self.config();
        config.loader.model_priority = priority;
        loader_from_config(&config).unwrap()
    }
}

/// A single fully qualified unit
pub fn unit(name: &str) -> String {
    format!("[[unit]]\nname = \"{}\"\n", name)
}
