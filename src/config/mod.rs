//! Configuration
//!
//! Layered configuration for the loader: built-in defaults, the application's
//! `spaark.toml`, then `SPAARK__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::loader::DEFAULT_FILE_SUFFIX;
use crate::logging::LoggingConfig;
use crate::registry::{ModelPriority, FRAMEWORK_MODEL_NAMESPACE, FRAMEWORK_PREFIX};
use crate::types::{ALT_SEPARATOR, SEPARATOR};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the per-application configuration file
pub const APP_CONFIG_FILE: &str = "spaark.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpaarkConfig {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub loader: LoaderSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Declared application namespace, e.g. `\MyApp\`
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Application root; also the default root for unregistered prefixes
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_namespace() -> String {
    "app".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            root: default_root(),
        }
    }
}

impl AppConfig {
    /// Namespace lowercased and stripped of separator padding, ready for the registry
    pub fn normalized_namespace(&self) -> String {
        self.namespace
            .trim()
            .trim_matches(|c| c == SEPARATOR || c == ALT_SEPARATOR)
            .to_lowercase()
    }
}

/// Loader section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSettings {
    /// Framework root; defaults to `<app.root>/spaark`
    #[serde(default)]
    pub framework_root: Option<PathBuf>,

    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,

    #[serde(default = "default_framework_prefix")]
    pub framework_prefix: String,

    #[serde(default = "default_framework_model_namespace")]
    pub framework_model_namespace: String,

    #[serde(default)]
    pub model_priority: ModelPriority,
}

fn default_file_suffix() -> String {
    DEFAULT_FILE_SUFFIX.to_string()
}

fn default_framework_prefix() -> String {
    FRAMEWORK_PREFIX.to_string()
}

fn default_framework_model_namespace() -> String {
    FRAMEWORK_MODEL_NAMESPACE.to_string()
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            framework_root: None,
            file_suffix: default_file_suffix(),
            framework_prefix: default_framework_prefix(),
            framework_model_namespace: default_framework_model_namespace(),
            model_priority: ModelPriority::default(),
        }
    }
}

impl SpaarkConfig {
    /// Framework root, falling back to `<app.root>/spaark`
    pub fn framework_root(&self) -> PathBuf {
        self.loader
            .framework_root
            .clone()
            .unwrap_or_else(|| self.app.root.join(FRAMEWORK_PREFIX))
    }
}
