//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::SpaarkConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the application rooted at `app_root`.
    pub fn load(app_root: &Path) -> Result<SpaarkConfig, ConfigError> {
        MergeService::load(app_root)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(app_root: &Path, path: &Path) -> Result<SpaarkConfig, ConfigError> {
        MergeService::load_from_file(app_root, path)
    }

    /// Create default configuration.
    pub fn default() -> SpaarkConfig {
        SpaarkConfig::default()
    }
}
