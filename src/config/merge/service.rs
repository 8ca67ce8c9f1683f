//! MergeService: orchestrates sources, applies merge policy, deserializes to SpaarkConfig.

use crate::config::sources::{app_file, environment};
use crate::config::SpaarkConfig;
use config::ConfigError;
use config::File;
use std::path::Path;

use super::policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config for an application.
    /// Precedence: defaults (lowest) -> `<app_root>/spaark.toml` -> environment (highest).
    pub fn load(app_root: &Path) -> Result<SpaarkConfig, ConfigError> {
        let builder = policy::builder_with_defaults(app_root)?;
        let builder = app_file::add_to_builder(builder, app_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(app_root: &Path, path: &Path) -> Result<SpaarkConfig, ConfigError> {
        let builder = policy::builder_with_defaults(app_root)?;
        let builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
