//! Application file source: optional `spaark.toml` at the application root.

use crate::config::APP_CONFIG_FILE;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Add `<app_root>/spaark.toml` to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    app_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = app_root.join(APP_CONFIG_FILE);
    Ok(builder.add_source(File::from(path).required(false)))
}
