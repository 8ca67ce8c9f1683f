//! Built-in defaults every configuration build starts from.

use crate::loader::DEFAULT_FILE_SUFFIX;
use crate::registry::{FRAMEWORK_MODEL_NAMESPACE, FRAMEWORK_PREFIX};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use std::path::Path;

/// Builder seeded with defaults; `app.root` defaults to `app_root`.
pub fn builder_with_defaults(app_root: &Path) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app.namespace", "app")?
        .set_default("app.root", app_root.to_string_lossy().to_string())?
        .set_default("loader.file_suffix", DEFAULT_FILE_SUFFIX)?
        .set_default("loader.framework_prefix", FRAMEWORK_PREFIX)?
        .set_default("loader.framework_model_namespace", FRAMEWORK_MODEL_NAMESPACE)?
        .set_default("loader.model_priority", "application_first")
}
