//! Loader bootstrap from configuration.
//!
//! Runs both registry phases in order: framework defaults first, then the
//! application namespace read from the merged configuration.

use crate::config::SpaarkConfig;
use crate::error::ApiError;
use crate::loader::ClassLoader;
use crate::registry::{FrameworkDefaults, NamespaceRegistry};
use crate::source::{FsUnitSource, UnitSource};
use tracing::info;

/// Build a filesystem-backed loader from `config`
pub fn loader_from_config(config: &SpaarkConfig) -> Result<ClassLoader, ApiError> {
    loader_with_source(config, FsUnitSource)
}

/// Build a loader from `config` over an arbitrary unit source
pub fn loader_with_source(
    config: &SpaarkConfig,
    source: impl UnitSource + 'static,
) -> Result<ClassLoader, ApiError> {
    let registry =
        NamespaceRegistry::new(config.app.root.clone()).with_priority(config.loader.model_priority);
    let framework = FrameworkDefaults::custom(
        config.framework_root(),
        &config.loader.framework_prefix,
        &config.loader.framework_model_namespace,
    )?;

    let mut loader = ClassLoader::bootstrap(registry, framework, source)?
        .with_file_suffix(config.loader.file_suffix.clone());

    let namespace = config.app.normalized_namespace();
    if namespace.is_empty() {
        return Err(ApiError::ConfigError(
            "app.namespace must not be empty".to_string(),
        ));
    }
    loader.with_application_defaults(&namespace)?;

    info!(
        app_root = %config.app.root.display(),
        framework_root = %config.framework_root().display(),
        namespace = %namespace,
        "Class loader ready"
    );
    Ok(loader)
}
