//! Environment overlay for `SpaarkConfig`: `SPAARK__<SECTION>__<KEY>`
//!
//! Only double-underscore names are read here. The single-underscore logging
//! variables (`SPAARK_LOG`, `SPAARK_LOG_MODULES`, `SPAARK_LOG_FORMAT`,
//! `SPAARK_LOG_OUTPUT`, `SPAARK_LOG_FILE`) never match this prefix; the logging
//! module reads them when it installs the subscriber.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

const PREFIX: &str = "SPAARK";
const SEPARATOR: &str = "__";

fn environment() -> Environment {
    Environment::with_prefix(PREFIX)
        .separator(SEPARATOR)
        .try_parsing(true)
}

/// Overlay `SPAARK__*` variables, e.g. `SPAARK__APP__NAMESPACE=shop` sets
/// `app.namespace`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(environment()))
}
