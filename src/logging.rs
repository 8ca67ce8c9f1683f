//! Logging
//!
//! Structured `tracing` output for the loader and CLI. The `[logging]` config
//! section picks level, format and destination; `SPAARK_LOG*` environment
//! variables take precedence over it.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "SPAARK_LOG";
const ENV_MODULES: &str = "SPAARK_LOG_MODULES";
const ENV_FORMAT: &str = "SPAARK_LOG_FORMAT";
const ENV_OUTPUT: &str = "SPAARK_LOG_OUTPUT";
const ENV_FILE: &str = "SPAARK_LOG_FILE";
const LOG_FILE_NAME: &str = "spaark-loader.log";

/// Line format of emitted events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log format {:?}, expected text or json",
                other
            ))),
        }
    }
}

/// Where events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogOutput {
    #[serde(rename = "stdout")]
    Stdout,
    #[default]
    #[serde(rename = "stderr")]
    Stderr,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr
    #[serde(rename = "both")]
    Both,
}

impl LogOutput {
    pub fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            "both" => Ok(LogOutput::Both),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log output {:?}, expected stdout, stderr, file, file+stderr or both",
                other
            ))),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// trace, debug, info, warn, error or off
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Log file when `output` includes a file; platform state dir otherwise
    pub file: Option<PathBuf>,
    /// ANSI colors for text output on terminals
    pub color: bool,
    /// Per-target levels, e.g. `spaark_loader::loader = "debug"`
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            file: None,
            color: true,
            modules: BTreeMap::new(),
        }
    }
}

/// Pick the log file: CLI flag, then `SPAARK_LOG_FILE`, then config, then the
/// platform state directory (scoped by application root when given).
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    app_root: Option<&Path>,
) -> Result<PathBuf, ApiError> {
    let env_file = std::env::var(ENV_FILE).ok().map(PathBuf::from);
    match [cli_file, env_file, config_file]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty())
    {
        Some(path) => Ok(path),
        None => default_log_file_path(app_root),
    }
}

fn default_log_file_path(app_root: Option<&Path>) -> Result<PathBuf, ApiError> {
    let dirs = directories::ProjectDirs::from("", "spaark", "spaark-loader").ok_or_else(|| {
        ApiError::ConfigError("No platform state directory for the log file".to_string())
    })?;
    // Not every platform has a state dir
    let mut dir = dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf();

    if let Some(root) = app_root {
        let canonical = dunce::canonicalize(root).map_err(|e| {
            ApiError::ConfigError(format!("Cannot canonicalize {}: {}", root.display(), e))
        })?;
        for component in canonical.components() {
            if let Component::Normal(name) = component {
                dir.push(name);
            }
        }
    }
    Ok(dir.join(LOG_FILE_NAME))
}

/// Install the global subscriber.
///
/// Environment variables win over `config`, which already carries any CLI
/// overrides. Fails if a subscriber is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);
    let installed = if !config.enabled {
        Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(std::io::sink))
            .try_init()
    } else {
        let filter = env_filter(config)?;
        let format = env_override(ENV_FORMAT)?.unwrap_or(config.format);
        let output = env_override(ENV_OUTPUT)?.unwrap_or(config.output);
        let writer = make_writer(output, config.file.clone())?;
        let ansi = config.color && !output.writes_file();

        let layer = fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer);
        let registry = Registry::default().with(filter);
        match format {
            LogFormat::Json => registry.with(layer.json()).try_init(),
            LogFormat::Text => registry.with(layer.with_ansi(ansi)).try_init(),
        }
    };
    installed.map_err(|e| ApiError::ConfigError(format!("Logging setup failed: {}", e)))
}

/// Parse an environment override, ignoring unset or empty variables
fn env_override<T: FromStr<Err = ApiError>>(var: &str) -> Result<Option<T>, ApiError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value.parse().map(Some),
        _ => Ok(None),
    }
}

fn open_log_file(config_file: Option<PathBuf>) -> Result<File, ApiError> {
    let path = resolve_log_file_path(None, config_file, None)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ApiError::ConfigError(format!("Cannot open {}: {}", path.display(), e)))
}

fn make_writer(output: LogOutput, config_file: Option<PathBuf>) -> Result<BoxMakeWriter, ApiError> {
    Ok(match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        LogOutput::File => BoxMakeWriter::new(open_log_file(config_file)?),
        LogOutput::FileAndStderr => {
            BoxMakeWriter::new(open_log_file(config_file)?.and(std::io::stderr))
        }
    })
}

/// `SPAARK_LOG` replaces the whole filter; otherwise the configured level plus
/// per-module directives from config and `SPAARK_LOG_MODULES`.
fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    if config.level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::new("off"));
    }

    let from_env = std::env::var(ENV_MODULES).unwrap_or_default();
    let env_pairs = from_env
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(module, level)| (module.trim(), level.trim()));
    let config_pairs = config
        .modules
        .iter()
        .map(|(module, level)| (module.as_str(), level.as_str()));

    config_pairs
        .chain(env_pairs)
        .try_fold(EnvFilter::new(&config.level), |filter, (module, level)| {
            directive(module, level).map(|d| filter.add_directive(d))
        })
}

fn directive(module: &str, level: &str) -> Result<Directive, ApiError> {
    format!("{}={}", module, level)
        .parse()
        .map_err(|e| ApiError::ConfigError(format!("Invalid log directive {}={}: {}", module, level, e)))
}
