//! Error types
//!
//! `LoadError` covers everything that can go wrong while resolving and loading a
//! unit. `ApiError` is the boundary error used by bootstrap, configuration and
//! the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Initialization phase of the namespace registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    Framework,
    Application,
}

impl std::fmt::Display for InitPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitPhase::Framework => write!(f, "framework"),
            InitPhase::Application => write!(f, "application"),
        }
    }
}

/// Errors raised while resolving or loading a unit.
///
/// A unit that simply cannot be found is not an error: the loader reports it as
/// `Ok(false)`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid symbolic name: {0:?}")]
    InvalidName(String),

    /// The file existed but did not declare the requested unit
    #[error("{name} not declared in its file ({})", path.display())]
    DefinitionMismatch { name: String, path: PathBuf },

    #[error("{name}, or one of its parents, has been marked as deprecated (marked by {marked_by})")]
    Deprecated { name: String, marked_by: String },

    #[error("{name} extends or implements {ancestor}, which could not be loaded")]
    MissingAncestor { name: String, ancestor: String },

    #[error("Cannot redeclare {name} ({})", path.display())]
    Redeclared { name: String, path: PathBuf },

    #[error("Malformed unit file {}: {message}", path.display())]
    MalformedUnitFile { path: PathBuf, message: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("On-load hook for {name} failed: {source}")]
    Hook {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Registry {0} defaults have already been registered")]
    AlreadyInitialized(InitPhase),

    #[error("Framework defaults must be registered before application defaults")]
    FrameworkNotInitialized,

    #[error("Namespace prefix already registered: {0}")]
    DuplicatePrefix(String),
}

/// Boundary error for bootstrap, configuration and CLI operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Unit not found: {0}")]
    UnitNotFound(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::OutputError(err.to_string())
    }
}
