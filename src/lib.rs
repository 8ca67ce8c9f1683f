//! Spaark Loader: namespace-driven class resolution
//!
//! Maps symbolic unit names such as `Spaark.Core.Output.StdOutput` to unit files
//! through a registry of namespace roots, loads each file at most once, and
//! verifies that the file declared what was asked for.

pub mod bootstrap;
pub mod catalog;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod hooks;
pub mod loader;
pub mod logging;
pub mod reflection;
pub mod registry;
pub mod source;
pub mod symbols;
pub mod tooling;
pub mod types;
pub mod unit;

pub use bootstrap::{loader_from_config, loader_with_source};
pub use concurrency::SharedClassLoader;
pub use error::{ApiError, LoadError};
pub use loader::{ClassLoader, Outcome, ResolutionAttempt, DEFAULT_FILE_SUFFIX};
pub use registry::{FrameworkDefaults, ModelPriority, NamespaceRegistry};
pub use source::{FsUnitSource, MemoryUnitSource, UnitSource};
pub use symbols::Autoload;
pub use types::SymbolName;
pub use unit::UnitDescriptor;
