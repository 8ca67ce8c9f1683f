//! Tooling & Integration Layer
//!
//! Command-line access to the loader: resolution, registry inspection and
//! whole-tree validation.

pub mod cli;

pub use cli::{load_config, Cli, CliContext, Commands};
