//! Configuration sources.

pub mod app_file;
pub mod environment;
