//! Merge policy and service for layered configuration.

pub mod policy;
pub mod service;
