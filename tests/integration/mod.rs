//! Integration tests against real unit trees on disk

mod models;
mod policies;
mod resolution;
mod support;
