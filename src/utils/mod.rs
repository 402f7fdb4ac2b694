//! Shared utilities: error types and crate-wide constants.

pub mod config;
pub mod error;
