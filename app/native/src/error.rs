//! Error types for Backdrop.
//!
//! The rotation manager itself never fails; these types cover the edges
//! around it (configuration, preference files, the CLI) and are what the
//! binary reports before exiting.

use serde::Serialize;
use thiserror::Error;

use crate::background::preferences::PreferenceError;
use crate::config::ConfigError;

/// Errors that can occur during application execution.
///
/// Serializes as `{"kind": ..., "message": ...}` so `--json` output stays
/// machine-readable on failure too.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum BackdropError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Preference store operation failed.
    #[error("Preference error: {0}")]
    PreferenceError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for BackdropError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for BackdropError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for BackdropError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<PreferenceError> for BackdropError {
    fn from(err: PreferenceError) -> Self { Self::PreferenceError(err.to_string()) }
}
