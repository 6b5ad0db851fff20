//! Configuration module for Backdrop.
//!
//! This module provides configuration types and loading functionality.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.
//! Every field is optional; a missing file means built-in defaults.

pub mod types;

use std::path::Path;

pub use types::{
    BackdropConfig, BackgroundConfig, ConfigError, PreferencesConfig, config_paths,
    load_config as load_config_default, load_config_from_path,
};

/// Loads the configuration used by the CLI.
///
/// An explicit `custom_path` must exist and parse. Without one, the default
/// search paths are tried and a missing file yields the default configuration.
///
/// # Errors
///
/// Returns an error if the explicit file is missing, or if any found file
/// cannot be read or parsed.
pub fn load(custom_path: Option<&Path>) -> Result<BackdropConfig, ConfigError> {
    if let Some(path) = custom_path {
        let config = load_config_from_path(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        return Ok(config);
    }

    match load_config_default() {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            Ok(BackdropConfig::default())
        }
        Err(err) => Err(err),
    }
}
