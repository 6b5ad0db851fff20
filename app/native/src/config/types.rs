//! Configuration types for Backdrop.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, defaults};
use crate::utils::path::expand;

/// Background discovery and rotation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundConfig {
    /// Directory that identifiers are resolved against when probing.
    /// Empty means the current working directory. Supports `~`.
    pub root: String,

    /// Folder prefix of every identifier, including the trailing slash.
    /// Default: "fundos/"
    pub folder: String,

    /// File name prefix before the sequence number.
    /// Default: "fundo_"
    pub prefix: String,

    /// Accepted extensions, probed in this order for every index.
    /// Default: ["png", "gif", "jpg", "jpeg"]
    pub extensions: Vec<String>,

    /// Highest sequence number probed during discovery.
    /// Default: 300
    pub max_scan_index: u32,

    /// Number of consecutive indices without any hit that stops the scan,
    /// once at least one background has been found.
    /// Default: 20
    pub stop_after_missing_streak: u32,

    /// Auto-switch delay in milliseconds when no valid value is persisted.
    /// Default: 20000
    pub default_delay_ms: f64,

    /// Crossfade duration in milliseconds.
    /// Default: 900
    pub fade_duration_ms: u64,

    /// Identifier used when discovery finds nothing.
    /// Default: "fundos/fundo_1.jpg"
    pub fallback: String,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            folder: defaults::FOLDER.to_string(),
            prefix: defaults::PREFIX.to_string(),
            extensions: defaults::EXTENSIONS.iter().map(ToString::to_string).collect(),
            max_scan_index: defaults::MAX_SCAN_INDEX,
            stop_after_missing_streak: defaults::STOP_AFTER_MISSING_STREAK,
            default_delay_ms: defaults::DELAY_MS,
            fade_duration_ms: defaults::FADE_DURATION_MS,
            fallback: defaults::FALLBACK.to_string(),
        }
    }
}

impl BackgroundConfig {
    /// Builds the identifier probed for `index` with extension `ext`.
    #[must_use]
    pub fn candidate(&self, index: u32, ext: &str) -> String {
        format!("{}{}{index}.{ext}", self.folder, self.prefix)
    }

    /// Returns the configured default delay, or the built-in one if the
    /// configured value is not a positive finite number.
    #[must_use]
    pub fn default_delay_ms(&self) -> f64 {
        if self.default_delay_ms.is_finite() && self.default_delay_ms > 0.0 {
            self.default_delay_ms
        } else {
            defaults::DELAY_MS
        }
    }

    /// Returns the crossfade duration.
    #[must_use]
    pub const fn fade_duration(&self) -> Duration { Duration::from_millis(self.fade_duration_ms) }

    /// Returns the directory identifiers are resolved against.
    #[must_use]
    pub fn root_dir(&self) -> PathBuf {
        if self.root.trim().is_empty() {
            PathBuf::from(".")
        } else {
            expand(&self.root)
        }
    }
}

/// Location of the persisted preference file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferencesConfig {
    /// Path of the JSON file holding persisted preferences. Supports `~`.
    /// Empty means `<data dir>/backdrop/preferences.json`.
    pub path: String,
}

impl PreferencesConfig {
    /// Returns the preference file path, falling back to the platform data
    /// directory (or `/tmp` when none is available).
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        if !self.path.trim().is_empty() {
            return expand(&self.path);
        }

        dirs::data_dir()
            .map_or_else(|| PathBuf::from(format!("/tmp/{APP_NAME}")), |dir| dir.join(APP_NAME))
            .join("preferences.json")
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct BackdropConfig {
    /// Background discovery and rotation settings.
    pub backgrounds: BackgroundConfig,

    /// Persisted preference storage.
    pub preferences: PreferencesConfig,
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/backdrop/config.jsonc \
        or the platform configuration directory"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/backdrop/config.jsonc` or `config.json`, if set
/// 2. `~/.config/backdrop/config.jsonc` or `config.json`
/// 3. The platform configuration directory (`dirs::config_dir()`)
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    let mut push_dir = |dir: PathBuf| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        push_dir(PathBuf::from(xdg_config).join(APP_NAME));
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join(APP_NAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join(APP_NAME));
    }

    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, `IoError` if it
/// cannot be read, and `ParseError` if it is not valid JSONC.
pub fn load_config_from_path(path: &Path) -> Result<BackdropConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, or the error of the first file that fails to load.
pub fn load_config() -> Result<(BackdropConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            let config = load_config_from_path(&path)?;
            return Ok((config, path));
        }
    }

    Err(ConfigError::NotFound)
}
