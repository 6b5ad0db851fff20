//! Persisted key-value preferences.
//!
//! Two independent string entries survive across sessions: the selected
//! background identifier and the auto-switch delay. Values are never
//! versioned; anything missing or malformed normalizes to a default.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::constants::keys;

/// Errors raised by file-backed preference stores.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    /// The preference file could not be written.
    #[error("Failed to write preferences to {path}: {source}")]
    Io {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The preferences could not be serialized.
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage that outlives the session.
pub trait PreferenceStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    /// Returns every stored entry, ordered by key.
    fn entries(&self) -> BTreeMap<String, String>;

    /// Removes every stored entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleared state could not be persisted.
    fn clear(&self) -> Result<(), PreferenceError>;
}

/// Volatile store, used when nothing should touch the disk.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates a store pre-filled with `entries`.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> { self.entries.lock().get(key).cloned() }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn entries(&self) -> BTreeMap<String, String> { self.entries.lock().clone() }

    fn clear(&self) -> Result<(), PreferenceError> {
        self.entries.lock().clear();
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk.
///
/// The file is read once on open and rewritten in full on every change. A
/// missing, unreadable, or malformed file opens as an empty store.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    /// Opens the store at `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        tracing::debug!(path = %path.display(), count = entries.len(), "opened preference store");
        Self { path, entries: Mutex::new(entries) }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), PreferenceError> {
        let json = serde_json::to_string_pretty(entries)?;
        let io_err = |source| PreferenceError::Io { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> { self.entries.lock().get(key).cloned() }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn entries(&self) -> BTreeMap<String, String> { self.entries.lock().clone() }

    fn clear(&self) -> Result<(), PreferenceError> {
        let mut entries = self.entries.lock();
        entries.clear();
        self.persist(&entries)
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    let Ok(contents) = fs::read_to_string(path) else {
        return BTreeMap::new();
    };

    serde_json::from_str(&contents).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "ignoring malformed preference file");
        BTreeMap::new()
    })
}

/// Parses a delay the way a form control value is read: surrounding
/// whitespace is ignored, and anything that is not a finite number greater
/// than zero yields `default_ms`. Only decimal notation is accepted; hex
/// literals such as `0x10` fall back to the default on purpose.
#[must_use]
pub fn normalize_delay(raw: &str, default_ms: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => default_ms,
    }
}

/// Formats a delay for storage. Integral values carry no fractional part.
#[must_use]
pub fn format_delay(delay_ms: f64) -> String { delay_ms.to_string() }

/// Reads the persisted delay, normalized against `default_ms`.
#[must_use]
pub fn load_delay(store: &dyn PreferenceStore, default_ms: f64) -> f64 {
    store
        .get(keys::SWITCH_INTERVAL)
        .map_or(default_ms, |raw| normalize_delay(&raw, default_ms))
}

/// Persists the delay, logging instead of failing.
pub fn save_delay(store: &dyn PreferenceStore, delay_ms: f64) {
    if let Err(err) = store.set(keys::SWITCH_INTERVAL, &format_delay(delay_ms)) {
        tracing::warn!(error = %err, "failed to persist background switch interval");
    }
}

/// Reads the persisted background selection.
#[must_use]
pub fn load_selection(store: &dyn PreferenceStore) -> Option<String> {
    store.get(keys::SELECTED_BACKGROUND)
}

/// Persists the background selection, logging instead of failing.
pub fn save_selection(store: &dyn PreferenceStore, identifier: &str) {
    if let Err(err) = store.set(keys::SELECTED_BACKGROUND, identifier) {
        tracing::warn!(error = %err, "failed to persist selected background");
    }
}
