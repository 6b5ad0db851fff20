//! Application-wide constants.

/// Application identifier, used for config, data, and log target names.
pub const APP_NAME: &str = "backdrop";

/// Persisted preference keys.
pub mod keys {
    /// Auto-switch delay in milliseconds, stored as a decimal string.
    pub const SWITCH_INTERVAL: &str = "fspBackgroundSwitchInterval";

    /// Identifier of the last committed background.
    pub const SELECTED_BACKGROUND: &str = "fspSelectedBackground";
}

/// Built-in defaults for the background rotation.
pub mod defaults {
    /// Folder prefix prepended to every background identifier.
    pub const FOLDER: &str = "fundos/";

    /// File name prefix before the sequence number.
    pub const PREFIX: &str = "fundo_";

    /// Accepted extensions, probed in this order for every index.
    pub const EXTENSIONS: &[&str] = &["png", "gif", "jpg", "jpeg"];

    /// Highest sequence number probed during discovery.
    pub const MAX_SCAN_INDEX: u32 = 300;

    /// Consecutive missing indices that end the scan once something was found.
    pub const STOP_AFTER_MISSING_STREAK: u32 = 20;

    /// Auto-switch delay used when nothing valid is persisted.
    pub const DELAY_MS: f64 = 20_000.0;

    /// Crossfade duration before a transition is committed.
    pub const FADE_DURATION_MS: u64 = 900;

    /// Identifier used when discovery finds nothing.
    pub const FALLBACK: &str = "fundos/fundo_1.jpg";
}

/// Bounds applied to the auto-switch period when scheduling: the range of a
/// signed 32-bit millisecond timer.
pub mod period {
    /// Shortest schedulable period in milliseconds.
    pub const MIN_MS: f64 = 1.0;

    /// Longest schedulable period in milliseconds.
    pub const MAX_MS: f64 = 2_147_483_647.0;
}
