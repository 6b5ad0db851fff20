//! Display state of the background controls.
//!
//! The manager owns no widgets; it derives what the previous/next buttons,
//! the stop/resume toggle, and the interval selector should show.

use serde::Serialize;

/// Icon shown on the stop/resume toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleIcon {
    /// Rotation is running; pressing pauses it.
    Pause,
    /// Rotation is stopped; pressing resumes it.
    Play,
}

/// Snapshot of every control the rotation drives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlState {
    /// Whether the previous button is enabled.
    pub prev_enabled: bool,
    /// Whether the next button is enabled.
    pub next_enabled: bool,
    /// Whether the stop/resume toggle is enabled.
    pub toggle_enabled: bool,
    /// Whether the toggle shows the stopped state.
    pub stopped: bool,
    /// Icon on the toggle.
    pub icon: ToggleIcon,
    /// Value of the toggle's `aria-pressed` attribute.
    pub aria_pressed: &'static str,
    /// Value of the toggle's `aria-label` attribute.
    pub aria_label: &'static str,
    /// Value shown by the interval selector, in milliseconds.
    pub interval_value: String,
}

impl ControlState {
    /// Derives the control state.
    ///
    /// `has_options` is whether the catalog holds more than one background;
    /// `stopped` is whether the user paused the rotation.
    #[must_use]
    pub fn new(has_options: bool, stopped: bool, interval_value: String) -> Self {
        let (icon, aria_pressed, aria_label) = if stopped {
            (ToggleIcon::Play, "true", "Resume automatic background transition")
        } else {
            (ToggleIcon::Pause, "false", "Pause automatic background transition")
        };

        Self {
            prev_enabled: has_options,
            next_enabled: has_options,
            toggle_enabled: has_options,
            stopped,
            icon,
            aria_pressed,
            aria_label,
            interval_value,
        }
    }
}
