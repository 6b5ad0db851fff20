//! Render targets for the rotating background.
//!
//! A surface mirrors the two stacked layers of a crossfade: the `current`
//! image and the `next` image fading in over it while the transition flag
//! is raised.

use std::path::PathBuf;

use crate::utils::path::resolve_identifier;

/// Receives the render steps of the rotation manager.
///
/// Calls arrive with the manager's state lock held; implementations must not
/// call back into the manager.
pub trait BackgroundSurface: Send + Sync {
    /// Sets the committed background layer.
    fn set_current(&self, identifier: &str);

    /// Sets the layer that fades in during a transition.
    fn set_next(&self, identifier: &str);

    /// Raises or clears the crossfade flag.
    fn set_transition(&self, active: bool);
}

/// Surface that only reports render steps through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSurface;

impl BackgroundSurface for LogSurface {
    fn set_current(&self, identifier: &str) {
        tracing::info!(background = identifier, "background committed");
    }

    fn set_next(&self, identifier: &str) {
        tracing::debug!(background = identifier, "next background layer set");
    }

    fn set_transition(&self, active: bool) {
        tracing::debug!(active, "background crossfade flag changed");
    }
}

/// Surface that sets the desktop wallpaper whenever a background is
/// committed. Crossfade steps are only logged; the desktop has no layer to
/// fade.
#[derive(Debug, Clone)]
pub struct WallpaperSurface {
    root: PathBuf,
}

impl WallpaperSurface {
    /// Creates a surface resolving identifiers against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }
}

impl BackgroundSurface for WallpaperSurface {
    fn set_current(&self, identifier: &str) {
        LogSurface.set_current(identifier);

        let Some(path) = resolve_identifier(&self.root, identifier) else {
            tracing::warn!(background = identifier, "background path escapes the root");
            return;
        };
        let path = std::path::absolute(&path).unwrap_or(path);

        // The platform call may shell out; keep it off the runtime thread.
        tokio::task::spawn_blocking(move || {
            let Some(path_str) = path.to_str() else {
                tracing::warn!(path = %path.display(), "wallpaper path is not valid UTF-8");
                return;
            };
            if let Err(err) = wallpaper::set_from_path(path_str) {
                tracing::warn!(path = path_str, error = %err, "failed to set desktop wallpaper");
            }
        });
    }

    fn set_next(&self, identifier: &str) { LogSurface.set_next(identifier); }

    fn set_transition(&self, active: bool) { LogSurface.set_transition(active); }
}
