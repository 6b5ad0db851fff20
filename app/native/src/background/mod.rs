//! Rotating background images.
//!
//! Backgrounds are discovered once at startup by probing numbered candidate
//! files, collected into a catalog, and cycled by the [`RotationManager`]
//! with a crossfade between entries.

pub mod catalog;
pub mod controls;
pub mod discovery;
pub mod manager;
pub mod preferences;
pub mod probe;
pub mod scheduler;
pub mod surface;

pub use catalog::BackgroundCatalog;
pub use controls::{ControlState, ToggleIcon};
pub use discovery::{ResourceProbe, discover};
pub use manager::{RotationManager, setup};
pub use preferences::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use probe::ImageFileProbe;
pub use surface::{BackgroundSurface, LogSurface, WallpaperSurface};
