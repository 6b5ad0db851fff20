//! Backdrop - rotating background images with persisted preferences.
//!
//! Backgrounds are discovered by probing numbered candidate files, cycled on
//! a timer with a crossfade, and the user's selection and switch interval
//! survive across sessions. The library drives any [`BackgroundSurface`];
//! the binary wires it to stdin and, optionally, the desktop wallpaper.
//!
//! [`BackgroundSurface`]: background::BackgroundSurface

pub mod background;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod utils;
