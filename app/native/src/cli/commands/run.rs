//! Interactive rotation session.
//!
//! Stdin stands in for the on-page controls: every line is one command,
//! forwarded from a reader thread to the runtime over a channel.

use std::io::BufRead;
use std::str::FromStr;
use std::sync::Arc;

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tokio::sync::mpsc;

use super::runtime;
use crate::background::{
    self, BackgroundSurface, ControlState, ImageFileProbe, JsonFilePreferenceStore, LogSurface,
    PreferenceStore, RotationManager, WallpaperSurface,
};
use crate::cli::output;
use crate::config::BackdropConfig;
use crate::error::BackdropError;

/// Arguments of the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Also set the desktop wallpaper whenever a background is committed.
    #[arg(long, short)]
    pub wallpaper: bool,
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Show the next background.
    Next,
    /// Show the previous background.
    Prev,
    /// Pause or resume the automatic rotation.
    Toggle,
    /// Change the auto-switch delay; the raw value is normalized by the manager.
    Delay(String),
    /// The viewport changed size.
    Resize,
    /// Print the current state.
    Status,
    /// End the session.
    Quit,
}

impl FromStr for SessionCommand {
    type Err = BackdropError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let argument = parts.next();

        let command = match (name.as_str(), argument) {
            ("next" | "n", None) => Self::Next,
            ("prev" | "p", None) => Self::Prev,
            ("toggle" | "t", None) => Self::Toggle,
            ("delay" | "d", Some(value)) => Self::Delay(value.to_string()),
            ("delay" | "d", None) => {
                return Err(BackdropError::InvalidArguments(
                    "delay expects a value in milliseconds".to_string(),
                ));
            }
            ("resize", None) => Self::Resize,
            ("status" | "s", None) => Self::Status,
            ("quit" | "q" | "exit", None) => Self::Quit,
            _ => {
                return Err(BackdropError::InvalidArguments(format!(
                    "unknown command: {}",
                    line.trim()
                )));
            }
        };

        if parts.next().is_some() {
            return Err(BackdropError::InvalidArguments(format!(
                "too many arguments: {}",
                line.trim()
            )));
        }

        Ok(command)
    }
}

/// Snapshot printed by `status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionStatus {
    current: Option<String>,
    index: usize,
    count: usize,
    delay_ms: f64,
    auto_switch: bool,
    transition_pending: bool,
    controls: ControlState,
}

impl SessionStatus {
    fn of(manager: &RotationManager) -> Self {
        Self {
            current: manager.current(),
            index: manager.current_index(),
            count: manager.catalog().len(),
            delay_ms: manager.delay_ms(),
            auto_switch: manager.is_auto_switch_running(),
            transition_pending: manager.is_transition_pending(),
            controls: manager.controls(),
        }
    }
}

/// Execute the `run` command.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built or status output fails.
pub fn execute(args: &RunArgs, config: &BackdropConfig) -> Result<(), BackdropError> {
    runtime()?.block_on(run_session(args, config))
}

async fn run_session(args: &RunArgs, config: &BackdropConfig) -> Result<(), BackdropError> {
    let backgrounds = &config.backgrounds;
    let root = backgrounds.root_dir();

    let store: Arc<dyn PreferenceStore> =
        Arc::new(JsonFilePreferenceStore::open(config.preferences.resolved_path()));
    let surface: Arc<dyn BackgroundSurface> = if args.wallpaper {
        Arc::new(WallpaperSurface::new(root.clone()))
    } else {
        Arc::new(LogSurface)
    };
    let probe = ImageFileProbe::new(root);

    let manager = background::setup(backgrounds, &probe, store, surface).await;
    output::print_json_line(&SessionStatus::of(&manager))?;

    let mut lines = spawn_stdin_reader();
    while let Some(line) = lines.recv().await {
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<SessionCommand>() {
            Ok(SessionCommand::Quit) => break,
            Ok(command) => dispatch(&manager, command)?,
            Err(err) => eprintln!("{} {err}", "error:".red()),
        }
    }

    tracing::debug!("session ended");
    Ok(())
}

fn dispatch(manager: &RotationManager, command: SessionCommand) -> Result<(), BackdropError> {
    match command {
        SessionCommand::Next => manager.advance(1),
        SessionCommand::Prev => manager.advance(-1),
        SessionCommand::Toggle => {
            manager.toggle_auto_switch();
        }
        SessionCommand::Delay(raw) => {
            manager.set_delay(&raw);
        }
        SessionCommand::Resize => manager.refresh(),
        SessionCommand::Status => output::print_json_line(&SessionStatus::of(manager))?,
        SessionCommand::Quit => {}
    }
    Ok(())
}

/// Reads stdin on a dedicated thread. The channel closes at end of input.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}
