//! CLI module for Backdrop.
//!
//! Every command loads the configuration first, then either runs an
//! interactive rotation session or inspects discovery and preferences.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::BackdropError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), BackdropError> {
    let cli = Cli::parse();
    cli.execute()
}
