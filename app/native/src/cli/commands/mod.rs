//! CLI command definitions using Clap.
//!
//! - `run` - Interactive rotation session driven from stdin
//! - `list` - Background discovery
//! - `prefs` - Persisted preference management

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config::{self, BackdropConfig};
use crate::constants::APP_NAME;
use crate::error::BackdropError;

pub mod list;
pub mod prefs;
pub mod run;

pub use list::ListArgs;
pub use prefs::PrefsCommands;
pub use run::RunArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backdrop CLI - rotating background images.
#[derive(Parser, Debug)]
#[command(name = "backdrop")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Start the background rotation.
    ///
    /// Discovers backgrounds, resumes the saved selection, and rotates until
    /// stdin is closed or `quit` is read.
    Run(RunArgs),

    /// List discovered backgrounds.
    List(ListArgs),

    /// Persisted preference commands.
    #[command(subcommand)]
    Prefs(PrefsCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support JSON
    /// Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(backdrop completions --shell zsh)"
    ///   backdrop completions --shell fish > ~/.config/fish/completions/backdrop.fish
    #[command(verbatim_doc_comment)]
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command
    /// fails.
    pub fn execute(&self) -> Result<(), BackdropError> {
        match &self.command {
            Commands::Run(args) => run::execute(args, &self.load_config()?),
            Commands::List(args) => list::execute(args, &self.load_config()?),
            Commands::Prefs(cmd) => prefs::execute(cmd, &self.load_config()?),

            Commands::Schema => {
                println!("{}", schema_json()?);
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    fn load_config(&self) -> Result<BackdropConfig, BackdropError> {
        match &self.config {
            Some(path) if !path.exists() => Err(BackdropError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            ))),
            custom => Ok(config::load(custom.as_deref())?),
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, APP_NAME, &mut io::stdout());
    }
}

/// Renders the configuration JSON Schema.
fn schema_json() -> Result<String, BackdropError> {
    let schema = schemars::schema_for!(BackdropConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Builds the single-threaded runtime every async command runs on.
fn runtime() -> Result<tokio::runtime::Runtime, BackdropError> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_time().build()?)
}
