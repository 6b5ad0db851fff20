//! Persisted preference commands.

use clap::Subcommand;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::background::{JsonFilePreferenceStore, PreferenceStore};
use crate::cli::output;
use crate::config::BackdropConfig;
use crate::error::BackdropError;

/// Preference subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum PrefsCommands {
    /// Show the persisted selection and switch interval.
    Show {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Remove every persisted preference.
    ///
    /// The next session starts at the first background with the default
    /// interval.
    Clear,

    /// Show the path of the preference file.
    Path,
}

#[derive(Tabled)]
struct PreferenceRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Execute preference subcommands.
///
/// # Errors
///
/// Returns an error if the preference file cannot be written or JSON output
/// fails.
pub fn execute(cmd: &PrefsCommands, config: &BackdropConfig) -> Result<(), BackdropError> {
    let path = config.preferences.resolved_path();

    match cmd {
        PrefsCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        PrefsCommands::Show { json } => show(&JsonFilePreferenceStore::open(path), *json),
        PrefsCommands::Clear => {
            let store = JsonFilePreferenceStore::open(path);
            store.clear()?;
            tracing::info!(path = %store.path().display(), "preferences cleared");
            println!("Preferences cleared.");
            Ok(())
        }
    }
}

fn show(store: &dyn PreferenceStore, json: bool) -> Result<(), BackdropError> {
    let entries = store.entries();

    if json {
        return output::print_json(&entries);
    }

    if entries.is_empty() {
        output::print_notice("No preferences stored.");
        return Ok(());
    }

    let count = entries.len();
    let rows = entries.into_iter().map(|(key, value)| PreferenceRow { key, value });
    let table = Table::new(rows).with(Style::rounded()).to_string();

    output::print_title("Preferences", count);
    println!("{table}");
    Ok(())
}
