//! Background discovery listing.

use clap::Args;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::runtime;
use crate::background::preferences::load_selection;
use crate::background::{ImageFileProbe, JsonFilePreferenceStore, discover};
use crate::cli::output;
use crate::config::BackdropConfig;
use crate::error::BackdropError;

/// Arguments of the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON.
    #[arg(long, short)]
    pub json: bool,
}

/// One discovered background.
#[derive(Debug, Serialize, Tabled)]
struct BackgroundRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Background")]
    identifier: String,
    #[tabled(rename = "Selected", display = "format_selected")]
    selected: bool,
}

/// Execute the `list` command.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built or JSON output fails.
pub fn execute(args: &ListArgs, config: &BackdropConfig) -> Result<(), BackdropError> {
    let backgrounds = &config.backgrounds;
    let probe = ImageFileProbe::new(backgrounds.root_dir());
    let found = runtime()?.block_on(discover(&probe, backgrounds));

    let store = JsonFilePreferenceStore::open(config.preferences.resolved_path());
    let rows = rows(found, load_selection(&store).as_deref());

    if args.json {
        return output::print_json(&rows);
    }

    if rows.is_empty() {
        output::print_notice(&format!(
            "No backgrounds found under {}; the rotation would show {}.",
            probe.root().display(),
            backgrounds.fallback
        ));
        return Ok(());
    }

    let count = rows.len();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .with(Modify::new(Columns::last()).with(Alignment::center()))
        .to_string();

    output::print_title("Backgrounds", count);
    println!("{table}");
    Ok(())
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature required by `tabled(display)`
fn format_selected(selected: &bool) -> String { output::format_bool(*selected) }

fn rows(found: Vec<String>, selected: Option<&str>) -> Vec<BackgroundRow> {
    found
        .into_iter()
        .enumerate()
        .map(|(index, identifier)| BackgroundRow {
            selected: selected == Some(identifier.as_str()),
            index,
            identifier,
        })
        .collect()
}
