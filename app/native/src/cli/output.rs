//! CLI output formatting utilities.

use colored::Colorize;
use serde::Serialize;

use crate::error::BackdropError;

/// Prints `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), BackdropError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints `value` as a single JSON line on stdout.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn print_json_line<T: Serialize + ?Sized>(value: &T) -> Result<(), BackdropError> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Prints a bold section title followed by its item count.
pub fn print_title(title: &str, count: usize) {
    println!("{}", format!("{title} ({count})").bold());
}

/// Prints a dimmed notice, used for empty results.
pub fn print_notice(message: &str) {
    println!("{}", message.dimmed());
}

/// Formats a boolean as a colored check mark.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
