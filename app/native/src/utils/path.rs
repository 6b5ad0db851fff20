//! Path helpers for configured directories and background identifiers.

use std::path::{Component, Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
///
/// Absolute and relative paths are returned unchanged; surrounding whitespace
/// is trimmed and an empty input yields an empty path.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}

/// Resolves a background identifier (a `/`-separated relative name such as
/// `fundos/fundo_3.png`) against `root`.
///
/// Returns `None` for identifiers that would escape `root`: absolute names
/// or names containing `..`.
#[must_use]
pub fn resolve_identifier(root: &Path, identifier: &str) -> Option<PathBuf> {
    let relative = Path::new(identifier);

    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if identifier.is_empty() || escapes {
        return None;
    }

    Some(root.join(relative))
}
