//! The session's ordered, de-duplicated set of background identifiers.

use std::collections::HashSet;

/// Ordered background identifiers confirmed for the current session.
///
/// Built once at startup and never mutated afterwards. A catalog is never
/// empty: construction substitutes the fallback identifier when discovery
/// found nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundCatalog {
    entries: Vec<String>,
}

impl BackgroundCatalog {
    /// Builds a catalog from discovered identifiers.
    ///
    /// Duplicates are dropped keeping the first occurrence. If nothing
    /// remains, the catalog holds `fallback` alone.
    #[must_use]
    pub fn new(found: Vec<String>, fallback: &str) -> Self {
        let mut seen = HashSet::with_capacity(found.len());
        let mut entries: Vec<String> =
            found.into_iter().filter(|id| seen.insert(id.clone())).collect();

        if entries.is_empty() {
            tracing::debug!(fallback, "no backgrounds discovered, using fallback");
            entries.push(fallback.to_string());
        }

        Self { entries }
    }

    /// Number of entries, always at least one.
    #[must_use]
    pub const fn len(&self) -> usize { self.entries.len() }

    /// Whether the catalog has no entries; `false` for every constructed catalog.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Whether there is more than one background to rotate through.
    #[must_use]
    pub const fn has_options(&self) -> bool { self.entries.len() > 1 }

    /// Returns the identifier at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> { self.entries.get(index).map(String::as_str) }

    /// Returns the position of `identifier`, if present.
    #[must_use]
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry == identifier)
    }

    /// Returns the index reached by moving `step` entries from `index`,
    /// wrapping in both directions.
    #[must_use]
    pub fn wrap(&self, index: usize, step: i64) -> usize {
        let len = i64::try_from(self.entries.len()).unwrap_or(i64::MAX);
        let current = i64::try_from(index).unwrap_or(0);
        let next = current.saturating_add(step).rem_euclid(len);
        usize::try_from(next).unwrap_or(0)
    }

    /// Returns the identifiers as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] { &self.entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> { names.iter().map(ToString::to_string).collect() }

    #[test]
    fn test_empty_discovery_uses_fallback() {
        let catalog = BackgroundCatalog::new(Vec::new(), "fundos/fundo_1.jpg");
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_empty());
        assert!(!catalog.has_options());
        assert_eq!(catalog.get(0), Some("fundos/fundo_1.jpg"));
    }

    #[test]
    fn test_duplicates_are_removed_keeping_order() {
        let catalog = BackgroundCatalog::new(ids(&["b", "a", "b", "c", "a"]), "x");
        assert_eq!(catalog.as_slice(), ids(&["b", "a", "c"]).as_slice());
    }

    #[test]
    fn test_position_lookup() {
        let catalog = BackgroundCatalog::new(ids(&["a", "b", "c"]), "x");
        assert_eq!(catalog.position("c"), Some(2));
        assert_eq!(catalog.position("missing"), None);
    }

    #[test]
    fn test_wrap_forward_and_backward() {
        let catalog = BackgroundCatalog::new(ids(&["a", "b", "c"]), "x");
        assert_eq!(catalog.wrap(2, 1), 0);
        assert_eq!(catalog.wrap(0, -1), 2);
        assert_eq!(catalog.wrap(1, 0), 1);
        assert_eq!(catalog.wrap(1, 7), 2);
        assert_eq!(catalog.wrap(1, -7), 0);
    }

    #[test]
    fn test_wrap_stays_in_range_for_any_step() {
        for len in 1..=6 {
            let names: Vec<String> = (0..len).map(|i| format!("bg_{i}")).collect();
            let catalog = BackgroundCatalog::new(names, "x");
            for start in 0..len {
                for step in [-1_000_003, -13, -1, 0, 1, 5, 999, i64::MAX, i64::MIN] {
                    assert!(catalog.wrap(start, step) < len);
                }
            }
        }
    }
}
