//! Background discovery by probing sequentially numbered candidates.
//!
//! Indices are scanned in increasing order. Every extension of one index is
//! probed concurrently and the whole group is awaited before the next index,
//! since the missing-streak counter has to observe indices in order.

use std::collections::HashSet;
use std::future::Future;

use futures::future::join_all;

use crate::config::BackgroundConfig;

/// Checks whether a background identifier can be loaded.
///
/// A probe never fails: it resolves to the identifier when the resource
/// loads and to `None` otherwise.
pub trait ResourceProbe {
    /// Attempts to load `identifier`.
    fn probe(&self, identifier: String) -> impl Future<Output = Option<String>> + Send;
}

/// Any predicate over identifiers is a probe that resolves immediately.
impl<F> ResourceProbe for F
where F: Fn(&str) -> bool
{
    fn probe(&self, identifier: String) -> impl Future<Output = Option<String>> + Send {
        let hit = self(&identifier);
        std::future::ready(hit.then_some(identifier))
    }
}

/// Scans `1..=max_scan_index` and returns every identifier that exists.
///
/// Hits of one index keep the extension order. The scan ends early once
/// `stop_after_missing_streak` consecutive indices missed and at least one
/// background was already found; a leading gap never ends the scan. The
/// result holds no duplicates and may be empty.
pub async fn discover<P>(probe: &P, config: &BackgroundConfig) -> Vec<String>
where P: ResourceProbe + ?Sized {
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    let mut missing_streak = 0u32;

    for index in 1..=config.max_scan_index {
        let checks = config
            .extensions
            .iter()
            .map(|ext| probe.probe(config.candidate(index, ext)));
        let hits: Vec<String> = join_all(checks).await.into_iter().flatten().collect();

        if hits.is_empty() {
            missing_streak += 1;

            if missing_streak >= config.stop_after_missing_streak && !found.is_empty() {
                tracing::debug!(index, missing_streak, "background scan stopped early");
                break;
            }
        } else {
            missing_streak = 0;
            found.extend(hits.into_iter().filter(|id| seen.insert(id.clone())));
        }
    }

    tracing::info!(count = found.len(), "background discovery finished");
    found
}
