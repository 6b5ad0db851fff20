//! Background rotation manager.
//!
//! Owns the catalog, the active index, the auto-switch delay, and the two
//! timers of the slideshow: the repeating auto-switch timer and the one-shot
//! crossfade commit. At most one of each exists at any time; starting a new
//! one always cancels the previous one first.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::catalog::BackgroundCatalog;
use super::controls::ControlState;
use super::discovery::{ResourceProbe, discover};
use super::preferences::{self, PreferenceStore};
use super::scheduler::{ScheduledTask, period_from_ms};
use super::surface::BackgroundSurface;
use crate::config::BackgroundConfig;

/// Mutable rotation state, guarded by the manager's lock.
#[derive(Debug)]
struct RotationState {
    /// Index of the active background in the catalog.
    current_index: usize,
    /// Auto-switch delay in milliseconds; always finite and positive.
    delay_ms: f64,
    /// Whether the user paused the rotation with the toggle.
    stopped: bool,
    /// Bumped on every transition; a commit only lands if it still matches.
    transition_generation: u64,
    /// Repeating auto-switch timer.
    auto_switch: Option<ScheduledTask>,
    /// Pending crossfade commit.
    transition: Option<ScheduledTask>,
}

/// Discovers nothing itself; drives a fixed catalog through a surface and
/// persists user choices to a preference store.
pub struct RotationManager {
    catalog: BackgroundCatalog,
    config: BackgroundConfig,
    store: Arc<dyn PreferenceStore>,
    surface: Arc<dyn BackgroundSurface>,
    state: Mutex<RotationState>,
    /// Handed to timer tasks so they never keep the manager alive.
    this: Weak<Self>,
}

impl std::fmt::Debug for RotationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationManager")
            .field("catalog", &self.catalog)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl RotationManager {
    /// Creates a manager positioned at `current_index` (clamped to 0 when
    /// out of range). Nothing is rendered and no timer is started.
    #[must_use]
    pub fn new(
        catalog: BackgroundCatalog,
        config: &BackgroundConfig,
        store: Arc<dyn PreferenceStore>,
        surface: Arc<dyn BackgroundSurface>,
        current_index: usize,
        delay_ms: f64,
    ) -> Arc<Self> {
        let current_index = if current_index < catalog.len() { current_index } else { 0 };
        let delay_ms =
            if delay_ms.is_finite() && delay_ms > 0.0 { delay_ms } else { config.default_delay_ms() };

        Arc::new_cyclic(|this| Self {
            catalog,
            config: config.clone(),
            store,
            surface,
            state: Mutex::new(RotationState {
                current_index,
                delay_ms,
                stopped: false,
                transition_generation: 0,
                auto_switch: None,
                transition: None,
            }),
            this: this.clone(),
        })
    }

    /// The session's catalog.
    #[must_use]
    pub const fn catalog(&self) -> &BackgroundCatalog { &self.catalog }

    /// Index of the active background.
    #[must_use]
    pub fn current_index(&self) -> usize { self.state.lock().current_index }

    /// Identifier of the active background.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        let index = self.current_index();
        self.catalog.get(index).map(ToString::to_string)
    }

    /// Active auto-switch delay in milliseconds.
    #[must_use]
    pub fn delay_ms(&self) -> f64 { self.state.lock().delay_ms }

    /// Whether the repeating auto-switch timer is scheduled.
    #[must_use]
    pub fn is_auto_switch_running(&self) -> bool { self.state.lock().auto_switch.is_some() }

    /// Whether a crossfade is waiting to be committed.
    #[must_use]
    pub fn is_transition_pending(&self) -> bool { self.state.lock().transition.is_some() }

    /// Display state for the controls.
    #[must_use]
    pub fn controls(&self) -> ControlState {
        let state = self.state.lock();
        ControlState::new(
            self.catalog.has_options(),
            state.stopped,
            preferences::format_delay(state.delay_ms),
        )
    }

    /// Moves `step` entries through the catalog, wrapping in both
    /// directions, and crossfades to the result.
    pub fn advance(&self, step: i64) {
        let mut state = self.state.lock();
        state.current_index = self.catalog.wrap(state.current_index, step);

        let Some(identifier) = self.catalog.get(state.current_index) else {
            return;
        };
        tracing::debug!(step, index = state.current_index, "advancing background");
        self.apply_locked(&mut state, identifier, true);
    }

    /// Shows `identifier`.
    ///
    /// Without a transition both layers switch at once and the selection is
    /// persisted. With one, any pending commit is abandoned, the next layer
    /// fades in, and after the fade duration the selection is committed and
    /// persisted.
    pub fn apply(&self, identifier: &str, with_transition: bool) {
        let mut state = self.state.lock();
        self.apply_locked(&mut state, identifier, with_transition);
    }

    /// Reapplies the active background without a transition, e.g. after the
    /// viewport was resized.
    pub fn refresh(&self) {
        let mut state = self.state.lock();
        if let Some(identifier) = self.catalog.get(state.current_index) {
            self.apply_locked(&mut state, identifier, false);
        }
    }

    /// (Re)starts the auto-switch timer at the active delay. A catalog with a
    /// single background never rotates.
    pub fn start_auto_switch(&self) {
        let mut state = self.state.lock();
        self.start_auto_switch_locked(&mut state);
    }

    /// Stops a running rotation, or starts a stopped one. Returns whether the
    /// rotation is shown as running afterwards.
    pub fn toggle_auto_switch(&self) -> bool {
        let mut state = self.state.lock();

        if let Some(running) = state.auto_switch.take() {
            running.cancel();
            state.stopped = true;
            tracing::info!("background auto-switch paused");
        } else {
            self.start_auto_switch_locked(&mut state);
            state.stopped = false;
            tracing::info!("background auto-switch resumed");
        }

        !state.stopped
    }

    /// Sets the auto-switch delay from a raw control value.
    ///
    /// Anything but a finite number greater than zero selects the default
    /// delay. The result is persisted, and a running timer is restarted so it
    /// takes effect immediately. Returns the delay now in use.
    pub fn set_delay(&self, raw: &str) -> f64 {
        let delay_ms = preferences::normalize_delay(raw, self.config.default_delay_ms());

        let mut state = self.state.lock();
        state.delay_ms = delay_ms;
        preferences::save_delay(self.store.as_ref(), delay_ms);
        tracing::info!(delay_ms, "background switch interval changed");

        if state.auto_switch.is_some() {
            self.start_auto_switch_locked(&mut state);
        }

        delay_ms
    }

    fn apply_locked(&self, state: &mut RotationState, identifier: &str, with_transition: bool) {
        if !with_transition {
            self.commit(identifier);
            return;
        }

        if let Some(pending) = state.transition.take() {
            pending.cancel();
        }
        state.transition_generation = state.transition_generation.wrapping_add(1);
        let generation = state.transition_generation;

        self.surface.set_next(identifier);
        self.surface.set_transition(true);

        let this = self.this.clone();
        let identifier = identifier.to_string();
        state.transition = Some(ScheduledTask::once(self.config.fade_duration(), move || {
            if let Some(manager) = this.upgrade() {
                manager.finish_transition(generation, &identifier);
            }
        }));
    }

    fn finish_transition(&self, generation: u64, identifier: &str) {
        let mut state = self.state.lock();
        if state.transition_generation != generation {
            tracing::trace!(background = identifier, "dropping superseded transition");
            return;
        }

        self.commit(identifier);
        self.surface.set_transition(false);
        state.transition = None;
    }

    fn commit(&self, identifier: &str) {
        self.surface.set_current(identifier);
        self.surface.set_next(identifier);
        preferences::save_selection(self.store.as_ref(), identifier);
    }

    fn start_auto_switch_locked(&self, state: &mut RotationState) {
        if let Some(running) = state.auto_switch.take() {
            running.cancel();
        }

        if !self.catalog.has_options() {
            return;
        }

        let period = period_from_ms(state.delay_ms);
        let this = self.this.clone();
        state.auto_switch = Some(ScheduledTask::repeating(period, move || {
            if let Some(manager) = this.upgrade() {
                manager.advance(1);
            }
        }));
        tracing::debug!(?period, "background auto-switch scheduled");
    }
}

/// Sets up the rotation: loads the persisted delay, discovers backgrounds,
/// resumes the persisted selection when it is still available, renders it
/// without a transition, and starts the auto-switch timer.
///
/// Must run inside a tokio runtime; the returned manager owns its timers.
pub async fn setup<P: ResourceProbe>(
    config: &BackgroundConfig,
    probe: &P,
    store: Arc<dyn PreferenceStore>,
    surface: Arc<dyn BackgroundSurface>,
) -> Arc<RotationManager> {
    let delay_ms = preferences::load_delay(store.as_ref(), config.default_delay_ms());
    preferences::save_delay(store.as_ref(), delay_ms);

    let found = discover(probe, config).await;
    let catalog = BackgroundCatalog::new(found, &config.fallback);

    let saved_index = preferences::load_selection(store.as_ref())
        .and_then(|saved| catalog.position(&saved));
    let current_index = saved_index.unwrap_or(0);
    tracing::info!(
        count = catalog.len(),
        index = current_index,
        resumed = saved_index.is_some(),
        delay_ms,
        "background rotation ready"
    );

    let manager = RotationManager::new(catalog, config, store, surface, current_index, delay_ms);
    manager.refresh();
    manager.start_auto_switch();
    manager
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::background::preferences::MemoryPreferenceStore;
    use crate::constants::keys;

    /// Surface that records every render step.
    #[derive(Default)]
    struct RecordingSurface {
        events: parking_lot::Mutex<Vec<String>>,
    }

    impl RecordingSurface {
        fn events(&self) -> Vec<String> { self.events.lock().clone() }

        fn committed(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| e.strip_prefix("current:").map(ToString::to_string))
                .collect()
        }
    }

    impl BackgroundSurface for RecordingSurface {
        fn set_current(&self, identifier: &str) {
            self.events.lock().push(format!("current:{identifier}"));
        }

        fn set_next(&self, identifier: &str) {
            self.events.lock().push(format!("next:{identifier}"));
        }

        fn set_transition(&self, active: bool) {
            self.events.lock().push(format!("transition:{active}"));
        }
    }

    fn catalog(len: usize) -> BackgroundCatalog {
        BackgroundCatalog::new((1..=len).map(|i| format!("fundos/fundo_{i}.png")).collect(), "x")
    }

    fn manager_with(
        len: usize,
    ) -> (Arc<RotationManager>, Arc<RecordingSurface>, Arc<MemoryPreferenceStore>) {
        let surface = Arc::new(RecordingSurface::default());
        let store = Arc::new(MemoryPreferenceStore::new());
        let manager = RotationManager::new(
            catalog(len),
            &BackgroundConfig::default(),
            store.clone(),
            surface.clone(),
            0,
            20_000.0,
        );
        (manager, surface, store)
    }

    fn selected(store: &MemoryPreferenceStore) -> Option<String> {
        store.get(keys::SELECTED_BACKGROUND)
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_wraps_in_both_directions() {
        let (manager, _, _) = manager_with(3);

        manager.advance(-1);
        assert_eq!(manager.current_index(), 2);
        manager.advance(1);
        assert_eq!(manager.current_index(), 0);
        manager.advance(5);
        assert_eq!(manager.current_index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_index_always_in_range() {
        for len in 1..=5 {
            let (manager, _, _) = manager_with(len);
            for step in [0, 1, 2, 3, 7, 100, 12_345] {
                manager.advance(step);
                assert!(manager.current_index() < len);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_without_transition_commits_immediately() {
        let (manager, surface, store) = manager_with(3);

        manager.apply("fundos/fundo_2.png", false);

        assert_eq!(surface.events(), vec![
            "current:fundos/fundo_2.png",
            "next:fundos/fundo_2.png"
        ]);
        assert_eq!(selected(&store).as_deref(), Some("fundos/fundo_2.png"));
        assert!(!manager.is_transition_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transition_commits_after_fade() {
        let (manager, surface, store) = manager_with(3);

        manager.apply("fundos/fundo_3.png", true);
        assert!(manager.is_transition_pending());
        assert_eq!(surface.events(), vec!["next:fundos/fundo_3.png", "transition:true"]);
        assert_eq!(selected(&store), None);

        tokio::time::sleep(Duration::from_millis(899)).await;
        assert!(surface.committed().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(surface.committed(), vec!["fundos/fundo_3.png"]);
        assert_eq!(surface.events().last().map(String::as_str), Some("transition:false"));
        assert_eq!(selected(&store).as_deref(), Some("fundos/fundo_3.png"));
        assert!(!manager.is_transition_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_transition_wins() {
        let (manager, surface, store) = manager_with(3);

        manager.apply("fundos/fundo_2.png", true);
        tokio::time::sleep(Duration::from_millis(500)).await;
        manager.apply("fundos/fundo_3.png", true);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(surface.committed().is_empty());
        assert_eq!(selected(&store), None);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(surface.committed(), vec!["fundos/fundo_3.png"]);
        assert_eq!(selected(&store).as_deref(), Some("fundos/fundo_3.png"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_commit_is_ignored() {
        let (manager, surface, _) = manager_with(3);

        manager.apply("fundos/fundo_2.png", true);
        manager.apply("fundos/fundo_3.png", true);
        manager.finish_transition(1, "fundos/fundo_2.png");

        assert!(surface.committed().is_empty());
        assert!(manager.is_transition_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_switch_advances_every_delay() {
        let (manager, _, _) = manager_with(3);
        manager.start_auto_switch();
        assert!(manager.is_auto_switch_running());

        tokio::time::sleep(Duration::from_millis(19_999)).await;
        assert_eq!(manager.current_index(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(manager.current_index(), 1);

        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(manager.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_background_never_auto_switches() {
        let (manager, _, _) = manager_with(1);
        manager.start_auto_switch();
        assert!(!manager.is_auto_switch_running());

        assert!(manager.toggle_auto_switch());
        assert!(!manager.is_auto_switch_running());
        assert!(!manager.controls().toggle_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_twice_restores_state_and_cadence() {
        let (manager, _, _) = manager_with(3);
        manager.start_auto_switch();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!manager.toggle_auto_switch());
        assert!(!manager.is_auto_switch_running());
        assert!(manager.controls().stopped);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(manager.current_index(), 0);

        assert!(manager.toggle_auto_switch());
        assert!(manager.is_auto_switch_running());
        assert!(!manager.controls().stopped);

        tokio::time::sleep(Duration::from_millis(19_999)).await;
        assert_eq!(manager.current_index(), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(manager.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_delay_invalid_values_use_default() {
        let (manager, _, store) = manager_with(3);

        for raw in ["0", "-1", "NaN", "inf", "-inf", "soon", ""] {
            manager.set_delay("1234");
            assert!((manager.set_delay(raw) - 20_000.0).abs() < f64::EPSILON);
            assert!((manager.delay_ms() - 20_000.0).abs() < f64::EPSILON);
            assert_eq!(store.get(keys::SWITCH_INTERVAL).as_deref(), Some("20000"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_delay_restarts_running_timer() {
        let (manager, _, store) = manager_with(3);
        manager.start_auto_switch();

        tokio::time::sleep(Duration::from_secs(2)).await;
        manager.set_delay("5000");
        assert_eq!(store.get(keys::SWITCH_INTERVAL).as_deref(), Some("5000"));

        tokio::time::sleep(Duration::from_millis(5_001)).await;
        assert_eq!(manager.current_index(), 1);
        assert_eq!(manager.controls().interval_value, "5000");
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_delay_keeps_stopped_rotation_stopped() {
        let (manager, _, _) = manager_with(3);
        manager.start_auto_switch();
        manager.toggle_auto_switch();

        manager.set_delay("1000");
        assert!(!manager.is_auto_switch_running());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(manager.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_reapplies_without_transition() {
        let (manager, surface, _) = manager_with(3);
        manager.advance(2);
        tokio::time::sleep(Duration::from_secs(1)).await;

        manager.refresh();
        let events = surface.events();
        assert_eq!(&events[events.len() - 2..], [
            "current:fundos/fundo_3.png".to_string(),
            "next:fundos/fundo_3.png".to_string()
        ]);
        assert!(!manager.is_transition_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_manager_stops_timers() {
        let (manager, surface, _) = manager_with(3);
        manager.start_auto_switch();
        manager.apply("fundos/fundo_2.png", true);
        drop(manager);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(surface.committed().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_setup_resumes_saved_selection() {
        let surface = Arc::new(RecordingSurface::default());
        let store = Arc::new(MemoryPreferenceStore::with_entries([
            (keys::SELECTED_BACKGROUND, "fundos/fundo_2.jpg"),
            (keys::SWITCH_INTERVAL, "7000"),
        ]));
        let probe = |id: &str| matches!(id, "fundos/fundo_1.png" | "fundos/fundo_2.jpg");

        let manager =
            setup(&BackgroundConfig::default(), &probe, store.clone(), surface.clone()).await;

        assert_eq!(manager.catalog().len(), 2);
        assert_eq!(manager.current_index(), 1);
        assert!((manager.delay_ms() - 7000.0).abs() < f64::EPSILON);
        assert_eq!(surface.committed(), vec!["fundos/fundo_2.jpg"]);
        assert!(manager.is_auto_switch_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_setup_unknown_selection_starts_at_zero() {
        let surface = Arc::new(RecordingSurface::default());
        let store = Arc::new(MemoryPreferenceStore::with_entries([
            (keys::SELECTED_BACKGROUND, "fundos/fundo_99.png"),
            (keys::SWITCH_INTERVAL, "-3"),
        ]));
        let probe = |id: &str| id == "fundos/fundo_1.png" || id == "fundos/fundo_2.png";

        let manager = setup(&BackgroundConfig::default(), &probe, store.clone(), surface).await;

        assert_eq!(manager.current_index(), 0);
        assert!((manager.delay_ms() - 20_000.0).abs() < f64::EPSILON);
        assert_eq!(store.get(keys::SWITCH_INTERVAL).as_deref(), Some("20000"));
        assert_eq!(selected(&store).as_deref(), Some("fundos/fundo_1.png"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_setup_empty_discovery_uses_fallback() {
        let surface = Arc::new(RecordingSurface::default());
        let store = Arc::new(MemoryPreferenceStore::new());
        let probe = |_: &str| false;
        let config = BackgroundConfig { max_scan_index: 5, ..Default::default() };

        let manager = setup(&config, &probe, store, surface.clone()).await;

        assert_eq!(manager.current().as_deref(), Some("fundos/fundo_1.jpg"));
        assert_eq!(surface.committed(), vec!["fundos/fundo_1.jpg"]);
        assert!(!manager.is_auto_switch_running());
        assert!(!manager.controls().prev_enabled);
    }
}
