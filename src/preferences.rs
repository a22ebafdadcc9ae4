//! The preference store: selected theme, auto-rotation, and the task that
//! drives rotation.
//!
//! All state sits behind one mutex. User operations and rotation ticks each
//! hold it for their whole duration (including persistence and style
//! publication), so every operation is observed as a single step.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::persistence::{PreferenceStorage, AUTO_CHANGE_THEME_KEY, SELECTED_THEME_KEY};
use crate::style::StyleRoot;
use crate::theme::{next_index, ThemeDefinition, DEFAULT_THEME_INDEX, THEMES};

pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_millis(5000);

/// Read model handed to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceSnapshot {
    pub theme: &'static ThemeDefinition,
    pub current_index: usize,
    pub catalog: &'static [ThemeDefinition],
    pub auto_rotate: bool,
}

struct Rotation {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

struct State {
    selected_index: usize,
    auto_rotate: bool,
    storage: Box<dyn PreferenceStorage>,
    style_root: StyleRoot,
    rotation: Option<Rotation>,
    changes: watch::Sender<u64>,
}

impl State {
    fn theme(&self) -> &'static ThemeDefinition {
        &THEMES[self.selected_index]
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!("Failed to persist {}={}: {}", key, value, e);
        }
    }

    fn select(&mut self, index: usize) {
        self.selected_index = index;
        self.persist(SELECTED_THEME_KEY, &index.to_string());
        self.style_root.publish_theme(self.theme());
        self.changes.send_modify(|revision| *revision += 1);
    }

    fn stop_rotation(&mut self) {
        if let Some(rotation) = self.rotation.take() {
            rotation.token.cancel();
            debug!("Theme rotation cancelled");
        }
    }

    fn rotation_active(&self) -> bool {
        self.rotation
            .as_ref()
            .is_some_and(|r| !r.token.is_cancelled() && !r.handle.is_finished())
    }
}

/// Owns the persisted theme preferences and the rotation task.
///
/// Create one with [`PreferenceStore::initialize`] at startup and pass it to
/// whatever needs it. Dropping the store (or calling [`dispose`]) cancels the
/// rotation task.
///
/// [`dispose`]: PreferenceStore::dispose
pub struct PreferenceStore {
    state: Arc<Mutex<State>>,
    interval: Duration,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("PreferenceStore")
            .field("selected_index", &state.selected_index)
            .field("auto_rotate", &state.auto_rotate)
            .field("rotating", &state.rotation_active())
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Parse a persisted theme index. Anything that is not an integer inside the
/// catalog resolves to the default theme.
pub fn parse_selected_index(raw: Option<&str>) -> usize {
    match raw.map(|s| s.trim().parse::<i64>()) {
        Some(Ok(index)) if index >= 0 && (index as usize) < THEMES.len() => index as usize,
        Some(Ok(index)) => {
            debug!("Persisted theme index {} is outside the catalog, using default", index);
            DEFAULT_THEME_INDEX
        }
        Some(Err(_)) => {
            debug!("Persisted theme index is not a number, using default");
            DEFAULT_THEME_INDEX
        }
        None => DEFAULT_THEME_INDEX,
    }
}

/// Parse a persisted auto-rotate flag: only the exact string `"false"` disables it.
pub fn parse_auto_rotate(raw: Option<&str>) -> bool {
    raw != Some("false")
}

impl PreferenceStore {
    /// Read persisted preferences, publish the resolved theme to `style_root`,
    /// and arm rotation if it is enabled.
    ///
    /// Arming rotation spawns a tokio task, so when auto-rotate is on this must
    /// be called from within a runtime.
    pub fn initialize(
        storage: Box<dyn PreferenceStorage>,
        style_root: StyleRoot,
        interval: Duration,
    ) -> Result<Self> {
        let interval = if interval.is_zero() { DEFAULT_ROTATION_INTERVAL } else { interval };
        let selected_index = parse_selected_index(storage.get(SELECTED_THEME_KEY).as_deref());
        let auto_rotate = parse_auto_rotate(storage.get(AUTO_CHANGE_THEME_KEY).as_deref());
        let (changes, _) = watch::channel(0);

        let state = State {
            selected_index,
            auto_rotate,
            storage,
            style_root,
            rotation: None,
            changes,
        };
        state.style_root.publish_theme(state.theme());
        info!(
            "Preferences loaded: theme={} ({}), auto_rotate={}",
            selected_index,
            state.theme().name,
            auto_rotate
        );

        let store = Self {
            state: Arc::new(Mutex::new(state)),
            interval,
        };
        if auto_rotate {
            let mut state = store.lock();
            store.arm_rotation(&mut state)?;
        }
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> PreferenceSnapshot {
        let state = self.lock();
        PreferenceSnapshot {
            theme: state.theme(),
            current_index: state.selected_index,
            catalog: &THEMES,
            auto_rotate: state.auto_rotate,
        }
    }

    pub fn theme(&self) -> &'static ThemeDefinition {
        self.lock().theme()
    }

    pub fn current_index(&self) -> usize {
        self.lock().selected_index
    }

    pub fn auto_rotate(&self) -> bool {
        self.lock().auto_rotate
    }

    pub fn catalog(&self) -> &'static [ThemeDefinition] {
        &THEMES
    }

    /// Whether a rotation task is currently alive.
    pub fn is_rotating(&self) -> bool {
        self.lock().rotation_active()
    }

    /// Receiver that observes a new revision after every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.lock().changes.subscribe()
    }

    /// Select a theme by catalog index. Leaves auto-rotate untouched.
    pub fn set_theme(&self, index: usize) -> Result<()> {
        if index >= THEMES.len() {
            return Err(Error::ThemeIndexOutOfRange { index, len: THEMES.len() });
        }
        let mut state = self.lock();
        state.select(index);
        info!("Theme set to {} ({})", index, state.theme().name);
        Ok(())
    }

    /// Enable or disable rotation. Does not change the selected theme.
    pub fn set_auto_rotate(&self, enabled: bool) -> Result<()> {
        let mut state = self.lock();
        state.auto_rotate = enabled;
        state.persist(AUTO_CHANGE_THEME_KEY, if enabled { "true" } else { "false" });
        if enabled {
            self.arm_rotation(&mut state)?;
        } else {
            state.stop_rotation();
        }
        state.changes.send_modify(|revision| *revision += 1);
        info!("Auto theme rotation {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Cancel the rotation task. Safe to call more than once.
    pub fn dispose(&self) {
        self.lock().stop_rotation();
    }

    fn arm_rotation(&self, state: &mut State) -> Result<()> {
        if state.rotation_active() {
            return Ok(());
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let token = CancellationToken::new();
        let handle = runtime.spawn(rotate(Arc::clone(&self.state), token.clone(), self.interval));
        state.rotation = Some(Rotation { token, handle });
        debug!("Theme rotation armed every {:?}", self.interval);
        Ok(())
    }
}

impl Drop for PreferenceStore {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn rotate(state: Arc<Mutex<State>>, token: CancellationToken, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
                // A cancel that landed while we waited for the lock wins.
                if token.is_cancelled() {
                    break;
                }
                let next = next_index(state.selected_index);
                state.select(next);
                debug!("Rotated theme to {} ({})", next, state.theme().name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn open(storage: &MemoryStorage) -> (PreferenceStore, StyleRoot) {
        let root = StyleRoot::new();
        let store = PreferenceStore::initialize(Box::new(storage.clone()), root.clone(), DEFAULT_ROTATION_INTERVAL)
            .expect("initialize");
        (store, root)
    }

    async fn elapse(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    fn assert_published(root: &StyleRoot, index: usize) {
        for (name, value) in THEMES[index].style_variables() {
            assert_eq!(root.get(name).as_deref(), Some(value), "variable {}", name);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn defaults_with_no_persisted_state() {
        let storage = MemoryStorage::new();
        let (store, root) = open(&storage);
        assert_eq!(store.current_index(), 0);
        assert!(store.auto_rotate());
        assert!(store.is_rotating());
        assert_published(&root, 0);
    }

    #[test]
    fn parse_selected_index_falls_back_to_default() {
        assert_eq!(parse_selected_index(None), 0);
        assert_eq!(parse_selected_index(Some("2")), 2);
        assert_eq!(parse_selected_index(Some("abc")), 0);
        assert_eq!(parse_selected_index(Some("")), 0);
        assert_eq!(parse_selected_index(Some("7")), 0);
        assert_eq!(parse_selected_index(Some("-1")), 0);
    }

    #[test]
    fn parse_auto_rotate_only_disables_on_false_literal() {
        assert!(parse_auto_rotate(None));
        assert!(parse_auto_rotate(Some("true")));
        assert!(parse_auto_rotate(Some("FALSE")));
        assert!(parse_auto_rotate(Some("0")));
        assert!(!parse_auto_rotate(Some("false")));
    }

    #[test]
    fn initialize_without_runtime_is_fine_when_rotation_is_off() {
        let storage = MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false"), (SELECTED_THEME_KEY, "1")]);
        let store = PreferenceStore::initialize(Box::new(storage), StyleRoot::new(), DEFAULT_ROTATION_INTERVAL)
            .unwrap();
        assert_eq!(store.current_index(), 1);
        assert!(!store.is_rotating());
    }

    #[test]
    fn initialize_without_runtime_fails_when_rotation_is_on() {
        let result = PreferenceStore::initialize(Box::new(MemoryStorage::new()), StyleRoot::new(), DEFAULT_ROTATION_INTERVAL);
        assert!(matches!(result, Err(Error::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn set_theme_round_trips_through_storage() {
        let storage = MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false")]);
        let (store, _) = open(&storage);
        store.set_theme(2).unwrap();
        drop(store);

        let (reloaded, root) = open(&storage);
        assert_eq!(reloaded.current_index(), 2);
        assert_published(&root, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rotation_wraps_from_last_to_first() {
        let storage = MemoryStorage::with_values([(SELECTED_THEME_KEY, "2")]);
        let (store, root) = open(&storage);
        assert_eq!(store.current_index(), 2);

        elapse(5_010).await;
        assert_eq!(store.current_index(), 0);
        assert_eq!(storage.get(SELECTED_THEME_KEY).as_deref(), Some("0"));
        assert_published(&root, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn set_theme_does_not_touch_auto_rotate() {
        let storage = MemoryStorage::new();
        let (store, _) = open(&storage);
        store.set_theme(1).unwrap();
        assert!(store.auto_rotate());

        store.set_auto_rotate(false).unwrap();
        store.set_theme(2).unwrap();
        assert!(!store.auto_rotate());
    }

    #[tokio::test(start_paused = true)]
    async fn set_auto_rotate_does_not_touch_index() {
        let storage = MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false"), (SELECTED_THEME_KEY, "1")]);
        let (store, _) = open(&storage);
        store.set_auto_rotate(true).unwrap();
        assert_eq!(store.current_index(), 1);
        assert_eq!(storage.get(AUTO_CHANGE_THEME_KEY).as_deref(), Some("true"));
    }

    #[tokio::test(start_paused = true)]
    async fn arming_twice_runs_a_single_rotation() {
        let storage = MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false")]);
        let (store, _) = open(&storage);
        store.set_auto_rotate(true).unwrap();
        store.set_auto_rotate(true).unwrap();

        elapse(5_010).await;
        assert_eq!(store.current_index(), 1, "two drivers would have advanced twice");

        store.set_auto_rotate(false).unwrap();
        assert!(!store.is_rotating());
        elapse(20_000).await;
        assert_eq!(store.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_set_theme_is_rejected() {
        let storage = MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false")]);
        let (store, root) = open(&storage);
        let frame = root.frame();

        let err = store.set_theme(3).unwrap_err();
        assert!(matches!(err, Error::ThemeIndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(store.current_index(), 0);
        assert_eq!(root.frame(), frame);
        assert_eq!(storage.get(SELECTED_THEME_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_stops_ticks() {
        let storage = MemoryStorage::new();
        let (store, _) = open(&storage);
        store.dispose();
        store.dispose();
        elapse(15_000).await;
        assert_eq!(store.current_index(), 0);
        assert!(store.auto_rotate(), "dispose does not change the persisted flag");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_store_stops_its_task() {
        let storage = MemoryStorage::new();
        let (store, _) = open(&storage);
        drop(store);
        elapse(15_000).await;
        assert_eq!(storage.get(SELECTED_THEME_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn every_change_publishes_the_full_theme() {
        let storage = MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false")]);
        let (store, root) = open(&storage);
        for index in [1, 2, 0, 2] {
            store.set_theme(index).unwrap();
            assert_published(&root, store.current_index());
        }
        store.set_auto_rotate(true).unwrap();
        elapse(5_010).await;
        assert_eq!(store.current_index(), 0);
        for _ in 0..3 {
            assert_published(&root, store.current_index());
            elapse(5_000).await;
        }
        assert_published(&root, store.current_index());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_rotation_ticks() {
        let storage = MemoryStorage::new();
        let (store, _) = open(&storage);
        let mut changes = store.subscribe();
        assert!(!changes.has_changed().unwrap());

        elapse(5_010).await;
        assert!(changes.has_changed().unwrap());
        let _ = changes.borrow_and_update();
    }

    #[tokio::test(start_paused = true)]
    async fn manual_pick_then_rotation_scenario() {
        let storage = MemoryStorage::new();
        let (store, _) = open(&storage);
        assert_eq!(store.theme().name, "red");

        store.set_auto_rotate(false).unwrap();
        store.set_theme(1).unwrap();
        assert_eq!(store.theme().name, "blue");
        elapse(5_010).await;
        assert_eq!(store.theme().name, "blue");

        store.set_auto_rotate(true).unwrap();
        elapse(5_020).await;
        assert_eq!(store.current_index(), 2);
        assert_eq!(store.theme().name, "grey");
        elapse(5_000).await;
        assert_eq!(store.current_index(), 0);
        assert_eq!(store.theme().name, "red");
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_exposes_read_model() {
        let storage = MemoryStorage::with_values([(AUTO_CHANGE_THEME_KEY, "false"), (SELECTED_THEME_KEY, "2")]);
        let (store, _) = open(&storage);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.current_index, 2);
        assert_eq!(snapshot.theme.name, "grey");
        assert_eq!(snapshot.catalog.len(), 3);
        assert!(!snapshot.auto_rotate);
    }
}
