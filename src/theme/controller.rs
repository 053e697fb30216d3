use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::mpsc;

use serde_json::Value;

use super::subscription::{ListenerRegistry, Subscription};
use super::transition::{next_state, ThemeEvent, ThemeTransition};
use super::{PaletteOverrides, ThemeMode, ThemeSettings, ThemeState};
use crate::appearance::{
    appearance_channel, AppearanceEvent, AppearanceResult, AppearanceSender, AppearanceSource,
    WatchGuard,
};
use crate::store::PersistenceStore;

pub const AUTO_THEME_KEY: &str = "autoTheme";
pub const THEME_KEY: &str = "theme";

/// Oldest transitions are dropped past this many.
pub const HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct ThemeOptions {
    pub overrides: Option<PaletteOverrides>,
    /// Mode used when neither the OS nor the store can tell us anything.
    pub fallback_scheme: ThemeMode,
}

/// Single owner of the theme state.
///
/// All mutation goes through `toggle_theme`, `toggle_auto_theme` and
/// `on_appearance_changed`; every applied change is persisted (best effort)
/// and then pushed to subscribers before the call returns.
pub struct ThemeController<A, S> {
    source: A,
    store: S,
    options: ThemeOptions,
    state: ThemeState,
    listeners: Rc<ListenerRegistry>,
    sender: AppearanceSender,
    events: mpsc::Receiver<AppearanceEvent>,
    watch: Option<WatchGuard>,
    history: VecDeque<ThemeTransition>,
}

impl<A: AppearanceSource, S: PersistenceStore> ThemeController<A, S> {
    pub fn new(source: A, store: S, options: ThemeOptions) -> Self {
        let settings = seed_settings(
            read_auto_theme(&store),
            read_pinned_mode(&store),
            read_os_scheme(&source),
            options.fallback_scheme,
        );
        tracing::info!(
            mode = %settings.mode,
            auto_theme = settings.auto_theme,
            "theme state initialised"
        );

        let state = ThemeState::resolve(settings, options.overrides.as_ref());
        let (sender, events) = appearance_channel();
        Self {
            source,
            store,
            options,
            state,
            listeners: Rc::new(ListenerRegistry::default()),
            sender,
            events,
            watch: None,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    pub fn state(&self) -> &ThemeState {
        &self.state
    }

    /// The most recent applied transitions, oldest first.
    pub fn history(&self) -> &VecDeque<ThemeTransition> {
        &self.history
    }

    pub fn toggle_theme(&mut self) {
        self.apply(ThemeEvent::ToggleTheme);
    }

    pub fn toggle_auto_theme(&mut self) {
        // Only re-enabling auto needs a fresh reading of the OS scheme.
        let os_scheme = if self.state.auto_theme() {
            None
        } else {
            read_os_scheme(&self.source)
        };
        self.apply(ThemeEvent::ToggleAutoTheme { os_scheme });
    }

    /// Returns whether the event changed the state.
    pub fn on_appearance_changed(&mut self, scheme: ThemeMode) -> bool {
        self.apply(ThemeEvent::AppearanceChanged(scheme))
    }

    /// Re-reads the OS scheme after the app returns to the foreground.
    pub fn on_foreground(&mut self) -> bool {
        match read_os_scheme(&self.source) {
            Some(scheme) => self.on_appearance_changed(scheme),
            None => false,
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&ThemeState) + 'static) -> Subscription {
        self.listeners.add(Rc::new(listener))
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Sender hosts use to forward lifecycle events (e.g. foreground) into the controller.
    pub fn appearance_sender(&self) -> AppearanceSender {
        self.sender.clone()
    }

    pub fn start_watching(&mut self) -> AppearanceResult<()> {
        if self.watch.is_some() {
            return Ok(());
        }
        self.watch = Some(self.source.watch(self.sender.clone())?);
        tracing::debug!("watching system appearance");
        // The watcher only reports changes after it starts; catch up on anything
        // the OS did since the state was seeded.
        self.on_foreground();
        Ok(())
    }

    pub fn stop_watching(&mut self) {
        if let Some(guard) = self.watch.take() {
            guard.stop();
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Drains queued appearance events in arrival order and returns how many changed the state.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            let changed = match event {
                AppearanceEvent::SchemeChanged(scheme) => self.on_appearance_changed(scheme),
                AppearanceEvent::Foreground => self.on_foreground(),
            };
            if changed {
                applied += 1;
            }
        }
        applied
    }

    fn apply(&mut self, event: ThemeEvent) -> bool {
        let from = self.state.settings();
        let Some(to) = next_state(from, event) else {
            tracing::trace!(?event, mode = %from.mode, auto_theme = from.auto_theme, "theme event ignored");
            return false;
        };

        tracing::debug!(?from, ?event, ?to, "theme transition");
        self.state = ThemeState::resolve(to, self.options.overrides.as_ref());
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(ThemeTransition { from, event, to });
        self.persist(from, event, to);
        self.listeners.notify(&self.state);
        true
    }

    fn persist(&self, from: ThemeSettings, event: ThemeEvent, to: ThemeSettings) {
        if matches!(event, ThemeEvent::AppearanceChanged(_)) {
            return;
        }
        self.write(AUTO_THEME_KEY, Value::Bool(to.auto_theme));
        if !to.auto_theme || to.mode != from.mode {
            self.write(THEME_KEY, Value::String(to.mode.as_str().to_string()));
        }
    }

    fn write(&self, key: &str, value: Value) {
        if let Err(err) = self.store.set(key, value) {
            tracing::warn!(?err, key, "failed to persist theme preference");
        }
    }
}

impl<A, S> std::fmt::Debug for ThemeController<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("state", &self.state)
            .field("subscribers", &self.listeners.len())
            .field("watching", &self.watch.is_some())
            .finish()
    }
}

fn seed_settings(
    persisted_auto: Option<bool>,
    persisted_mode: Option<ThemeMode>,
    os_scheme: Option<ThemeMode>,
    fallback: ThemeMode,
) -> ThemeSettings {
    let auto_theme = persisted_auto.unwrap_or(true);
    let mode = if auto_theme {
        os_scheme.or(persisted_mode)
    } else {
        persisted_mode.or(os_scheme)
    }
    .unwrap_or(fallback);
    ThemeSettings { mode, auto_theme }
}

fn read_os_scheme(source: &impl AppearanceSource) -> Option<ThemeMode> {
    source
        .current_scheme()
        .map_err(|err| tracing::warn!(?err, "system appearance unavailable"))
        .ok()
}

fn read_auto_theme(store: &impl PersistenceStore) -> Option<bool> {
    match read_key(store, AUTO_THEME_KEY)? {
        Value::Bool(auto_theme) => Some(auto_theme),
        other => {
            tracing::warn!(value = %other, "ignoring malformed persisted autoTheme");
            None
        }
    }
}

fn read_pinned_mode(store: &impl PersistenceStore) -> Option<ThemeMode> {
    let raw = read_key(store, THEME_KEY)?;
    serde_json::from_value(raw)
        .map_err(|err| tracing::warn!(?err, "ignoring malformed persisted theme"))
        .ok()
}

fn read_key(store: &impl PersistenceStore, key: &str) -> Option<Value> {
    store.get(key).unwrap_or_else(|err| {
        tracing::warn!(?err, key, "failed to read theme preference; using default");
        None
    })
}
