mod system;

use std::io;
use std::rc::Rc;
use std::sync::mpsc;

use thiserror::Error;

use crate::theme::ThemeMode;

pub use system::{SchemeDetector, SystemAppearance, DEFAULT_POLL_INTERVAL};

pub type AppearanceResult<T> = std::result::Result<T, AppearanceError>;

#[derive(Debug, Error)]
pub enum AppearanceError {
    #[error("system appearance is not available")]
    Unavailable,
    #[error("failed to spawn appearance watcher")]
    Spawn(#[source] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppearanceEvent {
    SchemeChanged(ThemeMode),
    /// The application came back to the foreground; the scheme must be re-read.
    Foreground,
}

/// Sending half of the appearance channel. Cheap to clone and `Send`, so
/// watcher threads can hold their own copy.
#[derive(Debug, Clone)]
pub struct AppearanceSender {
    tx: mpsc::Sender<AppearanceEvent>,
}

impl AppearanceSender {
    /// Returns `false` once the receiving controller is gone.
    pub fn send(&self, event: AppearanceEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn scheme_changed(&self, scheme: ThemeMode) -> bool {
        self.send(AppearanceEvent::SchemeChanged(scheme))
    }

    pub fn foreground(&self) -> bool {
        self.send(AppearanceEvent::Foreground)
    }
}

pub fn appearance_channel() -> (AppearanceSender, mpsc::Receiver<AppearanceEvent>) {
    let (tx, rx) = mpsc::channel();
    (AppearanceSender { tx }, rx)
}

/// Stops a running watch when dropped.
#[must_use = "dropping a WatchGuard stops the appearance watch"]
pub struct WatchGuard {
    stop: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchGuard {
    pub fn new(stop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            stop: Some(Box::new(stop)),
        }
    }

    /// A guard for sources that have nothing to tear down.
    pub fn detached() -> Self {
        Self { stop: None }
    }

    pub fn stop(mut self) {
        self.run_stop();
    }

    fn run_stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.run_stop();
    }
}

impl std::fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchGuard")
            .field("running", &self.stop.is_some())
            .finish()
    }
}

/// OS color-scheme capability.
pub trait AppearanceSource {
    fn current_scheme(&self) -> AppearanceResult<ThemeMode>;

    /// Starts pushing `SchemeChanged` events into `sender` until the guard is dropped.
    fn watch(&self, sender: AppearanceSender) -> AppearanceResult<WatchGuard>;
}

impl<T: AppearanceSource + ?Sized> AppearanceSource for Rc<T> {
    fn current_scheme(&self) -> AppearanceResult<ThemeMode> {
        (**self).current_scheme()
    }

    fn watch(&self, sender: AppearanceSender) -> AppearanceResult<WatchGuard> {
        (**self).watch(sender)
    }
}

impl<T: AppearanceSource + ?Sized> AppearanceSource for Box<T> {
    fn current_scheme(&self) -> AppearanceResult<ThemeMode> {
        (**self).current_scheme()
    }

    fn watch(&self, sender: AppearanceSender) -> AppearanceResult<WatchGuard> {
        (**self).watch(sender)
    }
}
