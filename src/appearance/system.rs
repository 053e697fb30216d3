//! Desktop appearance source backed by the OS color-scheme setting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

use super::{AppearanceError, AppearanceResult, AppearanceSender, AppearanceSource, WatchGuard};
use crate::theme::ThemeMode;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// Reads the OS scheme; `None` means the platform gave no usable answer.
pub type SchemeDetector = fn() -> Option<ThemeMode>;

/// Polls the desktop color scheme; the desktop has no push notification we can rely on.
///
/// A detector returning `None` surfaces as [`AppearanceError::Unavailable`], which
/// lets the controller fall back to its configured scheme.
#[derive(Debug, Clone, Copy)]
pub struct SystemAppearance {
    poll_interval: Duration,
    detector: SchemeDetector,
}

impl SystemAppearance {
    pub fn new(poll_interval: Duration) -> Self {
        Self::with_detector(poll_interval, os_scheme_detector)
    }

    /// Uses `detector` instead of querying the OS; handy for tests and for forcing a mode.
    pub fn with_detector(poll_interval: Duration, detector: SchemeDetector) -> Self {
        Self {
            poll_interval,
            detector,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for SystemAppearance {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl AppearanceSource for SystemAppearance {
    fn current_scheme(&self) -> AppearanceResult<ThemeMode> {
        (self.detector)().ok_or(AppearanceError::Unavailable)
    }

    fn watch(&self, sender: AppearanceSender) -> AppearanceResult<WatchGuard> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let detector = self.detector;
        let interval = self.poll_interval;
        let mut last = detector();

        thread::Builder::new()
            .name("appearance-watch".to_string())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    thread::sleep(interval);
                    if stop_flag.load(Ordering::Relaxed) {
                        break;
                    }
                    let Some(current) = detector() else {
                        continue;
                    };
                    if last == Some(current) {
                        continue;
                    }
                    tracing::debug!(from = ?last, to = %current, "system color scheme changed");
                    last = Some(current);
                    if !sender.scheme_changed(current) {
                        break;
                    }
                }
                tracing::debug!("appearance watcher exited");
            })
            .map_err(AppearanceError::Spawn)?;

        Ok(WatchGuard::new(move || stop.store(true, Ordering::Relaxed)))
    }
}

fn os_scheme_detector() -> Option<ThemeMode> {
    match detect_os_theme() {
        OsThemeMode::Dark => Some(ThemeMode::Dark),
        OsThemeMode::Light => Some(ThemeMode::Light),
    }
}
