mod controller;
mod palette;
mod subscription;
mod transition;

use serde::{Deserialize, Serialize};

pub use controller::{ThemeController, ThemeOptions, AUTO_THEME_KEY, HISTORY_LIMIT, THEME_KEY};
pub use palette::{resolve_palette, ColorPalette, PaletteOverrides, RoleOverrides};
pub use subscription::Subscription;
pub use transition::{next_state, ThemeEvent, ThemeTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mode/auto pair that drives every theme transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub auto_theme: bool,
}

/// Process-wide appearance state handed to subscribers.
///
/// The palette is always derived from `mode` when the state is built, so a
/// `ThemeState` never carries colors for the other mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeState {
    settings: ThemeSettings,
    palette: ColorPalette,
}

impl ThemeState {
    pub fn resolve(settings: ThemeSettings, overrides: Option<&PaletteOverrides>) -> Self {
        Self {
            settings,
            palette: resolve_palette(settings.mode, overrides),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.settings.mode
    }

    pub fn auto_theme(&self) -> bool {
        self.settings.auto_theme
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn settings(&self) -> ThemeSettings {
        self.settings
    }

    pub fn is_dark(&self) -> bool {
        self.settings.mode == ThemeMode::Dark
    }
}
