use serde::{Deserialize, Serialize};

use super::ThemeMode;

/// Semantic color roles consumed by presentational components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub background: String,
    pub text: String,
    pub secondary_text: String,
    pub border: String,
    pub card_background: String,
    pub primary: String,
    pub danger: String,
    pub success: String,
    pub gray: String,
}

impl ColorPalette {
    pub fn light() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            text: "#111827".to_string(),
            secondary_text: "#6B7280".to_string(),
            border: "#E5E7EB".to_string(),
            card_background: "#F9FAFB".to_string(),
            primary: "#2563EB".to_string(),
            danger: "#DC2626".to_string(),
            success: "#16A34A".to_string(),
            gray: "#9CA3AF".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#09090B".to_string(),
            text: "#F4F4F5".to_string(),
            secondary_text: "#A1A1AA".to_string(),
            border: "#27272A".to_string(),
            card_background: "#18181B".to_string(),
            primary: "#3B82F6".to_string(),
            danger: "#EF4444".to_string(),
            success: "#22C55E".to_string(),
            gray: "#71717A".to_string(),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }
}

/// Per-role overrides; every field is optional so a config can patch a single color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOverrides {
    pub background: Option<String>,
    pub text: Option<String>,
    pub secondary_text: Option<String>,
    pub border: Option<String>,
    pub card_background: Option<String>,
    pub primary: Option<String>,
    pub danger: Option<String>,
    pub success: Option<String>,
    pub gray: Option<String>,
}

/// Shared overrides plus per-mode overrides, applied in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteOverrides {
    #[serde(default)]
    pub common: RoleOverrides,
    #[serde(default)]
    pub light: RoleOverrides,
    #[serde(default)]
    pub dark: RoleOverrides,
}

/// Resolve the palette for a mode, applying user overrides on top of the built-in colors.
pub fn resolve_palette(mode: ThemeMode, overrides: Option<&PaletteOverrides>) -> ColorPalette {
    let mut palette = ColorPalette::for_mode(mode);

    if let Some(overrides) = overrides {
        apply_overrides(&mut palette, &overrides.common);
        let mode_overrides = match mode {
            ThemeMode::Light => &overrides.light,
            ThemeMode::Dark => &overrides.dark,
        };
        apply_overrides(&mut palette, mode_overrides);
    }

    palette
}

fn apply_overrides(palette: &mut ColorPalette, overrides: &RoleOverrides) {
    let slots = [
        (&mut palette.background, &overrides.background),
        (&mut palette.text, &overrides.text),
        (&mut palette.secondary_text, &overrides.secondary_text),
        (&mut palette.border, &overrides.border),
        (&mut palette.card_background, &overrides.card_background),
        (&mut palette.primary, &overrides.primary),
        (&mut palette.danger, &overrides.danger),
        (&mut palette.success, &overrides.success),
        (&mut palette.gray, &overrides.gray),
    ];
    for (slot, value) in slots {
        if let Some(value) = value {
            slot.clone_from(value);
        }
    }
}
