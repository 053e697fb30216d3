use super::{ThemeMode, ThemeSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeEvent {
    /// Explicit user flip; always leaves auto tracking off.
    ToggleTheme,
    /// Switch between auto and manual tracking. `os_scheme` is the scheme the
    /// platform reports at the moment of the switch, if any.
    ToggleAutoTheme { os_scheme: Option<ThemeMode> },
    AppearanceChanged(ThemeMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeTransition {
    pub from: ThemeSettings,
    pub event: ThemeEvent,
    pub to: ThemeSettings,
}

/// Pure transition function. `None` means the event leaves the settings untouched
/// and nobody should be notified.
pub fn next_state(current: ThemeSettings, event: ThemeEvent) -> Option<ThemeSettings> {
    match event {
        ThemeEvent::ToggleTheme => Some(ThemeSettings {
            mode: current.mode.toggled(),
            auto_theme: false,
        }),
        ThemeEvent::ToggleAutoTheme { .. } if current.auto_theme => Some(ThemeSettings {
            mode: current.mode,
            auto_theme: false,
        }),
        ThemeEvent::ToggleAutoTheme { os_scheme } => Some(ThemeSettings {
            mode: os_scheme.unwrap_or(current.mode),
            auto_theme: true,
        }),
        ThemeEvent::AppearanceChanged(scheme) => {
            if !current.auto_theme || scheme == current.mode {
                return None;
            }
            Some(ThemeSettings {
                mode: scheme,
                auto_theme: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ThemeSettings; 4] = [
        ThemeSettings {
            mode: ThemeMode::Light,
            auto_theme: true,
        },
        ThemeSettings {
            mode: ThemeMode::Dark,
            auto_theme: true,
        },
        ThemeSettings {
            mode: ThemeMode::Light,
            auto_theme: false,
        },
        ThemeSettings {
            mode: ThemeMode::Dark,
            auto_theme: false,
        },
    ];

    #[test]
    fn toggle_theme_always_disables_auto_and_flips_mode() {
        for current in ALL {
            let next = next_state(current, ThemeEvent::ToggleTheme).expect("toggle always applies");
            assert!(!next.auto_theme);
            assert_eq!(next.mode, current.mode.toggled());
        }
    }

    #[test]
    fn appearance_change_is_ignored_while_pinned() {
        for current in ALL.into_iter().filter(|s| !s.auto_theme) {
            for scheme in [ThemeMode::Light, ThemeMode::Dark] {
                assert_eq!(next_state(current, ThemeEvent::AppearanceChanged(scheme)), None);
            }
        }
    }

    #[test]
    fn appearance_change_to_current_mode_is_a_no_op() {
        let current = ALL[1];
        assert_eq!(
            next_state(current, ThemeEvent::AppearanceChanged(ThemeMode::Dark)),
            None
        );
    }

    #[test]
    fn appearance_change_is_adopted_in_auto_mode() {
        let next = next_state(ALL[0], ThemeEvent::AppearanceChanged(ThemeMode::Dark)).unwrap();
        assert_eq!(
            next,
            ThemeSettings {
                mode: ThemeMode::Dark,
                auto_theme: true
            }
        );
    }

    #[test]
    fn enabling_auto_resyncs_with_os_scheme() {
        let pinned_light = ALL[2];
        let next = next_state(
            pinned_light,
            ThemeEvent::ToggleAutoTheme {
                os_scheme: Some(ThemeMode::Dark),
            },
        )
        .unwrap();
        assert_eq!(next.mode, ThemeMode::Dark);
        assert!(next.auto_theme);
    }

    #[test]
    fn enabling_auto_without_os_signal_keeps_mode() {
        let next = next_state(ALL[3], ThemeEvent::ToggleAutoTheme { os_scheme: None }).unwrap();
        assert_eq!(next.mode, ThemeMode::Dark);
        assert!(next.auto_theme);
    }

    #[test]
    fn disabling_auto_pins_current_mode() {
        let next = next_state(
            ALL[1],
            ThemeEvent::ToggleAutoTheme {
                os_scheme: Some(ThemeMode::Light),
            },
        )
        .unwrap();
        assert_eq!(
            next,
            ThemeSettings {
                mode: ThemeMode::Dark,
                auto_theme: false
            }
        );
    }
}
