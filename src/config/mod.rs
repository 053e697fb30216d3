use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::appearance::DEFAULT_POLL_INTERVAL;
use crate::theme::{PaletteOverrides, ThemeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "moneta";
const APP_CONFIG_FILE: &str = "config.json";

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Mode used when the OS scheme cannot be read.
    #[serde(default)]
    pub fallback_scheme: Option<ThemeMode>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub appearance_poll_ms: Option<u64>,
    #[serde(default)]
    pub colors: Option<PaletteOverrides>,
}

impl AppConfig {
    pub fn fallback_scheme(&self) -> ThemeMode {
        self.fallback_scheme.unwrap_or_default()
    }

    pub fn appearance_poll_interval(&self) -> Duration {
        self.appearance_poll_ms
            .filter(|ms| *ms > 0)
            .map_or(DEFAULT_POLL_INTERVAL, Duration::from_millis)
    }
}

pub fn load_app_config() -> AppConfig {
    load_app_config_from(&ConfigDirs::from_env())
}

fn load_app_config_from(dirs: &ConfigDirs) -> AppConfig {
    let Ok(path) = dirs.app_file(APP_CONFIG_FILE) else {
        tracing::debug!("no config root; using default app config");
        return AppConfig::default();
    };
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return AppConfig::default(),
        Err(err) => {
            tracing::warn!(?err, path = %path.display(), "unreadable config.json; using defaults");
            return AppConfig::default();
        }
    };
    serde_json::from_str(&contents).unwrap_or_else(|err| {
        tracing::warn!(?err, path = %path.display(), "malformed config.json; using defaults");
        AppConfig::default()
    })
}

/// Where per-user files for the app live: `$XDG_CONFIG_HOME/moneta`, else `$HOME/.config/moneta`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ConfigDirs {
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
}

impl ConfigDirs {
    pub(crate) fn new(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            xdg_config_home: xdg_config_home.filter(|dir| !dir.as_os_str().is_empty()),
            home,
        }
    }

    pub(crate) fn from_env() -> Self {
        Self::new(
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        )
    }

    pub(crate) fn app_dir(&self) -> Result<PathBuf, ConfigPathError> {
        let root = match (&self.xdg_config_home, &self.home) {
            (Some(xdg), _) => xdg.clone(),
            (None, Some(home)) => home.join(".config"),
            (None, None) => return Err(ConfigPathError::MissingHomeDirectory),
        };
        Ok(root.join(APP_DIR))
    }

    pub(crate) fn app_file(&self, file_name: &str) -> Result<PathBuf, ConfigPathError> {
        self.app_dir().map(|dir| dir.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_root(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        std::env::temp_dir().join(format!("moneta-config-{tag}-{}-{nanos}", std::process::id()))
    }

    fn rooted(root: &std::path::Path) -> ConfigDirs {
        ConfigDirs::new(Some(root.to_path_buf()), None)
    }

    #[test]
    fn app_file_prefers_xdg_config_home() {
        let dirs = ConfigDirs::new(
            Some(PathBuf::from("/tmp/config-root")),
            Some(PathBuf::from("/tmp/home")),
        );
        assert_eq!(
            dirs.app_file("theme.json").unwrap(),
            PathBuf::from("/tmp/config-root/moneta/theme.json")
        );
    }

    #[test]
    fn app_file_ignores_empty_xdg_config_home() {
        let dirs = ConfigDirs::new(Some(PathBuf::new()), Some(PathBuf::from("/tmp/home")));
        assert_eq!(
            dirs.app_file("theme.json").unwrap(),
            PathBuf::from("/tmp/home/.config/moneta/theme.json")
        );
    }

    #[test]
    fn app_dir_errors_without_any_root() {
        let error = ConfigDirs::default().app_dir().unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let root = fixture_root("missing");
        let config = load_app_config_from(&rooted(&root));
        assert_eq!(config.fallback_scheme(), ThemeMode::Light);
        assert_eq!(config.appearance_poll_interval(), DEFAULT_POLL_INTERVAL);
        assert!(config.colors.is_none());
    }

    #[test]
    fn config_file_is_parsed() {
        let root = fixture_root("parsed");
        let dir = root.join(APP_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(APP_CONFIG_FILE),
            r##"{
                "fallback_scheme": "dark",
                "log_level": "debug",
                "appearance_poll_ms": 250,
                "colors": { "common": { "primary": "#123456" } }
            }"##,
        )
        .unwrap();

        let config = load_app_config_from(&rooted(&root));
        assert_eq!(config.fallback_scheme(), ThemeMode::Dark);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.appearance_poll_interval(), Duration::from_millis(250));
        let colors = config.colors.expect("colors should parse");
        assert_eq!(colors.common.primary.as_deref(), Some("#123456"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn invalid_config_file_falls_back_to_defaults() {
        let root = fixture_root("invalid");
        let dir = root.join(APP_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(APP_CONFIG_FILE), "{ nope").unwrap();

        let config = load_app_config_from(&rooted(&root));
        assert!(config.fallback_scheme.is_none());
        assert!(config.log_level.is_none());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn zero_poll_interval_uses_default() {
        let config = AppConfig {
            appearance_poll_ms: Some(0),
            ..AppConfig::default()
        };
        assert_eq!(config.appearance_poll_interval(), DEFAULT_POLL_INTERVAL);
    }
}
