pub mod appearance;
pub mod biometric;
mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod theme;

pub use config::{load_app_config, AppConfig};
pub use error::{AppError, AppResult};

use appearance::SystemAppearance;
use store::{JsonFileStore, MemoryStore, PersistenceStore};
use theme::{ThemeController, ThemeOptions};

/// Command-line switches understood by the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupConfig {
    /// Keep running and follow system appearance changes.
    pub watch: bool,
}

impl StartupConfig {
    pub fn from_args() -> Self {
        Self::from_arg_list(std::env::args().skip(1))
    }

    fn from_arg_list<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        for arg in args {
            match arg.as_ref() {
                "--watch" | "-w" => config.watch = true,
                other => tracing::warn!(arg = other, "ignoring unknown argument"),
            }
        }
        config
    }
}

/// Entrypoint used by the binary.
pub fn run(startup: StartupConfig) -> AppResult<()> {
    let config = load_app_config();
    logging::init(config.log_level.as_deref());
    tracing::info!("starting Moneta");

    let store: Box<dyn PersistenceStore> = match JsonFileStore::with_default_path() {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "using theme store");
            Box::new(store)
        }
        Err(err) => {
            tracing::warn!(?err, "theme store unavailable; preferences will not persist");
            Box::new(MemoryStore::new())
        }
    };
    let poll_interval = config.appearance_poll_interval();
    let options = ThemeOptions {
        overrides: config.colors.clone(),
        fallback_scheme: config.fallback_scheme(),
    };
    let mut controller = ThemeController::new(SystemAppearance::new(poll_interval), store, options);
    let _subscription = controller.subscribe(|state| {
        tracing::info!(
            mode = %state.mode(),
            auto_theme = state.auto_theme(),
            background = state.palette().background.as_str(),
            "theme changed"
        );
    });

    let state = controller.state();
    tracing::info!(
        mode = %state.mode(),
        auto_theme = state.auto_theme(),
        "startup complete"
    );

    if !startup.watch {
        return Ok(());
    }

    controller.start_watching()?;
    loop {
        std::thread::sleep(poll_interval);
        controller.process_events();
    }
}
