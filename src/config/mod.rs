pub mod env_file;
pub mod paths;
pub mod settings;


use crate::error::Result;
use log::warn;
use std::sync::{Arc, Mutex};

pub use env_file::EnvOverlay;
pub use paths::AppPaths;
pub use settings::{Group, Settings, TransitionDisplay};

/// Owner of the persisted configuration: the YAML settings file plus the
/// optional env-file overlay next to it. Mutations go through
/// `update_settings` and are written back immediately.
pub struct Config {
    paths: AppPaths,
    settings: Arc<Mutex<Settings>>,
    env: Arc<Mutex<EnvOverlay>>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = AppPaths::new()?;
        let settings = Settings::load(&paths.config_file)?;
        log_warnings(&settings);
        let env = load_overlay(&settings);

        Ok(Config {
            paths,
            settings: Arc::new(Mutex::new(settings)),
            env: Arc::new(Mutex::new(env)),
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Snapshot of the current settings. Callers work on the clone and never
    /// hold the lock across fetches or dialogs.
    pub fn settings(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }

    pub fn env(&self) -> EnvOverlay {
        self.env.lock().unwrap().clone()
    }

    /// Re-read the config file and env overlay in place ("Reload config").
    pub fn reload(&self) -> Result<()> {
        let fresh = Settings::load(&self.paths.config_file)?;
        log_warnings(&fresh);
        *self.env.lock().unwrap() = load_overlay(&fresh);
        *self.settings.lock().unwrap() = fresh;
        Ok(())
    }

    /// Mutate the settings and persist them to the config file.
    pub fn update_settings<F>(&self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.lock().unwrap();
        updater(&mut settings);
        log_warnings(&settings);
        settings.save(&self.paths.config_file)
    }
}

fn log_warnings(settings: &Settings) {
    for warning in settings.validate() {
        warn!("config: {warning}");
    }
}

fn load_overlay(settings: &Settings) -> EnvOverlay {
    match &settings.env_file {
        Some(path) => EnvOverlay::load(&paths::expand_tilde(path)),
        None => EnvOverlay::default(),
    }
}
