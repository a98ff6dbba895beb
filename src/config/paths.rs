use crate::error::{Result, TrayError};
use dirs;
use std::path::PathBuf;

// The config directory name predates this program's binary name and is kept
// so existing installs pick up their config unchanged.
const CONFIG_DIR_NAME: &str = "sysTrayJira";
const APP_NAME: &str = "jira-tray";

#[derive(Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub pins_file: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                TrayError::InvalidConfiguration("Could not determine config directory".to_string())
            })?
            .join(CONFIG_DIR_NAME);

        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| {
                TrayError::InvalidConfiguration("Could not determine cache directory".to_string())
            })?
            .join(APP_NAME);

        std::fs::create_dir_all(&config_dir)?;
        std::fs::create_dir_all(&cache_dir)?;

        Ok(AppPaths {
            config_file: config_dir.join("config.yaml"),
            pins_file: config_dir.join("pinned.yaml"),
            log_file: cache_dir.join(format!("{APP_NAME}.log")),
            config_dir,
        })
    }
}

/// Expand a leading `~` to the home directory, as the config file allows for
/// the icon and env-file paths.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
