//! Application directory layout.
//!
//! Everything lives under `~/.emulationstation/`: the systems config, the
//! settings file, and per-system gamelists (`<system>/gamelist.xml`).

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const APP_DIR_NAME: &str = ".emulationstation";
pub const SYSTEMS_FILE_NAME: &str = "es_systems.cfg";
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Resolved application paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    home: PathBuf,
    app_dir: PathBuf,
}

impl AppPaths {
    /// Resolve paths from the user's home directory.
    ///
    /// Fails with [`ConfigError::MissingHomeDirectory`] when no home
    /// directory is available; callers treat that as fatal.
    pub fn resolve() -> Result<Self, ConfigError> {
        match dirs::home_dir() {
            Some(home) if !home.as_os_str().is_empty() => Ok(Self::with_home(home)),
            _ => Err(ConfigError::MissingHomeDirectory),
        }
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let app_dir = home.join(APP_DIR_NAME);
        Self { home, app_dir }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// `~/.emulationstation/es_systems.cfg`
    pub fn systems_config(&self) -> PathBuf {
        self.app_dir.join(SYSTEMS_FILE_NAME)
    }

    /// `~/.emulationstation/settings.toml`
    pub fn settings_file(&self) -> PathBuf {
        self.app_dir.join(SETTINGS_FILE_NAME)
    }

    /// Expand a leading `~` to the home directory.
    ///
    /// Only `~` on its own or followed by `/` is expanded; `~user` forms are
    /// left untouched.
    pub fn expand_tilde(&self, raw: &str) -> PathBuf {
        if raw == "~" {
            return self.home.clone();
        }
        match raw.strip_prefix("~/") {
            Some(rest) => self.home.join(rest),
            None => PathBuf::from(raw),
        }
    }
}
