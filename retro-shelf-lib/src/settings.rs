//! Persistent application settings (`~/.emulationstation/settings.toml`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::ScanOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub gamelist: GamelistSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Build catalogs from gamelist entries only, without walking the ROM
    /// directories.
    #[serde(default)]
    pub gamelist_only: bool,
    /// Skip loading and merging gamelists.
    #[serde(default)]
    pub ignore_gamelist: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamelistSettings {
    /// Create new gamelists next to the ROMs instead of under the app dir.
    #[serde(default)]
    pub prefer_rom_dir: bool,
}

impl AppSettings {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            gamelist_only: self.scan.gamelist_only,
            ignore_gamelist: self.scan.ignore_gamelist,
            prefer_rom_dir: self.gamelist.prefer_rom_dir,
        }
    }
}

/// Load settings, returning defaults if the file is missing or corrupt.
pub fn load_settings(path: &Path) -> AppSettings {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Failed to parse settings at {}: {}", path.display(), e);
            AppSettings::default()
        }),
        Err(_) => AppSettings::default(),
    }
}

/// Save settings atomically (write to temp, then rename).
pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(settings).map_err(std::io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
