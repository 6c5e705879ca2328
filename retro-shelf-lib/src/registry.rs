//! The set of loaded catalogs.
//!
//! Construct one at startup from the systems config, pass it to whatever
//! needs catalogs, and drop it (or call [`CatalogRegistry::clear`]) at
//! shutdown. Nothing here is global.

use std::path::Path;

use crate::catalog::{Catalog, ScanOptions};
use crate::error::{CatalogError, ConfigError};
use crate::paths::AppPaths;
use crate::systems::{SystemConfig, load_systems};

pub struct CatalogRegistry {
    paths: AppPaths,
    options: ScanOptions,
    configs: Vec<SystemConfig>,
    catalogs: Vec<Catalog>,
}

impl CatalogRegistry {
    /// An empty registry.
    pub fn new(paths: AppPaths, options: ScanOptions) -> Self {
        Self {
            paths,
            options,
            configs: Vec::new(),
            catalogs: Vec::new(),
        }
    }

    /// Build a catalog for every config. Systems without any games are
    /// discarded with a warning.
    pub fn from_configs(configs: Vec<SystemConfig>, paths: AppPaths, options: ScanOptions) -> Self {
        let mut registry = Self::new(paths, options);
        registry.configs = configs;
        registry.build();
        registry
    }

    /// Read a systems config file and build catalogs from it.
    ///
    /// Bad lines and incomplete blocks are logged and skipped; only a
    /// missing or unreadable file is an error.
    pub fn load(config_path: &Path, paths: AppPaths, options: ScanOptions) -> Result<Self, ConfigError> {
        log::info!("Loading system config file {}", config_path.display());
        let parsed = load_systems(config_path, &paths)?;
        if !parsed.errors.is_empty() {
            log::warn!(
                "{} problem(s) in {}",
                parsed.errors.len(),
                config_path.display()
            );
        }
        Ok(Self::from_configs(parsed.systems, paths, options))
    }

    fn build(&mut self) {
        self.catalogs.clear();
        for config in &self.configs {
            let catalog = Catalog::open(config.clone(), &self.paths, self.options);
            if catalog.file_count() == 0 {
                log::warn!("{}! Ignoring it.", CatalogError::EmptyCatalog(config.name.clone()));
            } else {
                self.catalogs.push(catalog);
            }
        }
        log::info!(
            "Finished loading config - created {} systems",
            self.catalogs.len()
        );
    }

    /// Rescan every configured system.
    ///
    /// Existing catalogs keep their in-memory metadata; systems that were
    /// empty before are tried again, and catalogs that became empty are
    /// dropped.
    pub fn reload(&mut self) {
        let mut previous: Vec<Catalog> = std::mem::take(&mut self.catalogs);
        for config in &self.configs {
            let catalog = match previous.iter().position(|c| c.name() == config.name) {
                Some(idx) => {
                    let mut catalog = previous.swap_remove(idx);
                    catalog.reload();
                    catalog
                }
                None => Catalog::open(config.clone(), &self.paths, self.options),
            };
            if catalog.file_count() == 0 {
                log::warn!("{}! Ignoring it.", CatalogError::EmptyCatalog(config.name.clone()));
            } else {
                self.catalogs.push(catalog);
            }
        }
    }

    /// Save every catalog's gamelist. Failures are logged and returned;
    /// they do not stop the remaining catalogs from being saved.
    pub fn save_all(&mut self) -> Vec<CatalogError> {
        let mut failures = Vec::new();
        for catalog in &mut self.catalogs {
            if let Err(e) = catalog.save() {
                log::error!("Failed to save gamelist for \"{}\": {}", catalog.name(), e);
                failures.push(e);
            }
        }
        failures
    }

    /// Drop every catalog and config.
    pub fn clear(&mut self) {
        self.catalogs.clear();
        self.configs.clear();
    }

    pub fn catalogs(&self) -> impl Iterator<Item = &Catalog> {
        self.catalogs.iter()
    }

    pub fn catalogs_mut(&mut self) -> impl Iterator<Item = &mut Catalog> {
        self.catalogs.iter_mut()
    }

    pub fn get(&self, name: &str) -> Option<&Catalog> {
        self.catalogs.iter().find(|c| c.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Catalog> {
        self.catalogs.iter_mut().find(|c| c.name() == name)
    }

    /// The catalog whose tree contains the file at `path`.
    pub fn catalog_for(&self, path: &Path) -> Option<&Catalog> {
        self.catalogs.iter().find(|c| c.find_file(path).is_some())
    }

    pub fn names(&self) -> Vec<&str> {
        self.catalogs.iter().map(Catalog::name).collect()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }
}
