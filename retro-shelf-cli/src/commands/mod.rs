pub(crate) mod config;
pub(crate) mod launch;
pub(crate) mod list;
pub(crate) mod sync;
pub(crate) mod tree;

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use retro_shelf_lib::{AppPaths, Catalog, CatalogRegistry, ScanOptions};

use crate::error::CliError;

/// Loaded catalogs shared by the commands.
pub(crate) struct Session {
    pub registry: CatalogRegistry,
}

impl Session {
    pub(crate) fn open(
        config_path: &Path,
        paths: AppPaths,
        options: ScanOptions,
        quiet: bool,
    ) -> Result<Self, CliError> {
        let spinner = scan_spinner(quiet);
        let registry = CatalogRegistry::load(config_path, paths, options);
        spinner.finish_and_clear();
        let registry = registry?;
        if registry.is_empty() {
            log::warn!(
                "No systems with games found. Check {} (run 'retro-shelf config init' for an example).",
                config_path.display()
            );
        }
        Ok(Self { registry })
    }

    pub(crate) fn catalog(&self, name: &str) -> Result<&Catalog, CliError> {
        self.registry
            .get(name)
            .ok_or_else(|| CliError::unknown_system(name))
    }

    pub(crate) fn catalog_mut(&mut self, name: &str) -> Result<&mut Catalog, CliError> {
        self.registry
            .get_mut(name)
            .ok_or_else(|| CliError::unknown_system(name))
    }
}

fn scan_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("/-\\|"));
    }
    pb.set_message("Scanning ROM folders...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
