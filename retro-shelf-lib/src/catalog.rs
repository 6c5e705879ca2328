//! A single game system: its configuration, scanned tree, and gamelist.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use retro_shelf_core::{FileNode, FolderNode, ScanError};
use retro_shelf_frontend::{GamelistStore, gamelist_path, relative_key};

use crate::error::CatalogError;
use crate::launch::{LaunchTarget, RenderedCommand};
use crate::paths::AppPaths;
use crate::scanner::DirectoryScanner;
use crate::sync::{SyncReport, synchronize, tree_from_store};
use crate::systems::SystemConfig;

/// Lifecycle of a catalog. Launching and saving need [`CatalogState::Ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    Unloaded,
    Scanning,
    Merging,
    Sorted,
    Ready,
}

/// Switches that change how catalogs are built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Build the tree from gamelist entries instead of walking the disk
    pub gamelist_only: bool,
    /// Do not load, merge, or save gamelists
    pub ignore_gamelist: bool,
    /// Create new gamelists beside the ROMs rather than in the app dir
    pub prefer_rom_dir: bool,
}

#[derive(Debug)]
pub struct Catalog {
    config: SystemConfig,
    gamelist_path: PathBuf,
    options: ScanOptions,
    root: FolderNode,
    store: GamelistStore,
    state: CatalogState,
    last_sync: SyncReport,
    skipped: Vec<ScanError>,
}

impl Catalog {
    /// Create an unloaded catalog. Nothing is read from disk yet.
    pub fn new(config: SystemConfig, paths: &AppPaths, options: ScanOptions) -> Self {
        let gamelist_path = gamelist_path(
            &config.path,
            paths.app_dir(),
            &config.name,
            options.prefer_rom_dir,
        );
        let root = FolderNode::new(&config.path);
        Self {
            config,
            gamelist_path,
            options,
            root,
            store: GamelistStore::new(),
            state: CatalogState::Unloaded,
            last_sync: SyncReport::default(),
            skipped: Vec::new(),
        }
    }

    /// Create a catalog and bring it to [`CatalogState::Ready`].
    pub fn open(config: SystemConfig, paths: &AppPaths, options: ScanOptions) -> Self {
        let mut catalog = Self::new(config, paths, options);
        catalog.load();
        catalog
    }

    /// Load the gamelist, then scan, merge, and sort.
    ///
    /// A gamelist that cannot be read is logged and treated as empty.
    pub fn load(&mut self) {
        if !self.options.ignore_gamelist {
            self.store = match GamelistStore::load(&self.gamelist_path, &self.config.path) {
                Ok(store) => store,
                Err(e) => {
                    log::warn!("{e}; continuing with empty metadata");
                    GamelistStore::new()
                }
            };
        }
        self.refresh();
    }

    /// Rebuild the tree from disk, keeping the in-memory gamelist.
    ///
    /// Metadata changed since the last merge is folded back into the store
    /// first so it is not lost.
    pub fn reload(&mut self) {
        if self.state == CatalogState::Unloaded {
            self.load();
            return;
        }
        self.absorb_tree();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.state = CatalogState::Scanning;
        self.root = if self.options.gamelist_only {
            self.skipped.clear();
            tree_from_store(&self.config.path, &self.store, &self.config.extensions)
        } else {
            let outcome = DirectoryScanner::new(self.config.extensions.clone()).scan(&self.config.path);
            self.skipped = outcome.skipped;
            outcome.root
        };

        self.state = CatalogState::Merging;
        let empty = GamelistStore::new();
        let store = if self.options.ignore_gamelist {
            &empty
        } else {
            &self.store
        };
        self.last_sync = synchronize(&mut self.root, &self.config.path, store);

        self.root.sort_recursive();
        self.state = CatalogState::Sorted;

        log::debug!(
            "System \"{}\": {} files, {} matched, {} new, {} pruned",
            self.config.name,
            self.root.file_count(),
            self.last_sync.matched,
            self.last_sync.created,
            self.last_sync.pruned.len()
        );
        self.state = CatalogState::Ready;
    }

    fn absorb_tree(&mut self) {
        let root_path = self.config.path.clone();
        for file in self.root.files() {
            if let Some(record) = file.metadata() {
                let key = relative_key(file.path(), &root_path).unwrap_or_else(|| file.path().to_path_buf());
                self.store.insert(key, record.clone());
            }
        }
    }

    fn ensure_ready(&self) -> Result<(), CatalogError> {
        if self.state == CatalogState::Ready {
            Ok(())
        } else {
            Err(CatalogError::NotReady {
                name: self.config.name.clone(),
                state: self.state,
            })
        }
    }

    /// Write the gamelist, dropping entries for files that are gone.
    ///
    /// Returns how many stale entries were removed. With
    /// [`ScanOptions::ignore_gamelist`] nothing is written.
    pub fn save(&mut self) -> Result<usize, CatalogError> {
        self.ensure_ready()?;
        if self.options.ignore_gamelist {
            log::warn!(
                "Not saving gamelist for \"{}\": gamelists are ignored",
                self.config.name
            );
            return Ok(0);
        }

        let root_path = &self.config.path;
        let fresh: GamelistStore = self
            .root
            .files()
            .filter_map(|file| {
                let record = file.metadata()?.clone();
                let key = relative_key(file.path(), root_path).unwrap_or_else(|| file.path().to_path_buf());
                Some((key, record))
            })
            .collect();
        let dropped = self.store.keys().filter(|k| !fresh.contains(k)).count();

        fresh.save(&self.gamelist_path)?;
        self.store = fresh;
        self.last_sync.pruned.clear();
        log::info!(
            "Saved {} entries for \"{}\" to {}",
            self.store.len(),
            self.config.name,
            self.gamelist_path.display()
        );
        Ok(dropped)
    }

    fn file(&self, path: &Path) -> Result<&FileNode, CatalogError> {
        self.root
            .find_file(path)
            .ok_or_else(|| CatalogError::unknown_file(&self.config.name, path))
    }

    fn file_mut(&mut self, path: &Path) -> Result<&mut FileNode, CatalogError> {
        let name = &self.config.name;
        self.root
            .find_file_mut(path)
            .ok_or_else(|| CatalogError::unknown_file(name, path))
    }

    /// Resolve the file at `path` for launching.
    pub fn launch_target(&self, path: &Path) -> Result<LaunchTarget, CatalogError> {
        self.ensure_ready()?;
        LaunchTarget::resolve(self.file(path)?)
    }

    /// Render this system's launch command for the file at `path`.
    pub fn launch_command(&self, path: &Path) -> Result<RenderedCommand, CatalogError> {
        let target = self.launch_target(path)?;
        Ok(self.config.command.render(&target))
    }

    /// Count a launch of the file at `path`.
    pub fn record_play(&mut self, path: &Path, now: NaiveDateTime) -> Result<(), CatalogError> {
        self.ensure_ready()?;
        let file = self.file_mut(path)?;
        if let Some(record) = file.metadata_mut() {
            record.record_play(now);
        }
        Ok(())
    }

    /// Flip the favorite flag of the file at `path`, returning the new value.
    pub fn toggle_favorite(&mut self, path: &Path) -> Result<bool, CatalogError> {
        self.ensure_ready()?;
        let file = self.file_mut(path)?;
        Ok(file.metadata_mut().map(|r| r.toggle_favorite()).unwrap_or(false))
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn desc_name(&self) -> &str {
        &self.config.desc_name
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn root_path(&self) -> &Path {
        &self.config.path
    }

    pub fn gamelist_path(&self) -> &Path {
        &self.gamelist_path
    }

    pub fn root(&self) -> &FolderNode {
        &self.root
    }

    pub fn store(&self) -> &GamelistStore {
        &self.store
    }

    pub fn state(&self) -> CatalogState {
        self.state
    }

    pub fn last_sync(&self) -> &SyncReport {
        &self.last_sync
    }

    /// Subtrees skipped by the most recent scan.
    pub fn skipped(&self) -> &[ScanError] {
        &self.skipped
    }

    pub fn file_count(&self) -> usize {
        self.root.file_count()
    }

    pub fn find_file(&self, path: &Path) -> Option<&FileNode> {
        self.root.find_file(path)
    }

    /// The tree path of the file that `path` refers to.
    ///
    /// Accepts relative or non-normalized paths and paths that reach the
    /// file through a different symlink than the tree does.
    pub fn locate(&self, path: &Path) -> Option<&Path> {
        if let Some(file) = self.root.find_file(path) {
            return Some(file.path());
        }
        let target = fs::canonicalize(path).ok()?;
        if let Ok(root) = fs::canonicalize(&self.config.path) {
            if let Ok(rel) = target.strip_prefix(&root) {
                if let Some(file) = self.root.find_file(&self.config.path.join(rel)) {
                    return Some(file.path());
                }
            }
        }
        self.root
            .files()
            .find(|f| fs::canonicalize(f.path()).is_ok_and(|p| p == target))
            .map(FileNode::path)
    }

    /// The folder containing `path`.
    pub fn parent_of(&self, path: &Path) -> Option<&FolderNode> {
        self.root.parent_of(path)
    }
}
