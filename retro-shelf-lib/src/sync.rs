//! Reconcile a scanned tree with a loaded gamelist.

use std::path::{Path, PathBuf};

use retro_shelf_core::{ExtensionFilter, FileNode, FolderNode, MetadataRecord};
use retro_shelf_frontend::{GamelistStore, relative_key};

/// What a merge did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files that picked up an existing record
    pub matched: usize,
    /// Files that got a fresh default record
    pub created: usize,
    /// Store keys with no file on disk, sorted. They stay in the store until
    /// the catalog is saved.
    pub pruned: Vec<PathBuf>,
}

/// Attach gamelist records to every file in `tree`.
///
/// Lookup is by path relative to `rom_root`, so the result does not depend
/// on enumeration order, and running it again with the same store leaves the
/// tree unchanged. The store is not modified.
pub fn synchronize(tree: &mut FolderNode, rom_root: &Path, store: &GamelistStore) -> SyncReport {
    let mut remaining = store.key_set();
    let mut report = SyncReport::default();

    tree.for_each_file_mut(&mut |file: &mut FileNode| {
        let key = relative_key(file.path(), rom_root).unwrap_or_else(|| file.path().to_path_buf());
        match store.get(&key) {
            Some(record) => {
                file.set_metadata(record.clone());
                remaining.remove(&key);
                report.matched += 1;
            }
            None => {
                let record = MetadataRecord::for_file(file.display_name());
                file.set_metadata(record);
                report.created += 1;
            }
        }
    });

    let mut pruned: Vec<PathBuf> = remaining.into_iter().collect();
    pruned.sort();
    if !pruned.is_empty() {
        log::info!(
            "{} gamelist entries under {} no longer have a file",
            pruned.len(),
            rom_root.display()
        );
    }
    report.pruned = pruned;
    report
}

/// Build a tree from gamelist entries alone, without walking `rom_root`.
///
/// Entries whose file is missing, fails the filter, or lies outside the root
/// are left out.
pub fn tree_from_store(rom_root: &Path, store: &GamelistStore, filter: &ExtensionFilter) -> FolderNode {
    let mut root = FolderNode::new(rom_root);
    for key in store.keys() {
        let path = if key.is_absolute() {
            key.clone()
        } else {
            rom_root.join(key)
        };
        if !path.is_file() {
            log::debug!("Gamelist entry {} has no file", key.display());
            continue;
        }
        if !filter.matches_path(&path) {
            log::debug!("Gamelist entry {} does not match {}", key.display(), filter);
            continue;
        }
        if !root.insert_file(FileNode::new(path)) {
            log::debug!("Gamelist entry {} is outside {}", key.display(), rom_root.display());
        }
    }
    root
}
