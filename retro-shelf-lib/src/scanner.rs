//! Recursive directory scanner for catalog roots.
//!
//! Builds an unsorted [`FolderNode`] tree containing every file that passes
//! the system's extension filter. Folders without any matching files are
//! dropped as soon as they have been populated. Problems with a single
//! directory are logged and collected; they never abort the scan.

use std::fs;
use std::path::{Path, PathBuf};

use retro_shelf_core::util::stem_of;
use retro_shelf_core::{ExtensionFilter, FileNode, FolderNode, ScanError};

use crate::cycle_guard;

/// Result of scanning one root.
#[derive(Debug)]
pub struct ScanOutcome {
    pub root: FolderNode,
    /// Subtrees that were skipped, in the order they were encountered
    pub skipped: Vec<ScanError>,
}

/// Walks a directory tree collecting files that match an extension filter.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    filter: ExtensionFilter,
}

impl DirectoryScanner {
    pub fn new(filter: ExtensionFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &ExtensionFilter {
        &self.filter
    }

    /// Scan `root` recursively.
    ///
    /// If `root` itself is unusable the returned tree is empty and the
    /// reason is the only entry in [`ScanOutcome::skipped`].
    pub fn scan(&self, root: &Path) -> ScanOutcome {
        let mut skipped = Vec::new();
        let mut folder = FolderNode::new(root);
        let mut active = Vec::new();
        self.populate(&mut folder, &mut active, &mut skipped);
        log::debug!(
            "Scanned {}: {} files, {} skipped subtrees",
            root.display(),
            folder.file_count(),
            skipped.len()
        );
        ScanOutcome {
            root: folder,
            skipped,
        }
    }

    /// `active` holds the canonical paths of the directories currently being
    /// walked, outermost first.
    fn populate(&self, folder: &mut FolderNode, active: &mut Vec<PathBuf>, skipped: &mut Vec<ScanError>) {
        let path = folder.path().to_path_buf();

        if !path.is_dir() {
            let err = ScanError::NotADirectory(path);
            log::warn!("{err}");
            skipped.push(err);
            return;
        }

        // Links between sibling subtrees slip past the ancestor test; they
        // still land on a directory that is already being walked.
        let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if cycle_guard::would_recurse(&path) || active.contains(&canonical) {
            let err = ScanError::RecursiveSymlink(path);
            log::warn!("{err}");
            skipped.push(err);
            return;
        }

        let entries = match fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                let err = ScanError::unreadable(path, e);
                log::warn!("{err}");
                skipped.push(err);
                return;
            }
        };

        active.push(canonical);
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let err = ScanError::unreadable(&path, e);
                    log::warn!("{err}");
                    skipped.push(err);
                    continue;
                }
            };
            let entry_path = entry.path();

            if stem_of(&entry_path).is_empty() {
                continue;
            }

            // `is_dir` follows symlinks, so linked directories are walked too.
            if entry_path.is_dir() {
                let mut child = FolderNode::new(&entry_path);
                self.populate(&mut child, active, skipped);
                if child.file_count() == 0 {
                    log::debug!("Ignoring folder without games: {}", entry_path.display());
                } else {
                    folder.push(child);
                }
            } else if self.filter.matches_path(&entry_path) {
                folder.push(FileNode::new(entry_path));
            }
        }
        active.pop();
    }
}

/// Scan `root` with a freshly parsed extension list.
pub fn scan(root: &Path, extensions: &str) -> ScanOutcome {
    DirectoryScanner::new(ExtensionFilter::parse(extensions)).scan(root)
}
