use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while walking a catalog directory.
///
/// None of these abort a scan; the offending subtree is skipped and the
/// error is reported alongside the (smaller) tree.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan target exists but is not a directory (or does not exist)
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A symlinked directory resolves to itself or one of its ancestors
    #[error("Skipping infinitely recursive symlink: {}", .0.display())]
    RecursiveSymlink(PathBuf),

    /// Permission or I/O failure while enumerating a directory
    #[error("Unreadable entry {}: {source}", path.display())]
    UnreadableEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::UnreadableEntry {
            path: path.into(),
            source,
        }
    }

    /// The path of the subtree that was skipped.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ScanError::NotADirectory(p) | ScanError::RecursiveSymlink(p) => p,
            ScanError::UnreadableEntry { path, .. } => path,
        }
    }
}
