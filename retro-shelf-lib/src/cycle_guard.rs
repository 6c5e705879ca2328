//! Guard against symlinked directories that point back up the tree.
//!
//! This is a prefix test, not general cycle detection: it catches a link
//! that resolves to itself or one of its ancestors, which is the case that
//! would make a recursive walk run forever. Links between sibling subtrees
//! are followed.

use std::fs;
use std::path::{Path, PathBuf};

/// Returns `true` if `candidate` is a symlink whose canonical target is a
/// prefix of the candidate's own location.
///
/// Non-symlinks always return `false`, as do links that cannot be resolved
/// (a dangling link is not a directory and will not be descended into).
pub fn would_recurse(candidate: &Path) -> bool {
    let is_link = fs::symlink_metadata(candidate)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return false;
    }

    let target = match fs::canonicalize(candidate) {
        Ok(t) => t,
        Err(e) => {
            log::debug!("Cannot resolve symlink {}: {}", candidate.display(), e);
            return false;
        }
    };

    link_location(candidate).starts_with(&target)
}

/// Where the link itself lives: its canonical parent joined with its name.
fn link_location(candidate: &Path) -> PathBuf {
    let (Some(parent), Some(name)) = (candidate.parent(), candidate.file_name()) else {
        return candidate.to_path_buf();
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    fs::canonicalize(parent)
        .map(|p| p.join(name))
        .unwrap_or_else(|_| candidate.to_path_buf())
}
