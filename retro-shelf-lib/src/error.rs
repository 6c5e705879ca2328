use std::path::PathBuf;

use retro_shelf_frontend::GamelistError;
use thiserror::Error;

use crate::catalog::CatalogState;

/// Errors from resolving paths and reading the systems config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No home directory could be determined. Fatal: nothing can be located.
    #[error("$HOME environment variable empty or nonexistent")]
    MissingHomeDirectory,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A line that is neither blank, a comment, nor `KEY=VALUE`
    #[error("Line {line}: no equals sign found in {content:?}")]
    Syntax { line: usize, content: String },

    #[error("Line {line}: unknown key {key:?}")]
    UnknownKey { line: usize, key: String },

    /// A system block ended without all required keys
    #[error("System block at line {line} ({name}) is missing {}", missing.join(", "))]
    MissingField {
        line: usize,
        name: String,
        missing: Vec<&'static str>,
    },
}

impl ConfigError {
    pub fn syntax(line: usize, content: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            content: content.into(),
        }
    }
}

/// Errors from catalog lifecycle operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The scan found no files; the catalog is discarded.
    #[error("System \"{0}\" has no games")]
    EmptyCatalog(String),

    #[error("Catalog \"{name}\" is not ready (state: {state:?})")]
    NotReady { name: String, state: CatalogState },

    #[error("No file {} in catalog \"{name}\"", path.display())]
    UnknownFile { name: String, path: PathBuf },

    #[error("Could not resolve {}: {source}", path.display())]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Gamelist(#[from] GamelistError),
}

impl CatalogError {
    pub fn unknown_file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::UnknownFile {
            name: name.into(),
            path: path.into(),
        }
    }
}
