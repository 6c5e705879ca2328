use std::path::PathBuf;

/// Errors that can occur while reading or writing a gamelist.
#[derive(Debug, thiserror::Error)]
pub enum GamelistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid gamelist: {0}")]
    InvalidGamelist(String),

    /// The store exists but could not be read or parsed.
    #[error("Failed to load gamelist {}: {reason}", path.display())]
    MetadataLoadFailure { path: PathBuf, reason: String },
}

impl GamelistError {
    pub fn invalid_gamelist(msg: impl Into<String>) -> Self {
        Self::InvalidGamelist(msg.into())
    }

    pub fn load_failure(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MetadataLoadFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
