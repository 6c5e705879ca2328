use retro_shelf_lib::{CatalogError, ConfigError};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Systems config or app paths could not be resolved
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog operation failed
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// No loaded system with this name
    #[error("Unknown system: {0}")]
    UnknownSystem(String),

    /// Launch command could not be run or exited unsuccessfully
    #[error("Launch failed: {0}")]
    Launch(String),
}

impl CliError {
    pub(crate) fn unknown_system(msg: impl Into<String>) -> Self {
        Self::UnknownSystem(msg.into())
    }

    pub(crate) fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }
}
