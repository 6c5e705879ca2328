//! Catalog construction and synchronization for retro-shelf.
//!
//! The usual flow is: read `es_systems.cfg` into [`SystemConfig`]s, build a
//! [`CatalogRegistry`] from them (each [`Catalog`] scans its ROM directory
//! and merges its gamelist), then hand a chosen file to [`LaunchTemplate`].

pub mod catalog;
pub mod cycle_guard;
pub mod error;
pub mod launch;
pub mod paths;
pub mod registry;
pub mod scanner;
pub mod settings;
pub mod sync;
pub mod systems;

pub use catalog::{Catalog, CatalogState, ScanOptions};
pub use error::{CatalogError, ConfigError};
pub use launch::{LaunchTarget, LaunchTemplate, Placeholder, RenderedCommand};
pub use paths::AppPaths;
pub use registry::CatalogRegistry;
pub use scanner::{DirectoryScanner, ScanOutcome};
pub use settings::AppSettings;
pub use sync::{SyncReport, synchronize, tree_from_store};
pub use systems::{ParsedSystems, SystemConfig};

// Re-export the data model so frontends only need this crate.
pub use retro_shelf_core::{
    CatalogEntry, ExtensionFilter, FileNode, FolderNode, MetadataRecord, ScanError,
};
pub use retro_shelf_frontend::{GamelistError, GamelistStore};
