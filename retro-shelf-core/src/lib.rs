//! Core data model for retro-shelf catalogs.
//!
//! A catalog is a tree of [`FolderNode`]s and [`FileNode`]s built from a ROM
//! directory. This crate holds the tree itself, the per-file
//! [`MetadataRecord`], and the extension matching used to decide which files
//! belong in a catalog. Scanning and persistence live in the other crates.

pub mod error;
pub mod extension;
pub mod metadata;
pub mod tree;
pub mod util;

pub use error::ScanError;
pub use extension::{ExtensionFilter, matches};
pub use metadata::MetadataRecord;
pub use tree::{CatalogEntry, FileNode, FolderNode};
