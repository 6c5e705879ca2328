//! Metadata persistence for retro-shelf catalogs.
//!
//! Metadata is stored in an EmulationStation `gamelist.xml` next to the ROMs
//! or in a per-system directory under the application directory.

pub mod error;
pub mod gamelist;

pub use error::GamelistError;
pub use gamelist::{GAMELIST_FILE_NAME, GamelistStore, gamelist_path, relative_key};
