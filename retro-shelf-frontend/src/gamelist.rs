//! EmulationStation `gamelist.xml` store.
//!
//! ```xml
//! <?xml version="1.0"?>
//! <gameList>
//!   <game>
//!     <path>./Super Mario Bros. (World).nes</path>
//!     <name>Super Mario Bros.</name>
//!     <desc>...</desc>
//!     <image>./images/smb.png</image>
//!     <rating>0.9</rating>
//!     <favorite>true</favorite>
//!     <playcount>3</playcount>
//!     <lastplayed>20240102T030405</lastplayed>
//!   </game>
//! </gameList>
//! ```
//!
//! Entries are keyed by path relative to the ROM root. Unknown tags inside a
//! `<game>` are carried through untouched; `<folder>` entries are ignored.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fs;
use std::io::BufRead;
use std::path::{Component, Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use retro_shelf_core::MetadataRecord;
use retro_shelf_core::metadata::{format_timestamp, parse_timestamp};
use retro_shelf_core::util::{is_plain_relative, stem_of};

use crate::error::GamelistError;

pub const GAMELIST_FILE_NAME: &str = "gamelist.xml";

/// Metadata records of one catalog, keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamelistStore {
    entries: BTreeMap<PathBuf, MetadataRecord>,
}

impl GamelistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a gamelist from disk.
    ///
    /// A missing file yields an empty store. Any other read or parse problem
    /// is reported as [`GamelistError::MetadataLoadFailure`].
    pub fn load(path: &Path, rom_root: &Path) -> Result<Self, GamelistError> {
        let file = match fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No gamelist at {}", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(GamelistError::load_failure(path, e.to_string())),
        };
        Self::parse(std::io::BufReader::new(file), rom_root)
            .map_err(|e| GamelistError::load_failure(path, e.to_string()))
    }

    /// Parse gamelist XML from a reader.
    pub fn parse<R: BufRead>(reader: R, rom_root: &Path) -> Result<Self, GamelistError> {
        let mut xml = Reader::from_reader(reader);
        xml.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut store = Self::new();
        let mut saw_root = false;
        let mut current: Option<PendingGame> = None;
        // Element depth below the open <game>; only depth-1 text is a field.
        let mut depth = 0usize;
        let mut current_tag = String::new();
        let mut text = String::new();

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if current.is_some() {
                        depth += 1;
                        if depth == 1 {
                            current_tag = tag;
                            text.clear();
                        }
                    } else {
                        match tag.as_str() {
                            "gameList" => saw_root = true,
                            "game" => {
                                current = Some(PendingGame::default());
                                depth = 0;
                            }
                            _ => {}
                        }
                    }
                }
                Event::Empty(ref e) => {
                    if e.name().as_ref() == b"gameList" {
                        saw_root = true;
                    }
                }
                Event::Text(ref e) => {
                    if current.is_some() && depth == 1 {
                        text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(ref e) => {
                    if current.is_some() && depth == 1 {
                        text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Event::End(ref e) => {
                    if depth == 0 {
                        if e.name().as_ref() == b"game" {
                            if let Some(game) = current.take() {
                                store.finish_game(game, rom_root);
                            }
                        }
                    } else if let Some(ref mut game) = current {
                        if depth == 1 {
                            game.set(&current_tag, std::mem::take(&mut text));
                        }
                        depth -= 1;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(GamelistError::invalid_gamelist("No <gameList> root element"));
        }

        Ok(store)
    }

    fn finish_game(&mut self, game: PendingGame, rom_root: &Path) {
        let Some(raw_path) = game.path.filter(|p| !p.trim().is_empty()) else {
            log::warn!("Skipping gamelist entry without a <path>");
            return;
        };
        let Some(key) = normalize_key(&raw_path, rom_root) else {
            log::warn!("Skipping gamelist entry outside the ROM directory: {raw_path}");
            return;
        };
        let mut record = game.record;
        if !game.has_name {
            record.name = stem_of(&key);
        }
        if self.entries.insert(key.clone(), record).is_some() {
            log::warn!("Duplicate gamelist entry for {}, keeping the last", key.display());
        }
    }

    /// Write the store to disk, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<(), GamelistError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("xml.tmp");
        fs::write(&tmp, self.to_xml_string())?;
        fs::rename(&tmp, path)?;
        log::debug!("Wrote {} gamelist entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Render the store as gamelist XML. Entries are ordered by key.
    pub fn to_xml_string(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\"?>\n");
        xml.push_str("<gameList>\n");

        for (key, record) in &self.entries {
            xml.push_str("  <game>\n");
            write_tag(&mut xml, "path", &display_key(key));
            write_tag(&mut xml, "name", &record.name);
            if let Some(ref desc) = record.description {
                write_tag(&mut xml, "desc", desc);
            }
            if let Some(ref image) = record.image {
                write_tag(&mut xml, "image", image);
            }
            if let Some(rating) = record.rating {
                write_tag(&mut xml, "rating", &rating.to_string());
            }
            if record.favorite {
                write_tag(&mut xml, "favorite", "true");
            }
            if record.play_count > 0 {
                write_tag(&mut xml, "playcount", &record.play_count.to_string());
            }
            if let Some(ref ts) = record.last_played {
                write_tag(&mut xml, "lastplayed", &format_timestamp(ts));
            }
            for (tag, value) in &record.extra {
                write_tag(&mut xml, tag, value);
            }
            xml.push_str("  </game>\n");
        }

        xml.push_str("</gameList>\n");
        xml
    }

    pub fn get(&self, key: &Path) -> Option<&MetadataRecord> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<PathBuf>, record: MetadataRecord) -> Option<MetadataRecord> {
        self.entries.insert(key.into(), record)
    }

    pub fn remove(&mut self, key: &Path) -> Option<MetadataRecord> {
        self.entries.remove(key)
    }

    /// Keys as an owned set, used as the working copy during a merge.
    pub fn key_set(&self) -> HashSet<PathBuf> {
        self.entries.keys().cloned().collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &MetadataRecord)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(PathBuf, MetadataRecord)> for GamelistStore {
    fn from_iter<I: IntoIterator<Item = (PathBuf, MetadataRecord)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Fields collected for the `<game>` currently being parsed.
#[derive(Default)]
struct PendingGame {
    path: Option<String>,
    has_name: bool,
    record: MetadataRecord,
}

impl PendingGame {
    fn set(&mut self, tag: &str, value: String) {
        match tag {
            "path" => self.path = Some(value),
            "name" => {
                self.has_name = true;
                self.record.name = value;
            }
            "desc" => self.record.description = non_empty(value),
            "image" => self.record.image = non_empty(value),
            "rating" => {
                self.record.rating = match value.trim().parse::<f32>() {
                    Ok(r) if r.is_finite() => Some(r.clamp(0.0, 1.0)),
                    _ => {
                        if !value.is_empty() {
                            log::warn!("Ignoring invalid rating {value:?}");
                        }
                        None
                    }
                }
            }
            "favorite" => {
                let v = value.trim();
                self.record.favorite = v.eq_ignore_ascii_case("true") || v == "1";
            }
            "playcount" => {
                self.record.play_count = value.trim().parse().unwrap_or_else(|_| {
                    if !value.is_empty() {
                        log::warn!("Ignoring invalid playcount {value:?}");
                    }
                    0
                })
            }
            "lastplayed" => self.record.last_played = parse_timestamp(&value),
            other => {
                if !value.is_empty() {
                    self.record.extra.insert(other.to_string(), value);
                }
            }
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Relative key for `path` under `rom_root`, or `None` if it lies outside.
pub fn relative_key(path: &Path, rom_root: &Path) -> Option<PathBuf> {
    let diff = pathdiff::diff_paths(path, rom_root)?;
    is_plain_relative(&diff).then_some(diff)
}

/// Key for a `<path>` value, or `None` if it escapes the ROM root.
///
/// Absolute paths under the root are relativized. Absolute paths elsewhere
/// are kept as-is unless they contain `..`.
fn normalize_key(raw: &str, rom_root: &Path) -> Option<PathBuf> {
    let path = Path::new(raw.trim());
    if path.is_absolute() {
        if let Some(rel) = relative_key(path, rom_root) {
            return Some(rel);
        }
        if path.components().any(|c| c == Component::ParentDir) {
            return None;
        }
        return Some(path.to_path_buf());
    }
    let key: PathBuf = path.components().filter(|c| *c != Component::CurDir).collect();
    is_plain_relative(&key).then_some(key)
}

fn display_key(key: &Path) -> String {
    if key.is_absolute() {
        key.display().to_string()
    } else {
        format!("./{}", key.display())
    }
}

fn write_tag(xml: &mut String, tag: &str, value: &str) {
    xml.push_str("    <");
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(&quick_xml::escape::escape(value));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}

/// Where a system's gamelist lives.
///
/// Prefers an existing `gamelist.xml` in the ROM directory, then an
/// existing one in `<app_dir>/<system>/`. When neither exists, the
/// per-system location is returned unless `prefer_rom_dir` is set.
pub fn gamelist_path(rom_root: &Path, app_dir: &Path, system: &str, prefer_rom_dir: bool) -> PathBuf {
    let beside_roms = rom_root.join(GAMELIST_FILE_NAME);
    let per_system = app_dir.join(system).join(GAMELIST_FILE_NAME);
    if beside_roms.exists() {
        beside_roms
    } else if per_system.exists() {
        per_system
    } else if prefer_rom_dir {
        beside_roms
    } else {
        per_system
    }
}

#[cfg(test)]
#[path = "tests/gamelist_tests.rs"]
mod tests;
