use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// Timestamp layout used by EmulationStation gamelists (`19960623T000000`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Persisted descriptive data for a single catalog file.
///
/// Records are keyed by the file's path relative to the catalog root, so
/// they stay valid if the whole collection is moved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRecord {
    /// Display name (defaults to the file stem)
    pub name: String,
    /// Game description
    pub description: Option<String>,
    /// Image path, as written in the gamelist
    pub image: Option<String>,
    /// Rating from 0.0 to 1.0
    pub rating: Option<f32>,
    pub favorite: bool,
    /// Number of times the game has been launched
    pub play_count: u32,
    pub last_played: Option<NaiveDateTime>,
    /// Other gamelist tags (developer, genre, ...) preserved verbatim.
    pub extra: BTreeMap<String, String>,
}

impl MetadataRecord {
    /// Default record for a newly discovered file.
    pub fn for_file(display_name: impl Into<String>) -> Self {
        Self {
            name: display_name.into(),
            ..Self::default()
        }
    }

    /// Count a launch and stamp the time it happened.
    pub fn record_play(&mut self, now: NaiveDateTime) {
        self.play_count = self.play_count.saturating_add(1);
        self.last_played = Some(now);
    }

    pub fn toggle_favorite(&mut self) -> bool {
        self.favorite = !self.favorite;
        self.favorite
    }
}

/// Format a timestamp as `YYYYMMDDTHHMMSS`.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a gamelist timestamp.
///
/// Accepts the full `YYYYMMDDTHHMMSS` layout as well as a bare `YYYYMMDD`
/// date (midnight is assumed).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
        return Some(ts);
    }
    chrono::NaiveDate::parse_from_str(s, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
