//! Song info payload exchanged with the lookup service
//!
//! `mlib-si` serves it, `mlib-cs` consumes it when saving a new song.

use serde::{Deserialize, Serialize};

/// Authoritative song metadata returned by `GET /info`
///
/// All fields are plain strings on the wire; the consumer validates them
/// (non-empty group and song, `DD.MM.YYYY` release date) before storing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongInfo {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub song: String,
    #[serde(rename = "releaseDate", default)]
    pub release_date: String,
    #[serde(default)]
    pub text: String,
    /// Reference link (kept under its historical wire name)
    #[serde(default)]
    pub patronymic: String,
}

impl SongInfo {
    /// Case-insensitive match on the lookup key (group, song)
    pub fn matches(&self, group: &str, song: &str) -> bool {
        self.group.trim().to_lowercase() == group.trim().to_lowercase()
            && self.song.trim().to_lowercase() == song.trim().to_lowercase()
    }
}
