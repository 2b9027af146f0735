//! Songs known to the lookup service
//!
//! One song is compiled in. More can be loaded from a TOML file:
//!
//! ```toml
//! [[songs]]
//! group = "Muse"
//! song = "Uprising"
//! releaseDate = "07.09.2009"
//! text = "The paranoia is in bloom"
//! patronymic = "https://www.youtube.com/watch?v=w8KQmps-Sog"
//! ```

use mlib_common::{Error, Result, SongInfo};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_LYRICS: &str = include_str!("../fixtures/supermassive_black_hole.txt");

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    songs: Vec<SongInfo>,
}

/// In-memory song table
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    songs: Vec<SongInfo>,
}

impl Fixtures {
    pub fn new(songs: Vec<SongInfo>) -> Self {
        Self { songs }
    }

    /// The compiled-in song only
    pub fn builtin() -> Self {
        Self::new(vec![SongInfo {
            group: "Muse".to_string(),
            song: "Supermassive Black Hole".to_string(),
            release_date: "16.07.2006".to_string(),
            text: DEFAULT_LYRICS.trim_end().to_string(),
            patronymic: "https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string(),
        }])
    }

    /// Builtin song plus the songs in `path`
    ///
    /// Entries without group or song are rejected.
    pub fn with_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: FixtureFile = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

        if let Some(bad) = file
            .songs
            .iter()
            .position(|s| s.group.trim().is_empty() || s.song.trim().is_empty())
        {
            return Err(Error::Config(format!(
                "{}: songs[{}] needs both group and song",
                path.display(),
                bad
            )));
        }

        let mut fixtures = Self::builtin();
        fixtures.songs.extend(file.songs);
        Ok(fixtures)
    }

    /// Case-insensitive exact match on group and title; first entry wins
    pub fn find(&self, group: &str, song: &str) -> Option<&SongInfo> {
        self.songs.iter().find(|s| s.matches(group, song))
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_lookup_ignores_case() {
        let fixtures = Fixtures::builtin();
        let hit = fixtures.find("MUSE", "supermassive black hole").unwrap();
        assert_eq!(hit.release_date, "16.07.2006");
        assert!(hit.text.starts_with("Ooh baby, don't you know I suffer?"));
        assert!(hit.text.ends_with("Supermassive black hole"));

        assert!(fixtures.find("Muse", "Uprising").is_none());
    }

    #[test]
    fn test_builtin_lyrics_have_stanzas() {
        let fixtures = Fixtures::builtin();
        let text = &fixtures.find("Muse", "Supermassive Black Hole").unwrap().text;
        assert_eq!(text.split("\n\n").count(), 9);
    }

    #[test]
    fn test_file_adds_songs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[songs]]
group = "Muse"
song = "Uprising"
releaseDate = "07.09.2009"
text = "The paranoia is in bloom"
"#
        )
        .unwrap();

        let fixtures = Fixtures::with_file(file.path()).unwrap();
        assert_eq!(fixtures.len(), 2);

        let hit = fixtures.find("muse", "UPRISING").unwrap();
        assert_eq!(hit.release_date, "07.09.2009");
        assert_eq!(hit.patronymic, "");
    }

    #[test]
    fn test_file_rejects_nameless_entry() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[songs]]\ngroup = \"Muse\"\n").unwrap();

        let err = Fixtures::with_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Fixtures::with_file(Path::new("/nonexistent/fixtures.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
