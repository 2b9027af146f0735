//! Catalog data model and request conversion
//!
//! Request bodies arrive as loosely typed JSON. Each field is converted into
//! an optional of its expected kind here, so the SQL builders only ever see
//! typed values. A JSON `null` counts as absent.

use crate::error::{CatalogError, CatalogResult};
use chrono::NaiveDate;
use mlib_common::date::parse_date;
use mlib_common::SongInfo;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Persisted catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Song {
    pub id: i64,
    #[sqlx(rename = "group_name")]
    #[schema(example = "Muse")]
    pub group: String,
    #[sqlx(rename = "song")]
    #[serde(rename = "song")]
    #[schema(example = "Supermassive Black Hole")]
    pub title: String,
    #[serde(rename = "releaseDate", with = "mlib_common::date::optional", default)]
    #[schema(value_type = Option<String>, example = "16.07.2006")]
    pub release_date: Option<NaiveDate>,
    #[sqlx(rename = "text")]
    #[serde(rename = "text")]
    pub lyrics: Option<String>,
    #[sqlx(rename = "patronymic")]
    #[serde(rename = "patronymic")]
    pub reference_link: Option<String>,
}

/// One couplet of a song's lyrics, as returned by `GET /song-text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SongText {
    pub song_id: i64,
    /// 1-based index of the returned couplet
    pub couplet: usize,
    pub text: String,
}

/// Validated song ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub group: String,
    pub title: String,
    pub release_date: NaiveDate,
    pub lyrics: String,
    pub reference_link: String,
}

impl TryFrom<SongInfo> for NewSong {
    type Error = CatalogError;

    /// Trim every field, require group and song, parse the release date
    fn try_from(info: SongInfo) -> CatalogResult<Self> {
        let group = required(&info.group, "group")?;
        let title = required(&info.song, "song")?;
        let release_date = required(&info.release_date, "releaseDate")?;
        let release_date = parse_date("releaseDate", &release_date)?;

        Ok(NewSong {
            group,
            title,
            release_date,
            lyrics: info.text.trim().to_string(),
            reference_link: info.patronymic.trim().to_string(),
        })
    }
}

/// `POST /save` body: the lookup key for the song info service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub group: String,
    pub title: String,
}

impl SaveRequest {
    pub fn from_json(body: &Value) -> CatalogResult<Self> {
        let obj = as_object(body, "song request")?;

        let group = string_field(obj, "group")?.unwrap_or_default();
        let title = string_field(obj, "song")?.unwrap_or_default();

        Ok(SaveRequest {
            group: required(&group, "group")?,
            title: required(&title, "song")?,
        })
    }
}

/// Search criteria for `POST /get`; absent criteria do not filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    /// Case-insensitive substring of the group name
    pub group: Option<String>,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the lyrics
    pub text: Option<String>,
    /// Inclusive upper bound on the release date
    pub released_before: Option<NaiveDate>,
    /// Inclusive lower bound on the release date
    pub released_after: Option<NaiveDate>,
}

impl FilterSet {
    pub fn from_json(body: &Value) -> CatalogResult<Self> {
        if body.is_null() {
            return Ok(FilterSet::default());
        }
        let obj = as_object(body, "filters")?;

        Ok(FilterSet {
            group: string_field(obj, "group")?,
            title: string_field(obj, "song")?,
            text: string_field(obj, "text")?,
            released_before: date_field(obj, "release_date_before")?,
            released_after: date_field(obj, "release_date_after")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterSet::default()
    }
}

/// Partial update for `PATCH /update`; absent fields stay untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSet {
    pub id: i64,
    pub group: Option<String>,
    pub title: Option<String>,
    pub lyrics: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub reference_link: Option<String>,
}

impl UpdateSet {
    /// Update targeting `id` with no field changes yet
    pub fn new(id: i64) -> Self {
        Self {
            id,
            group: None,
            title: None,
            lyrics: None,
            release_date: None,
            reference_link: None,
        }
    }

    pub fn from_json(body: &Value) -> CatalogResult<Self> {
        let obj = as_object(body, "update")?;

        let id = match obj.get("id") {
            None | Some(Value::Null) => {
                return Err(CatalogError::Validation("validation error: id is required".into()))
            }
            Some(Value::Number(n)) => n.as_i64().ok_or_else(not_an_integer)?,
            Some(_) => return Err(not_an_integer()),
        };
        if id <= 0 {
            return Err(CatalogError::Validation("validation error: id must be positive".into()));
        }

        let group = string_field(obj, "group")?
            .map(|g| required(&g, "group"))
            .transpose()?;
        let title = string_field(obj, "song")?
            .map(|t| required(&t, "song"))
            .transpose()?;

        Ok(UpdateSet {
            id,
            group,
            title,
            lyrics: string_field(obj, "text")?,
            release_date: date_field(obj, "releaseDate")?,
            reference_link: string_field(obj, "patronymic")?,
        })
    }

    /// True when at least one optional field is set
    pub fn has_changes(&self) -> bool {
        self.group.is_some()
            || self.title.is_some()
            || self.lyrics.is_some()
            || self.release_date.is_some()
            || self.reference_link.is_some()
    }
}

fn not_an_integer() -> CatalogError {
    CatalogError::Validation("validation error: id must be an integer".into())
}

fn as_object<'a>(body: &'a Value, what: &str) -> CatalogResult<&'a Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| CatalogError::BadRequest(format!("{} must be a JSON object", what)))
}

fn string_field(obj: &Map<String, Value>, field: &'static str) -> CatalogResult<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(CatalogError::TypeMismatch { field }),
    }
}

fn date_field(obj: &Map<String, Value>, field: &'static str) -> CatalogResult<Option<NaiveDate>> {
    string_field(obj, field)?
        .map(|s| parse_date(field, &s).map_err(CatalogError::from))
        .transpose()
}

fn required(value: &str, field: &str) -> CatalogResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!(
            "validation error: field {} is required",
            field
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filters_all_present() {
        let filters = FilterSet::from_json(&json!({
            "group": "muse",
            "song": "hole",
            "text": "glaciers",
            "release_date_before": "01.01.2010",
            "release_date_after": "16.09.2001",
        }))
        .unwrap();

        assert_eq!(filters.group.as_deref(), Some("muse"));
        assert_eq!(filters.title.as_deref(), Some("hole"));
        assert_eq!(filters.text.as_deref(), Some("glaciers"));
        assert_eq!(filters.released_before, Some(date(1, 1, 2010)));
        assert_eq!(filters.released_after, Some(date(16, 9, 2001)));
    }

    #[test]
    fn test_filters_null_and_missing_are_absent() {
        let filters = FilterSet::from_json(&json!({"group": null})).unwrap();
        assert!(filters.is_empty());

        assert!(FilterSet::from_json(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_filters_non_string_is_type_mismatch() {
        let err = FilterSet::from_json(&json!({"song": 42})).unwrap_err();
        assert!(matches!(err, CatalogError::TypeMismatch { field: "song" }));

        let err = FilterSet::from_json(&json!({"release_date_after": ["16.09.2021"]}));
        assert!(matches!(
            err,
            Err(CatalogError::TypeMismatch { field: "release_date_after" })
        ));
    }

    #[test]
    fn test_filters_bad_date_is_validation() {
        let err = FilterSet::from_json(&json!({"release_date_before": "2021-09-16"})).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_filters_short_year_is_validation() {
        let err = FilterSet::from_json(&json!({"release_date_after": "16.09.21"})).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(err.to_string().contains("release_date_after"));
    }

    #[test]
    fn test_filters_must_be_object() {
        let err = FilterSet::from_json(&json!(["muse"])).unwrap_err();
        assert!(matches!(err, CatalogError::BadRequest(_)));
    }

    #[test]
    fn test_update_requires_positive_id() {
        let err = UpdateSet::from_json(&json!({"group": "Muse"})).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = UpdateSet::from_json(&json!({"id": 0, "group": "Muse"})).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let err = UpdateSet::from_json(&json!({"id": "7"})).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_update_fields() {
        let update = UpdateSet::from_json(&json!({
            "id": 7,
            "song": "  Uprising ",
            "releaseDate": "07.09.2009",
            "patronymic": "https://example.com/uprising",
        }))
        .unwrap();

        assert_eq!(update.id, 7);
        assert_eq!(update.group, None);
        assert_eq!(update.title.as_deref(), Some("Uprising"));
        assert_eq!(update.release_date, Some(date(7, 9, 2009)));
        assert_eq!(update.reference_link.as_deref(), Some("https://example.com/uprising"));
        assert!(update.has_changes());
    }

    #[test]
    fn test_update_without_fields_has_no_changes() {
        let update = UpdateSet::from_json(&json!({"id": 3})).unwrap();
        assert!(!update.has_changes());
    }

    #[test]
    fn test_update_blank_group_rejected() {
        let err = UpdateSet::from_json(&json!({"id": 3, "group": "   "})).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_update_non_string_lyrics() {
        let err = UpdateSet::from_json(&json!({"id": 3, "text": true})).unwrap_err();
        assert!(matches!(err, CatalogError::TypeMismatch { field: "text" }));
    }

    #[test]
    fn test_save_request_trims() {
        let body = json!({"group": " Muse ", "song": "Uprising\n"});
        let req = SaveRequest::from_json(&body).unwrap();
        assert_eq!(req.group, "Muse");
        assert_eq!(req.title, "Uprising");
    }

    #[test]
    fn test_save_request_requires_both() {
        assert!(matches!(
            SaveRequest::from_json(&json!({"group": "Muse"})),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            SaveRequest::from_json(&json!({"group": " ", "song": "Uprising"})),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_new_song_from_info() {
        let info = SongInfo {
            group: " Muse".to_string(),
            song: "Supermassive Black Hole ".to_string(),
            release_date: "16.07.2006".to_string(),
            text: "Ooh baby\n\n".to_string(),
            patronymic: "https://www.youtube.com/watch?v=Xsp3_a-PMTw".to_string(),
        };

        let song = NewSong::try_from(info).unwrap();
        assert_eq!(song.group, "Muse");
        assert_eq!(song.title, "Supermassive Black Hole");
        assert_eq!(song.release_date, date(16, 7, 2006));
        assert_eq!(song.lyrics, "Ooh baby");
    }

    #[test]
    fn test_new_song_rejects_bad_payload() {
        let missing_date = SongInfo {
            group: "Muse".to_string(),
            song: "Uprising".to_string(),
            ..Default::default()
        };
        assert!(matches!(NewSong::try_from(missing_date), Err(CatalogError::Validation(_))));

        let iso_date = SongInfo {
            group: "Muse".to_string(),
            song: "Uprising".to_string(),
            release_date: "2009-09-07".to_string(),
            ..Default::default()
        };
        assert!(matches!(NewSong::try_from(iso_date), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_song_serializes_wire_names() {
        let song = Song {
            id: 1,
            group: "Muse".to_string(),
            title: "Uprising".to_string(),
            release_date: Some(date(7, 9, 2009)),
            lyrics: None,
            reference_link: Some("link".to_string()),
        };

        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["group"], "Muse");
        assert_eq!(json["song"], "Uprising");
        assert_eq!(json["releaseDate"], "07.09.2009");
        assert_eq!(json["text"], Value::Null);
        assert_eq!(json["patronymic"], "link");
    }
}
