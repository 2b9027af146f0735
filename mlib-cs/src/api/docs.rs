//! OpenAPI document and Swagger UI
//!
//! The catalog endpoints decode their bodies from loosely typed JSON (see
//! `models`), so the request shapes below exist only to describe the wire
//! format.

use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use super::{health, songs};
use crate::error::{ErrorBody, ErrorDetail};
use crate::models::{Song, SongText};

/// Where the generated document is served
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// `POST /save` body
#[derive(Debug, ToSchema)]
pub struct SaveSongBody {
    #[schema(example = "Muse")]
    pub group: String,
    #[schema(example = "Supermassive Black Hole")]
    pub song: String,
}

/// `POST /get` body; every criterion is optional
#[derive(Debug, ToSchema)]
pub struct FilterBody {
    /// Case-insensitive substring of the group name
    pub group: Option<String>,
    /// Case-insensitive substring of the title
    pub song: Option<String>,
    /// Case-insensitive substring of the lyrics
    pub text: Option<String>,
    /// Released on or before, `DD.MM.YYYY`
    #[schema(example = "31.12.2010")]
    pub release_date_before: Option<String>,
    /// Released on or after, `DD.MM.YYYY`
    #[schema(example = "16.09.2001")]
    pub release_date_after: Option<String>,
}

/// `PATCH /update` body; fields left out stay untouched
#[derive(Debug, ToSchema)]
pub struct UpdateBody {
    #[schema(example = 1)]
    pub id: i64,
    pub group: Option<String>,
    pub song: Option<String>,
    pub text: Option<String>,
    #[schema(rename = "releaseDate", example = "16.07.2006")]
    pub release_date: Option<String>,
    pub patronymic: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Music library",
        description = "Song catalog backed by PostgreSQL and the song info service"
    ),
    paths(
        songs::save_song,
        songs::list_songs,
        songs::song_text,
        songs::delete_song,
        songs::update_song,
        health::health_check,
    ),
    components(schemas(
        Song,
        SongText,
        SaveSongBody,
        FilterBody,
        UpdateBody,
        songs::SavedSong,
        songs::SongChanged,
        health::HealthResponse,
        ErrorBody,
        ErrorDetail,
    )),
    tags((name = "songs", description = "Song catalog"))
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger` over the generated document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger").url(OPENAPI_PATH, ApiDoc::openapi())
}
