//! Song catalog endpoints
//!
//! Handlers only decode and normalize the request, call the catalog service
//! with an explicit `RequestContext` and shape the JSON response.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::docs::{FilterBody, SaveSongBody, UpdateBody};
use crate::context::RequestContext;
use crate::error::{CatalogError, CatalogResult, ErrorBody};
use crate::models::{FilterSet, SaveRequest, Song, SongText, UpdateSet};
use crate::pagination::{couplet_index, Page};
use crate::AppState;

/// `limit` / `offset` as raw strings so garbage normalizes instead of failing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page size, 10 when missing or not a positive integer
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: Option<String>,
    /// Rows to skip, 0 when missing or negative
    #[param(value_type = Option<i64>, example = 0)]
    pub offset: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SongTextQuery {
    /// Song id
    #[param(value_type = i64, example = 1)]
    pub id: Option<String>,
    /// 1-based couplet number, the first couplet when missing
    #[param(value_type = Option<i64>, example = 1)]
    pub couplet: Option<String>,
}

/// Answer of `POST /save`
#[derive(Debug, Serialize, ToSchema)]
pub struct SavedSong {
    #[schema(example = "song saved")]
    pub detail: String,
    pub id: i64,
}

/// Answer of `DELETE /song/{id}` and `PATCH /update`
#[derive(Debug, Serialize, ToSchema)]
pub struct SongChanged {
    pub song_id: i64,
    #[schema(example = "song updated")]
    pub detail: String,
}

impl SongChanged {
    fn new(song_id: i64, detail: &str) -> Self {
        Self {
            song_id,
            detail: detail.to_string(),
        }
    }
}

/// Look a song up by group and title and store it
#[utoipa::path(
    post,
    tag = "songs",
    path = "/save",
    request_body = SaveSongBody,
    responses(
        (status = 201, description = "Song stored", body = SavedSong),
        (status = 400, description = "Malformed body or unknown song", body = ErrorBody),
        (status = 422, description = "Missing or mistyped field", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
pub async fn save_song(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Json<Value>, JsonRejection>,
) -> CatalogResult<(StatusCode, Json<SavedSong>)> {
    let Json(body) = body.map_err(bad_json)?;
    let request = SaveRequest::from_json(&body)?;

    let id = state.catalog.save_song(&ctx, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SavedSong {
            detail: "song saved".to_string(),
            id,
        }),
    ))
}

/// Filtered page of songs
///
/// The body holds the filters; an empty body means no filtering.
#[utoipa::path(
    post,
    tag = "songs",
    path = "/get",
    params(ListQuery),
    request_body(content = FilterBody, description = "Filters, all optional; may be empty"),
    responses(
        (status = 200, description = "Songs ordered by id", body = Vec<Song>),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 422, description = "Mistyped filter or bad date", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
pub async fn list_songs(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<ListQuery>,
    body: Bytes,
) -> CatalogResult<Json<Vec<Song>>> {
    let filters = if body.iter().all(u8::is_ascii_whitespace) {
        FilterSet::default()
    } else {
        let raw: Value = serde_json::from_slice(&body)
            .map_err(|e| CatalogError::BadRequest(format!("failed to decode request: {}", e)))?;
        FilterSet::from_json(&raw)?
    };
    let page = Page::from_query(query.limit.as_deref(), query.offset.as_deref());

    let songs = state.catalog.list_songs(&ctx, &filters, page).await?;
    Ok(Json(songs))
}

/// One couplet of a song's lyrics
#[utoipa::path(
    get,
    tag = "songs",
    path = "/song-text",
    params(SongTextQuery),
    responses(
        (status = 200, description = "The requested couplet", body = SongText),
        (status = 400, description = "Invalid id, unknown song or bad couplet", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
pub async fn song_text(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<SongTextQuery>,
) -> CatalogResult<Json<SongText>> {
    let id = parse_song_id(query.id.as_deref())?;
    let couplet = couplet_index(query.couplet.as_deref());

    let text = state.catalog.song_text(&ctx, id, couplet).await?;
    Ok(Json(text))
}

/// Delete one song
#[utoipa::path(
    delete,
    tag = "songs",
    path = "/song/{id}",
    params(("id" = i64, Path, description = "Song id")),
    responses(
        (status = 200, description = "Song deleted", body = SongChanged),
        (status = 400, description = "Invalid id or unknown song", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
pub async fn delete_song(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_id): Path<String>,
) -> CatalogResult<Json<SongChanged>> {
    let id = parse_song_id(Some(&raw_id))?;

    let deleted = state.catalog.delete_song(&ctx, id).await?;
    Ok(Json(SongChanged::new(deleted, "song deleted")))
}

/// Partial update of one song
#[utoipa::path(
    patch,
    tag = "songs",
    path = "/update",
    request_body = UpdateBody,
    responses(
        (status = 200, description = "Song updated", body = SongChanged),
        (status = 400, description = "No fields, malformed body or unknown song", body = ErrorBody),
        (status = 422, description = "Missing id or mistyped field", body = ErrorBody),
        (status = 500, description = "Database failure", body = ErrorBody),
    ),
)]
pub async fn update_song(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Json<Value>, JsonRejection>,
) -> CatalogResult<Json<SongChanged>> {
    let Json(body) = body.map_err(bad_json)?;
    let update = UpdateSet::from_json(&body)?;

    let updated = state.catalog.update_song(&ctx, &update).await?;
    Ok(Json(SongChanged::new(updated, "song updated")))
}

fn bad_json(rejection: JsonRejection) -> CatalogError {
    let detail = rejection.body_text();
    CatalogError::BadRequest(format!("failed to decode request: {}", detail))
}

/// Positive song id from a path or query value
fn parse_song_id(raw: Option<&str>) -> CatalogResult<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| CatalogError::BadRequest("invalid song ID".to_string()))
}
