//! mlib-si library - song info lookup service
//!
//! Stand-in for the external service the catalog asks for authoritative
//! song metadata when a new song is saved.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use mlib_common::SongInfo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

pub mod fixtures;

pub use fixtures::Fixtures;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub fixtures: Arc<Fixtures>,
}

impl AppState {
    pub fn new(fixtures: Fixtures) -> Self {
        Self {
            fixtures: Arc::new(fixtures),
        }
    }
}

/// Query parameters of `GET /info`
#[derive(Debug, Default, Deserialize)]
pub struct InfoQuery {
    pub group: Option<String>,
    pub song: Option<String>,
}

/// Lookup errors
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("{0} parameter is required")]
    MissingParameter(&'static str),

    #[error("song not found")]
    NotFound,
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = match self {
            LookupError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            LookupError::NotFound => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// GET /info?group&song
pub async fn get_info(
    State(state): State<AppState>,
    Query(query): Query<InfoQuery>,
) -> Result<Json<SongInfo>, LookupError> {
    let group = required(query.group.as_deref(), "group")?;
    let song = required(query.song.as_deref(), "song")?;

    match state.fixtures.find(group, song) {
        Some(info) => {
            debug!(group, song, "song info found");
            Ok(Json(info.clone()))
        }
        None => {
            debug!(group, song, "song info not found");
            Err(LookupError::NotFound)
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, LookupError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(LookupError::MissingParameter(name))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "mlib-si".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/info", get(get_info))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
