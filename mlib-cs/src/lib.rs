//! mlib-cs library - song catalog service
//!
//! Stores song metadata in PostgreSQL and serves filtered listing, couplet
//! pagination of lyrics and transactional save/update/delete over HTTP.

use axum::{
    body::Body,
    http::{HeaderName, Request},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub mod api;
pub mod context;
pub mod db;
pub mod error;
pub mod lyrics;
pub mod models;
pub mod pagination;
pub mod query;
pub mod service;
pub mod song_info;

pub use context::RequestContext;
pub use error::{CatalogError, CatalogResult};
pub use service::CatalogService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    /// Upper bound for handling one request
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(catalog: CatalogService, request_timeout: Duration) -> Self {
        Self {
            catalog: Arc::new(catalog),
            request_timeout,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    let routes = Router::new()
        .route("/save", post(api::save_song))
        .route("/get", post(api::list_songs))
        .route("/song-text", get(api::song_text))
        .route("/song/:id", delete(api::delete_song))
        .route("/update", patch(api::update_song))
        .merge(api::health_routes())
        .merge(api::swagger_ui())
        .with_state(state);

    with_middleware(routes, request_timeout)
}

/// Wrap `router` in the shared HTTP middleware stack
///
/// Outermost first: request id assignment and propagation, tracing, panic
/// recovery, the request timeout and CORS. Timeout and panic responses are
/// produced inside the propagation layer so they still carry `x-request-id`.
pub fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(context::REQUEST_ID_HEADER);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(context::REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(CatchPanicLayer::custom(recover_panic))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive());

    router.layer(middleware)
}

/// Turn a handler panic into a 500 with the usual error body
fn recover_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "handler panicked");

    CatalogError::Internal("request handler panicked".to_string()).into_response()
}
