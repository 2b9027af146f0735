//! Error types for mlib-cs
//!
//! Every failure of the catalog core is one of these kinds. The HTTP layer
//! maps them to status codes: caller mistakes to 4xx, system failures to 5xx.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Catalog error type
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A filter or update value has the wrong JSON type (422)
    #[error("validation error: {field} must be a string")]
    TypeMismatch { field: &'static str },

    /// Required field missing or empty, bad date format (422)
    #[error("{0}")]
    Validation(String),

    /// Malformed request (400)
    #[error("{0}")]
    BadRequest(String),

    /// No row matches the id, or the lookup service does not know the song (400)
    #[error("{0}")]
    NotFound(String),

    /// Requested couplet does not exist (400)
    #[error("couplet {requested} out of range, song has {available}")]
    OutOfRange { requested: usize, available: usize },

    /// Song info lookup failed or answered garbage (400)
    #[error("song info lookup failed: {0}")]
    Upstream(String),

    /// DELETE matched but returned an inconsistent id (500)
    #[error("failed to delete song {0}")]
    DeleteFailed(i64),

    /// UPDATE matched but returned an inconsistent id (500)
    #[error("failed to update song {0}")]
    UpdateFailed(i64),

    /// No transaction could be obtained from the pool (500)
    #[error("database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Execute succeeded but COMMIT failed; the mutation may not be persisted (500)
    #[error("commit failed: {0}")]
    Commit(#[source] sqlx::Error),

    /// Any other database error (500)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error (500)
    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            CatalogError::TypeMismatch { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "TYPE_MISMATCH")
            }
            CatalogError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            CatalogError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            CatalogError::NotFound(_) => (StatusCode::BAD_REQUEST, "NOT_FOUND"),
            CatalogError::OutOfRange { .. } => (StatusCode::BAD_REQUEST, "OUT_OF_RANGE"),
            CatalogError::Upstream(_) => (StatusCode::BAD_REQUEST, "UPSTREAM_ERROR"),
            CatalogError::DeleteFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DELETE_FAILED"),
            CatalogError::UpdateFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPDATE_FAILED"),
            CatalogError::Connection(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONNECTION_ERROR"),
            CatalogError::Commit(_) => (StatusCode::INTERNAL_SERVER_ERROR, "COMMIT_ERROR"),
            CatalogError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            CatalogError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// True for failures the caller can fix by changing the request
    pub fn is_client_error(&self) -> bool {
        self.status_and_code().0.is_client_error()
    }
}

impl From<mlib_common::Error> for CatalogError {
    fn from(err: mlib_common::Error) -> Self {
        match err {
            mlib_common::Error::Validation(msg) => CatalogError::Validation(msg),
            mlib_common::Error::NotFound(msg) => CatalogError::NotFound(msg),
            mlib_common::Error::Database(e) => CatalogError::Database(e),
            other => CatalogError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        // Internal details stay in the logs
        let message = match &self {
            CatalogError::Connection(_) | CatalogError::Database(_) => {
                "internal database error".to_string()
            }
            CatalogError::Commit(_) => "failed to commit transaction".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorBody {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `VALIDATION_ERROR`
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,
    pub message: String,
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
