//! Request-scoped context passed explicitly into every catalog operation

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use tower_http::request_id::RequestId;
use tracing::Span;

/// Header carrying the request id in and out
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request diagnostic context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Context with a fresh random id, for calls that do not come from HTTP
    pub fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    /// Span for one catalog operation
    pub fn span(&self, op: &'static str) -> Span {
        tracing::info_span!("catalog", op, request_id = %self.request_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_layer = parts
            .extensions
            .get::<RequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .map(str::to_string);

        let from_header = || {
            parts
                .headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Ok(match from_layer.or_else(from_header) {
            Some(id) => RequestContext::new(id),
            None => RequestContext::generate(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_header_is_used() {
        let (mut parts, _) = Request::builder()
            .header(REQUEST_ID_HEADER, "req-42")
            .body(())
            .unwrap()
            .into_parts();

        let ctx = RequestContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.request_id, "req-42");
    }

    #[tokio::test]
    async fn test_missing_header_generates_id() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let ctx = RequestContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(uuid::Uuid::parse_str(&ctx.request_id).is_ok());
    }
}
