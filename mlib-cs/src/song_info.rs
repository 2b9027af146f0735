//! Client for the external song info lookup service

use async_trait::async_trait;
use mlib_common::config::SongInfoConfig;
use mlib_common::SongInfo;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use crate::context::{RequestContext, REQUEST_ID_HEADER};
use crate::error::{CatalogError, CatalogResult};

/// Source of authoritative song payloads, keyed by group and title
#[async_trait]
pub trait SongInfoLookup: Send + Sync {
    /// Fetch the payload for (`group`, `song`)
    ///
    /// Unknown songs fail with `NotFound`; every other failure with `Upstream`.
    async fn lookup(
        &self,
        ctx: &RequestContext,
        group: &str,
        song: &str,
    ) -> CatalogResult<SongInfo>;
}

/// `SongInfoLookup` over HTTP
#[derive(Debug, Clone)]
pub struct HttpSongInfoClient {
    client: reqwest::Client,
    info_url: String,
}

impl HttpSongInfoClient {
    pub fn new(info_url: impl Into<String>, timeout: Duration) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            info_url: info_url.into(),
        })
    }

    pub fn from_config(config: &SongInfoConfig) -> CatalogResult<Self> {
        Self::new(config.info_url(), Duration::from_millis(config.timeout_ms))
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }
}

#[async_trait]
impl SongInfoLookup for HttpSongInfoClient {
    async fn lookup(
        &self,
        ctx: &RequestContext,
        group: &str,
        song: &str,
    ) -> CatalogResult<SongInfo> {
        debug!(url = %self.info_url, group, song, "requesting song info");

        let response = self
            .client
            .get(&self.info_url)
            .query(&[("group", group), ("song", song)])
            .header(REQUEST_ID_HEADER, &ctx.request_id)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "song info request failed");
                CatalogError::Upstream(format!("request failed: {}", e))
            })?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(CatalogError::NotFound(format!(
                    "song info not found: {} - {}",
                    group, song
                )))
            }
            status => {
                warn!(%status, "song info service returned an error");
                return Err(CatalogError::Upstream(format!("unexpected status {}", status)));
            }
        }

        response
            .json::<SongInfo>()
            .await
            .map_err(|e| CatalogError::Upstream(format!("invalid song info payload: {}", e)))
    }
}
