//! Fruit metadata via the fruityvice REST API (no SDK dependency)
//!
//! One GET per page view, shown verbatim. Failures only produce a warning
//! and have no bearing on the order form.

use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("metadata endpoint returned HTTP {0}")]
    Status(http::StatusCode),
    #[error("metadata body is not JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

impl From<&MetadataError> for AppError {
    fn from(_: &MetadataError) -> Self {
        AppError::new(ErrorCode::MetadataUnavailable)
    }
}

impl From<MetadataError> for AppError {
    fn from(err: MetadataError) -> Self {
        AppError::from(&err)
    }
}

#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    url: String,
}

impl MetadataClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<Value, MetadataError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(MetadataError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MetadataError::Status(status));
        }
        resp.json().await.map_err(MetadataError::Decode)
    }

    /// Fetch and log a failure; callers only need the outcome
    pub async fn fetch_logged(&self) -> Result<Value, MetadataError> {
        let result = self.fetch().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, url = %self.url, "Fruit metadata unavailable");
        }
        result
    }
}
