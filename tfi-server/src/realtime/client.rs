//! GTFS-Realtime HTTP client.
//!
//! One GET per call against the configured feed URL, authenticated with an
//! `x-api-key` header. No caching and no retries: a failed fetch is
//! returned to the caller as-is.

use futures::future::BoxFuture;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::debug;

use super::error::FeedError;
use super::source::FeedSource;
use super::types::FeedMessage;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much of an unparseable body to keep for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the realtime feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed URL (JSON encoding)
    pub url: String,
    /// API key sent as `x-api-key`
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Create a new config for the given URL and key.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Realtime feed HTTP client.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| FeedError::NotConfigured("API key is not a valid header value".into()))?;
        headers.insert("x-api-key", api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Fetch the current feed.
    pub async fn fetch_feed(&self) -> Result<FeedMessage, FeedError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FeedError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FeedError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let feed: FeedMessage = serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })?;

        debug!(entities = feed.entity_count(), "fetched realtime feed");
        Ok(feed)
    }
}

impl FeedSource for FeedClient {
    fn fetch(&self) -> BoxFuture<'_, Result<FeedMessage, FeedError>> {
        Box::pin(self.fetch_feed())
    }
}
