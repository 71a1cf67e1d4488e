//! Realtime feed error types.

/// Errors from fetching the realtime feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Feed URL or API key not set
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key
    #[error("unauthorized: check NTA_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by realtime feed")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response was not a feed message
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// A local feed file could not be read
    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),
}
