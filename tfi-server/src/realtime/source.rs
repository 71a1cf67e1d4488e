//! Where realtime feeds come from.

use std::path::Path;
use std::sync::Arc;

use futures::future::{self, BoxFuture};

use super::error::FeedError;
use super::types::FeedMessage;

/// A provider of realtime feed snapshots.
///
/// Object-safe so the web layer can hold any source behind an `Arc`.
pub trait FeedSource: Send + Sync {
    /// Fetch the current feed.
    fn fetch(&self) -> BoxFuture<'_, Result<FeedMessage, FeedError>>;
}

/// A source that always serves the same feed.
///
/// Useful for development without API access, and in tests.
#[derive(Debug, Clone)]
pub struct StaticFeed {
    feed: Arc<FeedMessage>,
}

impl StaticFeed {
    pub fn new(feed: FeedMessage) -> Self {
        Self {
            feed: Arc::new(feed),
        }
    }

    /// Load a feed snapshot saved as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let body = std::fs::read_to_string(path)?;
        let feed = serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: e.to_string(),
            body: None,
        })?;
        Ok(Self::new(feed))
    }
}

impl FeedSource for StaticFeed {
    fn fetch(&self) -> BoxFuture<'_, Result<FeedMessage, FeedError>> {
        Box::pin(future::ready(Ok(FeedMessage::clone(&self.feed))))
    }
}

/// A source used when no feed is configured; every fetch fails.
#[derive(Debug, Clone)]
pub struct UnconfiguredFeed {
    reason: String,
}

impl UnconfiguredFeed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl FeedSource for UnconfiguredFeed {
    fn fetch(&self) -> BoxFuture<'_, Result<FeedMessage, FeedError>> {
        Box::pin(future::ready(Err(FeedError::NotConfigured(
            self.reason.clone(),
        ))))
    }
}
