//! Application state for the web layer.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::gtfs::GtfsStore;
use crate::realtime::FeedSource;
use crate::routing::RouteSearchConfig;

/// Shared application state.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Static GTFS reference data
    pub store: Arc<dyn GtfsStore>,

    /// Realtime feed provider
    pub feed: Arc<dyn FeedSource>,

    /// Stop search areas for route lookups
    pub route_config: Arc<RouteSearchConfig>,

    /// Zone the timetable is written in
    pub timezone: Tz,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        store: Arc<dyn GtfsStore>,
        feed: Arc<dyn FeedSource>,
        route_config: RouteSearchConfig,
        timezone: Tz,
    ) -> Self {
        Self {
            store,
            feed,
            route_config: Arc::new(route_config),
            timezone,
        }
    }
}
