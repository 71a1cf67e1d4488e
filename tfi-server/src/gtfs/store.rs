//! The read-only reference data interface.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{BoundingBox, GtfsTime, Route, Stop, Trip};

/// A trip's call at a particular stop, as seen from that stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopVisit {
    pub trip_id: String,
    pub stop_sequence: u32,
    pub arrival_time: Option<GtfsTime>,
}

/// A trip's scheduled arrival and position at one stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledCall {
    pub arrival_time: Option<GtfsTime>,
    pub stop_sequence: u32,
}

/// Row counts of the loaded reference data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub stops: usize,
    pub routes: usize,
    pub trips: usize,
    pub stop_times: usize,
}

/// Read-only access to static GTFS data.
///
/// Passed explicitly to everything that needs reference data, so tests can
/// seed their own store. Implementations must be safe to query from many
/// requests at once. Batched lookups (`route_short_names`, `stop_names`,
/// `schedules_at_stop`) answer a whole set of ids in one call; ids that are
/// unknown are simply absent from the result.
pub trait GtfsStore: Send + Sync {
    /// All stops whose location falls inside the box.
    fn stops_within(&self, bbox: &BoundingBox) -> Vec<Stop>;

    fn stop(&self, stop_id: &str) -> Option<Stop>;

    fn route(&self, route_id: &str) -> Option<Route>;

    fn trip(&self, trip_id: &str) -> Option<Trip>;

    /// Every scheduled call at a stop, in no particular order.
    fn visits_at(&self, stop_id: &str) -> Vec<StopVisit>;

    /// route_id → route_short_name for the given ids.
    fn route_short_names(&self, route_ids: &[&str]) -> HashMap<String, String>;

    /// stop_id → stop_name for the given ids.
    fn stop_names(&self, stop_ids: &[&str]) -> HashMap<String, String>;

    /// trip_id → that trip's scheduled call at `stop_id`, for the given trips.
    ///
    /// A trip that calls at the stop more than once reports its earliest call.
    fn schedules_at_stop(&self, stop_id: &str, trip_ids: &[&str])
    -> HashMap<String, ScheduledCall>;

    fn summary(&self) -> StoreSummary;
}
