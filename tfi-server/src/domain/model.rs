//! Static GTFS reference entities.

use super::{Coord, GtfsTime};

/// A boarding location.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: String,
    pub location: Coord,
}

impl Stop {
    pub fn new(stop_id: impl Into<String>, stop_name: impl Into<String>, location: Coord) -> Self {
        Self {
            stop_id: stop_id.into(),
            stop_name: stop_name.into(),
            location,
        }
    }
}

/// A transit line as the public knows it (e.g. "208").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
}

impl Route {
    pub fn new(
        route_id: impl Into<String>,
        route_short_name: impl Into<String>,
        route_long_name: impl Into<String>,
    ) -> Self {
        Self {
            route_id: route_id.into(),
            route_short_name: route_short_name.into(),
            route_long_name: route_long_name.into(),
        }
    }
}

/// One scheduled run of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub trip_id: String,
    pub route_id: String,
}

impl Trip {
    pub fn new(trip_id: impl Into<String>, route_id: impl Into<String>) -> Self {
        Self {
            trip_id: trip_id.into(),
            route_id: route_id.into(),
        }
    }
}

/// A trip's scheduled call at a stop.
///
/// `stop_sequence` increases strictly along a trip; it orders calls but is
/// not required to be contiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    /// Untimed calls (allowed by GTFS between timepoints) have no arrival.
    pub arrival_time: Option<GtfsTime>,
}

impl StopTime {
    pub fn new(
        trip_id: impl Into<String>,
        stop_id: impl Into<String>,
        stop_sequence: u32,
        arrival_time: Option<GtfsTime>,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            stop_id: stop_id.into(),
            stop_sequence,
            arrival_time,
        }
    }
}
