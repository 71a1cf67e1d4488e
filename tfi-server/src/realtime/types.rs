//! GTFS-Realtime feed DTOs (JSON encoding).
//!
//! Only the fields the enricher reads or writes are typed. Everything else
//! at each level is kept in a flattened `extra` map and written back out
//! unchanged, so the response is the upstream feed plus derived fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A whole feed fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<FeedHeader>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Vec<FeedEntity>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeedMessage {
    /// Number of entities in the feed.
    pub fn entity_count(&self) -> usize {
        self.entity.as_ref().map_or(0, Vec::len)
    }

    /// Drop trip updates on other routes.
    ///
    /// Entities without a trip update (vehicle positions, alerts) are kept.
    pub fn retain_route(&mut self, route_id: &str) {
        if let Some(entities) = self.entity.as_mut() {
            entities.retain(|e| match &e.trip_update {
                Some(tu) => {
                    tu.trip.as_ref().and_then(|t| t.route_id.as_deref()) == Some(route_id)
                }
                None => true,
            });
        }
    }
}

/// Feed metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gtfs_realtime_version: Option<String>,

    /// POSIX seconds; some producers send it as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entity of the feed, plus the fields derived for a target stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedEntity {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_update: Option<TripUpdate>,

    /// Set (to true) once the vehicle is past the target stop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_passed: Option<bool>,

    /// Delay-adjusted arrival at the target stop, RFC 3339 UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_arrival_time: Option<String>,

    /// Timetabled arrival at the target stop, "HH:MM:SS".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_arrival_time: Option<String>,

    /// Delay applied to the prediction, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i32>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Realtime progress of one trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip: Option<TripDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_time_update: Option<Vec<StopTimeUpdate>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TripUpdate {
    /// The stop-time updates, or an empty slice.
    pub fn updates(&self) -> &[StopTimeUpdate] {
        self.stop_time_update.as_deref().unwrap_or_default()
    }
}

/// Which scheduled trip an update refers to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,

    /// Resolved from the static routes table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_short_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Realtime prediction for one stop of a trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopTimeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<StopTimeEvent>,

    /// Resolved from the static stops table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StopTimeUpdate {
    /// The arrival delay, if present and non-zero.
    pub fn arrival_delay(&self) -> Option<i32> {
        self.arrival
            .as_ref()
            .and_then(|a| a.delay)
            .filter(|d| *d != 0)
    }
}

/// Timing for an arrival or departure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopTimeEvent {
    /// Seconds late (negative when early).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i32>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
