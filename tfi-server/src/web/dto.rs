//! Data transfer objects for web requests and responses.
//!
//! Query parameter names are camelCase to match the frontend; response
//! fields are snake_case.

use serde::{Deserialize, Serialize};

use crate::domain::Coord;
use crate::routing::RoutePlan;

/// Query for `GET /tfi/route`.
///
/// Fields are kept as raw strings so that missing and malformed values can
/// be reported with distinct messages.
#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    #[serde(rename = "startLat")]
    pub start_lat: Option<String>,

    #[serde(rename = "startLon")]
    pub start_lon: Option<String>,

    #[serde(rename = "endLat")]
    pub end_lat: Option<String>,

    #[serde(rename = "endLon")]
    pub end_lon: Option<String>,
}

impl RouteQuery {
    /// Parse the start and end coordinates.
    ///
    /// The error is the message to show the client.
    pub fn endpoints(&self) -> Result<(Coord, Coord), String> {
        let (Some(start_lat), Some(start_lon), Some(end_lat), Some(end_lon)) = (
            present(&self.start_lat),
            present(&self.start_lon),
            present(&self.end_lat),
            present(&self.end_lon),
        ) else {
            return Err("Missing start or end coordinates".to_string());
        };

        let start = parse_coord(("startLat", start_lat), ("startLon", start_lon))?;
        let end = parse_coord(("endLat", end_lat), ("endLon", end_lon))?;
        Ok((start, end))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_coord(lat: (&str, &str), lon: (&str, &str)) -> Result<Coord, String> {
    let degrees = |(name, raw): (&str, &str)| {
        raw.parse::<f64>()
            .map_err(|_| format!("Invalid coordinate: {name}={raw}"))
    };
    let coord = Coord::new(degrees(lat)?, degrees(lon)?)
        .map_err(|e| format!("Invalid coordinate: {}", e.reason()))?;
    Ok(coord)
}

/// Query for `GET /tfi/live`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct LiveQuery {
    #[serde(rename = "routeId")]
    pub route_id: Option<String>,

    #[serde(rename = "stopId")]
    pub stop_id: Option<String>,
}

impl LiveQuery {
    /// Only return trip updates on this route.
    pub fn route_id(&self) -> Option<&str> {
        present(&self.route_id)
    }

    /// Predict arrivals at this stop.
    pub fn stop_id(&self) -> Option<&str> {
        present(&self.stop_id)
    }
}

/// Response for a successful route lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,

    pub start_stop_id: String,
    pub start_stop_name: String,

    pub end_stop_id: String,
    pub end_stop_name: String,
    pub end_stop_lat: f64,
    pub end_stop_lon: f64,

    /// Straight-line walk from the alighting stop, in km (2 dp).
    pub walking_distance_to_dest: f64,

    /// Walking time in minutes.
    pub walking_time_to_dest: u32,
}

impl From<&RoutePlan> for RouteResponse {
    fn from(plan: &RoutePlan) -> Self {
        let route = &plan.route;
        Self {
            route_id: route.route.route_id.clone(),
            route_short_name: route.route.route_short_name.clone(),
            route_long_name: route.route.route_long_name.clone(),
            start_stop_id: route.start_stop.stop_id.clone(),
            start_stop_name: route.start_stop.stop_name.clone(),
            end_stop_id: route.end_stop.stop_id.clone(),
            end_stop_name: route.end_stop.stop_name.clone(),
            end_stop_lat: route.end_stop.location.lat(),
            end_stop_lon: route.end_stop.location.lon(),
            walking_distance_to_dest: (plan.walk.distance_km * 100.0).round() / 100.0,
            walking_time_to_dest: plan.walk.minutes,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    pub message: String,

    /// Underlying cause, when there is one worth showing
    pub error: Option<String>,
}
