//! The nearest-stop → direct-route → walk pipeline.

use tracing::debug;

use crate::domain::Coord;
use crate::gtfs::GtfsStore;

use super::config::RouteSearchConfig;
use super::error::RoutingError;
use super::matcher::{DirectRoute, find_direct_route};
use super::proximity::find_nearby_stops;
use super::walking::{WalkEstimate, estimate_walk};

/// A direct bus between two places, plus the walk at the far end.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub route: DirectRoute,
    pub walk: WalkEstimate,
}

/// Plan a direct trip from `start` to `end`.
///
/// Fails with [`RoutingError::NoNearbyStops`] when either end has no stop in
/// its search area, and [`RoutingError::NoDirectRoute`] when no single trip
/// links the two stop sets in travel order.
pub fn plan_direct_route(
    store: &dyn GtfsStore,
    start: Coord,
    end: Coord,
    config: &RouteSearchConfig,
) -> Result<RoutePlan, RoutingError> {
    let start_stops = find_nearby_stops(store, start, &config.start);
    let end_stops = find_nearby_stops(store, end, &config.end);

    debug!(
        %start,
        %end,
        start_candidates = start_stops.len(),
        end_candidates = end_stops.len(),
        "nearby stops"
    );

    if start_stops.is_empty() || end_stops.is_empty() {
        return Err(RoutingError::NoNearbyStops);
    }

    let start_ids: Vec<&str> = start_stops.iter().map(|s| s.stop.stop_id.as_str()).collect();
    let end_ids: Vec<&str> = end_stops.iter().map(|s| s.stop.stop_id.as_str()).collect();

    let route =
        find_direct_route(store, &start_ids, &end_ids).ok_or(RoutingError::NoDirectRoute)?;
    let walk = estimate_walk(end, route.end_stop.location);

    Ok(RoutePlan { route, walk })
}
