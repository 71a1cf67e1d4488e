//! Nearest-stop search.

use crate::domain::{BoundingBox, Coord, Stop};
use crate::gtfs::GtfsStore;

use super::config::SearchArea;

/// A stop and its distance from the search centre, in raw degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStop {
    pub stop: Stop,
    pub distance_deg: f64,
}

/// Find the stops nearest `centre` within a search area, nearest first.
///
/// The box is a cheap pre-filter, not a true radius, and ranking uses planar
/// distance in degree space. That is good enough to order stops a few hundred
/// metres apart. Ties are broken by stop id so results are stable.
pub fn find_nearby_stops(
    store: &dyn GtfsStore,
    centre: Coord,
    area: &SearchArea,
) -> Vec<NearbyStop> {
    let bbox = BoundingBox::around(centre, area.lat_radius, area.lon_radius);

    let mut nearby: Vec<NearbyStop> = store
        .stops_within(&bbox)
        .into_iter()
        .map(|stop| NearbyStop {
            distance_deg: centre.degree_distance(&stop.location),
            stop,
        })
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_deg
            .total_cmp(&b.distance_deg)
            .then_with(|| a.stop.stop_id.cmp(&b.stop.stop_id))
    });
    nearby.truncate(area.limit);
    nearby
}
