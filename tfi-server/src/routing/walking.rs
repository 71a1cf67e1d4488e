//! Straight-line walking estimates.

use crate::domain::Coord;

/// Kilometres per degree of latitude (and of longitude at the equator).
const KM_PER_DEGREE: f64 = 111.0;

/// Minutes to walk one kilometre at 5 km/h.
const MINUTES_PER_KM: f64 = 12.0;

/// Estimated walk from a stop to the final destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkEstimate {
    pub distance_km: f64,
    pub minutes: u32,
}

/// Estimate the walk between a stop and a destination.
///
/// Longitude degrees are scaled by the cosine of the destination latitude.
/// No path network, terrain or crossings are modelled.
pub fn estimate_walk(dest: Coord, stop: Coord) -> WalkEstimate {
    let dlat_km = (dest.lat() - stop.lat()) * KM_PER_DEGREE;
    let dlon_km = (dest.lon() - stop.lon()) * KM_PER_DEGREE * dest.lat().to_radians().cos();
    let distance_km = (dlat_km * dlat_km + dlon_km * dlon_km).sqrt();

    WalkEstimate {
        distance_km,
        minutes: (distance_km * MINUTES_PER_KM).round() as u32,
    }
}
