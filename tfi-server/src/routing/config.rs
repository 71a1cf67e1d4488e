//! Search areas for the route lookup.

/// A rectangular search area around a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchArea {
    /// Half-height of the box in degrees of latitude.
    pub lat_radius: f64,

    /// Half-width of the box in degrees of longitude.
    pub lon_radius: f64,

    /// Maximum number of stops to return.
    pub limit: usize,
}

impl SearchArea {
    pub fn new(lat_radius: f64, lon_radius: f64, limit: usize) -> Self {
        Self {
            lat_radius,
            lon_radius,
            limit,
        }
    }
}

/// Configuration for direct-route lookups.
///
/// The end area is deliberately looser than the start area: a rider will
/// accept a short walk at the destination but wants to board close by.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSearchConfig {
    /// Where to look for boarding stops.
    pub start: SearchArea,

    /// Where to look for alighting stops.
    pub end: SearchArea,
}

impl RouteSearchConfig {
    pub fn new(start: SearchArea, end: SearchArea) -> Self {
        Self { start, end }
    }

    /// Replace the boarding search area.
    pub fn with_start(mut self, start: SearchArea) -> Self {
        self.start = start;
        self
    }

    /// Replace the alighting search area.
    pub fn with_end(mut self, end: SearchArea) -> Self {
        self.end = end;
        self
    }
}

impl Default for RouteSearchConfig {
    fn default() -> Self {
        Self {
            // ~1km around the origin
            start: SearchArea::new(0.01, 0.015, 5),
            // ~3km around the destination, for "bus + walk"
            end: SearchArea::new(0.03, 0.04, 10),
        }
    }
}
