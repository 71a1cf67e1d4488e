//! Geographic coordinates and bounding boxes.

use std::fmt;

/// Error returned when constructing an out-of-range coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoord {
    reason: &'static str,
}

impl InvalidCoord {
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A WGS84 coordinate in decimal degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180];
/// NaN and infinities are rejected at construction.
///
/// # Examples
///
/// ```
/// use tfi_server::domain::Coord;
///
/// let cork = Coord::new(51.8979, -8.4706).unwrap();
/// assert_eq!(cork.lat(), 51.8979);
///
/// assert!(Coord::new(91.0, 0.0).is_err());
/// assert!(Coord::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    lat: f64,
    lon: f64,
}

impl Coord {
    /// Create a coordinate, validating both components.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoord> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoord {
                reason: "latitude and longitude must be finite numbers",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoord {
                reason: "latitude must be between -90 and 90",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoord {
                reason: "longitude must be between -180 and 180",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Euclidean distance in raw degree space.
    ///
    /// Not geodesic: a degree of longitude counts the same as a degree of
    /// latitude. Only meaningful for ranking nearby points.
    pub fn degree_distance(&self, other: &Coord) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// An inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// The box `centre ± (lat_radius, lon_radius)`.
    pub fn around(centre: Coord, lat_radius: f64, lon_radius: f64) -> Self {
        Self {
            min_lat: centre.lat - lat_radius,
            max_lat: centre.lat + lat_radius,
            min_lon: centre.lon - lon_radius,
            max_lon: centre.lon + lon_radius,
        }
    }

    /// Whether the coordinate lies inside the box (edges included).
    pub fn contains(&self, coord: &Coord) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lon..=self.max_lon).contains(&coord.lon)
    }
}
