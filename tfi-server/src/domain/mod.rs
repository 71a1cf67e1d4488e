//! Domain types for the transit lookup service.
//!
//! Static GTFS entities plus the validated value types (coordinates,
//! schedule times) that the rest of the crate relies on. Invariants are
//! checked at construction so downstream code can trust them.

mod coord;
mod model;
mod time;

pub use coord::{BoundingBox, Coord, InvalidCoord};
pub use model::{Route, Stop, StopTime, Trip};
pub use time::{GtfsTime, TimeError};
