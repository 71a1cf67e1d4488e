//! Direct route lookup between two coordinates.
//!
//! The pipeline is:
//! 1. find stops near the origin (tight box) and destination (loose box),
//! 2. find one trip that calls at an origin stop and later at a
//!    destination stop,
//! 3. estimate the walk from the alighting stop to the destination.
//!
//! There is no transfer search: a single trip either links the two stop
//! neighbourhoods or the lookup fails.

mod config;
mod error;
mod matcher;
mod plan;
mod proximity;
mod walking;

pub use config::{RouteSearchConfig, SearchArea};
pub use error::RoutingError;
pub use matcher::{DirectRoute, find_direct_route};
pub use plan::{RoutePlan, plan_direct_route};
pub use proximity::{NearbyStop, find_nearby_stops};
pub use walking::{WalkEstimate, estimate_walk};
