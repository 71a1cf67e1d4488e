//! Route lookup errors.

/// Why a direct route could not be planned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    /// One of the two search areas contains no stops
    #[error("No stops found near start or end location")]
    NoNearbyStops,

    /// Stops exist at both ends but no single trip links them in order
    #[error("No direct bus route found")]
    NoDirectRoute,
}
