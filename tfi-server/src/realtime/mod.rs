//! GTFS-Realtime feed access and enrichment.
//!
//! A [`FeedSource`] yields the current [`FeedMessage`]; [`enrich_feed`] then
//! resolves names against the static store and, for a target stop, adds
//! arrival predictions.

mod client;
mod enrich;
mod error;
mod source;
mod types;

pub use client::{FeedClient, FeedConfig};
pub use enrich::{EnrichContext, enrich_feed};
pub use error::FeedError;
pub use source::{FeedSource, StaticFeed, UnconfiguredFeed};
pub use types::{
    FeedEntity, FeedHeader, FeedMessage, StopTimeEvent, StopTimeUpdate, TripDescriptor,
    TripUpdate,
};
