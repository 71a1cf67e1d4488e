//! Static GTFS reference data.
//!
//! The rest of the crate only sees the [`GtfsStore`] trait. The production
//! implementation is an [`InMemoryStore`] loaded from a feed directory at
//! startup; it is read-only for the life of the process.

mod error;
mod loader;
mod memory;
mod store;

pub use error::GtfsError;
pub use loader::load_dir;
pub use memory::{InMemoryStore, InMemoryStoreBuilder};
pub use store::{GtfsStore, ScheduledCall, StopVisit, StoreSummary};
