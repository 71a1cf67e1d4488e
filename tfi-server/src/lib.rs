//! Transit lookup server for Transport for Ireland data.
//!
//! Answers two questions for a trip-planning frontend: "is there a direct
//! bus from here to there?" against static GTFS data, and "where are the
//! buses now?" against the GTFS-Realtime feed.

pub mod config;
pub mod domain;
pub mod gtfs;
pub mod realtime;
pub mod routing;
pub mod web;
