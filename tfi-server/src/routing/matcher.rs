//! Direct route matching.
//!
//! Given candidate boarding and alighting stops, find one trip that calls at
//! a boarding stop and later at an alighting stop. Direction matters: a trip
//! that visits the alighting stop first does not match, even if the same
//! route runs the other way on another trip.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Route, Stop};
use crate::gtfs::GtfsStore;

/// A single-trip connection between two stops.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectRoute {
    pub route: Route,
    pub trip_id: String,
    pub start_stop: Stop,
    pub end_stop: Stop,
    pub start_sequence: u32,
    pub end_sequence: u32,
}

/// Find a trip connecting any start stop to any end stop, in order.
///
/// First match wins, with a fixed examination order so the answer does not
/// depend on storage order: start stops as given (callers pass them nearest
/// first), then end stops as given, then trips by ascending id. Candidates
/// whose trip, route or stops are missing from the store are skipped.
pub fn find_direct_route(
    store: &dyn GtfsStore,
    start_stop_ids: &[&str],
    end_stop_ids: &[&str],
) -> Option<DirectRoute> {
    // Fetch each end stop's calls once rather than per start stop
    let end_visits: Vec<(&str, Vec<_>)> = end_stop_ids
        .iter()
        .map(|id| (*id, store.visits_at(id)))
        .collect();

    for start_id in start_stop_ids {
        // trip -> earliest sequence at this start stop
        let mut boardings: HashMap<String, u32> = HashMap::new();
        for visit in store.visits_at(start_id) {
            boardings
                .entry(visit.trip_id)
                .and_modify(|seq| *seq = (*seq).min(visit.stop_sequence))
                .or_insert(visit.stop_sequence);
        }
        if boardings.is_empty() {
            continue;
        }

        for (end_id, visits) in &end_visits {
            let mut candidates: Vec<(&str, u32, u32)> = visits
                .iter()
                .filter_map(|v| {
                    let board = *boardings.get(&v.trip_id)?;
                    (board < v.stop_sequence).then_some((
                        v.trip_id.as_str(),
                        board,
                        v.stop_sequence,
                    ))
                })
                .collect();
            candidates.sort();

            for (trip_id, start_sequence, end_sequence) in candidates {
                if let Some(found) = resolve(
                    store,
                    trip_id,
                    start_id,
                    end_id,
                    start_sequence,
                    end_sequence,
                ) {
                    debug!(
                        trip_id,
                        route = %found.route.route_short_name,
                        start = %start_id,
                        end = %end_id,
                        "matched direct route"
                    );
                    return Some(found);
                }
            }
        }
    }

    None
}

fn resolve(
    store: &dyn GtfsStore,
    trip_id: &str,
    start_id: &str,
    end_id: &str,
    start_sequence: u32,
    end_sequence: u32,
) -> Option<DirectRoute> {
    let trip = store.trip(trip_id)?;
    let route = store.route(&trip.route_id)?;
    let start_stop = store.stop(start_id)?;
    let end_stop = store.stop(end_id)?;

    Some(DirectRoute {
        route,
        trip_id: trip.trip_id,
        start_stop,
        end_stop,
        start_sequence,
        end_sequence,
    })
}
