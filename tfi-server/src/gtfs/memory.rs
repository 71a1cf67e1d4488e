//! In-memory GTFS store.
//!
//! Built once at startup (from a feed directory or, in tests, by hand) and
//! never mutated afterwards, so it can be shared behind an `Arc` without
//! locking.

use std::collections::{HashMap, HashSet};

use crate::domain::{BoundingBox, Route, Stop, StopTime, Trip};

use super::store::{GtfsStore, ScheduledCall, StopVisit, StoreSummary};

/// Immutable, indexed GTFS reference data.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Stops sorted by latitude so box queries can binary-search the
    /// latitude band before filtering on longitude.
    stops_by_lat: Vec<Stop>,
    stop_index: HashMap<String, usize>,
    routes: HashMap<String, Route>,
    trips: HashMap<String, Trip>,
    /// Calls grouped by stop, each group sorted by (trip_id, stop_sequence).
    visits_by_stop: HashMap<String, Vec<StopVisit>>,
    stop_time_count: usize,
}

impl InMemoryStore {
    /// Start building a store.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

impl GtfsStore for InMemoryStore {
    fn stops_within(&self, bbox: &BoundingBox) -> Vec<Stop> {
        let start = self
            .stops_by_lat
            .partition_point(|s| s.location.lat() < bbox.min_lat);
        let end = self
            .stops_by_lat
            .partition_point(|s| s.location.lat() <= bbox.max_lat);

        if start >= end {
            return Vec::new();
        }

        self.stops_by_lat[start..end]
            .iter()
            .filter(|s| bbox.contains(&s.location))
            .cloned()
            .collect()
    }

    fn stop(&self, stop_id: &str) -> Option<Stop> {
        self.stop_index
            .get(stop_id)
            .map(|&i| self.stops_by_lat[i].clone())
    }

    fn route(&self, route_id: &str) -> Option<Route> {
        self.routes.get(route_id).cloned()
    }

    fn trip(&self, trip_id: &str) -> Option<Trip> {
        self.trips.get(trip_id).cloned()
    }

    fn visits_at(&self, stop_id: &str) -> Vec<StopVisit> {
        self.visits_by_stop
            .get(stop_id)
            .cloned()
            .unwrap_or_default()
    }

    fn route_short_names(&self, route_ids: &[&str]) -> HashMap<String, String> {
        route_ids
            .iter()
            .filter_map(|id| {
                self.routes
                    .get(*id)
                    .map(|r| (r.route_id.clone(), r.route_short_name.clone()))
            })
            .collect()
    }

    fn stop_names(&self, stop_ids: &[&str]) -> HashMap<String, String> {
        stop_ids
            .iter()
            .filter_map(|id| {
                self.stop(id)
                    .map(|s| (s.stop_id, s.stop_name))
            })
            .collect()
    }

    fn schedules_at_stop(
        &self,
        stop_id: &str,
        trip_ids: &[&str],
    ) -> HashMap<String, ScheduledCall> {
        let Some(visits) = self.visits_by_stop.get(stop_id) else {
            return HashMap::new();
        };
        let wanted: HashSet<&str> = trip_ids.iter().copied().collect();

        let mut out = HashMap::new();
        // Visits are sorted by sequence within a trip, so the first one seen
        // is the trip's earliest call here.
        for visit in visits {
            if wanted.contains(visit.trip_id.as_str()) {
                out.entry(visit.trip_id.clone())
                    .or_insert_with(|| ScheduledCall {
                        arrival_time: visit.arrival_time,
                        stop_sequence: visit.stop_sequence,
                    });
            }
        }
        out
    }

    fn summary(&self) -> StoreSummary {
        StoreSummary {
            stops: self.stops_by_lat.len(),
            routes: self.routes.len(),
            trips: self.trips.len(),
            stop_times: self.stop_time_count,
        }
    }
}

/// Builder for [`InMemoryStore`].
///
/// Later entries with the same id replace earlier ones.
#[derive(Debug, Default)]
pub struct InMemoryStoreBuilder {
    stops: HashMap<String, Stop>,
    routes: HashMap<String, Route>,
    trips: HashMap<String, Trip>,
    stop_times: Vec<StopTime>,
}

impl InMemoryStoreBuilder {
    pub fn stop(mut self, stop: Stop) -> Self {
        self.add_stop(stop);
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.add_route(route);
        self
    }

    pub fn trip(mut self, trip: Trip) -> Self {
        self.add_trip(trip);
        self
    }

    pub fn stop_time(mut self, stop_time: StopTime) -> Self {
        self.add_stop_time(stop_time);
        self
    }

    pub fn add_stop(&mut self, stop: Stop) {
        self.stops.insert(stop.stop_id.clone(), stop);
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.insert(route.route_id.clone(), route);
    }

    pub fn add_trip(&mut self, trip: Trip) {
        self.trips.insert(trip.trip_id.clone(), trip);
    }

    pub fn add_stop_time(&mut self, stop_time: StopTime) {
        self.stop_times.push(stop_time);
    }

    /// Index everything and freeze the store.
    pub fn build(self) -> InMemoryStore {
        let mut stops_by_lat: Vec<Stop> = self.stops.into_values().collect();
        stops_by_lat.sort_by(|a, b| {
            a.location
                .lat()
                .total_cmp(&b.location.lat())
                .then_with(|| a.stop_id.cmp(&b.stop_id))
        });

        let stop_index = stops_by_lat
            .iter()
            .enumerate()
            .map(|(i, s)| (s.stop_id.clone(), i))
            .collect();

        let stop_time_count = self.stop_times.len();
        let mut visits_by_stop: HashMap<String, Vec<StopVisit>> = HashMap::new();
        for st in self.stop_times {
            visits_by_stop.entry(st.stop_id).or_default().push(StopVisit {
                trip_id: st.trip_id,
                stop_sequence: st.stop_sequence,
                arrival_time: st.arrival_time,
            });
        }
        for visits in visits_by_stop.values_mut() {
            visits.sort_by(|a, b| {
                a.trip_id
                    .cmp(&b.trip_id)
                    .then(a.stop_sequence.cmp(&b.stop_sequence))
            });
        }

        InMemoryStore {
            stops_by_lat,
            stop_index,
            routes: self.routes,
            trips: self.trips,
            visits_by_stop,
            stop_time_count,
        }
    }
}
