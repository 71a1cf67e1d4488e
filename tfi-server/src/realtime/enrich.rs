//! Annotating a realtime feed with static reference data.
//!
//! Names come from the store in one batched lookup per kind. When a target
//! stop is given, each trip update also gets its scheduled arrival at that
//! stop, shifted by the reported delay.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, SecondsFormat, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::gtfs::{GtfsStore, ScheduledCall};

use super::types::{FeedEntity, FeedMessage, StopTimeUpdate};

/// Inputs to enrichment beyond the feed itself.
#[derive(Debug, Clone, Copy)]
pub struct EnrichContext<'a> {
    /// Stop to compute arrival predictions for.
    pub target_stop: Option<&'a str>,
    /// Date the scheduled times are anchored on.
    ///
    /// Trips that began on the previous service day are still anchored
    /// here, so their predictions land a day late.
    pub service_date: NaiveDate,
    /// Zone the timetable is written in.
    pub timezone: Tz,
}

impl<'a> EnrichContext<'a> {
    pub fn new(service_date: NaiveDate, timezone: Tz) -> Self {
        Self {
            target_stop: None,
            service_date,
            timezone,
        }
    }

    /// Compute arrival predictions for this stop.
    pub fn with_target_stop(mut self, stop_id: &'a str) -> Self {
        self.target_stop = Some(stop_id);
        self
    }

    /// Context for today's date in the given zone.
    pub fn today(timezone: Tz) -> Self {
        Self::new(Utc::now().with_timezone(&timezone).date_naive(), timezone)
    }
}

/// Enrich every trip update in the feed.
///
/// Entity count and order are preserved. Unknown ids fall back to the raw
/// id rather than failing.
pub fn enrich_feed(
    store: &dyn GtfsStore,
    mut feed: FeedMessage,
    ctx: &EnrichContext<'_>,
) -> FeedMessage {
    let Some(entities) = feed.entity.as_mut() else {
        return feed;
    };
    if entities.is_empty() {
        return feed;
    }

    let ids = ReferencedIds::collect(entities);

    let route_names = store.route_short_names(&ids.routes());
    let stop_names = store.stop_names(&ids.stops());
    let schedules = match ctx.target_stop {
        Some(target) => store.schedules_at_stop(target, &ids.trips()),
        None => HashMap::new(),
    };

    for entity in entities.iter_mut() {
        let Some(trip_update) = entity.trip_update.as_mut() else {
            continue;
        };

        if let Some(trip) = trip_update.trip.as_mut() {
            if let Some(route_id) = &trip.route_id {
                trip.route_short_name = Some(name_or_id(&route_names, route_id));
            }
        }

        for update in trip_update.stop_time_update.iter_mut().flatten() {
            if let Some(stop_id) = &update.stop_id {
                update.stop_name = Some(name_or_id(&stop_names, stop_id));
            }
        }

        if let Some(target) = ctx.target_stop {
            annotate_arrival(entity, target, &schedules, ctx);
        }
    }

    feed
}

/// Distinct ids mentioned by the feed's trip updates.
#[derive(Debug, Default)]
struct ReferencedIds {
    routes: BTreeSet<String>,
    stops: BTreeSet<String>,
    trips: BTreeSet<String>,
}

impl ReferencedIds {
    fn collect(entities: &[FeedEntity]) -> Self {
        let mut ids = Self::default();
        for trip_update in entities.iter().filter_map(|e| e.trip_update.as_ref()) {
            if let Some(trip) = &trip_update.trip {
                if let Some(route_id) = &trip.route_id {
                    ids.routes.insert(route_id.clone());
                }
                if let Some(trip_id) = &trip.trip_id {
                    ids.trips.insert(trip_id.clone());
                }
            }
            for update in trip_update.updates() {
                if let Some(stop_id) = &update.stop_id {
                    ids.stops.insert(stop_id.clone());
                }
            }
        }
        ids
    }

    fn routes(&self) -> Vec<&str> {
        self.routes.iter().map(String::as_str).collect()
    }

    fn stops(&self) -> Vec<&str> {
        self.stops.iter().map(String::as_str).collect()
    }

    fn trips(&self) -> Vec<&str> {
        self.trips.iter().map(String::as_str).collect()
    }
}

fn name_or_id(names: &HashMap<String, String>, id: &str) -> String {
    names
        .get(id)
        .filter(|name| !name.is_empty())
        .cloned()
        .unwrap_or_else(|| id.to_string())
}

/// Add `has_passed`, `delay` and the predicted arrival at `target`.
fn annotate_arrival(
    entity: &mut FeedEntity,
    target: &str,
    schedules: &HashMap<String, ScheduledCall>,
    ctx: &EnrichContext<'_>,
) {
    let Some(trip_update) = &entity.trip_update else {
        return;
    };
    let Some(call) = trip_update
        .trip
        .as_ref()
        .and_then(|t| t.trip_id.as_deref())
        .and_then(|trip_id| schedules.get(trip_id))
    else {
        return;
    };

    let updates = trip_update.updates();
    let first = updates.first();

    let has_passed = first
        .and_then(|u| u.stop_sequence)
        .is_some_and(|seq| seq > call.stop_sequence);

    let delay = updates
        .iter()
        .find(|u| u.stop_id.as_deref() == Some(target))
        .and_then(StopTimeUpdate::arrival_delay)
        .or_else(|| first.and_then(StopTimeUpdate::arrival_delay))
        .unwrap_or(0);

    if has_passed {
        entity.has_passed = Some(true);
    }

    let Some(arrival) = call.arrival_time else {
        return;
    };
    // Nonexistent local times (DST gaps) and out-of-range results leave the
    // entity with names only
    let Some(predicted) = arrival
        .on_date(ctx.service_date, &ctx.timezone)
        .and_then(|scheduled| {
            scheduled.checked_add_signed(TimeDelta::try_seconds(i64::from(delay))?)
        })
    else {
        return;
    };

    entity.predicted_arrival_time = Some(
        predicted
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    entity.scheduled_arrival_time = Some(arrival.to_string());
    entity.delay = Some(delay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coord, GtfsTime, Route, Stop, StopTime, Trip};
    use crate::gtfs::InMemoryStore;
    use serde_json::json;

    fn store() -> InMemoryStore {
        let here = Coord::new(51.9, -8.47).unwrap();
        InMemoryStore::builder()
            .stop(Stop::new("S1", "Patrick Street", here))
            .stop(Stop::new("S9", "Western Road", here))
            .route(Route::new("R208", "208", "Lotabeg - Bishopstown"))
            .trip(Trip::new("T1", "R208"))
            .stop_time(StopTime::new(
                "T1",
                "S9",
                5,
                Some(GtfsTime::parse("09:00:00").unwrap()),
            ))
            .trip(Trip::new("T2", "R208"))
            .stop_time(StopTime::new("T2", "S9", 5, None))
            .trip(Trip::new("T3", "R208"))
            .stop_time(StopTime::new(
                "T3",
                "S9",
                5,
                Some(GtfsTime::parse("01:30:00").unwrap()),
            ))
            .build()
    }

    fn feed(value: serde_json::Value) -> FeedMessage {
        serde_json::from_value(value).unwrap()
    }

    fn ctx() -> EnrichContext<'static> {
        EnrichContext::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), Tz::UTC)
    }

    fn trip_entity(trip_id: &str, route_id: &str, updates: serde_json::Value) -> serde_json::Value {
        json!({
            "id": format!("E-{trip_id}"),
            "trip_update": {
                "trip": { "trip_id": trip_id, "route_id": route_id },
                "stop_time_update": updates
            }
        })
    }

    fn entities(feed: &FeedMessage) -> &[FeedEntity] {
        feed.entity.as_deref().unwrap()
    }

    #[test]
    fn resolves_names() {
        let input = feed(json!({
            "entity": [trip_entity("T1", "R208", json!([{ "stop_sequence": 4, "stop_id": "S1" }]))]
        }));

        let out = enrich_feed(&store(), input, &ctx());
        let tu = entities(&out)[0].trip_update.as_ref().unwrap();

        assert_eq!(
            tu.trip.as_ref().unwrap().route_short_name.as_deref(),
            Some("208")
        );
        assert_eq!(tu.updates()[0].stop_name.as_deref(), Some("Patrick Street"));
    }

    #[test]
    fn unknown_ids_fall_back_to_raw_id() {
        let input = feed(json!({
            "entity": [trip_entity("TX", "R1", json!([{ "stop_sequence": 1, "stop_id": "S404" }]))]
        }));

        let out = enrich_feed(&store(), input, &ctx());
        let tu = entities(&out)[0].trip_update.as_ref().unwrap();

        assert_eq!(
            tu.trip.as_ref().unwrap().route_short_name.as_deref(),
            Some("R1")
        );
        assert_eq!(tu.updates()[0].stop_name.as_deref(), Some("S404"));
    }

    #[test]
    fn missing_route_id_gets_no_short_name() {
        let input = feed(json!({
            "entity": [{ "id": "E1", "trip_update": { "trip": { "trip_id": "T1" } } }]
        }));

        let out = enrich_feed(&store(), input, &ctx());
        let trip = entities(&out)[0]
            .trip_update
            .as_ref()
            .unwrap()
            .trip
            .as_ref()
            .unwrap();
        assert!(trip.route_short_name.is_none());
    }

    #[test]
    fn vehicle_past_target_stop() {
        let input = feed(json!({
            "entity": [trip_entity("T1", "R208", json!([{ "stop_sequence": 12, "stop_id": "S1" }]))]
        }));

        let out = enrich_feed(&store(), input, &ctx().with_target_stop("S9"));
        assert_eq!(entities(&out)[0].has_passed, Some(true));
    }

    #[test]
    fn vehicle_before_target_stop() {
        let input = feed(json!({
            "entity": [trip_entity("T1", "R208", json!([{ "stop_sequence": 3, "stop_id": "S1" }]))]
        }));

        let out = enrich_feed(&store(), input, &ctx().with_target_stop("S9"));
        assert_eq!(entities(&out)[0].has_passed, None);
    }

    #[test]
    fn predicts_arrival_with_target_delay() {
        let input = feed(json!({
            "entity": [trip_entity("T1", "R208", json!([
                { "stop_sequence": 3, "stop_id": "S1", "arrival": { "delay": 60 } },
                { "stop_sequence": 5, "stop_id": "S9", "arrival": { "delay": 300 } }
            ]))]
        }));

        let out = enrich_feed(&store(), input, &ctx().with_target_stop("S9"));
        let entity = &entities(&out)[0];

        assert_eq!(entity.delay, Some(300));
        assert_eq!(entity.scheduled_arrival_time.as_deref(), Some("09:00:00"));
        assert_eq!(
            entity.predicted_arrival_time.as_deref(),
            Some("2024-03-15T09:05:00.000Z")
        );
    }

    #[test]
    fn delay_falls_back_to_first_update() {
        let input = feed(json!({
            "entity": [trip_entity("T1", "R208", json!([
                { "stop_sequence": 3, "stop_id": "S1", "arrival": { "delay": 90 } },
                { "stop_sequence": 5, "stop_id": "S9", "arrival": { "delay": 0 } }
            ]))]
        }));

        let out = enrich_feed(&store(), input, &ctx().with_target_stop("S9"));
        let entity = &entities(&out)[0];

        assert_eq!(entity.delay, Some(90));
        assert_eq!(
            entity.predicted_arrival_time.as_deref(),
            Some("2024-03-15T09:01:30.000Z")
        );
    }

    #[test]
    fn delay_defaults_to_zero() {
        let input = feed(json!({
            "entity": [trip_entity("T1", "R208", json!([{ "stop_sequence": 3, "stop_id": "S1" }]))]
        }));

        let out = enrich_feed(&store(), input, &ctx().with_target_stop("S9"));
        let entity = &entities(&out)[0];

        assert_eq!(entity.delay, Some(0));
        assert_eq!(
            entity.predicted_arrival_time.as_deref(),
            Some("2024-03-15T09:00:00.000Z")
        );
    }

    #[test]
    fn timetable_zone_is_applied() {
        let input = feed(json!({
            "entity": [trip_entity("T1", "R208", json!([{ "stop_sequence": 3, "stop_id": "S1" }]))]
        }));
        let summer = EnrichContext::new(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            Tz::Europe__Dublin,
        )
        .with_target_stop("S9");

        let out = enrich_feed(&store(), input, &summer);
        assert_eq!(
            entities(&out)[0].predicted_arrival_time.as_deref(),
            Some("2024-07-01T08:00:00.000Z")
        );
    }

    #[test]
    fn nonexistent_local_time_gets_names_only() {
        // Dublin skips 01:00-02:00 on 31 March 2024
        let input = feed(json!({
            "entity": [trip_entity("T3", "R208", json!([{ "stop_sequence": 3, "stop_id": "S1" }]))]
        }));
        let spring_forward = EnrichContext::new(
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            Tz::Europe__Dublin,
        )
        .with_target_stop("S9");

        let out = enrich_feed(&store(), input, &spring_forward);
        let entity = &entities(&out)[0];

        assert!(entity.predicted_arrival_time.is_none());
        assert!(entity.scheduled_arrival_time.is_none());
        assert!(entity.delay.is_none());
        assert!(entity.has_passed.is_none());
        let tu = entity.trip_update.as_ref().unwrap();
        assert_eq!(
            tu.trip.as_ref().unwrap().route_short_name.as_deref(),
            Some("208")
        );
        assert_eq!(tu.updates()[0].stop_name.as_deref(), Some("Patrick Street"));
    }

    #[test]
    fn extreme_delay_does_not_panic() {
        let input = feed(json!({
            "entity": [trip_entity("T1", "R208", json!([
                { "stop_sequence": 3, "stop_id": "S9", "arrival": { "delay": i32::MAX } }
            ]))]
        }));

        // An ordinary date still has room for ~68 years of delay
        let out = enrich_feed(&store(), input.clone(), &ctx().with_target_stop("S9"));
        assert_eq!(entities(&out)[0].delay, Some(i32::MAX));
        assert!(entities(&out)[0].predicted_arrival_time.is_some());

        // At the end of the calendar the prediction is dropped
        let last_day = EnrichContext::new(NaiveDate::MAX, Tz::UTC).with_target_stop("S9");
        let out = enrich_feed(&store(), input, &last_day);
        let entity = &entities(&out)[0];
        assert!(entity.predicted_arrival_time.is_none());
        assert!(entity.delay.is_none());
        assert_eq!(
            entity.trip_update.as_ref().unwrap().updates()[0]
                .stop_name
                .as_deref(),
            Some("Western Road")
        );
    }

    #[test]
    fn trips_without_schedule_get_names_only() {
        let input = feed(json!({
            "entity": [
                trip_entity("T_UNKNOWN", "R208", json!([{ "stop_sequence": 12, "stop_id": "S1" }])),
                trip_entity("T2", "R208", json!([{ "stop_sequence": 3, "stop_id": "S1" }]))
            ]
        }));

        let out = enrich_feed(&store(), input, &ctx().with_target_stop("S9"));

        for entity in entities(&out) {
            assert!(entity.has_passed.is_none());
            assert!(entity.predicted_arrival_time.is_none());
            assert!(entity.delay.is_none());
            let tu = entity.trip_update.as_ref().unwrap();
            assert_eq!(tu.updates()[0].stop_name.as_deref(), Some("Patrick Street"));
        }
    }

    #[test]
    fn preserves_cardinality_and_order() {
        let input = feed(json!({
            "entity": [
                { "id": "V0", "vehicle": { "position": { "latitude": 51.9 } } },
                trip_entity("T1", "R208", json!([])),
                trip_entity("TX", "R1", json!([]))
            ]
        }));

        let out = enrich_feed(&store(), input, &ctx());
        let ids: Vec<&str> = entities(&out).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["V0", "E-T1", "E-TX"]);

        let untouched = &entities(&out)[0];
        assert!(untouched.trip_update.is_none());
        assert!(untouched.extra.contains_key("vehicle"));
    }

    #[test]
    fn empty_feeds_pass_through() {
        let no_entities = feed(json!({ "header": { "gtfs_realtime_version": "2.0" } }));
        assert_eq!(
            enrich_feed(&store(), no_entities.clone(), &ctx()),
            no_entities
        );

        let empty = feed(json!({ "entity": [] }));
        assert_eq!(enrich_feed(&store(), empty.clone(), &ctx()), empty);
    }

    #[test]
    fn enrichment_is_deterministic_and_stable() {
        let input = feed(json!({
            "entity": [
                trip_entity("T1", "R208", json!([{ "stop_sequence": 12, "stop_id": "S1", "arrival": { "delay": 30 } }])),
                trip_entity("TX", "R1", json!([{ "stop_sequence": 1, "stop_id": "S404" }]))
            ]
        }));
        let context = ctx().with_target_stop("S9");

        let once = enrich_feed(&store(), input.clone(), &context);
        let again = enrich_feed(&store(), input, &context);
        assert_eq!(once, again);

        let twice = enrich_feed(&store(), once.clone(), &context);
        assert_eq!(twice, once);
    }
}
