//! GTFS feed directory loader.
//!
//! Reads the four files the lookups need (`stops.txt`, `routes.txt`,
//! `trips.txt`, `stop_times.txt`) into an [`InMemoryStore`]. Columns beyond
//! the ones below are ignored.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::domain::{Coord, GtfsTime, Route, Stop, StopTime, Trip};

use super::error::GtfsError;
use super::memory::{InMemoryStore, InMemoryStoreBuilder};

const STOPS: &str = "stops.txt";
const ROUTES: &str = "routes.txt";
const TRIPS: &str = "trips.txt";
const STOP_TIMES: &str = "stop_times.txt";

#[derive(Debug, Deserialize)]
struct StopRow {
    stop_id: String,
    stop_name: Option<String>,
    stop_lat: Option<f64>,
    stop_lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RouteRow {
    route_id: String,
    route_short_name: Option<String>,
    route_long_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TripRow {
    route_id: String,
    trip_id: String,
}

#[derive(Debug, Deserialize)]
struct StopTimeRow {
    trip_id: String,
    arrival_time: Option<String>,
    stop_id: String,
    stop_sequence: u32,
}

/// Load a GTFS feed directory.
///
/// Stops without coordinates (generic nodes, boarding areas) are skipped,
/// since they can never match a proximity search.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<InMemoryStore, GtfsError> {
    let dir = dir.as_ref();
    let mut builder = InMemoryStore::builder();

    let stops = read_stops(dir, &mut builder)?;
    let routes = read_routes(dir, &mut builder)?;
    let trips = read_trips(dir, &mut builder)?;
    let stop_times = read_stop_times(dir, &mut builder)?;

    info!(
        dir = %dir.display(),
        stops, routes, trips, stop_times,
        "loaded GTFS feed"
    );

    Ok(builder.build())
}

/// Read every row of `file`, handing each to `f` with its line number.
fn for_each_row<T, F>(dir: &Path, file: &'static str, mut f: F) -> Result<usize, GtfsError>
where
    T: DeserializeOwned,
    F: FnMut(T, u64) -> Result<(), GtfsError>,
{
    let path = dir.join(file);
    if !path.is_file() {
        return Err(GtfsError::MissingFile(path));
    }
    let csv_err = |source| GtfsError::Csv { file, source };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut record = csv::StringRecord::new();
    let mut count = 0;
    while reader.read_record(&mut record).map_err(csv_err)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: T = record.deserialize(Some(&headers)).map_err(csv_err)?;
        f(row, line)?;
        count += 1;
    }
    Ok(count)
}

fn read_stops(dir: &Path, builder: &mut InMemoryStoreBuilder) -> Result<usize, GtfsError> {
    let mut skipped = 0;
    let rows = for_each_row(dir, STOPS, |row: StopRow, line| {
        let (Some(lat), Some(lon)) = (row.stop_lat, row.stop_lon) else {
            skipped += 1;
            return Ok(());
        };
        let location = Coord::new(lat, lon).map_err(|e| GtfsError::InvalidRow {
            file: STOPS,
            line,
            message: format!("stop {}: {e}", row.stop_id),
        })?;
        let name = row.stop_name.unwrap_or_else(|| row.stop_id.clone());
        builder.add_stop(Stop::new(row.stop_id, name, location));
        Ok(())
    })?;

    if skipped > 0 {
        debug!(skipped, "skipped stops without coordinates");
    }
    Ok(rows - skipped)
}

fn read_routes(dir: &Path, builder: &mut InMemoryStoreBuilder) -> Result<usize, GtfsError> {
    for_each_row(dir, ROUTES, |row: RouteRow, _| {
        builder.add_route(Route::new(
            row.route_id,
            row.route_short_name.unwrap_or_default(),
            row.route_long_name.unwrap_or_default(),
        ));
        Ok(())
    })
}

fn read_trips(dir: &Path, builder: &mut InMemoryStoreBuilder) -> Result<usize, GtfsError> {
    for_each_row(dir, TRIPS, |row: TripRow, _| {
        builder.add_trip(Trip::new(row.trip_id, row.route_id));
        Ok(())
    })
}

fn read_stop_times(dir: &Path, builder: &mut InMemoryStoreBuilder) -> Result<usize, GtfsError> {
    for_each_row(dir, STOP_TIMES, |row: StopTimeRow, line| {
        let arrival_time = row
            .arrival_time
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(GtfsTime::parse)
            .transpose()
            .map_err(|e| GtfsError::InvalidRow {
                file: STOP_TIMES,
                line,
                message: e.to_string(),
            })?;

        builder.add_stop_time(StopTime::new(
            row.trip_id,
            row.stop_id,
            row.stop_sequence,
            arrival_time,
        ));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs::GtfsStore;
    use std::fs;
    use tempfile::TempDir;

    fn write_feed(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    const STOPS_TXT: &str = "\
stop_id,stop_code,stop_name,stop_lat,stop_lon
S1,100,Patrick Street,51.8979,-8.4706
S2,101,\"Washington Street, West\",51.8970,-8.4800
N1,,Generic node,,
";

    const ROUTES_TXT: &str = "\
route_id,agency_id,route_short_name,route_long_name,route_type
R208,7778020,208,Lotabeg - Bishopstown,3
R220,7778020,220,,3
";

    const TRIPS_TXT: &str = "\
route_id,service_id,trip_id,shape_id,direction_id
R208,SVC1,T1,SH1,0
";

    const STOP_TIMES_TXT: &str = "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
T1,08:00:00,08:00:00,S1,1
T1,,,S2,2
";

    fn full_feed() -> TempDir {
        write_feed(&[
            ("stops.txt", STOPS_TXT),
            ("routes.txt", ROUTES_TXT),
            ("trips.txt", TRIPS_TXT),
            ("stop_times.txt", STOP_TIMES_TXT),
        ])
    }

    #[test]
    fn loads_complete_feed() {
        let dir = full_feed();
        let store = load_dir(dir.path()).unwrap();

        let summary = store.summary();
        assert_eq!(summary.stops, 2);
        assert_eq!(summary.routes, 2);
        assert_eq!(summary.trips, 1);
        assert_eq!(summary.stop_times, 2);

        assert_eq!(
            store.stop("S2").unwrap().stop_name,
            "Washington Street, West"
        );
        assert_eq!(store.route("R220").unwrap().route_long_name, "");
        assert_eq!(store.trip("T1").unwrap().route_id, "R208");
    }

    #[test]
    fn skips_stops_without_coordinates() {
        let dir = full_feed();
        let store = load_dir(dir.path()).unwrap();
        assert!(store.stop("N1").is_none());
    }

    #[test]
    fn empty_arrival_time_loads_as_none() {
        let dir = full_feed();
        let store = load_dir(dir.path()).unwrap();

        let s1 = store.visits_at("S1");
        assert_eq!(s1[0].arrival_time, Some(GtfsTime::parse("08:00:00").unwrap()));

        let s2 = store.visits_at("S2");
        assert_eq!(s2[0].arrival_time, None);
        assert_eq!(s2[0].stop_sequence, 2);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = write_feed(&[("stops.txt", STOPS_TXT), ("routes.txt", ROUTES_TXT)]);
        let err = load_dir(dir.path()).unwrap_err();
        match err {
            GtfsError::MissingFile(path) => assert!(path.ends_with("trips.txt")),
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn bad_time_reports_line() {
        let dir = write_feed(&[
            ("stops.txt", STOPS_TXT),
            ("routes.txt", ROUTES_TXT),
            ("trips.txt", TRIPS_TXT),
            (
                "stop_times.txt",
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                 T1,08:00:00,08:00:00,S1,1\n\
                 T1,8h15,8h15,S2,2\n",
            ),
        ]);

        let err = load_dir(dir.path()).unwrap_err();
        match err {
            GtfsError::InvalidRow { file, line, .. } => {
                assert_eq!(file, "stop_times.txt");
                assert_eq!(line, 3);
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_sequence_is_csv_error() {
        let dir = write_feed(&[
            ("stops.txt", STOPS_TXT),
            ("routes.txt", ROUTES_TXT),
            ("trips.txt", TRIPS_TXT),
            (
                "stop_times.txt",
                "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                 T1,08:00:00,08:00:00,S1,first\n",
            ),
        ]);

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, GtfsError::Csv { file: "stop_times.txt", .. }));
    }

    #[test]
    fn out_of_range_coordinate_rejected() {
        let dir = write_feed(&[
            (
                "stops.txt",
                "stop_id,stop_name,stop_lat,stop_lon\nS1,Bad,123.0,-8.0\n",
            ),
            ("routes.txt", ROUTES_TXT),
            ("trips.txt", TRIPS_TXT),
            ("stop_times.txt", STOP_TIMES_TXT),
        ]);

        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, GtfsError::InvalidRow { file: "stops.txt", .. }));
    }
}
