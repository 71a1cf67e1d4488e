//! Process configuration read from environment variables.
//!
//! `main` loads a `.env` file with `dotenvy` first, so any of these can live
//! there instead of the real environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDR` | `127.0.0.1` |
//! | `PORT` | `3001` |
//! | `GTFS_DATA_DIR` | `./data/gtfs` |
//! | `TFI_GTFS_URL`, `NTA_API_KEY` | unset (live endpoint fails) |
//! | `TFI_FEED_FILE` | unset; serves a saved feed instead of the upstream |
//! | `FEED_TIMEOUT_SECS` | `30` |
//! | `FEED_TIMEZONE` | `Europe/Dublin` |
//! | `START_LAT_RADIUS`, `START_LON_RADIUS`, `START_STOP_LIMIT` | `0.01`, `0.015`, `5` |
//! | `END_LAT_RADIUS`, `END_LON_RADIUS`, `END_STOP_LIMIT` | `0.03`, `0.04`, `10` |

use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use chrono_tz::Tz;

use crate::realtime::{
    FeedClient, FeedConfig, FeedError, FeedSource, StaticFeed, UnconfiguredFeed,
};
use crate::routing::{RouteSearchConfig, SearchArea};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_GTFS_DIR: &str = "./data/gtfs";
const DEFAULT_FEED_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TIMEZONE: Tz = Tz::Europe__Dublin;

/// A configuration variable that could not be used.
#[derive(Debug, thiserror::Error)]
#[error("invalid {name}={value:?}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

/// Where `/tfi/live` gets its feed from.
#[derive(Debug, Clone)]
pub enum FeedMode {
    /// Fetch from the NTA API on every request.
    Upstream(FeedConfig),
    /// Serve a feed snapshot saved as JSON.
    File(PathBuf),
    /// No feed; every live request fails. Holds the reason.
    Unconfigured(String),
}

impl FeedMode {
    /// Build the feed source for this mode.
    pub fn into_source(self) -> Result<Arc<dyn FeedSource>, FeedError> {
        let source: Arc<dyn FeedSource> = match self {
            FeedMode::Upstream(config) => Arc::new(FeedClient::new(config)?),
            FeedMode::File(path) => Arc::new(StaticFeed::from_file(path)?),
            FeedMode::Unconfigured(reason) => Arc::new(UnconfiguredFeed::new(reason)),
        };
        Ok(source)
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Directory holding `stops.txt`, `routes.txt`, `trips.txt`, `stop_times.txt`.
    pub gtfs_dir: PathBuf,
    pub feed: FeedMode,
    /// Zone the static timetable is written in.
    pub timezone: Tz,
    pub route_search: RouteSearchConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(&get, "BIND_ADDR", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = parse_or(&get, "PORT", DEFAULT_PORT)?;
        let gtfs_dir = get("GTFS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GTFS_DIR));
        let timezone = parse_or(&get, "FEED_TIMEZONE", DEFAULT_TIMEZONE)?;
        let timeout_secs = parse_or(&get, "FEED_TIMEOUT_SECS", DEFAULT_FEED_TIMEOUT_SECS)?;

        let feed = match (get("TFI_FEED_FILE"), get("TFI_GTFS_URL"), get("NTA_API_KEY")) {
            (Some(path), _, _) => FeedMode::File(PathBuf::from(path)),
            (None, Some(url), Some(key)) => {
                FeedMode::Upstream(FeedConfig::new(url, key).with_timeout(timeout_secs))
            }
            (None, None, _) => FeedMode::Unconfigured("TFI_GTFS_URL is not set".into()),
            (None, Some(_), None) => FeedMode::Unconfigured("NTA_API_KEY is not set".into()),
        };

        let defaults = RouteSearchConfig::default();
        let route_search = RouteSearchConfig::new(
            search_area(
                &get,
                ["START_LAT_RADIUS", "START_LON_RADIUS", "START_STOP_LIMIT"],
                &defaults.start,
            )?,
            search_area(
                &get,
                ["END_LAT_RADIUS", "END_LON_RADIUS", "END_STOP_LIMIT"],
                &defaults.end,
            )?,
        );

        Ok(Self {
            bind_addr,
            port,
            gtfs_dir,
            feed,
            timezone,
            route_search,
        })
    }

    /// Address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = get(name) else {
        return Ok(default);
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}

fn search_area(
    get: &impl Fn(&str) -> Option<String>,
    [lat_name, lon_name, limit_name]: [&'static str; 3],
    defaults: &SearchArea,
) -> Result<SearchArea, ConfigError> {
    let lat_radius = radius(get, lat_name, defaults.lat_radius)?;
    let lon_radius = radius(get, lon_name, defaults.lon_radius)?;
    let limit: usize = parse_or(get, limit_name, defaults.limit)?;
    if limit == 0 {
        return Err(ConfigError {
            name: limit_name,
            value: "0".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(SearchArea::new(lat_radius, lon_radius, limit))
}

fn radius(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: f64,
) -> Result<f64, ConfigError> {
    let value: f64 = parse_or(get, name, default)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError {
            name,
            value: value.to_string(),
            reason: "must be a positive number of degrees".into(),
        });
    }
    Ok(value)
}
