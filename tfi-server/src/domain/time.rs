//! GTFS schedule times.
//!
//! GTFS expresses stop times as "HH:MM:SS" measured from the start of the
//! service day. Hours may exceed 23 for trips that run past midnight, so a
//! schedule time is not a time of day and cannot be a `NaiveTime`.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};

/// Error returned when parsing an invalid GTFS time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid GTFS time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A GTFS "HH:MM:SS" schedule time, stored as seconds since the start of
/// the service day.
///
/// # Examples
///
/// ```
/// use tfi_server::domain::GtfsTime;
///
/// let t = GtfsTime::parse("08:05:30").unwrap();
/// assert_eq!(t.seconds(), 8 * 3600 + 5 * 60 + 30);
///
/// // Past-midnight service is allowed
/// let late = GtfsTime::parse("25:10:00").unwrap();
/// assert_eq!(late.to_string(), "25:10:00");
///
/// assert!(GtfsTime::parse("08:60:00").is_err());
/// assert!(GtfsTime::parse("0805").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GtfsTime(u32);

impl GtfsTime {
    /// Create from seconds since the start of the service day.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Parse "HH:MM:SS" (a single-digit hour such as "8:05:00" is accepted).
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.trim().split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TimeError::new("expected HH:MM:SS format"));
        };

        if h.is_empty() || h.len() > 3 || m.len() != 2 || sec.len() != 2 {
            return Err(TimeError::new("expected HH:MM:SS format"));
        }

        let hours = parse_digits(h).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minutes = parse_digits(m).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let seconds = parse_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?;

        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if seconds > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self(hours * 3600 + minutes * 60 + seconds))
    }

    /// Seconds since the start of the service day.
    pub fn seconds(&self) -> u32 {
        self.0
    }

    /// Anchor this schedule time on a calendar date in the given timezone.
    ///
    /// The time is taken as wall-clock time counted from local midnight of
    /// `date`, so "25:10:00" lands at 01:10 on the following day. Returns
    /// `None` when that wall-clock time does not exist (DST gap) or is out
    /// of range.
    pub fn on_date<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
        let wall = date
            .and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::try_seconds(i64::from(self.0))?)?;
        tz.from_local_datetime(&wall).earliest()
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0 / 3600;
        let m = (self.0 % 3600) / 60;
        let s = self.0 % 60;
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}
