//! Wall-clock parsing and conversion.
//!
//! Timestamps are stored as whole Unix seconds. Everything a user types or
//! reads is wall-clock time in a caller-supplied time zone (the local zone in
//! the CLI, a fixed offset in tests).

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use thiserror::Error;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").expect("relative time regex")
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Malformed or unrepresentable date/time input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The text matches none of the accepted forms.
    #[error(
        "invalid date/time: {value}. Use YYYY-MM-DD [HH:MM[:SS]], HH:MM[:SS], or relative (e.g., '2 hours ago')"
    )]
    Invalid { value: String },

    /// A relative time reaches too far into the past.
    #[error("relative time value too large: {value}")]
    OutOfRange { value: String },

    /// The wall-clock time falls in a DST gap.
    #[error("{value} does not exist in the local time zone")]
    Nonexistent { value: String },
}

/// Parses user-supplied date/time text into a Unix timestamp.
///
/// Wall-clock forms are interpreted in the zone of `now`; time-only and
/// relative forms are resolved against `now`. Supports:
/// - `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM` (also with a `T` separator)
/// - `YYYY-MM-DD` (midnight)
/// - `HH:MM:SS`, `HH:MM` (today)
/// - RFC 3339: `2014-04-14T19:45:38+02:00`
/// - Relative: `30 minutes ago`, `2 hours ago`, `1 day ago`, `1 week ago`
pub fn parse_date_time<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> Result<i64, TimeError> {
    let text = text.trim();
    let tz = now.timezone();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.timestamp());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return localize(&tz, naive, text);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return localize(&tz, date.and_time(NaiveTime::MIN), text);
    }

    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(text, format) {
            return localize(&tz, now.date_naive().and_time(time), text);
        }
    }

    parse_relative(text, now)
}

fn parse_relative<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> Result<i64, TimeError> {
    let invalid = || TimeError::Invalid {
        value: text.to_string(),
    };
    let caps = RELATIVE_TIME_RE.captures(text).ok_or_else(invalid)?;

    let n: i64 = caps[1].parse().map_err(|_| TimeError::OutOfRange {
        value: text.to_string(),
    })?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        _ => return Err(invalid()),
    };

    if n > max_for_unit {
        return Err(TimeError::OutOfRange {
            value: text.to_string(),
        });
    }

    Ok(now.timestamp() - Duration::minutes(n * minutes_per_unit).num_seconds())
}

fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime, text: &str) -> Result<i64, TimeError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| TimeError::Nonexistent {
            value: text.to_string(),
        })
}

/// Converts a Unix timestamp to wall-clock time in `tz`.
///
/// Timestamps outside chrono's range clamp to the epoch.
pub fn at<Tz: TimeZone>(tz: &Tz, timestamp: i64) -> DateTime<Tz> {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .with_timezone(tz)
}

/// Unix timestamp of local midnight starting `date` in `tz`.
///
/// A DST gap at midnight falls forward to 1am.
pub fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map_or_else(|| midnight.and_utc().timestamp(), |dt| dt.timestamp())
}

/// Unix timestamp of the local midnight that started the day containing `now`.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    local_midnight(&now.timezone(), now.date_naive())
}
