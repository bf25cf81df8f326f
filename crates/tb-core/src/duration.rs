//! Duration formatting.

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Formats seconds like a `timedelta`: `H:MM:SS`, with a `N day(s), ` prefix
/// once the value reaches a full day.
///
/// Negative values borrow from the day count, so `-1` renders as
/// `-1 day, 23:59:59`.
pub fn format_timedelta(seconds: i64) -> String {
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    let rem = seconds.rem_euclid(SECONDS_PER_DAY);
    let clock = format!("{}:{:02}:{:02}", rem / 3600, rem / 60 % 60, rem % 60);
    match days {
        0 => clock,
        1 | -1 => format!("{days} day, {clock}"),
        _ => format!("{days} days, {clock}"),
    }
}

/// Formats seconds as `H:MM:SS` with unbounded hours.
pub fn format_hms(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    format!(
        "{sign}{}:{:02}:{:02}",
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60
    )
}
