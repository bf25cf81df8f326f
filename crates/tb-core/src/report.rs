//! Day-grouped timesheet reports.
//!
//! Turns the raw intervals of one sheet into per-day groups with day totals
//! and a grand total, and flattens those into the rows the table and CSV
//! renderers print.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::duration::format_hms;
use crate::entry::Entry;
use crate::time::at;

/// Column headers of the plain report table.
pub const TABLE_HEADER: [&str; 4] = ["Day", "Start      End", "Duration", "Notes"];

/// Column headers of the CSV export.
pub const CSV_HEADER: [&str; 4] = ["Start", "End", "Length", "Description"];

const TIME_FORMAT: &str = "%H:%M:%S";
const DAY_FORMAT: &str = "%b %d, %Y";
const CSV_TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Bounds applied to a sheet's entries before aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Keep entries starting at or after this timestamp.
    pub start: Option<i64>,
    /// Keep closed entries ending at or before this timestamp.
    pub end: Option<i64>,
}

/// One interval as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub start: i64,
    pub end: Option<i64>,
    #[serde(rename = "duration_seconds")]
    pub duration: i64,
    pub description: Option<String>,
}

/// The intervals that started on one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    #[serde(rename = "total_seconds")]
    pub total: i64,
    pub entries: Vec<ReportEntry>,
}

/// A sheet's intervals grouped by local start day, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(rename = "timesheet")]
    pub sheet: String,
    pub days: Vec<DayGroup>,
    #[serde(rename = "total_seconds")]
    pub total: i64,
}

/// One printable row: day label (blank for continuation rows), time range,
/// duration and notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub day: String,
    pub range: String,
    pub duration: String,
    pub notes: String,
}

impl ReportRow {
    fn total(label: &str, seconds: i64) -> Self {
        Self {
            day: label.to_string(),
            range: String::new(),
            duration: format_hms(seconds),
            notes: String::new(),
        }
    }

    /// The row's cells in column order.
    pub fn cells(&self) -> [&str; 4] {
        [&self.day, &self.range, &self.duration, &self.notes]
    }
}

impl Report {
    /// Groups `entries` by the local date of their start time in `tz`.
    ///
    /// Running intervals count through `now`.
    pub fn build<Tz: TimeZone>(sheet: &str, entries: &[Entry], now: i64, tz: &Tz) -> Self {
        let mut sorted: Vec<&Entry> = entries.iter().collect();
        sorted.sort_by_key(|e| (e.start_time, e.id));

        let mut days: BTreeMap<NaiveDate, DayGroup> = BTreeMap::new();
        for entry in sorted {
            let date = at(tz, entry.start_time).date_naive();
            let duration = entry.duration_at(now);
            let day = days.entry(date).or_insert_with(|| DayGroup {
                date,
                total: 0,
                entries: Vec::new(),
            });
            day.total += duration;
            day.entries.push(ReportEntry {
                start: entry.start_time,
                end: entry.end_time,
                duration,
                description: entry.description.clone(),
            });
        }

        let days: Vec<DayGroup> = days.into_values().collect();
        let total = days.iter().map(|d| d.total).sum();
        Self {
            sheet: sheet.to_string(),
            days,
            total,
        }
    }

    /// Whether no interval survived filtering.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Table body: each day's intervals followed by a row holding the day
    /// total. Only a day's first row carries the date.
    pub fn rows<Tz: TimeZone>(&self, tz: &Tz) -> Vec<ReportRow>
    where
        Tz::Offset: fmt::Display,
    {
        let mut rows = Vec::new();
        for day in &self.days {
            for (i, entry) in day.entries.iter().enumerate() {
                let day_label = if i == 0 {
                    day.date.format(DAY_FORMAT).to_string()
                } else {
                    String::new()
                };
                let start = at(tz, entry.start).format(TIME_FORMAT);
                let range = match entry.end {
                    Some(end) => format!("{start} - {}", at(tz, end).format(TIME_FORMAT)),
                    None => format!("{start} -"),
                };
                rows.push(ReportRow {
                    day: day_label,
                    range,
                    duration: format_hms(entry.duration),
                    notes: entry.description.clone().unwrap_or_default(),
                });
            }
            rows.push(ReportRow::total("", day.total));
        }
        rows
    }

    /// Footer row with the grand total.
    pub fn total_row(&self) -> ReportRow {
        ReportRow::total("Total", self.total)
    }
}

/// CSV records for the closed entries, followed by a spreadsheet formula
/// totalling the length column in hours.
///
/// Running intervals are left out entirely.
pub fn csv_records<Tz: TimeZone>(entries: &[Entry], tz: &Tz) -> Vec<[String; 4]>
where
    Tz::Offset: fmt::Display,
{
    let mut records: Vec<[String; 4]> = entries
        .iter()
        .filter_map(|entry| {
            let end = entry.end_time?;
            Some([
                at(tz, entry.start_time).format(CSV_TIME_FORMAT).to_string(),
                at(tz, end).format(CSV_TIME_FORMAT).to_string(),
                (end - entry.start_time).to_string(),
                entry.description.clone().unwrap_or_default(),
            ])
        })
        .collect();

    // Header is row 1, so data spans C2..C(n+1).
    let last_row = records.len() + 1;
    records.push([
        "Total".to_string(),
        String::new(),
        format!("=SUM(C2:C{last_row})/3600"),
        String::new(),
    ]);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use insta::assert_snapshot;

    // 2014-04-14 17:45:38 UTC
    const T0: i64 = 1_397_497_538;
    const DAY: i64 = 86_400;

    fn entry(id: i64, start: i64, end: Option<i64>, description: Option<&str>) -> Entry {
        Entry {
            id,
            sheet: "default".to_string(),
            start_time: start,
            end_time: end,
            description: description.map(str::to_string),
            extra: None,
        }
    }

    #[test]
    fn single_closed_interval_totals_its_length() {
        let entries = [entry(1, T0, Some(T0 + 300), Some("Working"))];
        let report = Report::build("default", &entries, T0 + 1_000, &Utc);

        assert_eq!(report.days.len(), 1);
        assert_eq!(report.days[0].total, 300);
        assert_eq!(report.total, 300);
        assert_eq!(report.total_row().cells(), ["Total", "", "0:05:00", ""]);
    }

    #[test]
    fn groups_by_start_day_oldest_first() {
        let entries = [
            entry(3, T0 + DAY, Some(T0 + DAY + 60), None),
            entry(1, T0, Some(T0 + 300), Some("Working")),
            entry(2, T0 + 600, Some(T0 + 900), Some("More")),
        ];
        let report = Report::build("default", &entries, T0 + 2 * DAY, &Utc);

        let dates: Vec<String> = report.days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2014-04-14", "2014-04-15"]);
        assert_eq!(report.days[0].total, 600);
        assert_eq!(report.days[1].total, 60);
        assert_eq!(report.total, 660);
    }

    #[test]
    fn running_interval_counts_through_now() {
        let entries = [
            entry(1, T0, Some(T0 + 300), None),
            entry(2, T0 + 400, None, None),
        ];
        let report = Report::build("default", &entries, T0 + 1_000, &Utc);
        assert_eq!(report.total, 300 + 600);
    }

    #[test]
    fn empty_input_is_an_empty_report() {
        let report = Report::build("default", &[], T0, &Utc);
        assert!(report.is_empty());
        assert_eq!(report.total, 0);
    }

    #[test]
    fn rows_blank_continuation_days_and_add_day_totals() {
        let entries = [
            entry(1, T0, Some(T0 + 300), Some("Working")),
            entry(2, T0 + 600, None, None),
        ];
        let report = Report::build("default", &entries, T0 + 900, &Utc);
        let rendered: Vec<String> = report
            .rows(&Utc)
            .iter()
            .map(|row| row.cells().join("|"))
            .collect();

        assert_snapshot!(rendered.join("\n"), @r"
        Apr 14, 2014|17:45:38 - 17:50:38|0:05:00|Working
        |17:55:38 -|0:05:00|
        ||0:10:00|
        ");
    }

    #[test]
    fn csv_skips_running_intervals_and_appends_formula() {
        let entries = [
            entry(1, T0, Some(T0 + 300), Some("Working")),
            entry(2, T0 + 600, None, Some("Still going")),
        ];
        let records = csv_records(&entries, &Utc);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            [
                "04/14/2014 17:45:38".to_string(),
                "04/14/2014 17:50:38".to_string(),
                "300".to_string(),
                "Working".to_string(),
            ]
        );
        assert_eq!(records[1][0], "Total");
        assert_eq!(records[1][2], "=SUM(C2:C2)/3600");
    }

    #[test]
    fn rows_and_csv_render_in_the_given_zone() {
        let tz = chrono::FixedOffset::west_opt(5 * 3_600).unwrap();
        let entries = [entry(1, T0, Some(T0 + 300), Some("Working"))];
        let report = Report::build("default", &entries, T0 + 300, &tz);

        let rows = report.rows(&tz);
        assert_eq!(rows[0].cells()[1], "12:45:38 - 12:50:38");
        let records = csv_records(&entries, &tz);
        assert_eq!(records[0][0], "04/14/2014 12:45:38");
    }

    #[test]
    fn report_serializes_with_second_totals() {
        let entries = [entry(1, T0, Some(T0 + 300), Some("Working"))];
        let report = Report::build("default", &entries, T0, &Utc);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["timesheet"], "default");
        assert_eq!(json["total_seconds"], 300);
        assert_eq!(json["days"][0]["date"], "2014-04-14");
        assert_eq!(json["days"][0]["entries"][0]["duration_seconds"], 300);
    }
}
