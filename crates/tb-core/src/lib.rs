//! Core domain logic for timebook.
//!
//! This crate contains the storage-independent pieces of the tracker:
//! - Entries and validated sheet names
//! - Exact-then-prefix name resolution for commands and sheets
//! - Date/time parsing and duration formatting
//! - Day-grouped report aggregation for display and CSV export

pub mod duration;
mod entry;
pub mod lookup;
pub mod report;
pub mod time;
mod types;

pub use duration::{format_hms, format_timedelta};
pub use entry::Entry;
pub use lookup::{LookupError, complete, complete_name};
pub use report::{DateRange, DayGroup, Report, ReportEntry, ReportRow, csv_records};
pub use time::{TimeError, parse_date_time};
pub use types::{DEFAULT_SHEET, SheetName, ValidationError};
