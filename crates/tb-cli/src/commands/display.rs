//! Display command: a timesheet as a day-grouped table, CSV or JSON.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tb_core::report::{CSV_HEADER, TABLE_HEADER};
use tb_core::{DateRange, csv_records};

use super::Session;
use crate::render::{Table, write_csv};

/// Output format of the display command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Plain,
    Csv,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("invalid format \"{other}\" (expected plain, csv or json)")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

/// Display the data from a timesheet.
///
/// Display a timesheet, by default the current one, in the given format.
#[derive(Debug, Parser)]
#[command(name = "display")]
pub struct DisplayArgs {
    /// Show only entries starting on or after this date.
    #[arg(short, long, value_name = "DATE")]
    pub start: Option<String>,

    /// Show only finished entries ending on or before this date.
    #[arg(short, long, value_name = "DATE")]
    pub end: Option<String>,

    /// Output format: plain, csv or json.
    #[arg(short, long, default_value_t = Format::Plain)]
    pub format: Format,

    /// Timesheet to display, or an unambiguous prefix of one.
    pub timesheet: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, session: &Session<'_>, args: &DisplayArgs) -> Result<()> {
    let sheet = session.resolve_sheet(args.timesheet.as_deref())?;
    let range = DateRange {
        start: args
            .start
            .as_deref()
            .map(|s| session.timestamp(Some(s)))
            .transpose()?,
        end: args
            .end
            .as_deref()
            .map(|s| session.timestamp(Some(s)))
            .transpose()?,
    };
    tracing::debug!(%sheet, ?range, format = %args.format, "displaying timesheet");

    match args.format {
        Format::Plain => {
            let report = session
                .db
                .report(&sheet, range, session.now.timestamp(), &Local)?;
            if report.is_empty() {
                writeln!(writer, "(empty)")?;
                return Ok(());
            }
            let mut table = Table::new(&TABLE_HEADER);
            for row in report.rows(&Local) {
                table.add_row(&row.cells());
            }
            table.set_footer(&report.total_row().cells());
            write!(writer, "{}", table.render())?;
        }
        Format::Csv => {
            let entries = session.db.list_entries(&sheet, range)?;
            write_csv(writer, &CSV_HEADER, &csv_records(&entries, &Local))?;
        }
        Format::Json => {
            let report = session
                .db
                .report(&sheet, range, session.now.timestamp(), &Local)?;
            serde_json::to_writer_pretty(&mut *writer, &report)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
