//! Running command: every sheet with an open interval.

use std::io::Write;

use anyhow::Result;
use clap::Parser;

use super::Session;
use crate::render::Table;

/// Show all running timesheets.
#[derive(Debug, Parser)]
#[command(name = "running")]
pub struct RunningArgs {}

pub fn run<W: Write>(writer: &mut W, session: &Session<'_>, _args: &RunningArgs) -> Result<()> {
    let mut table = Table::new(&["Timesheet", "Description"]);
    for running in session.db.running_sheets()? {
        let description = running.description.unwrap_or_else(|| "--".to_string());
        table.add_row(&[running.sheet, description]);
    }
    write!(writer, "{}", table.render())?;
    Ok(())
}
