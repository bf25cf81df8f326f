//! List command: show the available timesheets with their totals.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tb_core::format_timedelta;
use tb_core::time::start_of_day;

use super::Session;
use crate::render::Table;

const HEADER: [&str; 4] = [" Timesheet", "Running", "Today", "Total time"];

/// Show the available timesheets.
#[derive(Debug, Parser)]
#[command(name = "list")]
pub struct ListArgs {
    /// Only display the names of the available timesheets.
    #[arg(short, long)]
    pub simple: bool,
}

pub fn run<W: Write>(writer: &mut W, session: &Session<'_>, args: &ListArgs) -> Result<()> {
    if args.simple {
        for name in session.db.sheet_names()? {
            writeln!(writer, "{name}")?;
        }
        return Ok(());
    }

    let summaries = session
        .db
        .sheet_summaries(session.now.timestamp(), start_of_day(&session.now))?;
    if summaries.is_empty() {
        writeln!(writer, "(no sheets)")?;
        return Ok(());
    }

    let mut table = Table::new(&HEADER);
    for summary in summaries {
        let marker = if summary.is_current { '*' } else { ' ' };
        table.add_row(&[
            format!("{marker}{}", summary.name),
            summary
                .active
                .map_or_else(|| "--".to_string(), format_timedelta),
            format_timedelta(summary.today),
            format_timedelta(summary.total),
        ]);
    }
    write!(writer, "{}", table.render())?;
    Ok(())
}
