//! Out command: stop the timer for the current timesheet.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tb_core::format_timedelta;

use super::Session;

/// Stop the timer for the current timesheet.
///
/// Must be called after in.
#[derive(Debug, Parser)]
#[command(name = "out")]
pub struct OutArgs {
    /// Show the duration of the period that was ended.
    #[arg(short, long)]
    pub verbose: bool,

    /// Set time of clock-out.
    #[arg(short, long, value_name = "TIME")]
    pub at: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, session: &Session<'_>, args: &OutArgs) -> Result<()> {
    let at = session.timestamp(args.at.as_deref())?;
    let closed = session.db.clock_out(at)?;
    if args.verbose {
        writeln!(writer, "{}", format_timedelta(closed.duration_at(at)))?;
    }
    Ok(())
}
