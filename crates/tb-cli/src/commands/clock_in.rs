//! In command: start the timer for the current timesheet.

use anyhow::Result;
use clap::Parser;
use tb_core::SheetName;
use tb_db::ClockIn;

use super::{Session, join_words};

/// Start the timer for the current timesheet.
///
/// Must be called before out. Notes may be specified for this period; they
/// are exactly equivalent to notes specified with alter.
#[derive(Debug, Parser)]
#[command(name = "in")]
pub struct InArgs {
    /// Switch to another timesheet before starting the timer.
    #[arg(short, long, value_name = "TIMESHEET")]
    pub switch: Option<SheetName>,

    /// Clock out before clocking in.
    #[arg(short, long)]
    pub out: bool,

    /// Set time of clock-in.
    #[arg(short, long, value_name = "TIME")]
    pub at: Option<String>,

    /// Clock in with the description of the last active period.
    #[arg(short, long)]
    pub resume: bool,

    /// Opaque data stored with the entry for hooks.
    #[arg(long, hide = true)]
    pub extra: Option<String>,

    /// Notes for this period.
    pub description: Vec<String>,
}

pub fn run(session: &Session<'_>, args: &InArgs) -> Result<()> {
    let at = session.timestamp(args.at.as_deref())?;
    let entry = session.db.clock_in(&ClockIn {
        switch: args.switch.as_ref().map(ToString::to_string),
        description: join_words(&args.description),
        at,
        out: args.out,
        resume: args.resume,
        extra: args.extra.clone(),
    })?;
    tracing::debug!(entry_id = entry.id, sheet = %entry.sheet, "clocked in");
    Ok(())
}
