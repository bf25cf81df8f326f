//! Kill command: delete every entry of a timesheet after confirmation.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tb_core::SheetName;
use tb_db::KillOutcome;

use super::Session;

/// Delete a timesheet.
///
/// If no timesheet is specified, delete the current timesheet and switch to
/// the default timesheet.
#[derive(Debug, Parser)]
#[command(name = "kill")]
pub struct KillArgs {
    /// Timesheet to delete; the current one when omitted.
    pub timesheet: Option<SheetName>,
}

pub fn run<W: Write>(writer: &mut W, session: &mut Session<'_>, args: &KillArgs) -> Result<()> {
    let Session { db, confirm, .. } = session;
    let outcome = db.kill(args.timesheet.as_ref().map(SheetName::as_str), |sheet| {
        confirm.confirm(&format!("delete timesheet {sheet}?"))
    })?;

    match outcome {
        KillOutcome::Canceled { .. } => writeln!(writer, "canceled")?,
        KillOutcome::Deleted {
            sheet,
            entries,
            switched_to_default,
        } => {
            tracing::debug!(%sheet, entries, switched_to_default, "kill finished");
        }
    }
    Ok(())
}
