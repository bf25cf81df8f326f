//! Switch command: change the current timesheet.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tb_core::SheetName;

use super::Session;

/// Switch to a new timesheet.
///
/// This causes all future operations (except switch) to operate on that
/// timesheet. The default timesheet is called "default".
#[derive(Debug, Parser)]
#[command(name = "switch")]
pub struct SwitchArgs {
    /// Print the name and number of entries of the timesheet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Timesheet to switch to; it does not need to exist yet.
    pub timesheet: SheetName,
}

pub fn run<W: Write>(writer: &mut W, session: &Session<'_>, args: &SwitchArgs) -> Result<()> {
    let sheet = args.timesheet.as_str();
    session.db.switch(sheet)?;

    if args.verbose {
        match session.db.entry_count(sheet)? {
            0 => writeln!(writer, "switched to empty timesheet \"{sheet}\"")?,
            1 => writeln!(writer, "switched to timesheet \"{sheet}\" (1 entry)")?,
            n => writeln!(writer, "switched to timesheet \"{sheet}\" ({n} entries)")?,
        }
    }
    Ok(())
}
