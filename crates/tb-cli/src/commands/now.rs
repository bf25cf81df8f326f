//! Now command: status of the current (or a named) timesheet.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tb_core::format_timedelta;
use tb_db::SheetStatus;

use super::Session;

/// Show the status of the current timesheet.
///
/// Shows the current timesheet, whether it is active and, if so, the length
/// of the current period and its notes. A named timesheet is shown instead
/// when given.
#[derive(Debug, Parser)]
#[command(name = "now")]
pub struct NowArgs {
    /// Only display the name of the current timesheet.
    #[arg(short, long)]
    pub simple: bool,

    /// Only display the notes associated with the current period.
    #[arg(short, long)]
    pub notes: bool,

    /// Timesheet to show, or an unambiguous prefix of one.
    pub timesheet: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, session: &Session<'_>, args: &NowArgs) -> Result<()> {
    if args.simple {
        writeln!(writer, "{}", session.db.current_sheet()?)?;
        return Ok(());
    }

    let sheet = session.resolve_sheet(args.timesheet.as_deref())?;
    let status = session.db.status(&sheet, session.now.timestamp())?;

    if args.notes {
        let notes = match status {
            SheetStatus::Active { notes, .. } => notes.unwrap_or_default(),
            SheetStatus::Idle => String::new(),
        };
        writeln!(writer, "{notes}")?;
        return Ok(());
    }

    match status {
        SheetStatus::Idle => writeln!(writer, "{sheet}: not active")?,
        SheetStatus::Active {
            elapsed,
            notes: Some(notes),
        } => writeln!(writer, "{sheet}: {} ({notes})", format_timedelta(elapsed))?,
        SheetStatus::Active {
            elapsed,
            notes: None,
        } => writeln!(writer, "{sheet}: {}", format_timedelta(elapsed))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::CommandKind;
    use super::super::testing::{T0, run_command};

    use tb_core::LookupError;
    use tb_db::{Database, DbError};

    #[test]
    fn running_sheet_shows_elapsed_and_notes() {
        let db = Database::open_in_memory().unwrap();
        run_command(&db, T0, "", CommandKind::In, &["Writing", "tests."]).unwrap();

        let output = run_command(&db, T0 + 90, "", CommandKind::Now, &[]).unwrap();
        assert_eq!(output, "default: 0:01:30 (Writing tests)\n");
    }

    #[test]
    fn running_without_notes_shows_elapsed_only() {
        let db = Database::open_in_memory().unwrap();
        run_command(&db, T0, "", CommandKind::In, &[]).unwrap();

        let output = run_command(&db, T0 + 90_061, "", CommandKind::Now, &[]).unwrap();
        assert_eq!(output, "default: 1 day, 1:01:01\n");
    }

    #[test]
    fn stopped_sheet_is_not_active() {
        let db = Database::open_in_memory().unwrap();
        run_command(&db, T0, "", CommandKind::In, &[]).unwrap();
        run_command(&db, T0 + 10, "", CommandKind::Out, &[]).unwrap();

        let output = run_command(&db, T0 + 20, "", CommandKind::Now, &[]).unwrap();
        assert_eq!(output, "default: not active\n");
    }

    #[test]
    fn empty_sheet_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let err = run_command(&db, T0, "", CommandKind::Now, &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::EmptySheet { .. })
        ));
    }

    #[test]
    fn simple_prints_current_sheet_even_when_empty() {
        let db = Database::open_in_memory().unwrap();
        let output = run_command(&db, T0, "", CommandKind::Now, &["-s"]).unwrap();
        assert_eq!(output, "default\n");
    }

    #[test]
    fn notes_prints_only_the_notes() {
        let db = Database::open_in_memory().unwrap();
        run_command(&db, T0, "", CommandKind::In, &["Reviewing..."]).unwrap();

        let output = run_command(&db, T0 + 5, "", CommandKind::Now, &["-n"]).unwrap();
        assert_eq!(output, "Reviewing\n");
    }

    #[test]
    fn named_sheet_resolves_by_prefix() {
        let db = Database::open_in_memory().unwrap();
        run_command(&db, T0, "", CommandKind::In, &["-s", "project-x"]).unwrap();
        run_command(&db, T0, "", CommandKind::Switch, &["default"]).unwrap();

        let output = run_command(&db, T0 + 60, "", CommandKind::Now, &["proj"]).unwrap();
        assert_eq!(output, "project-x: 0:01:00\n");

        let err = run_command(&db, T0 + 60, "", CommandKind::Now, &["zzz"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LookupError>(),
            Some(LookupError::NoMatch { .. })
        ));
    }
}
