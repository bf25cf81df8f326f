//! Alter command: replace the notes of the running period.

use anyhow::Result;
use clap::Parser;

use super::Session;

/// Alter the description of the active period.
///
/// Inserts a note associated with the currently active period in the
/// timesheet, replacing any existing note.
#[derive(Debug, Parser)]
#[command(name = "alter")]
pub struct AlterArgs {
    /// New notes for the active period.
    #[arg(required = true)]
    pub description: Vec<String>,
}

pub fn run(session: &Session<'_>, args: &AlterArgs) -> Result<()> {
    session.db.alter(&args.description.join(" "))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::CommandKind;
    use super::super::testing::{T0, run_command};

    use tb_db::{Database, DbError};

    #[test]
    fn replaces_description_of_running_interval() {
        let db = Database::open_in_memory().unwrap();
        run_command(&db, T0, "", CommandKind::In, &["draft"]).unwrap();
        run_command(&db, T0 + 10, "", CommandKind::Alter, &["final", "notes"]).unwrap();

        let active = db.active_entry("default").unwrap().unwrap();
        assert_eq!(active.description.as_deref(), Some("final notes"));
    }

    #[test]
    fn requires_a_running_interval() {
        let db = Database::open_in_memory().unwrap();
        let err = run_command(&db, T0, "", CommandKind::Alter, &["notes"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::SheetNotActive { .. })
        ));
    }

    #[test]
    fn requires_words() {
        let db = Database::open_in_memory().unwrap();
        let err = run_command(&db, T0, "", CommandKind::Alter, &[]).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }
}
