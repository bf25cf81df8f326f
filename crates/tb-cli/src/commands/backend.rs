//! Backend command: an interactive SQLite shell on the timebook.

use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::Parser;

use super::Session;

const SHELL: &str = "sqlite3";

/// Open the backend's interactive shell.
///
/// Runs the `sqlite3` shell on the timebook database.
#[derive(Debug, Parser)]
#[command(name = "backend")]
pub struct BackendArgs {}

pub fn run(session: &Session<'_>, _args: &BackendArgs) -> Result<()> {
    let Some(path) = session.db.path() else {
        bail!("an in-memory timebook has no backend shell");
    };

    tracing::debug!(path, "starting {SHELL}");
    let status = Command::new(SHELL)
        .arg(path)
        .status()
        .with_context(|| format!("failed to run {SHELL}"))?;
    if !status.success() {
        bail!("{SHELL} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::CommandKind;
    use super::super::testing::{T0, run_command};

    use tb_db::Database;

    #[test]
    fn in_memory_database_has_no_shell() {
        let db = Database::open_in_memory().unwrap();
        let err = run_command(&db, T0, "", CommandKind::Backend, &[]).unwrap_err();
        assert!(err.to_string().contains("in-memory"), "{err}");
    }

    #[test]
    fn takes_no_arguments() {
        let db = Database::open_in_memory().unwrap();
        let err = run_command(&db, T0, "", CommandKind::Backend, &["extra"]).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }
}
