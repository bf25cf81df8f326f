//! Runs one command line inside a transaction.

use std::io::Write;

use anyhow::{Context, Result};

use crate::commands::{self, CommandTable, Session};
use crate::hooks::Hooks;

/// Resolves command names and runs them between their hooks.
#[derive(Debug)]
pub struct Dispatcher<'a> {
    table: &'a CommandTable,
    hooks: &'a Hooks,
}

impl<'a> Dispatcher<'a> {
    pub const fn new(table: &'a CommandTable, hooks: &'a Hooks) -> Self {
        Self { table, hooks }
    }

    /// Runs `name` with `args`.
    ///
    /// The pre hook runs first, then the command inside one transaction that
    /// commits only if the command succeeds. Output is held back until the
    /// post hook has seen it, so a failed command prints nothing.
    pub fn dispatch<W: Write>(
        &self,
        name: &str,
        args: Vec<String>,
        session: &mut Session<'_>,
        writer: &mut W,
    ) -> Result<()> {
        let kind = self.table.resolve(name)?;
        tracing::debug!(command = kind.name(), ?args, "dispatching");
        let args = self.hooks.pre(kind, args)?;

        let db = session.db;
        let tx = db.begin()?;
        let mut output = Vec::new();
        match commands::execute(kind, &args, session, &mut output) {
            Ok(()) => {
                tx.commit()?;
                tracing::debug!(command = kind.name(), "committed");
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback() {
                    tracing::warn!(%rollback, "rollback failed");
                }
                tracing::debug!(command = kind.name(), "rolled back");
                return Err(err);
            }
        }

        let output = String::from_utf8(output).context("command output is not UTF-8")?;
        let output = self.hooks.post(kind, output)?;
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
