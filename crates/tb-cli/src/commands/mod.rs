//! Command implementations and the table that names them.
//!
//! Every command parses its own arguments with clap, so a command line is
//! resolved in two steps: the command name (or an unambiguous prefix of it)
//! picks a [`CommandKind`], then the remaining words go to that command's
//! parser.

pub mod alter;
pub mod backend;
pub mod clock_in;
pub mod clock_out;
pub mod display;
pub mod kill;
pub mod list;
pub mod now;
pub mod running;
pub mod switch;

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::Parser;
use tb_core::{LookupError, complete, complete_name, parse_date_time};
use tb_db::Database;

use crate::prompt::Confirm;

/// A command the tracker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandKind {
    Alter,
    Backend,
    Display,
    In,
    Kill,
    List,
    Now,
    Out,
    Running,
    Switch,
}

impl CommandKind {
    pub const ALL: [Self; 10] = [
        Self::Alter,
        Self::Backend,
        Self::Display,
        Self::In,
        Self::Kill,
        Self::List,
        Self::Now,
        Self::Out,
        Self::Running,
        Self::Switch,
    ];

    /// Canonical name, also used to key hooks in the configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Alter => "alter",
            Self::Backend => "backend",
            Self::Display => "display",
            Self::In => "in",
            Self::Kill => "kill",
            Self::List => "list",
            Self::Now => "now",
            Self::Out => "out",
            Self::Running => "running",
            Self::Switch => "switch",
        }
    }

    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Alter => &["write"],
            Self::Backend => &["shell"],
            Self::Display => &["export", "format", "show"],
            Self::In => &["start"],
            Self::Kill => &["delete"],
            Self::List => &["ls"],
            Self::Now => &["info"],
            Self::Out => &["stop"],
            Self::Running => &["active"],
            Self::Switch => &[],
        }
    }

    /// Looks up a canonical command name exactly; aliases do not count.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Alter => "Alter the description of the active period",
            Self::Backend => "Open the backend's interactive shell",
            Self::Display => "Display the data from a timesheet",
            Self::In => "Start the timer for the current timesheet",
            Self::Kill => "Delete a timesheet",
            Self::List => "Show the available timesheets",
            Self::Now => "Show the status of the current timesheet",
            Self::Out => "Stop the timer for the current timesheet",
            Self::Running => "Show all running timesheets",
            Self::Switch => "Switch to a new timesheet",
        }
    }
}

/// Every command name and alias, for resolving what the user typed.
#[derive(Debug, Clone)]
pub struct CommandTable {
    names: BTreeMap<&'static str, CommandKind>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        let mut names = BTreeMap::new();
        for kind in CommandKind::ALL {
            names.insert(kind.name(), kind);
            for alias in kind.aliases() {
                names.insert(*alias, kind);
            }
        }
        Self { names }
    }

    /// Resolves an exact name or alias, or else a unique prefix of one.
    pub fn resolve(&self, name: &str) -> Result<CommandKind, LookupError> {
        complete(self.names.iter().map(|(n, k)| (*n, *k)), name, "command")
    }
}

/// Command summary appended to the top-level help.
pub fn help_text() -> String {
    let labels: Vec<(String, &str)> = CommandKind::ALL
        .iter()
        .map(|kind| {
            let mut label = kind.name().to_string();
            for alias in kind.aliases() {
                label.push_str(", ");
                label.push_str(alias);
            }
            (label, kind.description())
        })
        .collect();
    let width = labels.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let mut help = String::from("Commands:\n");
    for (label, description) in labels {
        writeln!(help, "  {label:<width$}  {description}").unwrap();
    }
    help.push_str("\nCommands may be abbreviated to any unambiguous prefix.");
    help
}

/// State shared by every command of one invocation.
pub struct Session<'a> {
    pub db: &'a Database,
    /// Wall-clock time the invocation started.
    pub now: DateTime<Local>,
    pub confirm: &'a mut dyn Confirm,
}

impl Session<'_> {
    /// `text` as a timestamp, or now when absent.
    pub fn timestamp(&self, text: Option<&str>) -> Result<i64> {
        match text {
            Some(text) => Ok(parse_date_time(text, &self.now)?),
            None => Ok(self.now.timestamp()),
        }
    }

    /// Resolves a user-supplied sheet name against the existing sheets, or
    /// falls back to the current sheet.
    pub fn resolve_sheet(&self, name: Option<&str>) -> Result<String> {
        match name {
            Some(name) => Ok(complete_name(&self.db.sheet_names()?, name, "timesheet")?),
            None => Ok(self.db.current_sheet()?),
        }
    }
}

/// Joins description words; no words means no description.
fn join_words(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Parses `args` for `kind` and runs it, writing output to `writer`.
pub fn execute<W: Write>(
    kind: CommandKind,
    args: &[String],
    session: &mut Session<'_>,
    writer: &mut W,
) -> Result<()> {
    let argv = std::iter::once(kind.name().to_string()).chain(args.iter().cloned());
    match kind {
        CommandKind::Alter => alter::run(session, &alter::AlterArgs::try_parse_from(argv)?),
        CommandKind::Backend => backend::run(session, &backend::BackendArgs::try_parse_from(argv)?),
        CommandKind::Display => {
            display::run(writer, session, &display::DisplayArgs::try_parse_from(argv)?)
        }
        CommandKind::In => clock_in::run(session, &clock_in::InArgs::try_parse_from(argv)?),
        CommandKind::Kill => kill::run(writer, session, &kill::KillArgs::try_parse_from(argv)?),
        CommandKind::List => list::run(writer, session, &list::ListArgs::try_parse_from(argv)?),
        CommandKind::Now => now::run(writer, session, &now::NowArgs::try_parse_from(argv)?),
        CommandKind::Out => {
            clock_out::run(writer, session, &clock_out::OutArgs::try_parse_from(argv)?)
        }
        CommandKind::Running => {
            running::run(writer, session, &running::RunningArgs::try_parse_from(argv)?)
        }
        CommandKind::Switch => {
            switch::run(writer, session, &switch::SwitchArgs::try_parse_from(argv)?)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_names_and_aliases_resolve() {
        let table = CommandTable::new();
        assert_eq!(table.resolve("in").unwrap(), CommandKind::In);
        assert_eq!(table.resolve("start").unwrap(), CommandKind::In);
        assert_eq!(table.resolve("show").unwrap(), CommandKind::Display);
        assert_eq!(table.resolve("ls").unwrap(), CommandKind::List);
    }

    #[test]
    fn unique_prefix_resolves() {
        let table = CommandTable::new();
        assert_eq!(table.resolve("sw").unwrap(), CommandKind::Switch);
        assert_eq!(table.resolve("disp").unwrap(), CommandKind::Display);
        assert_eq!(table.resolve("k").unwrap(), CommandKind::Kill);
    }

    #[test]
    fn ambiguous_prefix_lists_candidates() {
        let table = CommandTable::new();
        let err = table.resolve("s").unwrap_err();
        assert_eq!(
            err.to_string(),
            "ambiguous command \"s\":\n    shell show start stop switch"
        );
    }

    #[test]
    fn unknown_command_is_no_match() {
        let table = CommandTable::new();
        assert!(matches!(
            table.resolve("frobnicate"),
            Err(LookupError::NoMatch { .. })
        ));
    }

    #[test]
    fn from_name_ignores_aliases() {
        assert_eq!(CommandKind::from_name("out"), Some(CommandKind::Out));
        assert_eq!(CommandKind::from_name("stop"), None);
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for kind in CommandKind::ALL {
            assert!(help.contains(kind.description()), "{help}");
        }
        assert!(help.contains("display, export, format, show"));
    }
}
