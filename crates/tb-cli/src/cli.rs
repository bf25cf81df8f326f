//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::CommandKind;

/// Timebook time tracker.
///
/// Records time spent on named timesheets in a local SQLite database.
#[derive(Debug, Parser)]
#[command(
    name = "t",
    version,
    long_about = None,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Specify an alternate configuration file.
    #[arg(short = 'C', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Specify an alternate timebook file.
    #[arg(short = 'b', long, value_name = "FILE")]
    pub timebook: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Invocation>,
}

/// A command and its unparsed arguments.
#[derive(Debug, Subcommand)]
pub enum Invocation {
    /// Any command name, alias or unambiguous prefix, then its arguments.
    #[command(external_subcommand)]
    Run(Vec<String>),
}

impl Cli {
    /// The command name and its arguments; `now` when none was given.
    pub fn into_command_line(self) -> (String, Vec<String>) {
        match self.command {
            Some(Invocation::Run(words)) => {
                let mut words = words.into_iter();
                let name = words.next().unwrap_or_default();
                (name, words.collect())
            }
            None => (CommandKind::Now.name().to_string(), Vec::new()),
        }
    }
}
