use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{CommandFactory, FromArgMatches};
use tracing_subscriber::EnvFilter;

use tb_cli::commands::{CommandTable, Session, help_text};
use tb_cli::hooks::Hooks;
use tb_cli::prompt::Prompt;
use tb_cli::{Cli, Config, Dispatcher, default_config_file, ensure_config_file};

/// Open the database, ensuring the parent directory exists.
fn open_database(path: &Path) -> Result<tb_db::Database> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    tb_db::Database::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn run(cli: Cli, table: &CommandTable) -> Result<()> {
    let config_path = cli.config.clone().or_else(default_config_file);
    if let Some(path) = &config_path {
        ensure_config_file(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
    }
    let mut config =
        Config::load_from(config_path.as_deref()).context("failed to load configuration")?;
    if let Some(path) = &cli.timebook {
        config.database_path.clone_from(path);
    }
    tracing::debug!(?config, "loaded configuration");

    let db = open_database(&config.database_path)?;
    let hooks = Hooks::from_config(&config.hooks).context("failed to load hooks")?;

    let (name, args) = cli.into_command_line();
    let mut prompt = Prompt::stdio();
    let mut session = Session {
        db: &db,
        now: Local::now(),
        confirm: &mut prompt,
    };
    Dispatcher::new(table, &hooks).dispatch(&name, args, &mut session, &mut io::stdout())
}

fn main() -> ExitCode {
    let table = CommandTable::new();
    let matches = Cli::command().after_help(help_text()).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match run(cli, &table) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Per-command parse errors, --help and --version exit the way clap does.
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("t: error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
