//! Timebook CLI library.
//!
//! This crate provides the `t` command line: argument parsing, configuration,
//! the command table, hooks and output rendering.

mod cli;
pub mod commands;
mod config;
pub mod dispatch;
pub mod hooks;
pub mod prompt;
pub mod render;

pub use cli::{Cli, Invocation};
pub use config::{Config, HookCommand, default_config_file, ensure_config_file};
pub use dispatch::Dispatcher;
