//! Terminal front-end: a small shell that opens category and entry forms,
//! edits their fields and submits them against the in-memory API.

mod commands;
mod context;
pub mod output;
mod prompts;
mod shell;

use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::errors::{ConfigError, ControllerError, FormError, NavigationError, ServiceError};

pub use context::{CliMode, ShellContext};
pub use shell::run_cli;

/// Failures that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures of a single command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("No form is open. Use `open <collection>/new` or `open <collection>/<id>/edit`.")]
    NoPage,
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}
