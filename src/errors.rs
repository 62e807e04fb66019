use std::io;

use spendwise_config::ConfigError;
use spendwise_core::CoreError;
use thiserror::Error;

/// Failures that stop the shell itself, as opposed to a single command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Could not open ledger: {0}")]
    Core(#[from] CoreError),
}
