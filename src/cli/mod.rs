//! Interactive and scripted shell over a [`spendwise_core::Ledger`].

pub mod commands;
pub mod core;
pub mod io;
pub mod output;
pub mod shell;
pub mod ui;

pub use self::core::{CliMode, CommandError, CommandResult, LoopControl, ShellContext};
pub use shell::run_cli;
