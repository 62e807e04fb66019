pub mod config;
pub mod ledger;
pub mod system;
pub mod transaction;

use crate::cli::core::{CommandError, CommandResult, ShellContext};

/// Every shell command, in the order `help` lists them.
pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(transaction::definitions());
    commands.extend(ledger::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn find(name: &str) -> Option<CommandDefinition> {
    all_definitions()
        .into_iter()
        .find(|definition| definition.name == name)
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Usage error for the named command.
pub(crate) fn usage(name: &str) -> CommandError {
    match find(name) {
        Some(definition) => ShellContext::usage_error(&definition),
        None => CommandError::InvalidArguments(format!("Usage: {name}")),
    }
}

/// Parses a 1-based row number as shown by `list` into a 0-based index.
pub(crate) fn parse_row(raw: &str) -> Result<usize, CommandError> {
    match raw.trim().parse::<usize>() {
        Ok(row) if row >= 1 => Ok(row - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{raw}` is not a row number; use the # column from `list`."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_one_based() {
        assert_eq!(parse_row("1").unwrap(), 0);
        assert_eq!(parse_row(" 12 ").unwrap(), 11);
        assert!(parse_row("0").is_err());
        assert!(parse_row("-3").is_err());
        assert!(parse_row("abc").is_err());
    }

    #[test]
    fn command_names_are_unique() {
        let definitions = all_definitions();
        let mut names: Vec<_> = definitions.iter().map(|d| d.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), definitions.len());
    }

    #[test]
    fn find_resolves_aliases() {
        assert!(find("quit").is_some());
        assert!(find("exit").is_some());
        assert!(find("launch").is_none());
    }
}
