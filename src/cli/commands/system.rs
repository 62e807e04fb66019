use crate::cli::commands::{all_definitions, find, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
        CommandDefinition::new("quit", "Exit the shell", "quit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match find(&name.to_lowercase()) {
            Some(definition) => {
                output_section(definition.name);
                io::print_info(definition.description);
                io::print_info(format!("Usage: {}", definition.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output_section("Commands");
    let definitions = all_definitions();
    let width = definitions
        .iter()
        .map(|definition| definition.name.len())
        .max()
        .unwrap_or(0);
    for definition in &definitions {
        io::print_info(format!(
            "{:<width$}  {}",
            definition.name,
            definition.description,
            width = width
        ));
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
