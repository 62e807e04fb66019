use spendwise_config::Config;
use spendwise_storage_json::JsonFileStore;

use crate::cli::commands::{usage, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and change preferences",
        "config [show|set <currency|color|profile|categories|chart-width|data-dir> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None => show_config(context),
        Some((action, rest)) => match action.to_ascii_lowercase().as_str() {
            "show" if rest.is_empty() => show_config(context),
            "set" if rest.len() >= 2 => set_config_value(context, rest[0], &rest[1..].join(" ")),
            _ => Err(usage("config")),
        },
    }
}

fn show_config(context: &mut ShellContext) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    io::print_info(format!("currency    : {}", config.currency_symbol));
    io::print_info(format!(
        "color       : {}",
        if config.ui_color_enabled { "on" } else { "off" }
    ));
    io::print_info(format!("profile     : {}", config.profile));
    let categories = if config.tracked_categories.is_empty() {
        "(all)".to_string()
    } else {
        config.tracked_categories.join(", ")
    };
    io::print_info(format!("categories  : {categories}"));
    io::print_info(format!("chart-width : {}", config.chart_width));
    io::print_info(format!("store       : {}", context.store_path().display()));
    if let Some(dir) = context.store_path().parent() {
        let profiles = JsonFileStore::list_profiles(dir)?;
        io::print_info(format!("profiles    : {}", profiles.join(", ")));
    }
    io::print_info(format!(
        "config file : {}",
        context.config_manager().config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_ascii_lowercase();
    let previous = context.config.clone();
    let mut updated = previous.clone();
    updated.set(&key, value)?;

    context.config = updated;
    if moves_store(&previous, &context.config) {
        if let Err(err) = context.reopen_ledger() {
            context.config = previous;
            return Err(err);
        }
        io::print_info(format!(
            "Opened {} ({} transactions).",
            context.store_path().display(),
            context.ledger.len()
        ));
    }
    if key == "color" {
        output::set_color_enabled(context.config.ui_color_enabled && context.is_interactive());
    }

    context.config_manager().save(&context.config)?;
    io::print_success(format!("Set {key} = {value}."));
    if moves_store(&previous, &context.config) {
        context.render_totals();
    }
    Ok(())
}

fn moves_store(before: &Config, after: &Config) -> bool {
    before.profile != after.profile || before.data_dir != after.data_dir
}
