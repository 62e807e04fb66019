use std::{
    env,
    path::{Path, PathBuf},
};

use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use spendwise_config::{Config, ConfigError, ConfigManager};
use spendwise_core::{Committed, CoreError, Ledger, SummaryService};
use spendwise_storage_json::JsonFileStore;
use strsim::levenshtein;
use thiserror::Error;
use tracing::warn;

use crate::cli::{
    commands::{self, CommandDefinition},
    io as cli_io,
    output,
    ui::format_amount,
};
use crate::errors::CliError;

/// Overrides the directory holding `config.json` and the profile stores.
pub const HOME_ENV: &str = "SPENDWISE_HOME";
/// When set, commands are read line by line from stdin without prompts.
pub const SCRIPT_ENV: &str = "SPENDWISE_CLI_SCRIPT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Session state shared by every command: the open ledger plus preferences.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub ledger: Ledger,
    pub config: Config,
    config_manager: ConfigManager,
    home: Option<PathBuf>,
    store_path: PathBuf,
    theme: ColorfulTheme,
}

impl ShellContext {
    /// Loads configuration and opens the configured profile's ledger.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home = env::var_os(HOME_ENV).map(PathBuf::from);
        let config_manager = match &home {
            Some(dir) => ConfigManager::with_base_dir(dir.clone())?,
            None => ConfigManager::from_default_location()?,
        };
        let config = config_manager.load()?;
        let store = open_store(&config, home.as_deref())?;
        let store_path = store.path().to_path_buf();
        let ledger = Ledger::load(Box::new(store))?;

        Ok(Self::with_parts(
            mode,
            ledger,
            config,
            config_manager,
            home,
            store_path,
        ))
    }

    pub fn with_parts(
        mode: CliMode,
        ledger: Ledger,
        config: Config,
        config_manager: ConfigManager,
        home: Option<PathBuf>,
        store_path: PathBuf,
    ) -> Self {
        output::set_color_enabled(config.ui_color_enabled && mode == CliMode::Interactive);
        Self {
            mode,
            running: true,
            ledger,
            config,
            config_manager,
            home,
            store_path,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn theme(&self) -> &ColorfulTheme {
        &self.theme
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub fn prompt(&self) -> String {
        format!("spendwise[{}]> ", self.config.profile)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        commands::all_definitions()
            .iter()
            .map(|definition| definition.name)
            .collect()
    }

    /// Reopens the ledger after the profile or data directory changed.
    pub fn reopen_ledger(&mut self) -> Result<(), CommandError> {
        let store = open_store(&self.config, self.home.as_deref())?;
        let store_path = store.path().to_path_buf();
        self.ledger = Ledger::load(Box::new(store))?;
        self.store_path = store_path;
        Ok(())
    }

    pub fn format_amount(&self, value: Decimal) -> String {
        format_amount(&self.config.currency_symbol, value)
    }

    /// Prints the totals line; runs after every mutation.
    pub fn render_totals(&self) {
        let totals = SummaryService::totals(&self.ledger);
        cli_io::print_info(format!(
            "Income {} | Expenses {} | Balance {}",
            self.format_amount(totals.income),
            self.format_amount(totals.expenses),
            self.format_amount(totals.balance)
        ));
    }

    /// Surfaces a failed store write as a warning; memory stays authoritative.
    pub fn report_persist<T>(&self, committed: &Committed<T>) {
        if let Some(err) = &committed.persist_error {
            cli_io::print_warning(format!(
                "Change kept for this session but not saved: {err}"
            ));
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = commands::find(command) {
            match (definition.handler)(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_ascii_lowercase();
        let mut suggestions: Vec<_> = commands::all_definitions()
            .iter()
            .map(|definition| (levenshtein(definition.name, &needle), definition.name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit spendwise?", true).or(Ok(true))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_info("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(CoreError::Validation(message)) => {
                cli_io::print_error(format!(
                    "Please fill all fields correctly with valid values: {message}"
                ));
                Ok(())
            }
            CommandError::Core(CoreError::IndexOutOfRange { index, len }) => {
                cli_io::print_error(format!(
                    "No transaction at row {}; the ledger has {len}.",
                    index + 1
                ));
                Ok(())
            }
            CommandError::Core(err @ CoreError::InvalidMonth(_)) => {
                warn!(error = %err, "month derivation failed");
                cli_io::print_error(format!("Internal error: {err}"));
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    pub(crate) fn usage_error(definition: &CommandDefinition) -> CommandError {
        CommandError::InvalidArguments(format!("Usage: {}", definition.usage))
    }
}

fn open_store(config: &Config, home: Option<&Path>) -> Result<JsonFileStore, CoreError> {
    let data_dir = match (&config.data_dir, home) {
        (Some(dir), _) => dir.clone(),
        (None, Some(home)) => home.join("stores"),
        (None, None) => config.resolve_data_dir(),
    };
    JsonFileStore::open(data_dir, &config.profile)
}
