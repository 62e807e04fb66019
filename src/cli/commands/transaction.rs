use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use spendwise_core::CoreError;
use spendwise_domain::{Displayable, TransactionDraft, TransactionKind};

use crate::cli::commands::{parse_row, usage, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::ui::table::transactions_table;

const DATE_FORMAT: &str = "%Y-%m-%d";
const KIND_ITEMS: [&str; 2] = ["Income", "Expense"];

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add",
            "Record an income or expense",
            "add <income|expense> <title> <category> <amount> <YYYY-MM-DD>",
            cmd_add,
        ),
        CommandDefinition::new("list", "Show all transactions", "list", cmd_list),
        CommandDefinition::new(
            "edit",
            "Take a transaction out, change it, and record it again",
            "edit <row> [type=..] [title=..] [category=..] [amount=..] [date=..]",
            cmd_edit,
        ),
        CommandDefinition::new("delete", "Remove a transaction", "delete <row>", cmd_delete),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = match args {
        [] if context.is_interactive() => prompt_draft(context, None)?,
        [kind, title, category, amount, date] => TransactionDraft::new(
            parse_kind(kind)?,
            *title,
            *category,
            parse_amount(amount)?,
            parse_date(date)?,
        ),
        _ => return Err(usage("add")),
    };

    let committed = context.ledger.add_draft(draft)?;
    context.report_persist(&committed);
    io::print_success(format!(
        "Recorded {} ({}).",
        committed.value.display_label(),
        context.format_amount(committed.value.amount)
    ));
    context.render_totals();
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage("list"));
    }
    if context.ledger.is_empty() {
        io::print_info("No transactions recorded.");
        return Ok(());
    }
    let table = transactions_table(
        context.ledger.transactions(),
        &context.config.currency_symbol,
    );
    output::raw(table.render());
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((row, rest)) = args.split_first() else {
        return Err(usage("edit"));
    };
    let index = parse_row(row)?;
    // Parse overrides before touching the ledger so a typo costs nothing.
    let overrides = rest
        .iter()
        .map(|arg| FieldOverride::parse(arg))
        .collect::<Result<Vec<_>, _>>()?;

    let taken = context.ledger.edit_at(index)?;
    context.report_persist(&taken);
    let original = taken.value;

    let edited = if overrides.is_empty() && context.is_interactive() {
        match prompt_draft(context, Some(&original)) {
            Ok(draft) => draft,
            Err(err) => {
                print_restore_hint(&original);
                return Err(err);
            }
        }
    } else {
        let mut draft = original.clone();
        for field in overrides {
            field.apply(&mut draft);
        }
        draft
    };

    match context.ledger.add_draft(edited) {
        Ok(committed) => {
            context.report_persist(&committed);
            io::print_success(format!(
                "Updated {} ({}).",
                committed.value.display_label(),
                context.format_amount(committed.value.amount)
            ));
            context.render_totals();
            Ok(())
        }
        Err(err) => {
            print_restore_hint(&original);
            context.render_totals();
            Err(err.into())
        }
    }
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [row] = args else {
        return Err(usage("delete"));
    };
    let index = parse_row(row)?;

    let committed = context.ledger.remove_at(index)?;
    context.report_persist(&committed);
    io::print_success(format!("Deleted {}.", committed.value.display_label()));
    context.render_totals();
    Ok(())
}

/// One `field=value` argument to `edit`, already parsed.
#[derive(Debug, Clone, PartialEq)]
enum FieldOverride {
    Kind(TransactionKind),
    Title(String),
    Category(String),
    Amount(Decimal),
    Date(NaiveDate),
}

impl FieldOverride {
    fn parse(arg: &str) -> Result<Self, CommandError> {
        let Some((field, value)) = arg.split_once('=') else {
            return Err(CommandError::InvalidArguments(format!(
                "expected field=value, got `{arg}`"
            )));
        };
        match field.trim().to_ascii_lowercase().as_str() {
            "type" | "kind" => Ok(Self::Kind(parse_kind(value)?)),
            "title" => Ok(Self::Title(value.to_string())),
            "category" => Ok(Self::Category(value.to_string())),
            "amount" => Ok(Self::Amount(parse_amount(value)?)),
            "date" => Ok(Self::Date(parse_date(value)?)),
            other => Err(CommandError::InvalidArguments(format!(
                "unknown field `{other}`; expected type, title, category, amount or date"
            ))),
        }
    }

    fn apply(self, draft: &mut TransactionDraft) {
        match self {
            Self::Kind(kind) => draft.kind = kind,
            Self::Title(title) => draft.title = title,
            Self::Category(category) => draft.category = category,
            Self::Amount(amount) => draft.amount = amount,
            Self::Date(date) => draft.date = date,
        }
    }
}

fn parse_kind(raw: &str) -> Result<TransactionKind, CommandError> {
    raw.parse()
        .map_err(|message: String| CoreError::Validation(message).into())
}

fn parse_amount(raw: &str) -> Result<Decimal, CommandError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| CoreError::Validation(format!("amount `{raw}` is not a number")).into())
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        CoreError::Validation(format!("date `{raw}` is not in YYYY-MM-DD form")).into()
    })
}

/// Asks for every field, prefilled from `initial` when editing.
fn prompt_draft(
    context: &ShellContext,
    initial: Option<&TransactionDraft>,
) -> Result<TransactionDraft, CommandError> {
    let theme = context.theme();
    let default_kind = match initial.map(|draft| draft.kind) {
        Some(TransactionKind::Income) => 0,
        _ => 1,
    };
    let kind = match io::prompt_select(theme, "Type", &KIND_ITEMS, default_kind)? {
        0 => TransactionKind::Income,
        _ => TransactionKind::Expense,
    };
    let title = io::prompt_text(theme, "Title", initial.map(|draft| draft.title.as_str()))?;
    let category = io::prompt_text(
        theme,
        "Category",
        initial.map(|draft| draft.category.as_str()),
    )?;
    let amount_text = initial.map(|draft| draft.amount.to_string());
    let amount = io::prompt_text(theme, "Amount", amount_text.as_deref())?;
    let date_text = initial
        .map(|draft| draft.date)
        .unwrap_or_else(|| Local::now().date_naive())
        .format(DATE_FORMAT)
        .to_string();
    let date = io::prompt_text(theme, "Date (YYYY-MM-DD)", Some(&date_text))?;

    Ok(TransactionDraft::new(
        kind,
        title,
        category,
        parse_amount(&amount)?,
        parse_date(&date)?,
    ))
}

/// Renders a draft as an `add` line that recreates it when pasted.
pub(crate) fn add_command(draft: &TransactionDraft) -> String {
    let amount = draft.amount.normalize().to_string();
    let date = draft.date.format(DATE_FORMAT).to_string();
    shell_words::join([
        "add",
        draft.kind.as_str(),
        draft.title.as_str(),
        draft.category.as_str(),
        amount.as_str(),
        date.as_str(),
    ])
}

fn print_restore_hint(original: &TransactionDraft) {
    io::print_warning("The transaction was taken out but not recorded again. To restore it, run:");
    output::raw(format!("  {}", add_command(original)));
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn draft() -> TransactionDraft {
        TransactionDraft::new(
            TransactionKind::Expense,
            "Team lunch",
            "food",
            dec!(250.5),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        )
    }

    #[test]
    fn add_command_quotes_multi_word_fields() {
        assert_eq!(
            add_command(&draft()),
            "add expense 'Team lunch' food 250.5 2024-03-15"
        );
    }

    #[test]
    fn overrides_replace_only_named_fields() {
        let mut edited = draft();
        FieldOverride::parse("amount=300").unwrap().apply(&mut edited);
        FieldOverride::parse("TYPE=income").unwrap().apply(&mut edited);

        assert_eq!(edited.amount, dec!(300));
        assert_eq!(edited.kind, TransactionKind::Income);
        assert_eq!(edited.title, "Team lunch");
        assert_eq!(edited.date, draft().date);
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        assert!(FieldOverride::parse("amount").is_err());
        assert!(FieldOverride::parse("colour=red").is_err());
        assert!(matches!(
            FieldOverride::parse("date=15/03/2024"),
            Err(CommandError::Core(CoreError::Validation(_)))
        ));
        assert!(matches!(
            FieldOverride::parse("amount=lots"),
            Err(CommandError::Core(CoreError::Validation(_)))
        ));
    }
}
