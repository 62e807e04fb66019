//! Whole-ledger commands: totals, charts, consistency checks and reset.

use spendwise_core::SummaryService;

use crate::cli::commands::{usage, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::ui::charts::{render_category_chart, render_monthly_chart};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "summary",
            "Show total income, expenses and balance",
            "summary",
            cmd_summary,
        ),
        CommandDefinition::new(
            "chart",
            "Chart expenses by category and by month",
            "chart",
            cmd_chart,
        ),
        CommandDefinition::new(
            "check",
            "Compare stored totals against the transactions",
            "check",
            cmd_check,
        ),
        CommandDefinition::new(
            "repair",
            "Recompute stored totals from the transactions",
            "repair",
            cmd_repair,
        ),
        CommandDefinition::new(
            "reset",
            "Delete every transaction and zero all totals",
            "reset [--yes]",
            cmd_reset,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage("summary"));
    }
    let totals = SummaryService::totals(&context.ledger);
    output::section("Summary");
    io::print_info(format!(
        "Total income   : {}",
        context.format_amount(totals.income)
    ));
    io::print_info(format!(
        "Total expenses : {}",
        context.format_amount(totals.expenses)
    ));
    io::print_info(format!(
        "Balance        : {}",
        context.format_amount(totals.balance)
    ));
    Ok(())
}

fn cmd_chart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage("chart"));
    }
    let currency = context.config.currency_symbol.as_str();
    let width = context.config.chart_width;

    let slices =
        SummaryService::category_breakdown(&context.ledger, &context.config.tracked_categories);
    output::section("Expenses by category");
    output::raw(render_category_chart(&slices, width, currency));

    let bars = SummaryService::monthly_series(&context.ledger);
    output::section("Expenses by month");
    output::raw(render_monthly_chart(&bars, width, currency));
    Ok(())
}

fn cmd_check(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage("check"));
    }
    let warnings = context.ledger.consistency_warnings()?;
    if warnings.is_empty() {
        io::print_success("Stored totals match the transactions.");
        return Ok(());
    }
    for warning in &warnings {
        io::print_warning(warning);
    }
    io::print_info("Run `repair` to recompute the totals.");
    Ok(())
}

fn cmd_repair(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage("repair"));
    }
    let committed = context.ledger.rebuild_aggregates()?;
    context.report_persist(&committed);
    io::print_success("Totals recomputed from the transactions.");
    context.render_totals();
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let confirmed_by_flag = match args {
        [] => false,
        [flag] if flag.eq_ignore_ascii_case("--yes") => true,
        _ => return Err(usage("reset")),
    };

    if !confirmed_by_flag && context.is_interactive() {
        let prompt = format!(
            "Delete all {} transactions and zero every total?",
            context.ledger.len()
        );
        if !io::confirm_action(context.theme(), &prompt, false)? {
            io::print_info("Reset cancelled.");
            return Ok(());
        }
    }

    let committed = context.ledger.reset();
    context.report_persist(&committed);
    io::print_success("Ledger reset.");
    context.render_totals();
    Ok(())
}
