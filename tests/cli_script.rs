mod common;

use std::fs;

use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use serde_json::Value;

use common::{read_store, script_command, store_path, store_string, test_home};

const SALARY: &str = "add income Salary salary 50000 2024-03-01\n";
const LUNCH: &str = "add expense Lunch food 250 2024-03-15\n";

fn run(home: &std::path::Path, script: &str) -> String {
    let output = script_command(home)
        .write_stdin(script.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).expect("utf-8 output")
}

fn totals_lines(stdout: &str) -> Vec<(String, String, String)> {
    let pattern =
        Regex::new(r"INFO: Income ₹([\d.]+) \| Expenses ₹([\d.]+) \| Balance ₹(-?[\d.]+)")
            .unwrap();
    pattern
        .captures_iter(stdout)
        .map(|caps| (caps[1].to_string(), caps[2].to_string(), caps[3].to_string()))
        .collect()
}

#[test]
fn script_mode_records_income_and_expense() {
    let home = test_home();
    let stdout = run(&home, &format!("{SALARY}{LUNCH}summary\nexit\n"));

    assert!(stdout.contains("Recorded Income `Salary` [salary] on 2024-03-01 (₹50000.00)."));
    assert!(stdout.contains("INFO: Total income   : ₹50000.00"));
    assert!(stdout.contains("INFO: Total expenses : ₹250.00"));
    assert!(stdout.contains("INFO: Balance        : ₹49750.00"));

    let totals = totals_lines(&stdout);
    assert_eq!(
        totals,
        vec![
            ("50000.00".into(), "0.00".into(), "50000.00".into()),
            ("50000.00".into(), "250.00".into(), "49750.00".into()),
        ]
    );
}

#[test]
fn persisted_store_uses_the_four_ledger_keys() {
    let home = test_home();
    run(&home, &format!("{SALARY}{LUNCH}"));

    let store = read_store(&home, "default");
    let mut keys: Vec<_> = store.keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["monthlyExpenses", "totalExpenses", "totalIncome", "transactions"]
    );
    assert_eq!(store_string(&home, "totalIncome"), "50000");
    assert_eq!(store_string(&home, "totalExpenses"), "250");

    let monthly: Value = serde_json::from_str(&store_string(&home, "monthlyExpenses")).unwrap();
    assert_eq!(monthly["March"].as_f64(), Some(250.0));

    let transactions: Value = serde_json::from_str(&store_string(&home, "transactions")).unwrap();
    let entries = transactions.as_array().expect("transaction array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["type"], "expense");
    assert_eq!(entries[1]["category"], "food");
    assert_eq!(entries[1]["date"], "2024-03-15");
}

#[test]
fn state_survives_a_restart() {
    let home = test_home();
    run(&home, &format!("{SALARY}{LUNCH}"));

    script_command(&home)
        .write_stdin("list\nsummary\n")
        .assert()
        .success()
        .stdout(contains("Salary"))
        .stdout(contains("Lunch"))
        .stdout(contains("INFO: Balance        : ₹49750.00"));
}

#[test]
fn delete_reverses_the_expense() {
    let home = test_home();
    let stdout = run(&home, &format!("{SALARY}{LUNCH}delete 2\n"));

    assert!(stdout.contains("Deleted Expense `Lunch` [food] on 2024-03-15."));
    let last = totals_lines(&stdout).pop().expect("totals line");
    assert_eq!(last, ("50000.00".into(), "0.00".into(), "50000.00".into()));

    let monthly: Value = serde_json::from_str(&store_string(&home, "monthlyExpenses")).unwrap();
    assert_eq!(monthly["March"].as_f64(), Some(0.0));
}

#[test]
fn edit_moves_an_expense_between_months() {
    let home = test_home();
    let stdout = run(&home, &format!("{LUNCH}edit 1 amount=300 date=2024-04-02\n"));

    assert!(stdout.contains("Updated Expense `Lunch` [food] on 2024-04-02 (₹300.00)."));
    let monthly: Value = serde_json::from_str(&store_string(&home, "monthlyExpenses")).unwrap();
    assert_eq!(monthly["March"].as_f64(), Some(0.0));
    assert_eq!(monthly["April"].as_f64(), Some(300.0));
    assert_eq!(store_string(&home, "totalExpenses"), "300");
}

#[test]
fn failed_edit_prints_a_restore_command() {
    let home = test_home();
    let stdout = run(
        &home,
        "add expense 'Team lunch' food 250 2024-03-15\nedit 1 amount=-5\nlist\n",
    );

    assert!(stdout.contains("add expense 'Team lunch' food 250 2024-03-15"));
    assert!(stdout.contains("Please fill all fields correctly with valid values"));
    assert!(stdout.contains("No transactions recorded."));
}

#[test]
fn invalid_input_changes_nothing() {
    let home = test_home();
    let stdout = run(
        &home,
        &format!("{LUNCH}add expense Taxi transport abc 2024-03-16\nadd expense Taxi transport 0 2024-03-16\ndelete 9\n"),
    );

    assert_eq!(
        stdout
            .matches("Please fill all fields correctly with valid values")
            .count(),
        2
    );
    assert!(stdout.contains("No transaction at row 9; the ledger has 1."));
    assert_eq!(store_string(&home, "totalExpenses"), "250");
}

#[test]
fn reset_clears_the_store() {
    let home = test_home();
    let stdout = run(&home, &format!("{SALARY}{LUNCH}reset\nlist\n"));

    assert!(stdout.contains("SUCCESS: Ledger reset."));
    assert!(stdout.contains("No transactions recorded."));
    assert!(!store_path(&home, "default").exists());
}

#[test]
fn chart_lists_tracked_categories_and_months() {
    let home = test_home();
    script_command(&home)
        .write_stdin(format!("{LUNCH}add expense Flat rent 1000 2024-04-01\nchart\n"))
        .assert()
        .success()
        .stdout(contains("=== Expenses by category ==="))
        .stdout(contains("Food"))
        .stdout(contains("Transportation"))
        .stdout(contains("March"))
        .stdout(contains("April"))
        .stdout(contains("₹1000.00"));
}

#[test]
fn check_and_repair_fix_tampered_totals() {
    let home = test_home();
    run(&home, LUNCH);

    let path = store_path(&home, "default");
    let mut store = read_store(&home, "default");
    store.insert("totalExpenses".into(), Value::String("999".into()));
    fs::write(&path, serde_json::to_string(&store).unwrap()).unwrap();

    let stdout = run(&home, "check\nrepair\ncheck\n");
    assert!(stdout.contains("total expenses is 999 but transactions sum to 250"));
    assert!(stdout.contains("Stored totals match the transactions."));
    assert_eq!(store_string(&home, "totalExpenses"), "250");
}

#[test]
fn config_changes_currency_and_profile() {
    let home = test_home();
    let stdout = run(
        &home,
        &format!("{LUNCH}config set currency $\nconfig set profile travel\nsummary\n"),
    );

    assert!(stdout.contains("Set profile = travel."));
    assert!(stdout.contains("INFO: Total expenses : $0.00"));
    assert!(home.join("config.json").exists());
    assert!(store_path(&home, "default").exists());

    script_command(&home)
        .write_stdin("config show\n")
        .assert()
        .success()
        .stdout(contains("profile     : travel"))
        .stdout(contains("currency    : $"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = test_home();
    script_command(&home)
        .write_stdin("lsit\nhelp edit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `lsit`"))
        .stdout(contains("Suggestion: `list`?"))
        .stdout(contains("Usage: edit <row>"));
}

#[test]
fn exit_stops_reading_the_script() {
    let home = test_home();
    script_command(&home)
        .write_stdin(format!("exit\n{LUNCH}"))
        .assert()
        .success()
        .stdout(contains("Recorded").not());
    assert!(!store_path(&home, "default").exists());
}

#[test]
fn deleting_fractional_expenses_returns_totals_to_exact_zero() {
    let home = test_home();
    let stdout = run(
        &home,
        "add expense Gum food 0.1 2024-03-15\nadd expense Tea food 0.7 2024-03-16\ndelete 2\ndelete 1\n",
    );

    let last = totals_lines(&stdout).pop().expect("totals line");
    assert_eq!(last, ("0.00".into(), "0.00".into(), "0.00".into()));
    assert!(!stdout.contains("-0.00"));
    assert_eq!(store_string(&home, "totalExpenses"), "0");

    let monthly: Value = serde_json::from_str(&store_string(&home, "monthlyExpenses")).unwrap();
    assert_eq!(monthly["March"].as_f64(), Some(0.0));
}

#[test]
fn failed_profile_switch_keeps_the_open_store() {
    let home = test_home();
    run(&home, LUNCH);
    fs::write(
        store_path(&home, "broken"),
        r#"{"totalExpenses": "not a number"}"#,
    )
    .unwrap();

    let stdout = run(&home, "config set profile broken\nconfig show\nlist\n");
    assert!(stdout.contains("Stored value for `totalExpenses` is corrupt"));
    assert!(!stdout.contains("Set profile = broken."));
    assert!(stdout.contains("profile     : default"));
    let default_store = store_path(&home, "default");
    assert!(stdout.contains(&format!("store       : {}", default_store.display())));
    assert!(stdout.contains("Lunch"));
}
