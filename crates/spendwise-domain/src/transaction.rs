//! Domain models for recorded income and expense events.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Enumerates the direction of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction type `{other}`")),
        }
    }
}

/// One recorded financial event.
///
/// Persisted as `{id, type, title, category, amount, date}`. Records written
/// before identifiers existed receive a fresh id when loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub title: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl Transaction {
    /// Creates a transaction with a new identifier. The category is lower-cased.
    pub fn new(
        kind: TransactionKind,
        title: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            category: category.into().to_lowercase(),
            amount,
            date,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Returns the editable field set, dropping the identifier.
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            title: self.title.clone(),
            category: self.category.clone(),
            amount: self.amount,
            date: self.date,
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{} `{}` [{}] on {}", self.kind, self.title, self.category, self.date)
    }
}

/// The form-level field set of a transaction, without identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub title: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        title: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            category: category.into(),
            amount,
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn march_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn new_lowercases_category() {
        let txn = Transaction::new(TransactionKind::Expense, "Lunch", "Food", dec!(250), march_15());
        assert_eq!(txn.category, "food");
        assert!(txn.is_expense());
    }

    #[test]
    fn serializes_with_type_field_and_iso_date() {
        let txn = Transaction::new(TransactionKind::Income, "Salary", "salary", dec!(500.5), march_15());
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["date"], "2024-03-15");
        assert_eq!(value["amount"], 500.5);
        assert_eq!(value["id"], txn.id.to_string());
    }

    #[test]
    fn legacy_records_without_id_receive_one() {
        let raw = r#"{"type":"expense","title":"Bus","category":"transportation","amount":40,"date":"2024-01-02"}"#;
        let txn: Transaction = serde_json::from_str(raw).unwrap();
        assert!(!txn.id.is_nil());
        assert_eq!(txn.kind, TransactionKind::Expense);
        assert_eq!(txn.amount, dec!(40));
    }

    #[test]
    fn draft_round_trip_keeps_fields() {
        let txn = Transaction::new(TransactionKind::Expense, "Rent", "rent", dec!(9000), march_15());
        let draft = txn.to_draft();
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.title, "Rent");
        assert_eq!(draft.category, "rent");
        assert_eq!(draft.amount, dec!(9000));
        assert_eq!(draft.date, march_15());
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Expense".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
