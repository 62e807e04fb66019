//! The ledger: transaction list plus the aggregates derived from it.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::de::DeserializeOwned;
use spendwise_domain::{
    Amounted, Displayable, Identifiable, MonthKey, Transaction, TransactionDraft, TransactionKind,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    storage::{
        KeyValueStore, MONTHLY_EXPENSES_KEY, TOTAL_EXPENSES_KEY, TOTAL_INCOME_KEY,
        TRANSACTIONS_KEY,
    },
    CoreError,
};

/// Result of a mutation that was applied in memory.
///
/// `persist_error` is set when the follow-up store write failed. The
/// in-memory state stays authoritative for the rest of the session.
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub persist_error: Option<CoreError>,
}

impl<T> Committed<T> {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Committed<U> {
        Committed {
            value: f(self.value),
            persist_error: self.persist_error,
        }
    }
}

/// Totals and monthly rollups, either maintained or recomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub monthly_expenses: BTreeMap<MonthKey, Decimal>,
}

impl Aggregates {
    /// Recomputes every aggregate from scratch.
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self, CoreError> {
        let mut aggregates = Aggregates::default();
        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => aggregates.total_income += txn.amount(),
                TransactionKind::Expense => {
                    aggregates.total_expenses += txn.amount();
                    let month = month_key(txn.date)?;
                    *aggregates
                        .monthly_expenses
                        .entry(month)
                        .or_insert(Decimal::ZERO) += txn.amount();
                }
            }
        }
        Ok(aggregates)
    }
}

/// Derives the monthly rollup bucket for `date`.
///
/// The label comes from chrono's `%B` formatting, which is English and does
/// not depend on the process locale. A label that is not purely alphabetic
/// is an internal error.
pub fn month_key(date: NaiveDate) -> Result<MonthKey, CoreError> {
    let label = date.format("%B").to_string();
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::InvalidMonth(label));
    }
    MonthKey::from_label(&label).ok_or(CoreError::InvalidMonth(label))
}

/// Owns the transaction list, the running totals, and the monthly rollups,
/// and writes all four through to the injected store after each mutation.
pub struct Ledger {
    transactions: Vec<Transaction>,
    total_income: Decimal,
    total_expenses: Decimal,
    monthly_expenses: BTreeMap<MonthKey, Decimal>,
    store: Box<dyn KeyValueStore>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("transactions", &self.transactions.len())
            .field("total_income", &self.total_income)
            .field("total_expenses", &self.total_expenses)
            .field("monthly_expenses", &self.monthly_expenses)
            .finish()
    }
}

impl Ledger {
    /// Creates an empty ledger without reading the store.
    pub fn empty(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            transactions: Vec::new(),
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            monthly_expenses: BTreeMap::new(),
            store,
        }
    }

    /// Loads ledger state from the store. Absent keys fall back to an empty
    /// list, zero totals, and an empty monthly map. A stored transaction that
    /// would fail validation makes the store corrupt.
    pub fn load(store: Box<dyn KeyValueStore>) -> Result<Self, CoreError> {
        let transactions: Vec<Transaction> =
            read_json(store.as_ref(), TRANSACTIONS_KEY)?.unwrap_or_default();
        for (position, txn) in transactions.iter().enumerate() {
            validate(&txn.to_draft()).map_err(|err| CoreError::Corrupt {
                key: TRANSACTIONS_KEY.to_string(),
                reason: format!("entry {position}: {err}"),
            })?;
        }
        let total_income =
            read_number(store.as_ref(), TOTAL_INCOME_KEY)?.unwrap_or(Decimal::ZERO);
        let total_expenses =
            read_number(store.as_ref(), TOTAL_EXPENSES_KEY)?.unwrap_or(Decimal::ZERO);
        let monthly_expenses: BTreeMap<MonthKey, Decimal> =
            read_json(store.as_ref(), MONTHLY_EXPENSES_KEY)?.unwrap_or_default();

        info!(
            transactions = transactions.len(),
            months = monthly_expenses.len(),
            "ledger loaded"
        );

        Ok(Self {
            transactions,
            total_income,
            total_expenses,
            monthly_expenses,
            store,
        })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id() == id)
    }

    pub fn total_income(&self) -> Decimal {
        self.total_income
    }

    pub fn total_expenses(&self) -> Decimal {
        self.total_expenses
    }

    pub fn balance(&self) -> Decimal {
        (self.total_income - self.total_expenses).normalize()
    }

    pub fn monthly_expenses(&self) -> &BTreeMap<MonthKey, Decimal> {
        &self.monthly_expenses
    }

    pub fn aggregates(&self) -> Aggregates {
        Aggregates {
            total_income: self.total_income,
            total_expenses: self.total_expenses,
            monthly_expenses: self.monthly_expenses.clone(),
        }
    }

    /// Translates a 0-based display position into a stable identifier.
    pub fn id_at(&self, index: usize) -> Result<Uuid, CoreError> {
        self.transactions
            .get(index)
            .map(Identifiable::id)
            .ok_or(CoreError::IndexOutOfRange {
                index,
                len: self.transactions.len(),
            })
    }

    pub fn add(
        &mut self,
        kind: TransactionKind,
        title: &str,
        category: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<Committed<Transaction>, CoreError> {
        self.add_draft(TransactionDraft::new(kind, title, category, amount, date))
    }

    /// Validates and appends a transaction, folds it into the aggregates, and
    /// persists. Nothing changes and nothing is written if validation or month
    /// derivation fails.
    pub fn add_draft(&mut self, draft: TransactionDraft) -> Result<Committed<Transaction>, CoreError> {
        validate(&draft)?;
        let month = match draft.kind {
            TransactionKind::Expense => Some(month_key(draft.date)?),
            TransactionKind::Income => None,
        };

        let txn = Transaction::new(
            draft.kind,
            draft.title.trim(),
            draft.category.trim(),
            draft.amount,
            draft.date,
        );
        match month {
            Some(month) => {
                self.total_expenses += txn.amount();
                self.fold_month(month, txn.amount());
            }
            None => self.total_income += txn.amount(),
        }
        self.transactions.push(txn.clone());
        debug!(id = %txn.id, "added {}", txn.display_label());

        Ok(self.commit(txn))
    }

    /// Reverses a transaction's contribution to the aggregates and deletes it.
    pub fn remove(&mut self, id: Uuid) -> Result<Committed<Transaction>, CoreError> {
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id() == id)
            .ok_or(CoreError::TransactionNotFound(id))?;
        let month = if self.transactions[index].is_expense() {
            Some(month_key(self.transactions[index].date)?)
        } else {
            None
        };

        let txn = self.transactions.remove(index);
        match month {
            Some(month) => {
                self.total_expenses -= txn.amount();
                self.fold_month(month, -txn.amount());
            }
            None => self.total_income -= txn.amount(),
        }
        debug!(id = %txn.id, "removed {}", txn.display_label());

        Ok(self.commit(txn))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Committed<Transaction>, CoreError> {
        let id = self.id_at(index)?;
        self.remove(id)
    }

    /// Takes a transaction out for editing: returns its fields and removes it.
    ///
    /// There is no in-place update. The caller re-adds the (possibly changed)
    /// draft with [`Ledger::add_draft`]; a draft that is never re-added is gone.
    pub fn edit(&mut self, id: Uuid) -> Result<Committed<TransactionDraft>, CoreError> {
        Ok(self.remove(id)?.map(|txn| txn.to_draft()))
    }

    pub fn edit_at(&mut self, index: usize) -> Result<Committed<TransactionDraft>, CoreError> {
        let id = self.id_at(index)?;
        self.edit(id)
    }

    /// Clears all state and erases the store. Always succeeds in memory.
    pub fn reset(&mut self) -> Committed<()> {
        self.transactions.clear();
        self.total_income = Decimal::ZERO;
        self.total_expenses = Decimal::ZERO;
        self.monthly_expenses.clear();

        let persist_error = self.store.clear().err();
        match &persist_error {
            Some(err) => warn!(error = %err, "ledger reset in memory only"),
            None => info!("ledger reset"),
        }
        Committed {
            value: (),
            persist_error,
        }
    }

    /// Lists every place where the maintained aggregates disagree with a
    /// recomputation from the transaction list.
    pub fn consistency_warnings(&self) -> Result<Vec<String>, CoreError> {
        let expected = Aggregates::from_transactions(&self.transactions)?;
        let mut warnings = Vec::new();

        if self.total_income != expected.total_income {
            warnings.push(format!(
                "total income is {} but transactions sum to {}",
                self.total_income, expected.total_income
            ));
        }
        if self.total_expenses != expected.total_expenses {
            warnings.push(format!(
                "total expenses is {} but transactions sum to {}",
                self.total_expenses, expected.total_expenses
            ));
        }

        let months = self
            .monthly_expenses
            .keys()
            .chain(expected.monthly_expenses.keys())
            .copied()
            .collect::<std::collections::BTreeSet<_>>();
        for month in months {
            let stored = self.monthly_expenses.get(&month).copied().unwrap_or_default();
            let actual = expected.monthly_expenses.get(&month).copied().unwrap_or_default();
            if stored != actual {
                warnings.push(format!(
                    "{month} expenses is {stored} but transactions sum to {actual}"
                ));
            }
        }
        Ok(warnings)
    }

    /// Replaces the aggregates with a recomputation and persists them.
    pub fn rebuild_aggregates(&mut self) -> Result<Committed<()>, CoreError> {
        let rebuilt = Aggregates::from_transactions(&self.transactions)?;
        self.total_income = rebuilt.total_income;
        self.total_expenses = rebuilt.total_expenses;
        self.monthly_expenses = rebuilt.monthly_expenses;
        info!("ledger aggregates rebuilt");
        Ok(self.commit(()))
    }

    /// Writes all four keys to the store.
    pub fn persist(&self) -> Result<(), CoreError> {
        let entries = [
            (TRANSACTIONS_KEY, serde_json::to_string(&self.transactions)?),
            (TOTAL_INCOME_KEY, self.total_income.normalize().to_string()),
            (TOTAL_EXPENSES_KEY, self.total_expenses.normalize().to_string()),
            (
                MONTHLY_EXPENSES_KEY,
                serde_json::to_string(&self.monthly_expenses)?,
            ),
        ];
        self.store.set_many(&entries)
    }

    fn commit<T>(&self, value: T) -> Committed<T> {
        let persist_error = self.persist().err();
        if let Some(err) = &persist_error {
            warn!(error = %err, "ledger change kept in memory only");
        }
        Committed {
            value,
            persist_error,
        }
    }

    fn fold_month(&mut self, month: MonthKey, delta: Decimal) {
        let bucket = self.monthly_expenses.entry(month).or_insert(Decimal::ZERO);
        let next = *bucket + delta;
        if next < Decimal::ZERO {
            warn!(%month, unclamped = %next, "monthly expenses clamped to zero");
        }
        *bucket = next.max(Decimal::ZERO).normalize();
    }
}

fn validate(draft: &TransactionDraft) -> Result<(), CoreError> {
    if draft.title.trim().is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if draft.category.trim().is_empty() {
        return Err(CoreError::Validation("category is required".into()));
    }
    if draft.amount <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "amount must be a positive number, got {}",
            draft.amount
        )));
    }
    Ok(())
}

fn read_raw(store: &dyn KeyValueStore, key: &str) -> Result<Option<String>, CoreError> {
    Ok(store
        .get(key)?
        .filter(|value| !value.trim().is_empty()))
}

fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, CoreError> {
    match read_raw(store, key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| CoreError::Corrupt {
                key: key.to_string(),
                reason: err.to_string(),
            }),
        None => Ok(None),
    }
}

/// Reads a total stored as decimal text. Scientific notation written by
/// older float-based stores is accepted too.
fn read_number(store: &dyn KeyValueStore, key: &str) -> Result<Option<Decimal>, CoreError> {
    let Some(raw) = read_raw(store, key)? else {
        return Ok(None);
    };
    let text = raw.trim();
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
        .or_else(|| text.parse::<f64>().ok().and_then(Decimal::from_f64))
        .map(|value| Some(value.normalize()))
        .ok_or_else(|| CoreError::Corrupt {
            key: key.to_string(),
            reason: format!("`{raw}` is not a number"),
        })
}
