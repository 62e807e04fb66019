//! Read-only projections of ledger state for tables and charts.

use std::collections::BTreeMap;

use rust_decimal::{prelude::ToPrimitive, Decimal};
use spendwise_domain::{Amounted, MonthKey};

use crate::Ledger;

/// Income, expenses, and the difference between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// Expense total for one category, with its share of the charted total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub category: String,
    pub amount: Decimal,
    /// Fraction of the charted total, between 0 and 1.
    pub share: f64,
}

/// One bar of the monthly expense chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyBar {
    pub month: MonthKey,
    pub amount: Decimal,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(ledger: &Ledger) -> Totals {
        Totals {
            income: ledger.total_income(),
            expenses: ledger.total_expenses(),
            balance: ledger.balance(),
        }
    }

    /// Sums expenses per category.
    ///
    /// With a non-empty `tracked` list only those categories are reported, in
    /// the given order and zero-filled; expenses in other categories are left
    /// out of the chart. With an empty list every expense category appears,
    /// largest first.
    pub fn category_breakdown(ledger: &Ledger, tracked: &[String]) -> Vec<CategorySlice> {
        let mut sums: BTreeMap<String, Decimal> = BTreeMap::new();
        for txn in ledger.transactions().iter().filter(|txn| txn.is_expense()) {
            *sums.entry(txn.category.clone()).or_insert(Decimal::ZERO) += txn.amount();
        }

        let rows: Vec<(String, Decimal)> = if tracked.is_empty() {
            let mut all: Vec<_> = sums.into_iter().collect();
            all.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            all
        } else {
            tracked
                .iter()
                .map(|name| {
                    let key = name.trim().to_lowercase();
                    let amount = sums.get(&key).copied().unwrap_or(Decimal::ZERO);
                    (key, amount)
                })
                .collect()
        };

        let total: Decimal = rows.iter().map(|(_, amount)| *amount).sum();
        rows.into_iter()
            .map(|(category, amount)| CategorySlice {
                share: if total > Decimal::ZERO {
                    (amount / total).to_f64().unwrap_or(0.0)
                } else {
                    0.0
                },
                category,
                amount,
            })
            .collect()
    }

    /// Monthly expense rollups in calendar order.
    pub fn monthly_series(ledger: &Ledger) -> Vec<MonthlyBar> {
        ledger
            .monthly_expenses()
            .iter()
            .map(|(month, amount)| MonthlyBar {
                month: *month,
                amount: *amount,
            })
            .collect()
    }
}
