//! spendwise-domain
//!
//! Pure domain models (Transaction, TransactionDraft, MonthKey).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod month;
pub mod transaction;

pub use common::*;
pub use month::*;
pub use transaction::*;
