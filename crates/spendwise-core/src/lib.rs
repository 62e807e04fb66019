//! spendwise-core
//!
//! Ledger state, aggregate bookkeeping, and read-only summaries.
//! Depends on spendwise-domain. Persistence goes through the injected
//! [`storage::KeyValueStore`]; no CLI, no terminal I/O.

pub mod error;
pub mod ledger;
pub mod storage;
pub mod summary_service;


pub use error::CoreError;
pub use ledger::*;
pub use storage::{KeyValueStore, MemoryStore};
pub use summary_service::*;
