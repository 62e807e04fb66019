use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use crate::CoreError;

/// Key under which the transaction list is stored.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key under which the running income total is stored.
pub const TOTAL_INCOME_KEY: &str = "totalIncome";
/// Key under which the running expense total is stored.
pub const TOTAL_EXPENSES_KEY: &str = "totalExpenses";
/// Key under which the month-name → expense map is stored.
pub const MONTHLY_EXPENSES_KEY: &str = "monthlyExpenses";

/// Every key the ledger owns in a store.
pub const LEDGER_KEYS: [&str; 4] = [
    TRANSACTIONS_KEY,
    TOTAL_INCOME_KEY,
    TOTAL_EXPENSES_KEY,
    MONTHLY_EXPENSES_KEY,
];

/// Durable, synchronous string key-value storage the ledger persists into.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    /// Erases every key in the store.
    fn clear(&self) -> Result<(), CoreError>;

    /// Writes several entries. Backends with a single underlying document
    /// override this to commit them in one write.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), CoreError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
///
/// Clones share the same entries, so a test can hand one clone to a ledger
/// and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    writes: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` and `clear` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// When enabled, every write fails with a storage error (reads still work).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CoreError::Storage("storage quota exceeded".into()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.check_writable()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.check_writable()?;
        self.lock()?.clear();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
