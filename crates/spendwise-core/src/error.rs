use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("No transaction at row {index} (ledger has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid month value `{0}`")]
    InvalidMonth(String),
    #[error("Stored value for `{key}` is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
