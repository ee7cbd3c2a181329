//! Error types for the Ledger.

use budget_ledger_core::CoreError;
use budget_ledger_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Storage error. Any failure here aborts the whole operation.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A stored record could not be decoded.
    #[error("malformed record at {key}: {source}")]
    MalformedRecord {
        key: String,
        #[source]
        source: CoreError,
    },

    /// Amount or target rejected before touching the store.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[source] CoreError),

    /// The transaction ID counter reached `u64::MAX`.
    #[error("transaction id counter exhausted")]
    CounterExhausted,

    /// A record could not be encoded for storage.
    #[error("encoding error: {0}")]
    Encoding(#[source] CoreError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A blocking store task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Blocking(String),
}

impl LedgerError {
    pub(crate) fn malformed(key: &[u8], source: CoreError) -> Self {
        Self::MalformedRecord {
            key: String::from_utf8_lossy(key).into_owned(),
            source,
        }
    }
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
