//! Error types for the budget ledger core.

use thiserror::Error;

/// Errors raised while encoding, decoding, or validating ledger records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("invalid counter: expected 8 bytes, got {len}")]
    InvalidCounter { len: usize },

    #[error("invalid amount: {0} (must be finite and greater than zero)")]
    InvalidAmount(f64),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
