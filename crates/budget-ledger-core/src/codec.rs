//! Storage encoding: key layout and value codecs.
//!
//! Keys are UTF-8 strings, values are bytes:
//!
//! | Key                   | Value                                   |
//! |-----------------------|-----------------------------------------|
//! | `user:{user_id}`      | JSON [`User`]                           |
//! | `transaction:{id}`    | JSON [`Transaction`]                    |
//! | `last_transaction_id` | 8-byte little-endian unsigned counter   |
//!
//! Record values are JSON so that stores written by earlier versions of the
//! bot stay readable. Timestamps are RFC 3339; any offset is accepted on
//! decode and normalized to UTC.

use crate::error::{CoreError, Result};
use crate::record::{Transaction, User};
use crate::types::{TransactionId, UserId};

/// Prefix shared by all transaction records.
pub const TRANSACTION_PREFIX: &str = "transaction:";

/// Prefix shared by all user records.
pub const USER_PREFIX: &str = "user:";

/// Key of the last-allocated transaction ID counter.
pub const LAST_TRANSACTION_ID_KEY: &str = "last_transaction_id";

/// Width of the encoded counter.
pub const COUNTER_LEN: usize = 8;

pub fn user_key(user_id: UserId) -> Vec<u8> {
    format!("{USER_PREFIX}{user_id}").into_bytes()
}

pub fn transaction_key(id: TransactionId) -> Vec<u8> {
    format!("{TRANSACTION_PREFIX}{id}").into_bytes()
}

/// Recover the transaction ID from a `transaction:{id}` key.
pub fn parse_transaction_key(key: &[u8]) -> Result<TransactionId> {
    let invalid = || CoreError::InvalidKey(String::from_utf8_lossy(key).into_owned());

    let key = std::str::from_utf8(key).map_err(|_| invalid())?;
    let digits = key.strip_prefix(TRANSACTION_PREFIX).ok_or_else(invalid)?;
    // Reject forms like "+7" or "007" that u64::from_str would accept.
    if digits.is_empty() || digits.starts_with(['+', '0']) {
        return Err(invalid());
    }
    digits.parse::<u64>().map(TransactionId).map_err(|_| invalid())
}

/// Encode the counter as 8 little-endian bytes (byte i = (value >> 8i) & 0xFF).
pub fn encode_counter(value: u64) -> [u8; COUNTER_LEN] {
    value.to_le_bytes()
}

/// Decode an 8-byte little-endian counter.
pub fn decode_counter(bytes: &[u8]) -> Result<u64> {
    let arr: [u8; COUNTER_LEN] = bytes
        .try_into()
        .map_err(|_| CoreError::InvalidCounter { len: bytes.len() })?;
    Ok(u64::from_le_bytes(arr))
}

pub fn encode_user(user: &User) -> Result<Vec<u8>> {
    serde_json::to_vec(user).map_err(|e| CoreError::Encoding(e.to_string()))
}

pub fn decode_user(bytes: &[u8]) -> Result<User> {
    serde_json::from_slice(bytes).map_err(|e| CoreError::Decoding(e.to_string()))
}

pub fn encode_transaction(transaction: &Transaction) -> Result<Vec<u8>> {
    serde_json::to_vec(transaction).map_err(|e| CoreError::Encoding(e.to_string()))
}

/// Decode a transaction record.
///
/// Amounts that are not finite and positive are rejected here as well, so a
/// record that slipped past validation can never enter a total.
pub fn decode_transaction(bytes: &[u8]) -> Result<Transaction> {
    let transaction: Transaction =
        serde_json::from_slice(bytes).map_err(|e| CoreError::Decoding(e.to_string()))?;
    crate::validation::validate_amount(transaction.amount)?;
    Ok(transaction)
}
