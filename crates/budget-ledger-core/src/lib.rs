//! # Budget Ledger Core
//!
//! Pure record types for the budget ledger: identifiers, users,
//! transactions, and the byte layout they are stored in.
//!
//! This crate contains no I/O and no storage. It is plain data plus the
//! codecs that turn it into keys and values.
//!
//! ## Key Types
//!
//! - [`Transaction`] - An immutable ledger entry
//! - [`NewTransaction`] - A validated append request (no ID or timestamp yet)
//! - [`User`] - A registered participant
//! - [`TransactionId`] / [`UserId`] - Identifier newtypes
//! - [`YearMonth`] - UTC calendar month for monthly statistics
//!
//! ## Storage Layout
//!
//! See the [`codec`] module for the key layout and value formats.

pub mod codec;
pub mod error;
pub mod period;
pub mod record;
pub mod types;
pub mod validation;

pub use codec::{
    decode_counter, decode_transaction, decode_user, encode_counter, encode_transaction,
    encode_user, parse_transaction_key, transaction_key, user_key, LAST_TRANSACTION_ID_KEY,
    TRANSACTION_PREFIX, USER_PREFIX,
};
pub use error::{CoreError, Result};
pub use period::YearMonth;
pub use record::{NewTransaction, Transaction, TransactionType, User};
pub use types::{TransactionId, UserId};
pub use validation::{validate_amount, validate_target};
