//! Strong type definitions for the budget ledger.
//!
//! Identifiers are newtypes so a user ID can never be passed where a
//! transaction ID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable external identifier of a ledger participant (e.g. a chat user ID).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Attribution used for entries the ledger writes on its own behalf.
    pub const SYSTEM: Self = Self(0);

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Position of a transaction in the ledger.
///
/// IDs start at 1 and are allocated gaplessly; 0 means "no transaction yet"
/// and only ever appears as the value of the last-ID counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Counter value of an empty ledger.
    pub const NONE: Self = Self(0);

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The ID following this one, or `None` when the counter is exhausted.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TransactionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
