//! Ledger records: users and transactions.
//!
//! A transaction is immutable once written. Corrections are represented as
//! new transactions, never as edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::types::{TransactionId, UserId};
use crate::validation::validate_amount;

/// Direction of a transaction. The stored amount is always positive; the
/// sign is implied by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Apply this type's sign to a positive amount.
    pub fn sign(self, amount: f64) -> f64 {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered ledger participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    /// Refreshed on every registration call.
    pub registered_at: DateTime<Utc>,
}

/// A committed ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always finite and greater than zero.
    pub amount: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// The amount with the type's sign applied: positive for income,
    /// negative for expense.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// A validated request to append a transaction.
///
/// Holds everything except the ID and timestamp, which are assigned at
/// commit time inside the allocating transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    user_id: UserId,
    kind: TransactionType,
    amount: f64,
    description: String,
}

impl NewTransaction {
    /// Validate and build an append request.
    pub fn new(
        user_id: UserId,
        kind: TransactionType,
        amount: f64,
        description: impl Into<String>,
    ) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            user_id,
            kind,
            amount,
            description: description.into(),
        })
    }

    /// Build the entry that moves a balance by `delta`, or `None` if `delta`
    /// is zero. Positive deltas become income, negative deltas expense.
    pub fn adjustment(
        user_id: UserId,
        delta: f64,
        description: impl Into<String>,
    ) -> Result<Option<Self>> {
        if delta == 0.0 {
            return Ok(None);
        }
        let kind = if delta > 0.0 {
            TransactionType::Income
        } else {
            TransactionType::Expense
        };
        Self::new(user_id, kind, delta.abs(), description).map(Some)
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Seal the request into a record with its allocated ID and timestamp.
    pub fn into_transaction(self, id: TransactionId, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            user_id: self.user_id,
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::TimeZone;

    #[test]
    fn test_signed_amount() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let income = NewTransaction::new(UserId(1), TransactionType::Income, 1000.0, "Salary")
            .unwrap()
            .into_transaction(TransactionId(1), at);
        let expense = NewTransaction::new(UserId(1), TransactionType::Expense, 150.5, "Groceries")
            .unwrap()
            .into_transaction(TransactionId(2), at);

        assert_eq!(income.signed_amount(), 1000.0);
        assert_eq!(expense.signed_amount(), -150.5);
        assert!(income.is_income());
        assert!(expense.is_expense());
    }

    #[test]
    fn test_new_transaction_rejects_bad_amounts() {
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = NewTransaction::new(UserId(1), TransactionType::Expense, amount, "x");
            assert!(matches!(err, Err(CoreError::InvalidAmount(_))));
        }
    }

    #[test]
    fn test_adjustment_direction() {
        let up = NewTransaction::adjustment(UserId(2), 25.0, "adj").unwrap().unwrap();
        assert_eq!(up.kind(), TransactionType::Income);
        assert_eq!(up.amount(), 25.0);

        let down = NewTransaction::adjustment(UserId(2), -40.25, "adj").unwrap().unwrap();
        assert_eq!(down.kind(), TransactionType::Expense);
        assert_eq!(down.amount(), 40.25);

        assert!(NewTransaction::adjustment(UserId(2), 0.0, "adj").unwrap().is_none());
    }

    #[test]
    fn test_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionType::Income).unwrap(),
            "\"income\""
        );
        assert!(serde_json::from_str::<TransactionType>("\"refund\"").is_err());
    }
}
