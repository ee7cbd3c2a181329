//! Proptest generators for property-based testing.

use proptest::prelude::*;

use budget_ledger_core::{NewTransaction, TransactionType, UserId};

/// A valid amount: finite and greater than zero.
///
/// Mostly cent-denominated values, with some arbitrary fractions mixed in.
pub fn amount() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => (1u64..=10_000_000u64).prop_map(|cents| cents as f64 / 100.0),
        1 => 1e-6f64..1e9f64,
    ]
}

/// Generate a TransactionType.
pub fn transaction_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Income), Just(TransactionType::Expense)]
}

pub fn user_id() -> impl Strategy<Value = UserId> {
    any::<i64>().prop_map(UserId)
}

/// Free-text description, including non-ASCII.
pub fn description() -> impl Strategy<Value = String> {
    "\\PC{0,40}".prop_map(String::from)
}

/// Parameters for one `add_transaction` call.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionParams {
    pub user_id: UserId,
    pub kind: TransactionType,
    pub amount: f64,
    pub description: String,
}

impl NewTransactionParams {
    pub fn income(user_id: UserId, amount: f64, description: &str) -> Self {
        Self {
            user_id,
            kind: TransactionType::Income,
            amount,
            description: description.to_string(),
        }
    }

    pub fn expense(user_id: UserId, amount: f64, description: &str) -> Self {
        Self {
            user_id,
            kind: TransactionType::Expense,
            amount,
            description: description.to_string(),
        }
    }

    /// The amount with the type's sign applied.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign(self.amount)
    }

    pub fn to_new_transaction(&self) -> budget_ledger_core::Result<NewTransaction> {
        NewTransaction::new(self.user_id, self.kind, self.amount, self.description.clone())
    }
}

impl Arbitrary for NewTransactionParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (user_id(), transaction_type(), amount(), description())
            .prop_map(|(user_id, kind, amount, description)| NewTransactionParams {
                user_id,
                kind,
                amount,
                description,
            })
            .boxed()
    }
}

/// A batch of appends, small enough for async property tests.
pub fn batch(max_len: usize) -> impl Strategy<Value = Vec<NewTransactionParams>> {
    prop::collection::vec(any::<NewTransactionParams>(), 0..=max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_generated_params_always_validate(params: NewTransactionParams) {
            let entry = params.to_new_transaction().unwrap();
            prop_assert_eq!(entry.amount(), params.amount);
            prop_assert_eq!(entry.kind(), params.kind);
        }

        #[test]
        fn test_signed_amount_follows_type(params: NewTransactionParams) {
            let signed = params.signed_amount();
            match params.kind {
                TransactionType::Income => prop_assert!(signed > 0.0),
                TransactionType::Expense => prop_assert!(signed < 0.0),
            }
        }
    }
}
