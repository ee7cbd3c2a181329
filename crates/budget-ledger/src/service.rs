//! The `Budget` service trait consumed by command handlers.

use async_trait::async_trait;
use budget_ledger_core::{Transaction, TransactionType, User, UserId};
use budget_ledger_store::KvStore;

use crate::aggregate::MonthlyStats;
use crate::error::Result;
use crate::ledger::Ledger;

/// Budget operations, object-safe so handlers can hold `Arc<dyn Budget>`
/// without knowing the storage backend.
#[async_trait]
pub trait Budget: Send + Sync {
    async fn register_user(&self, user_id: UserId, username: &str) -> Result<User>;

    async fn add_transaction(
        &self,
        user_id: UserId,
        kind: TransactionType,
        amount: f64,
        description: &str,
    ) -> Result<Transaction>;

    async fn balance(&self) -> Result<f64>;

    async fn monthly_stats(&self) -> Result<MonthlyStats>;

    async fn monthly_expenses(&self) -> Result<f64>;

    async fn reset_balance(&self) -> Result<Option<Transaction>>;

    async fn set_balance(&self, user_id: UserId, target: f64) -> Result<Option<Transaction>>;
}

#[async_trait]
impl<S: KvStore + 'static> Budget for Ledger<S> {
    async fn register_user(&self, user_id: UserId, username: &str) -> Result<User> {
        Ledger::register_user(self, user_id, username).await
    }

    async fn add_transaction(
        &self,
        user_id: UserId,
        kind: TransactionType,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        Ledger::add_transaction(self, user_id, kind, amount, description).await
    }

    async fn balance(&self) -> Result<f64> {
        Ledger::balance(self).await
    }

    async fn monthly_stats(&self) -> Result<MonthlyStats> {
        Ledger::monthly_stats(self).await
    }

    async fn monthly_expenses(&self) -> Result<f64> {
        Ledger::monthly_expenses(self).await
    }

    async fn reset_balance(&self) -> Result<Option<Transaction>> {
        Ledger::reset_balance(self).await
    }

    async fn set_balance(&self, user_id: UserId, target: f64) -> Result<Option<Transaction>> {
        Ledger::set_balance(self, user_id, target).await
    }
}
