//! The Ledger: append-only transaction log over a transactional store.
//!
//! Every mutation runs inside one [`KvStore::update`], so the ID counter and
//! the record it names always commit together. Store calls are synchronous
//! and are moved onto the blocking pool by the async methods.

use std::sync::Arc;

use budget_ledger_core::{
    decode_counter, decode_transaction, decode_user, encode_counter, encode_transaction,
    encode_user, transaction_key, user_key, NewTransaction, Transaction, TransactionId,
    TransactionType, User, UserId, LAST_TRANSACTION_ID_KEY,
};
use budget_ledger_store::{KvStore, ReadTxn, WriteTxn};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::aggregate::scan_transactions;
use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};

/// The main Ledger struct.
///
/// Cheap to clone: clones share the same store, configuration, and clock.
pub struct Ledger<S> {
    store: Arc<S>,
    config: Arc<LedgerConfig>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for Ledger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: KvStore + 'static> Ledger<S> {
    /// Create a ledger over `store` using wall-clock time.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create a ledger with an explicit time source.
    pub fn with_clock(store: S, config: LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            clock,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Run a synchronous store operation on the blocking pool.
    pub(crate) async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ledger = self.clone();
        tokio::task::spawn_blocking(move || f(&ledger))
            .await
            .map_err(|e| LedgerError::Blocking(e.to_string()))?
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a user, or refresh an existing registration.
    ///
    /// Last write wins; `registered_at` is always set to now.
    pub async fn register_user(&self, user_id: UserId, username: &str) -> Result<User> {
        let username = username.to_owned();
        self.blocking(move |ledger| {
            let user = User {
                user_id,
                username,
                registered_at: ledger.now(),
            };
            let value = encode_user(&user).map_err(LedgerError::Encoding)?;
            ledger
                .store
                .update(|txn| -> Result<()> { Ok(txn.set(&user_key(user_id), &value)?) })?;

            debug!(user = %user.user_id, username = %user.username, "registered user");
            Ok(user)
        })
        .await
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        self.blocking(move |ledger| {
            let key = user_key(user_id);
            let bytes = ledger.store.view(|txn| -> Result<_> { Ok(txn.get(&key)?) })?;
            bytes
                .map(|b| decode_user(&b).map_err(|e| LedgerError::malformed(&key, e)))
                .transpose()
        })
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a transaction and return the stored record.
    ///
    /// The amount is validated before the store is touched. ID allocation,
    /// the record write, and the counter write share one atomic transaction.
    pub async fn add_transaction(
        &self,
        user_id: UserId,
        kind: TransactionType,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        let entry = NewTransaction::new(user_id, kind, amount, description)
            .map_err(LedgerError::InvalidAmount)?;

        self.blocking(move |ledger| {
            let transaction = ledger
                .store
                .update(|txn| append_in(txn, entry, ledger.now()))?;

            debug!(
                id = %transaction.id,
                user = %transaction.user_id,
                kind = %transaction.kind,
                amount = transaction.amount,
                "appended transaction"
            );
            Ok(transaction)
        })
        .await
    }

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        self.blocking(move |ledger| {
            let key = transaction_key(id);
            let bytes = ledger.store.view(|txn| -> Result<_> { Ok(txn.get(&key)?) })?;
            bytes
                .map(|b| decode_transaction(&b).map_err(|e| LedgerError::malformed(&key, e)))
                .transpose()
        })
        .await
    }

    /// Every transaction in the ledger, ordered by ID, from one snapshot.
    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.blocking(|ledger| ledger.store.view(|txn| scan_transactions(txn)))
            .await
    }

    /// The most recently allocated ID, or [`TransactionId::NONE`] for an
    /// empty ledger.
    pub async fn last_transaction_id(&self) -> Result<TransactionId> {
        self.blocking(|ledger| ledger.store.view(|txn| read_last_id(txn)))
            .await
    }
}

/// Read the ID counter. A missing counter means no transaction yet.
pub(crate) fn read_last_id<T: ReadTxn + ?Sized>(txn: &T) -> Result<TransactionId> {
    let key = LAST_TRANSACTION_ID_KEY.as_bytes();
    match txn.get(key)? {
        None => Ok(TransactionId::NONE),
        Some(bytes) => decode_counter(&bytes)
            .map(TransactionId)
            .map_err(|e| LedgerError::malformed(key, e)),
    }
}

/// Allocate the next ID and write `entry` under it, within `txn`.
pub(crate) fn append_in(
    txn: &mut dyn WriteTxn,
    entry: NewTransaction,
    now: DateTime<Utc>,
) -> Result<Transaction> {
    let id = read_last_id(&*txn)?
        .next()
        .ok_or(LedgerError::CounterExhausted)?;

    let transaction = entry.into_transaction(id, now);
    let value = encode_transaction(&transaction).map_err(LedgerError::Encoding)?;

    txn.set(&transaction_key(id), &value)?;
    txn.set(LAST_TRANSACTION_ID_KEY.as_bytes(), &encode_counter(id.get()))?;

    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use budget_ledger_store::{MemoryStore, StoreError};
    use chrono::{Duration, TimeZone};

    fn ledger() -> (Ledger<MemoryStore>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        ));
        let ledger = Ledger::with_clock(MemoryStore::new(), LedgerConfig::default(), clock.clone());
        (ledger, clock)
    }

    #[tokio::test]
    async fn test_register_user_refreshes_timestamp() {
        let (ledger, clock) = ledger();

        let first = ledger.register_user(UserId(10), "alice").await.unwrap();
        clock.advance(Duration::days(3));
        let second = ledger.register_user(UserId(10), "alice_renamed").await.unwrap();

        assert!(second.registered_at > first.registered_at);
        let stored = ledger.get_user(UserId(10)).await.unwrap().unwrap();
        assert_eq!(stored, second);
        assert_eq!(ledger.get_user(UserId(11)).await.unwrap(), None);
        assert_eq!(ledger.store().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let (ledger, _) = ledger();
        assert_eq!(ledger.last_transaction_id().await.unwrap(), TransactionId::NONE);

        for expected in 1..=3u64 {
            let t = ledger
                .add_transaction(UserId(1), TransactionType::Expense, 10.0, "coffee")
                .await
                .unwrap();
            assert_eq!(t.id, TransactionId(expected));
        }

        assert_eq!(ledger.last_transaction_id().await.unwrap(), TransactionId(3));
        let second = ledger.get_transaction(TransactionId(2)).await.unwrap().unwrap();
        assert_eq!(second.description, "coffee");
        assert_eq!(second.created_at, Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        assert_eq!(ledger.get_transaction(TransactionId(4)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_amount_touches_nothing() {
        let (ledger, _) = ledger();

        for amount in [0.0, -5.0, f64::NAN, f64::NEG_INFINITY] {
            let result = ledger
                .add_transaction(UserId(1), TransactionType::Income, amount, "bad")
                .await;
            assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
        }
        assert!(ledger.store().is_empty());
    }

    #[tokio::test]
    async fn test_counter_exhaustion_writes_nothing() {
        let (ledger, _) = ledger();
        ledger
            .store()
            .update(|txn| -> std::result::Result<(), StoreError> {
                txn.set(LAST_TRANSACTION_ID_KEY.as_bytes(), &encode_counter(u64::MAX))
            })
            .unwrap();

        let result = ledger
            .add_transaction(UserId(1), TransactionType::Income, 1.0, "one too many")
            .await;
        assert!(matches!(result, Err(LedgerError::CounterExhausted)));
        assert_eq!(ledger.store().len(), 1);
        assert_eq!(
            ledger.last_transaction_id().await.unwrap(),
            TransactionId(u64::MAX)
        );
    }

    #[tokio::test]
    async fn test_transactions_are_ordered_by_id_not_key() {
        let (ledger, _) = ledger();
        for i in 1..=12 {
            ledger
                .add_transaction(UserId(1), TransactionType::Income, i as f64, "tick")
                .await
                .unwrap();
        }

        let ids: Vec<u64> = ledger
            .transactions()
            .await
            .unwrap()
            .iter()
            .map(|t| t.id.get())
            .collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_corrupt_counter_is_reported() {
        let (ledger, _) = ledger();
        ledger
            .store()
            .update(|txn| -> std::result::Result<(), StoreError> {
                txn.set(LAST_TRANSACTION_ID_KEY.as_bytes(), b"\x01\x02")
            })
            .unwrap();

        let result = ledger
            .add_transaction(UserId(1), TransactionType::Income, 1.0, "x")
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::MalformedRecord { ref key, .. }) if key == LAST_TRANSACTION_ID_KEY
        ));
    }
}
