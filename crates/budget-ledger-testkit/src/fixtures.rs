//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use budget_ledger::{FixedClock, Ledger, LedgerConfig, Result};
use budget_ledger_core::{encode_counter, Transaction, LAST_TRANSACTION_ID_KEY};
use budget_ledger_store::{KvStore, MemoryStore, SqliteStore, StoreError};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use crate::generators::NewTransactionParams;

/// Time every fixture starts at: mid-month, so appends land in November 2024.
pub fn fixture_start() -> DateTime<Utc> {
    Utc.timestamp_opt(1_731_672_000, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A ledger with a controllable clock.
///
/// SQLite fixtures own their temporary directory, which is removed on drop.
pub struct LedgerFixture<S> {
    pub ledger: Ledger<S>,
    pub clock: Arc<FixedClock>,
    _dir: Option<TempDir>,
}

impl LedgerFixture<MemoryStore> {
    /// Ledger over an in-memory store.
    pub fn memory() -> Self {
        Self::memory_with(LedgerConfig::default())
    }

    pub fn memory_with(config: LedgerConfig) -> Self {
        let clock = Arc::new(FixedClock::new(fixture_start()));
        Self {
            ledger: Ledger::with_clock(MemoryStore::new(), config, clock.clone()),
            clock,
            _dir: None,
        }
    }
}

impl LedgerFixture<SqliteStore> {
    /// Ledger over a SQLite file in a fresh temporary directory.
    pub fn sqlite() -> Result<Self> {
        let dir = tempfile::tempdir().map_err(StoreError::from)?;
        let mut config = LedgerConfig::default();
        config.storage.path = dir.path().join("budget.db");

        let store = SqliteStore::open_with(&config.storage.path, &config.storage.sqlite_options())?;
        let clock = Arc::new(FixedClock::new(fixture_start()));
        Ok(Self {
            ledger: Ledger::with_clock(store, config, clock.clone()),
            clock,
            _dir: Some(dir),
        })
    }
}

impl<S: KvStore + 'static> LedgerFixture<S> {
    /// Move the clock to midday on the given UTC date.
    pub fn set_date(&self, year: i32, month: u32, day: u32) {
        if let Some(at) = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single() {
            self.clock.set(at);
        }
    }

    /// Append one transaction described by `params`.
    pub async fn append(&self, params: &NewTransactionParams) -> Result<Transaction> {
        self.ledger
            .add_transaction(params.user_id, params.kind, params.amount, &params.description)
            .await
    }

    /// Append each entry in order.
    pub async fn append_all(&self, params: &[NewTransactionParams]) -> Result<Vec<Transaction>> {
        let mut appended = Vec::with_capacity(params.len());
        for p in params {
            appended.push(self.append(p).await?);
        }
        Ok(appended)
    }

    /// Write raw bytes under `key`, bypassing the ledger.
    pub fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.ledger
            .store()
            .update(|txn| -> std::result::Result<(), StoreError> { txn.set(key, value) })?;
        Ok(())
    }

    /// Overwrite the ID counter.
    pub fn set_counter(&self, value: u64) -> Result<()> {
        self.put_raw(LAST_TRANSACTION_ID_KEY.as_bytes(), &encode_counter(value))
    }
}

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use budget_ledger::YearMonth;
    use budget_ledger_core::{TransactionId, TransactionType, UserId};

    #[test]
    fn test_fixture_start_is_november() {
        assert_eq!(
            YearMonth::of(fixture_start()),
            YearMonth { year: 2024, month: 11 }
        );
    }

    #[tokio::test]
    async fn test_memory_fixture_appends() {
        let fixture = LedgerFixture::memory();
        let appended = fixture
            .append_all(&[
                NewTransactionParams::income(UserId(1), 10.0, "a"),
                NewTransactionParams::expense(UserId(2), 4.0, "b"),
            ])
            .await
            .unwrap();

        assert_eq!(appended[1].id, TransactionId(2));
        assert_eq!(appended[1].kind, TransactionType::Expense);
        assert_eq!(appended[0].created_at, fixture_start());
        assert_eq!(fixture.ledger.balance().await.unwrap(), 6.0);
    }

    #[tokio::test]
    async fn test_sqlite_fixture_counter_override() {
        let fixture = LedgerFixture::sqlite().unwrap();
        fixture.set_counter(41).unwrap();

        let t = fixture
            .append(&NewTransactionParams::income(UserId(1), 1.0, "x"))
            .await
            .unwrap();
        assert_eq!(t.id, TransactionId(42));
    }
}
