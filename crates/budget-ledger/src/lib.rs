//! # Budget Ledger
//!
//! A shared budget: an append-only log of income and expense transactions
//! with a live balance, current-month statistics, and compensating resets.
//!
//! ## Overview
//!
//! - **Transactions**: Immutable. Never edited. Corrections are new entries.
//! - **IDs**: Allocated atomically with the record they name; gapless from 1.
//! - **Aggregates**: Computed by scanning one consistent snapshot.
//! - **Reset**: Appends a single adjustment that brings the balance to zero.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use budget_ledger::{LedgerConfig, TransactionType, UserId};
//!
//! async fn example() -> budget_ledger::Result<()> {
//!     let config = LedgerConfig::load(None)?;
//!     let ledger = budget_ledger::open(&config)?;
//!
//!     ledger.register_user(UserId(42), "alice").await?;
//!     ledger
//!         .add_transaction(UserId(42), TransactionType::Income, 1000.0, "Salary")
//!         .await?;
//!     ledger
//!         .add_transaction(UserId(42), TransactionType::Expense, 150.50, "Groceries")
//!         .await?;
//!
//!     assert_eq!(ledger.balance().await?, 849.50);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `budget_ledger::core` - Records, identifiers, and codecs
//! - `budget_ledger::store` - Storage abstraction, SQLite and in-memory backends

pub mod adjustment;
pub mod aggregate;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod service;

pub use budget_ledger_core as core;
pub use budget_ledger_store as store;

pub use aggregate::MonthlyStats;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{LedgerConfig, StorageConfig};
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use service::Budget;

pub use budget_ledger_core::{Transaction, TransactionId, TransactionType, User, UserId, YearMonth};

use budget_ledger_store::{SqliteStore, StoreError};

/// Open the SQLite-backed ledger described by `config`.
///
/// Parent directories of the database file are created as needed.
pub fn open(config: &LedgerConfig) -> Result<Ledger<SqliteStore>> {
    let path = &config.storage.path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(StoreError::from)?;
    }

    let store = SqliteStore::open_with(path, &config.storage.sqlite_options())?;
    tracing::debug!(path = %path.display(), "opened ledger");
    Ok(Ledger::new(store, config.clone()))
}
