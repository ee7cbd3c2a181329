//! # Budget Ledger Store
//!
//! Storage abstraction for the budget ledger: an ordered key-value space
//! accessed only through atomic transactions.
//!
//! ## Overview
//!
//! The [`KvStore`] trait keeps the ledger storage-agnostic. The primary
//! implementation is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`KvStore`] - `update` (atomic read-write) and `view` (snapshot) entry points
//! - [`ReadTxn`] / [`WriteTxn`] - Operations available inside a transaction
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use budget_ledger_store::{KvStore, SqliteStore, StoreError};
//!
//! let store = SqliteStore::open("budget.db").unwrap();
//!
//! store
//!     .update(|txn| -> Result<(), StoreError> {
//!         txn.set(b"user:1", b"{}")?;
//!         txn.set(b"user:2", b"{}")
//!     })
//!     .unwrap();
//!
//! let users = store.view(|txn| txn.scan_prefix(b"user:")).unwrap();
//! assert_eq!(users.len(), 2);
//! ```
//!
//! ## Design Notes
//!
//! - **No bare writes**: `set` only exists on a [`WriteTxn`]
//! - **All-or-nothing**: an `update` closure that returns `Err` leaves no trace
//! - **Serialized writers**: a value read inside `update` is stable until commit
//! - **Snapshot reads**: `view` is unaffected by writers committing meanwhile

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::{SqliteOptions, SqliteStore};
pub use traits::{prefix_upper_bound, Entry, KvStore, ReadTxn, WriteTxn};
