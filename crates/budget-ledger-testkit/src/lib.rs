//! # Budget Ledger Testkit
//!
//! Testing utilities for the budget ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Counter encodings and records written by the earlier bot
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Ledgers over memory or temporary SQLite with a fixed clock
//!
//! ## Golden Vectors
//!
//! ```rust
//! use budget_ledger_testkit::vectors::verify_record_vectors;
//!
//! for (name, ok) in verify_record_vectors() {
//!     assert!(ok, "{name}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use budget_ledger_testkit::generators::NewTransactionParams;
//!
//! proptest! {
//!     #[test]
//!     fn params_validate(params: NewTransactionParams) {
//!         prop_assert!(params.to_new_transaction().is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use budget_ledger_testkit::{LedgerFixture, NewTransactionParams};
//! use budget_ledger::UserId;
//!
//! let fixture = LedgerFixture::memory();
//! fixture.append(&NewTransactionParams::income(UserId(1), 1000.0, "Salary")).await?;
//! fixture.set_date(2024, 12, 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{fixture_start, init_test_tracing, LedgerFixture};
pub use generators::NewTransactionParams;
pub use vectors::{counter_vectors, record_vectors, verify_counter_vectors, verify_record_vectors};
