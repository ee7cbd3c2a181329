//! Balance and monthly aggregates, computed by full scan.
//!
//! Scans decode every record under the `transaction:` prefix and fold them
//! in ascending ID order. Key order is lexicographic ("transaction:10"
//! sorts before "transaction:2"), so records are re-sorted before folding;
//! that keeps f64 totals bit-identical across repeated scans.

use budget_ledger_core::{
    decode_transaction, parse_transaction_key, CoreError, Transaction, YearMonth,
    TRANSACTION_PREFIX,
};
use budget_ledger_store::{KvStore, ReadTxn};
use serde::Serialize;
use tracing::warn;

use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;

/// Income, expenses, and net result for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub period: YearMonth,
    pub income: f64,
    pub expenses: f64,
    /// `income - expenses`.
    pub balance: f64,
}

impl MonthlyStats {
    /// Totals over the transactions created during `period`.
    pub fn collect(period: YearMonth, transactions: &[Transaction]) -> Self {
        let mut income = 0.0;
        let mut expenses = 0.0;
        for t in transactions.iter().filter(|t| period.contains(t.created_at)) {
            if t.is_income() {
                income += t.amount;
            } else {
                expenses += t.amount;
            }
        }
        Self {
            period,
            income,
            expenses,
            balance: income - expenses,
        }
    }
}

/// Net sum of signed amounts, folded in slice order.
pub fn balance_of(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .fold(0.0, |balance, t| balance + t.signed_amount())
}

/// Decode every transaction record visible to `txn`, ordered by ID.
///
/// The first malformed record aborts the scan.
pub fn scan_transactions<T: ReadTxn + ?Sized>(txn: &T) -> Result<Vec<Transaction>> {
    let entries = txn.scan_prefix(TRANSACTION_PREFIX.as_bytes())?;

    let mut transactions = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let transaction = decode_entry(&key, &value).map_err(|source| {
            let err = LedgerError::malformed(&key, source);
            warn!(error = %err, "aborting scan on malformed record");
            err
        })?;
        transactions.push(transaction);
    }

    transactions.sort_by_key(|t| t.id);
    Ok(transactions)
}

fn decode_entry(key: &[u8], value: &[u8]) -> std::result::Result<Transaction, CoreError> {
    let id = parse_transaction_key(key)?;
    let transaction = decode_transaction(value)?;
    if transaction.id != id {
        return Err(CoreError::InvalidKey(format!(
            "key names transaction {id} but record carries {}",
            transaction.id
        )));
    }
    Ok(transaction)
}

impl<S: KvStore + 'static> Ledger<S> {
    /// Net balance over the whole ledger, from one snapshot.
    pub async fn balance(&self) -> Result<f64> {
        self.blocking(|ledger| {
            let transactions = ledger.store().view(|txn| scan_transactions(txn))?;
            Ok(balance_of(&transactions))
        })
        .await
    }

    /// Income, expenses, and net for the current UTC month.
    pub async fn monthly_stats(&self) -> Result<MonthlyStats> {
        self.blocking(|ledger| {
            let period = YearMonth::of(ledger.now());
            let transactions = ledger.store().view(|txn| scan_transactions(txn))?;
            Ok(MonthlyStats::collect(period, &transactions))
        })
        .await
    }

    /// Expense total for the current UTC month.
    pub async fn monthly_expenses(&self) -> Result<f64> {
        self.monthly_stats().await.map(|stats| stats.expenses)
    }
}
