//! Compensating adjustments: reset to zero and move to a target balance.
//!
//! History is never rewritten. Both operations append at most one entry
//! that moves the balance, computed and written inside the same atomic
//! transaction so no concurrent append can land in between.

use budget_ledger_core::{validate_target, NewTransaction, Transaction, UserId};
use budget_ledger_store::KvStore;
use tracing::info;

use crate::aggregate::{balance_of, scan_transactions};
use crate::error::{LedgerError, Result};
use crate::ledger::{append_in, Ledger};

impl<S: KvStore + 'static> Ledger<S> {
    /// Bring the balance to exactly zero.
    ///
    /// Appends one entry for the negated balance, attributed to the
    /// configured system user. Returns `None` if the balance was already 0.
    pub async fn reset_balance(&self) -> Result<Option<Transaction>> {
        self.blocking(|ledger| {
            let user_id = ledger.config().system_user_id;
            let description = ledger.config().reset_description.clone();
            let adjusted = adjust(ledger, user_id, description, |current| -current)?;

            if let Some((previous, entry)) = &adjusted {
                info!(
                    id = %entry.id,
                    previous_balance = previous,
                    kind = %entry.kind,
                    amount = entry.amount,
                    "balance reset"
                );
            }
            Ok(adjusted.map(|(_, entry)| entry))
        })
        .await
    }

    /// Move the balance toward `target` with a single adjustment entry by
    /// `user_id`. The entry's amount is `target - balance`.
    ///
    /// The resulting balance is `balance + (target - balance)` in f64, which
    /// can differ from `target` in the last bits when neither value is exactly
    /// representable. Calling again with the same target then appends another
    /// tiny correction. Returns `None` if the balance already equals `target`.
    pub async fn set_balance(&self, user_id: UserId, target: f64) -> Result<Option<Transaction>> {
        validate_target(target).map_err(LedgerError::InvalidAmount)?;

        self.blocking(move |ledger| {
            let description = ledger.config().adjustment_description.clone();
            let adjusted = adjust(ledger, user_id, description, |current| target - current)?;

            if let Some((previous, entry)) = &adjusted {
                info!(
                    id = %entry.id,
                    user = %user_id,
                    previous_balance = previous,
                    target,
                    kind = %entry.kind,
                    amount = entry.amount,
                    "balance adjusted"
                );
            }
            Ok(adjusted.map(|(_, entry)| entry))
        })
        .await
    }
}

/// Scan, compute the delta from the current balance, and append the
/// adjustment, all in one `update`. Yields the prior balance with the entry.
fn adjust<S: KvStore + 'static>(
    ledger: &Ledger<S>,
    user_id: UserId,
    description: String,
    delta: impl FnOnce(f64) -> f64,
) -> Result<Option<(f64, Transaction)>> {
    let now = ledger.now();
    ledger.store().update(|txn| -> Result<_> {
        let current = balance_of(&scan_transactions(&*txn)?);
        let entry = NewTransaction::adjustment(user_id, delta(current), description)
            .map_err(LedgerError::InvalidAmount)?;

        match entry {
            Some(entry) => append_in(txn, entry, now).map(|t| Some((current, t))),
            None => Ok(None),
        }
    })
}
