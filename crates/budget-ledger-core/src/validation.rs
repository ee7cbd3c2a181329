//! Input validation for ledger entries.

use crate::error::{CoreError, Result};

/// Check that an amount can be stored in the ledger.
///
/// Amounts are unsigned magnitudes: the transaction type carries the sign.
/// NaN and infinities are rejected so that sums stay finite.
pub fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidAmount(amount))
    }
}

/// Check that a balance target is a usable number.
pub fn validate_target(target: f64) -> Result<()> {
    if target.is_finite() {
        Ok(())
    } else {
        Err(CoreError::InvalidAmount(target))
    }
}
