//! # Returns Rules
//!
//! Status machine and bounds for vendor and customer returns.
//!
//! ## Status Machine
//! ```text
//!              resolve(Resolved)
//!   Pending ───────────────────────► Resolved   (terminal)
//!      │
//!      │       resolve(Rejected)
//!      └───────────────────────────► Rejected   (terminal)
//! ```
//!
//! ## Customer Return Bound
//! A customer may return at most what was sold on the bill line, minus
//! what earlier (non-rejected) returns against that line already took back.
//! Current warehouse stock plays no part in this check.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{BillItem, ReturnOutcome, ReturnStatus};

impl ReturnStatus {
    /// True for `Resolved` and `Rejected`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReturnStatus::Pending)
    }

    /// Applies a resolution outcome.
    ///
    /// ## Errors
    /// `InvalidReturnTransition` when the return already left `Pending`.
    pub fn transition(self, outcome: ReturnOutcome) -> CoreResult<ReturnStatus> {
        if self.is_terminal() {
            return Err(CoreError::InvalidReturnTransition { from: self });
        }
        Ok(match outcome {
            ReturnOutcome::Resolved => ReturnStatus::Resolved,
            ReturnOutcome::Rejected => ReturnStatus::Rejected,
        })
    }
}

/// Checks a customer return against the quantity still returnable on the
/// bill line.
pub fn check_returnable(sold: i64, already_returned: i64, requested: i64) -> CoreResult<()> {
    if requested > sold - already_returned {
        return Err(CoreError::ReturnExceedsSold {
            sold,
            already_returned,
            requested,
        });
    }
    Ok(())
}

/// Checks a refund against what the customer paid for the returned units.
///
/// `lines` are every line of the bill for the returned product. When the
/// product was billed at several prices the bound assumes the dearest
/// units come back first.
///
/// ## Errors
/// - `RefundExceedsLine` when the refund is above the bound
/// - `Validation` when the bound overflows
pub fn check_refund(lines: &[BillItem], return_qty: i64, refund: Money) -> CoreResult<()> {
    let mut by_price: Vec<&BillItem> = lines.iter().collect();
    by_price.sort_by(|a, b| b.selling_price_cents.cmp(&a.selling_price_cents));

    let mut remaining = return_qty;
    let mut max = Money::zero();
    for line in by_price {
        if remaining <= 0 {
            break;
        }
        let taken = remaining.min(line.quantity);
        let paid = line
            .selling_price()
            .checked_multiply_quantity(taken)
            .ok_or_else(refund_overflow)?;
        max = max.checked_add(paid).ok_or_else(refund_overflow)?;
        remaining -= taken;
    }

    if refund > max {
        return Err(CoreError::RefundExceedsLine {
            max,
            requested: refund,
        });
    }
    Ok(())
}

fn refund_overflow() -> CoreError {
    ValidationError::OutOfRange {
        field: "refund_amount".to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================
