//! # Stock Arithmetic
//!
//! The non-negativity rule for `VendorProduct.stock`, shared by both stock
//! ledger operations. The database layer calls [`apply_delta`] after it has
//! locked the row and before it writes the new value.

use crate::error::{CoreError, CoreResult};

/// Returns `current + delta`, refusing any result below zero.
///
/// ## Example
/// ```rust
/// use shelf_core::stock::apply_delta;
///
/// assert_eq!(apply_delta("vp-1", 10, -3).unwrap(), 7);
/// assert!(apply_delta("vp-1", 2, -5).is_err());
/// ```
pub fn apply_delta(vendor_product_id: &str, current: i64, delta: i64) -> CoreResult<i64> {
    match current.checked_add(delta) {
        Some(next) if next >= 0 => Ok(next),
        _ => Err(CoreError::NegativeStock {
            vendor_product_id: vendor_product_id.to_string(),
            current,
            delta,
        }),
    }
}
