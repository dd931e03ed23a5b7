//! # Billing Rules
//!
//! Pure half of bill creation: totals and the order in which line items
//! acquire their stock locks. The transactional half lives in
//! `shelf_db::billing`.
//!
//! ## Totals
//! ```text
//! line_total_i = quantity_i × selling_price_i
//! net_amount   = Σ line_total_i
//! total_amount = net_amount - discount        (must be >= 0)
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::NewBillItem;
use crate::validation::{validate_bill_items, validate_customer_name, validate_non_negative};

/// Computed amounts of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillTotals {
    pub net_amount: Money,
    pub discount: Money,
    pub total_amount: Money,
}

impl BillTotals {
    /// Computes net and total amounts for the given lines.
    ///
    /// ## Errors
    /// - `DiscountExceedsNet` when the discount is larger than the net amount
    /// - `Validation` when an amount overflows
    pub fn compute(items: &[NewBillItem], discount: Money) -> CoreResult<Self> {
        let mut net_amount = Money::zero();
        for item in items {
            let line = line_total(item)?;
            net_amount = net_amount.checked_add(line).ok_or_else(overflow)?;
        }

        let total_amount = net_amount - discount;
        if total_amount.is_negative() {
            return Err(CoreError::DiscountExceedsNet {
                net: net_amount,
                discount,
            });
        }

        Ok(BillTotals {
            net_amount,
            discount,
            total_amount,
        })
    }
}

/// `quantity × selling_price` for a single line.
pub fn line_total(item: &NewBillItem) -> CoreResult<Money> {
    item.selling_price
        .checked_multiply_quantity(item.quantity)
        .ok_or_else(overflow)
}

fn overflow() -> CoreError {
    ValidationError::OutOfRange {
        field: "items".to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

/// Checks a bill request before any transaction is opened.
///
/// ## Rules
/// - at least one item (`EmptyBill`)
/// - every item passes quantity / price validation
/// - discount is not negative
/// - customer name fits the column
pub fn validate_new_bill(
    customer_name: Option<&str>,
    discount: Money,
    items: &[NewBillItem],
) -> CoreResult<()> {
    if items.is_empty() {
        return Err(CoreError::EmptyBill);
    }
    validate_bill_items(items)?;
    validate_non_negative("discount", discount)?;
    if let Some(name) = customer_name {
        validate_customer_name(name)?;
    }
    Ok(())
}

/// Order in which line items take their row locks.
///
/// Sorting by vendor-product id gives every transaction the same global
/// lock order, so two bills touching the same pair of products can never
/// wait on each other in a cycle. The sort is stable: repeated lines for
/// the same product keep their input order.
///
/// ## Example
/// ```rust
/// use shelf_core::billing::lock_order;
/// use shelf_core::{Money, NewBillItem};
///
/// let item = |id: &str| NewBillItem {
///     vendor_product_id: id.to_string(),
///     quantity: 1,
///     selling_price: Money::from_cents(100),
/// };
/// let items = vec![item("b"), item("a"), item("c")];
/// assert_eq!(lock_order(&items), vec![1, 0, 2]);
/// ```
pub fn lock_order(items: &[NewBillItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[a].vendor_product_id.cmp(&items[b].vendor_product_id));
    order
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: i64, price_cents: i64) -> NewBillItem {
        NewBillItem {
            vendor_product_id: id.to_string(),
            quantity,
            selling_price: Money::from_cents(price_cents),
        }
    }

    #[test]
    fn test_totals_without_discount() {
        let totals = BillTotals::compute(&[item("vp", 3, 5000)], Money::zero()).unwrap();
        assert_eq!(totals.net_amount.cents(), 15000);
        assert_eq!(totals.total_amount.cents(), 15000);
    }

    #[test]
    fn test_totals_with_discount_across_lines() {
        let items = vec![item("a", 2, 1250), item("b", 1, 999)];
        let totals = BillTotals::compute(&items, Money::from_cents(499)).unwrap();
        assert_eq!(totals.net_amount.cents(), 3499);
        assert_eq!(totals.total_amount.cents(), 3000);
        assert_eq!(
            totals.total_amount,
            totals.net_amount - totals.discount
        );
    }

    #[test]
    fn test_discount_equal_to_net_is_allowed() {
        let totals = BillTotals::compute(&[item("vp", 1, 500)], Money::from_cents(500)).unwrap();
        assert!(totals.total_amount.is_zero());
    }

    #[test]
    fn test_discount_exceeding_net_fails() {
        let err = BillTotals::compute(&[item("vp", 3, 50)], Money::from_cents(200)).unwrap_err();
        assert!(matches!(err, CoreError::DiscountExceedsNet { .. }));
    }

    #[test]
    fn test_overflow_is_rejected() {
        let err = BillTotals::compute(&[item("vp", 999, i64::MAX / 10)], Money::zero()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_validate_new_bill() {
        assert!(matches!(
            validate_new_bill(None, Money::zero(), &[]),
            Err(CoreError::EmptyBill)
        ));
        assert!(validate_new_bill(Some("Asha"), Money::zero(), &[item("vp", 1, 100)]).is_ok());
        assert!(validate_new_bill(None, Money::from_cents(-1), &[item("vp", 1, 100)]).is_err());
        assert!(validate_new_bill(None, Money::zero(), &[item("vp", 0, 100)]).is_err());
    }

    #[test]
    fn test_lock_order_is_sorted_and_stable() {
        let items = vec![item("c", 1, 1), item("a", 1, 1), item("c", 2, 1), item("b", 1, 1)];
        assert_eq!(lock_order(&items), vec![1, 3, 0, 2]);
    }
}
