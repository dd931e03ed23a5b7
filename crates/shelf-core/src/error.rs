//! # Error Types
//!
//! Domain-specific error types for shelf-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shelf-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shelf-db errors (separate crate)                                      │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── ServiceError     - CoreError | DbError from engine operations     │
//! │                                                                         │
//! │  admin-api errors                                                      │
//! │  └── ApiError         - What the admin UI sees (status + field)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError → UI      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Categories
//! - **Validation** (client-correctable): everything except `NegativeStock`.
//!   Detected before commit, never causes partial persistence.
//! - **Integrity**: `NegativeStock`. Indicates a bug in the locking
//!   discipline; logged as an error, never silently corrected.

use thiserror::Error;

use crate::money::Money;
use crate::types::ReturnStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Vendor product id does not exist.
    #[error("Vendor product not found: {0}")]
    VendorProductNotFound(String),

    /// Requested quantity exceeds the current stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Bill line (qty: 5)
    ///      │
    ///      ▼
    /// Lock vendor product, stock = 2
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Sugar 1kg", available: 2, requested: 5 }
    ///      │
    ///      ▼
    /// Whole bill rolls back, UI shows the message on the items field
    /// ```
    #[error("Insufficient stock for product '{product}'. Available stock: {available}, requested: {requested}.")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A credit would have driven stock below zero.
    #[error("Stock for {vendor_product_id} would become negative: current {current}, change {delta}")]
    NegativeStock {
        vendor_product_id: String,
        current: i64,
        delta: i64,
    },

    /// Bill request without line items.
    #[error("At least one bill item is required.")]
    EmptyBill,

    /// Discount larger than the sum of line totals.
    #[error("Discount cannot exceed net amount (net {net}, discount {discount}).")]
    DiscountExceedsNet { net: Money, discount: Money },

    /// No bill carries this invoice number.
    #[error("Invalid invoice number: {0}")]
    InvoiceNotFound(String),

    /// The bill exists but the vendor product was never billed on it.
    #[error("Product {vendor_product_id} was not billed on invoice {invoice_no}")]
    LineItemNotFound {
        invoice_no: String,
        vendor_product_id: String,
    },

    /// Customer return larger than what is still returnable on the line.
    #[error("Return quantity {requested} exceeds returnable quantity (sold {sold}, already returned {already_returned})")]
    ReturnExceedsSold {
        sold: i64,
        already_returned: i64,
        requested: i64,
    },

    /// Refund larger than what the customer paid for the returned units.
    #[error("Refund amount {requested} exceeds {max} paid for the returned units")]
    RefundExceedsLine { max: Money, requested: Money },

    /// Return record does not exist.
    #[error("Return not found: {0}")]
    ReturnNotFound(String),

    /// Resolving a return that is already in a terminal state.
    #[error("Return is already {from:?}, cannot transition")]
    InvalidReturnTransition { from: ReturnStatus },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Request field the error is reported against.
    ///
    /// The admin UI renders field-scoped messages next to the offending
    /// input, so every client-correctable error names one.
    pub fn field(&self) -> Option<&str> {
        match self {
            CoreError::VendorProductNotFound(_) => Some("vendor_product_id"),
            CoreError::InsufficientStock { .. } | CoreError::EmptyBill => Some("items"),
            CoreError::DiscountExceedsNet { .. } => Some("discount"),
            CoreError::InvoiceNotFound(_) => Some("invoice_num"),
            CoreError::LineItemNotFound { .. } => Some("vendor_product_id"),
            CoreError::ReturnExceedsSold { .. } => Some("return_qty"),
            CoreError::RefundExceedsLine { .. } => Some("refund_amount"),
            CoreError::InvalidReturnTransition { .. } => Some("status"),
            CoreError::Validation(e) => Some(e.field()),
            CoreError::NegativeStock { .. } | CoreError::ReturnNotFound(_) => None,
        }
    }

    /// True for errors that indicate a broken invariant rather than bad input.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, CoreError::NegativeStock { .. })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any transaction is opened.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid invoice number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Selling price must be strictly above cost.
    #[error("Selling price cannot be less than or equal to cost price.")]
    PriceNotAboveCost,
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::PriceNotAboveCost => "price",
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_product() {
        let err = CoreError::InsufficientStock {
            product: "Sugar 1kg".to_string(),
            available: 2,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 'Sugar 1kg'. Available stock: 2, requested: 5."
        );
        assert_eq!(err.field(), Some("items"));
    }

    #[test]
    fn test_field_scoping() {
        let err = CoreError::DiscountExceedsNet {
            net: Money::from_cents(15000),
            discount: Money::from_cents(20000),
        };
        assert_eq!(err.field(), Some("discount"));

        let err: CoreError = ValidationError::MustBePositive {
            field: "return_qty".to_string(),
        }
        .into();
        assert_eq!(err.field(), Some("return_qty"));
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_only_negative_stock_is_integrity_failure() {
        let integrity = CoreError::NegativeStock {
            vendor_product_id: "vp".to_string(),
            current: 1,
            delta: -2,
        };
        assert!(integrity.is_integrity_failure());
        assert!(!CoreError::EmptyBill.is_integrity_failure());
    }
}
