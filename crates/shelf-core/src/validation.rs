//! # Validation Module
//!
//! Input validation for bills, returns and catalog records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: admin-api (Rust)                                             │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Discriminator → ReturnRequest variant                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - field rules, before any transaction opens      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engines in shelf-db - rules that need locked state           │
//! │  ├── stock availability, invoice / line lookups, returnable qty        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), UNIQUE invoice_no, UNIQUE vendor codes        │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::NewBillItem;
use crate::{MAX_BILL_ITEMS, MAX_CUSTOMER_NAME_LEN, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a free-text return reason.
const MAX_REASON_LEN: usize = 1000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a business code (product code or vendor code).
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_code;
///
/// assert!(validate_code("vendor_code", "SUG-1KG").is_ok());
/// assert!(validate_code("vendor_code", "").is_err());
/// assert!(validate_code("vendor_code", "has space").is_err());
/// ```
pub fn validate_code(field: &str, code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if code.len() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (product, vendor, category).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 255 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 255,
        });
    }

    Ok(())
}

/// Validates the optional customer name on a bill or return.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    if name.trim().len() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer_name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates the optional free-text reason on a return.
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    if reason.len() > MAX_REASON_LEN {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: MAX_REASON_LEN,
        });
    }
    Ok(())
}

/// Validates an invoice number as typed into the returns form.
///
/// Only presence is checked here. Any other value is looked up, so an
/// unknown or oddly shaped number reports `InvoiceNotFound`.
pub fn validate_invoice_number(invoice_no: &str) -> ValidationResult<()> {
    if invoice_no.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "invoice_num".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates that a monetary amount is zero or more.
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_non_negative;
/// use shelf_core::Money;
///
/// assert!(validate_non_negative("discount", Money::zero()).is_ok());
/// assert!(validate_non_negative("discount", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Enforces `price > cost` on catalog writes. Not applied at sale time.
pub fn validate_price_over_cost(price: Money, cost: Money) -> ValidationResult<()> {
    validate_non_negative("cost", cost)?;
    if price <= cost {
        return Err(ValidationError::PriceNotAboveCost);
    }
    Ok(())
}

/// Validates the initial stock of a catalog entry.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the line items of a bill request.
///
/// ## Rules
/// - At most MAX_BILL_ITEMS (100) lines
/// - Every line has a vendor product id, a valid quantity and a
///   non-negative selling price
pub fn validate_bill_items(items: &[NewBillItem]) -> ValidationResult<()> {
    if items.len() > MAX_BILL_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_BILL_ITEMS as i64,
        });
    }

    for item in items {
        if item.vendor_product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "vendor_product_id".to_string(),
            });
        }
        validate_quantity("quantity", item.quantity)?;
        validate_non_negative("selling_price", item.selling_price)?;
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_uuid;
///
/// assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert!(validate_code("code", "SUG-1KG").is_ok());
        assert!(validate_code("code", "rice_5").is_ok());
        assert!(validate_code("code", "   ").is_err());
        assert!(validate_code("code", &"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("quantity", 1).is_ok());
        assert!(validate_quantity("quantity", 999).is_ok());
        assert!(validate_quantity("quantity", 0).is_err());
        assert!(validate_quantity("quantity", -1).is_err());
        assert!(validate_quantity("quantity", 1000).is_err());
    }

    #[test]
    fn test_validate_price_over_cost() {
        assert!(validate_price_over_cost(Money::from_cents(5000), Money::from_cents(4000)).is_ok());
        assert!(matches!(
            validate_price_over_cost(Money::from_cents(4000), Money::from_cents(4000)),
            Err(ValidationError::PriceNotAboveCost)
        ));
        assert!(validate_price_over_cost(Money::from_cents(100), Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_bill_items() {
        let line = |id: &str, qty: i64, price: i64| NewBillItem {
            vendor_product_id: id.to_string(),
            quantity: qty,
            selling_price: Money::from_cents(price),
        };
        assert!(validate_bill_items(&[line("vp", 1, 0)]).is_ok());
        assert!(validate_bill_items(&[line("", 1, 100)]).is_err());
        assert!(validate_bill_items(&[line("vp", 1, -100)]).is_err());

        let too_many: Vec<_> = (0..=MAX_BILL_ITEMS).map(|_| line("vp", 1, 1)).collect();
        assert!(validate_bill_items(&too_many).is_err());
    }

    #[test]
    fn test_validate_invoice_number() {
        assert!(validate_invoice_number("INV00012").is_ok());
        assert!(validate_invoice_number("BILL-42").is_ok());
        assert!(validate_invoice_number("").is_err());
        assert!(validate_invoice_number("   ").is_err());
    }

    #[test]
    fn test_validate_customer_name_and_reason() {
        assert!(validate_customer_name("Asha Rao").is_ok());
        assert!(validate_customer_name(&"x".repeat(151)).is_err());
        assert!(validate_reason("damaged seal").is_ok());
        assert!(validate_reason(&"x".repeat(1001)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "123").is_err());
    }
}
