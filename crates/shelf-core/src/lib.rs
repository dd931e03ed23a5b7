//! # shelf-core: Pure Business Logic for the Shelf Back-Office
//!
//! Billing and returns rules for a single-shop back-office, written as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Shelf Back-Office Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Admin UI (browser)                           │   │
//! │  │      Billing page ──► Returns modal ──► Recent bills list       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    admin-api (axum)                             │   │
//! │  │        POST /bills, GET /bills, POST /returns                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shelf-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  billing  │  │  returns  │  │   │
//! │  │   │   Bill    │  │   Money   │  │ BillTotals│  │  status   │  │   │
//! │  │   │  Returns  │  │           │  │ lock order│  │  bounds   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shelf-db (Database Layer)                    │   │
//! │  │     SQLite, stock ledger, billing and returns transactions      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (VendorProduct, Bill, returns, requests)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`billing`] - Bill totals and lock ordering
//! - [`returns`] - Return status machine and returnable quantity
//! - [`invoice`] - Invoice number formatting
//! - [`stock`] - Stock non-negativity rule
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use shelf_core::billing::BillTotals;
//! use shelf_core::{Money, NewBillItem};
//!
//! let items = vec![NewBillItem {
//!     vendor_product_id: "vp-1".to_string(),
//!     quantity: 3,
//!     selling_price: Money::from_cents(5000),
//! }];
//!
//! let totals = BillTotals::compute(&items, Money::zero()).unwrap();
//! assert_eq!(totals.net_amount.cents(), 15000);
//! assert_eq!(totals.total_amount.cents(), 15000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod invoice;
pub mod money;
pub mod returns;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed on a single bill.
///
/// ## Business Reason
/// Keeps a single bill transaction short; every line holds a row lock
/// until commit.
pub const MAX_BILL_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of a customer name, matching the `bills` column.
pub const MAX_CUSTOMER_NAME_LEN: usize = 150;

/// Prefix of every human-readable invoice number.
pub const INVOICE_PREFIX: &str = "INV";
