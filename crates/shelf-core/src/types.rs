//! # Domain Types
//!
//! Core domain types used throughout the back-office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │◄──│  VendorProduct  │──►│     Vendor      │       │
//! │  │  code (unique)  │   │  price / cost   │   │                 │       │
//! │  │  category_id    │   │  stock >= 0     │   │                 │       │
//! │  └─────────────────┘   └────────▲────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │  ┌─────────────────┐   ┌────────┴────────┐   ┌─────────────────┐       │
//! │  │      Bill       │◄──│    BillItem     │◄──│ CustomerProduct │       │
//! │  │  invoice_no     │   │  quantity       │   │ Return (weak    │       │
//! │  │  net/discount/  │   │  selling_price  │   │ bill links)     │       │
//! │  │  total          │   │  (frozen)       │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductReturn  │   │  ReturnStatus   │   │ ResolutionType  │       │
//! │  │  (vendor-side)  │   │  Pending        │   │  Refund         │       │
//! │  │                 │   │  Resolved       │   │  Replacement    │       │
//! │  └─────────────────┘   │  Rejected       │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists: (product code, vendor code, invoice_no)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Catalog
// =============================================================================

/// A product category. Only consumed as a foreign-key target.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A supplier. Only consumed as a foreign-key target.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A catalog product, independent of who supplies it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Business identifier, unique across the catalog.
    pub code: String,
    pub description: Option<String>,
    pub category_id: String,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// The sellable unit: a product as offered by one vendor.
///
/// `stock` is only ever changed through the stock ledger (debit/credit).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VendorProduct {
    pub id: String,
    pub product_id: String,
    pub vendor_id: String,
    /// Vendor-specific code, unique per vendor.
    pub vendor_code: String,
    /// Selling price in cents.
    pub price_cents: i64,
    /// Acquisition cost in cents.
    pub cost_cents: i64,
    /// Units on hand. Never negative.
    pub stock: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl VendorProduct {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Checks whether `quantity` units can leave the shop.
    pub fn can_debit(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }
}

// =============================================================================
// Bill
// =============================================================================

/// An invoice header. Created once, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Bill {
    pub id: String,
    /// Human-readable number, e.g. `INV00042`. Unique, never reassigned.
    pub invoice_no: String,
    pub customer_name: Option<String>,
    /// Sum of line totals before discount.
    pub net_amount_cents: i64,
    pub discount_cents: i64,
    /// Always `net_amount_cents - discount_cents`.
    pub total_amount_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    #[inline]
    pub fn net_amount(&self) -> Money {
        Money::from_cents(self.net_amount_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// A line item on a bill.
/// Uses snapshot pattern to freeze catalog data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillItem {
    pub id: String,
    pub bill_id: String,
    pub vendor_product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name_snapshot: String,
    /// Vendor name at time of sale (frozen).
    pub vendor_name_snapshot: String,
    /// Vendor code at time of sale (frozen).
    pub vendor_code_snapshot: String,
    pub quantity: i64,
    /// Price actually charged per unit (frozen).
    pub selling_price_cents: i64,
    /// `selling_price_cents × quantity`.
    pub line_total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl BillItem {
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// A bill together with its line items, as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillWithItems {
    #[serde(flatten)]
    pub bill: Bill,
    pub items: Vec<BillItem>,
}

/// Request to create a bill.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBill {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub discount: Money,
    pub items: Vec<NewBillItem>,
}

/// One requested line of a [`NewBill`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBillItem {
    #[serde(alias = "vendor_product")]
    pub vendor_product_id: String,
    pub quantity: i64,
    pub selling_price: Money,
}

// =============================================================================
// Returns
// =============================================================================

/// Lifecycle of a return: `Pending -> Resolved | Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    /// Waiting for the resolution workflow.
    #[default]
    Pending = 1,
    /// Refunded or replaced.
    Resolved = 2,
    /// Return refused.
    Rejected = 3,
}

/// How a return is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionType {
    Refund = 1,
    Replacement = 2,
}

/// Outcome chosen by the resolution workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReturnOutcome {
    Resolved,
    Rejected,
}

/// Stock sent back to (or rejected by) a vendor.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductReturn {
    pub id: String,
    pub vendor_product_id: String,
    pub return_qty: i64,
    pub resolution_type: Option<ResolutionType>,
    pub status: ReturnStatus,
    pub reason: Option<String>,
    #[ts(as = "String")]
    pub return_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub resolved_date: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A return tied to a specific prior sale.
///
/// `bill_id` / `bill_item_id` are weak links: removing the bill nulls
/// them and the return history survives.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CustomerProductReturn {
    pub id: String,
    pub vendor_product_id: String,
    pub bill_id: Option<String>,
    pub bill_item_id: Option<String>,
    pub return_qty: i64,
    pub customer_name: Option<String>,
    pub resolution_type: Option<ResolutionType>,
    pub status: ReturnStatus,
    pub refund_amount_cents: Option<i64>,
    pub reason: Option<String>,
    #[ts(as = "String")]
    pub return_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub resolved_date: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CustomerProductReturn {
    pub fn refund_amount(&self) -> Option<Money> {
        self.refund_amount_cents.map(Money::from_cents)
    }
}

/// Vendor-side return request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VendorReturnRequest {
    pub vendor_product_id: String,
    pub return_qty: i64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub resolution_type: Option<ResolutionType>,
}

/// Customer-side return request, tied to an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerReturnRequest {
    pub invoice_num: String,
    pub vendor_product_id: String,
    pub return_qty: i64,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub resolution_type: Option<ResolutionType>,
    #[serde(default)]
    pub refund_amount: Option<Money>,
}

/// An already-disambiguated return request.
///
/// The transport layer resolves the wire discriminator into one of these
/// variants; the returns engine never inspects a generic payload.
#[derive(Debug, Clone)]
pub enum ReturnRequest {
    Vendor(VendorReturnRequest),
    Customer(CustomerReturnRequest),
}

/// What a return request produced.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreatedReturn {
    Vendor(ProductReturn),
    Customer(CustomerProductReturn),
}

// =============================================================================
// Unit Tests
// =============================================================================
