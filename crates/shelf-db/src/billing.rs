//! # Billing Engine
//!
//! Creates a bill atomically: stock debits, totals, invoice number, bill
//! header and line items either all commit or none do.
//!
//! ## Bill Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_bill(NewBill)                                                   │
//! │                                                                         │
//! │  validate (no I/O) ── EmptyBill / Validation ──────────────► 400       │
//! │       │                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │  for line in lock_order(items):       ← sorted by vendor_product_id     │
//! │       ledger::debit(line) ── InsufficientStock ── ROLLBACK ──► 400      │
//! │       snapshot product / vendor names                                   │
//! │       │                                                                 │
//! │  BillTotals::compute ── DiscountExceedsNet ─── ROLLBACK ──► 400         │
//! │       │                                                                 │
//! │  next_invoice_number  (counter row, same transaction)                   │
//! │  INSERT bill, INSERT bill_items (request order)                         │
//! │       │                                                                 │
//! │  COMMIT ──────────────────────────────────────────────────► 201         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried automatically. A `LockTimeout` leaves the database
//! untouched and the caller may resubmit.

use chrono::Utc;
use shelf_core::billing::{line_total, lock_order, validate_new_bill, BillTotals};
use shelf_core::{Bill, BillItem, BillWithItems, NewBill};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::ledger;
use crate::repository::bill::{self, BillRepository};
use crate::repository::catalog::{self, LineSnapshot};
use crate::repository::invoice::next_invoice_number;

/// Default number of bills in the recent-bills listing.
pub const DEFAULT_RECENT_BILLS: u32 = 5;

/// Billing engine over a connection pool.
#[derive(Debug, Clone)]
pub struct BillingEngine {
    pool: SqlitePool,
}

impl BillingEngine {
    /// Creates a new BillingEngine.
    pub fn new(pool: SqlitePool) -> Self {
        BillingEngine { pool }
    }

    /// Creates a bill, debiting stock for every line.
    ///
    /// ## Errors
    /// - `EmptyBill`, `Validation` - before any transaction opens
    /// - `VendorProductNotFound`, `InsufficientStock` - first failing line
    ///   in lock order; every earlier debit is rolled back
    /// - `DiscountExceedsNet`
    /// - `Db(LockTimeout)` and other infrastructure failures
    pub async fn create_bill(&self, request: NewBill) -> ServiceResult<BillWithItems> {
        let result = self.create_bill_inner(&request).await;

        if let Err(ServiceError::Core(e)) = &result {
            warn!(error = %e, lines = request.items.len(), "Bill rejected");
        }

        result
    }

    async fn create_bill_inner(&self, request: &NewBill) -> ServiceResult<BillWithItems> {
        validate_new_bill(
            request.customer_name.as_deref(),
            request.discount,
            &request.items,
        )?;

        let mut tx = self.pool.begin().await?;

        let mut locked: Vec<(usize, LineSnapshot)> = Vec::with_capacity(request.items.len());
        for idx in lock_order(&request.items) {
            let item = &request.items[idx];
            ledger::debit(&mut tx, &item.vendor_product_id, item.quantity).await?;
            let snapshot = catalog::line_snapshot(&mut tx, &item.vendor_product_id).await?;
            locked.push((idx, snapshot));
        }
        locked.sort_by_key(|(idx, _)| *idx);

        let totals = BillTotals::compute(&request.items, request.discount)?;
        let invoice_no = next_invoice_number(&mut tx).await?;

        let now = Utc::now();
        let bill = Bill {
            id: Uuid::new_v4().to_string(),
            invoice_no,
            customer_name: request
                .customer_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            net_amount_cents: totals.net_amount.cents(),
            discount_cents: totals.discount.cents(),
            total_amount_cents: totals.total_amount.cents(),
            created_at: now,
            updated_at: now,
        };
        bill::insert_bill(&mut tx, &bill).await?;

        let mut items = Vec::with_capacity(request.items.len());
        for ((_, snapshot), line) in locked.into_iter().zip(&request.items) {
            let item = BillItem {
                id: Uuid::new_v4().to_string(),
                bill_id: bill.id.clone(),
                vendor_product_id: line.vendor_product_id.clone(),
                product_name_snapshot: snapshot.product_name,
                vendor_name_snapshot: snapshot.vendor_name,
                vendor_code_snapshot: snapshot.vendor_code,
                quantity: line.quantity,
                selling_price_cents: line.selling_price.cents(),
                line_total_cents: line_total(line)?.cents(),
                created_at: now,
            };
            bill::insert_bill_item(&mut tx, &item).await?;
            items.push(item);
        }

        tx.commit().await?;

        info!(
            invoice_no = %bill.invoice_no,
            lines = items.len(),
            total = %totals.total_amount,
            "Bill created"
        );

        Ok(BillWithItems { bill, items })
    }

    /// Most recent bills, newest first, with their line items.
    pub async fn list_recent_bills(&self, limit: u32) -> ServiceResult<Vec<BillWithItems>> {
        debug!(limit = limit, "Listing recent bills");
        Ok(BillRepository::new(self.pool.clone()).list_recent(limit).await?)
    }

    /// Looks a bill up by invoice number.
    pub async fn get_bill_by_invoice(&self, invoice_no: &str) -> ServiceResult<Option<BillWithItems>> {
        Ok(BillRepository::new(self.pool.clone())
            .get_by_invoice(invoice_no)
            .await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
