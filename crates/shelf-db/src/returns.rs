//! # Returns Engine
//!
//! Vendor and customer returns, and their resolution.
//!
//! ## Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReturnRequest::Vendor                ReturnRequest::Customer           │
//! │  ─────────────────────                ───────────────────────           │
//! │  BEGIN                                BEGIN                             │
//! │  ledger::debit(vp, qty)               lock vendor product               │
//! │    InsufficientStock?                 bill by invoice_no                │
//! │  INSERT product_returns (Pending)       InvoiceNotFound?                │
//! │  COMMIT                               bill lines for vp                 │
//! │                                         LineItemNotFound?               │
//! │                                       sold - already returned           │
//! │                                         ReturnExceedsSold?              │
//! │                                       refund <= paid for those units    │
//! │                                         RefundExceedsLine?              │
//! │                                       INSERT product_returns (Pending)  │
//! │                                       INSERT customer_product_returns   │
//! │                                       COMMIT       (stock unchanged)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Resolution
//! `Pending -> Resolved | Rejected`, both terminal. Rejecting a vendor
//! return puts the debited units back into stock.

use chrono::Utc;
use shelf_core::returns::{check_refund, check_returnable};
use shelf_core::validation::{
    validate_customer_name, validate_invoice_number, validate_non_negative, validate_reason,
};
use shelf_core::{
    CoreError, CreatedReturn, CustomerProductReturn, CustomerReturnRequest, ProductReturn,
    ReturnOutcome, ReturnRequest, ReturnStatus, ValidationError, VendorReturnRequest,
};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::ledger;
use crate::repository::bill;
use crate::repository::catalog;
use crate::repository::returns::{self, ReturnTable};

/// Returns engine over a connection pool.
#[derive(Debug, Clone)]
pub struct ReturnsEngine {
    pool: SqlitePool,
}

impl ReturnsEngine {
    /// Creates a new ReturnsEngine.
    pub fn new(pool: SqlitePool) -> Self {
        ReturnsEngine { pool }
    }

    /// Records a return of either kind.
    pub async fn create(&self, request: ReturnRequest) -> ServiceResult<CreatedReturn> {
        let result = match request {
            ReturnRequest::Vendor(req) => self.create_vendor_return(req).await.map(CreatedReturn::Vendor),
            ReturnRequest::Customer(req) => {
                self.create_customer_return(req).await.map(CreatedReturn::Customer)
            }
        };

        if let Err(ServiceError::Core(e)) = &result {
            warn!(error = %e, "Return rejected");
        }

        result
    }

    /// Sends stock back to the vendor.
    ///
    /// ## Errors
    /// - `Validation` for a non-positive quantity or an oversized reason
    /// - `VendorProductNotFound`
    /// - `InsufficientStock` when more units are returned than are on hand
    pub async fn create_vendor_return(
        &self,
        request: VendorReturnRequest,
    ) -> ServiceResult<ProductReturn> {
        validate_return_qty(request.return_qty)?;
        if let Some(reason) = &request.reason {
            validate_reason(reason)?;
        }

        let mut tx = self.pool.begin().await?;

        ledger::debit(&mut tx, &request.vendor_product_id, request.return_qty).await?;

        let now = Utc::now();
        let row = ProductReturn {
            id: Uuid::new_v4().to_string(),
            vendor_product_id: request.vendor_product_id,
            return_qty: request.return_qty,
            resolution_type: request.resolution_type,
            status: ReturnStatus::Pending,
            reason: request.reason,
            return_date: now,
            resolved_date: None,
            created_at: now,
            updated_at: now,
        };
        returns::insert_product_return(&mut tx, &row).await?;

        tx.commit().await?;

        info!(
            id = %row.id,
            vendor_product_id = %row.vendor_product_id,
            qty = row.return_qty,
            "Vendor return recorded"
        );
        Ok(row)
    }

    /// Takes back goods sold on an earlier bill.
    ///
    /// Stock is not changed; the return waits in `Pending` for resolution.
    ///
    /// ## Errors
    /// - `Validation` for malformed input
    /// - `InvoiceNotFound`, `LineItemNotFound`
    /// - `ReturnExceedsSold` when the line has fewer units left to return
    /// - `RefundExceedsLine`
    pub async fn create_customer_return(
        &self,
        request: CustomerReturnRequest,
    ) -> ServiceResult<CustomerProductReturn> {
        validate_invoice_number(&request.invoice_num)?;
        validate_return_qty(request.return_qty)?;
        if let Some(name) = &request.customer_name {
            validate_customer_name(name)?;
        }
        if let Some(reason) = &request.reason {
            validate_reason(reason)?;
        }
        if let Some(refund) = request.refund_amount {
            validate_non_negative("refund_amount", refund)?;
        }

        let mut tx = self.pool.begin().await?;

        // Write lock first; the bill lookups below then read under it.
        let locked = catalog::lock_vendor_product(&mut tx, &request.vendor_product_id).await?;

        let bill = bill::find_by_invoice(&mut tx, &request.invoice_num)
            .await?
            .ok_or_else(|| CoreError::InvoiceNotFound(request.invoice_num.clone()))?;

        let lines = bill::lines_for_product(&mut tx, &bill.id, &request.vendor_product_id).await?;
        let Some(line) = lines.first() else {
            return Err(CoreError::LineItemNotFound {
                invoice_no: bill.invoice_no,
                vendor_product_id: request.vendor_product_id,
            }
            .into());
        };

        // A billed line keeps its vendor product alive (ON DELETE RESTRICT)
        let vp = locked
            .ok_or_else(|| CoreError::VendorProductNotFound(request.vendor_product_id.clone()))?;

        let sold: i64 = lines.iter().map(|l| l.quantity).sum();
        let already_returned = returns::returned_quantity(&mut tx, &bill.id, &vp.id).await?;
        check_returnable(sold, already_returned, request.return_qty)?;

        if let Some(refund) = request.refund_amount {
            check_refund(&lines, request.return_qty, refund)?;
        }

        let now = Utc::now();
        let audit = ProductReturn {
            id: Uuid::new_v4().to_string(),
            vendor_product_id: vp.id.clone(),
            return_qty: request.return_qty,
            resolution_type: request.resolution_type,
            status: ReturnStatus::Pending,
            reason: request.reason.clone(),
            return_date: now,
            resolved_date: None,
            created_at: now,
            updated_at: now,
        };
        returns::insert_product_return(&mut tx, &audit).await?;

        let row = CustomerProductReturn {
            id: Uuid::new_v4().to_string(),
            vendor_product_id: vp.id,
            bill_id: Some(bill.id),
            bill_item_id: Some(line.id.clone()),
            return_qty: request.return_qty,
            customer_name: request
                .customer_name
                .or(bill.customer_name)
                .filter(|name| !name.trim().is_empty()),
            resolution_type: request.resolution_type,
            status: ReturnStatus::Pending,
            refund_amount_cents: request.refund_amount.map(|m| m.cents()),
            reason: request.reason,
            return_date: now,
            resolved_date: None,
            created_at: now,
            updated_at: now,
        };
        returns::insert_customer_return(&mut tx, &row).await?;

        tx.commit().await?;

        info!(
            id = %row.id,
            invoice_no = %bill.invoice_no,
            qty = row.return_qty,
            sold = sold,
            already_returned = already_returned,
            "Customer return recorded"
        );
        Ok(row)
    }

    /// Resolves or rejects a pending vendor return.
    ///
    /// Rejection credits the returned units back to stock.
    pub async fn resolve_vendor_return(
        &self,
        id: &str,
        outcome: ReturnOutcome,
    ) -> ServiceResult<ProductReturn> {
        let mut tx = self.pool.begin().await?;

        let mut row = returns::lock_product_return(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::ReturnNotFound(id.to_string()))?;

        let next = row.status.transition(outcome)?;
        if next == ReturnStatus::Rejected {
            ledger::credit(&mut tx, &row.vendor_product_id, row.return_qty).await?;
        }

        let now = Utc::now();
        returns::set_status(&mut tx, ReturnTable::Vendor, id, next, now).await?;
        tx.commit().await?;

        row.status = next;
        row.resolved_date = Some(now);
        row.updated_at = now;

        info!(id = %row.id, status = ?row.status, "Vendor return resolved");
        Ok(row)
    }

    /// Resolves or rejects a pending customer return.
    pub async fn resolve_customer_return(
        &self,
        id: &str,
        outcome: ReturnOutcome,
    ) -> ServiceResult<CustomerProductReturn> {
        let mut tx = self.pool.begin().await?;

        let mut row = returns::lock_customer_return(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::ReturnNotFound(id.to_string()))?;

        let next = row.status.transition(outcome)?;

        let now = Utc::now();
        returns::set_status(&mut tx, ReturnTable::Customer, id, next, now).await?;
        tx.commit().await?;

        row.status = next;
        row.resolved_date = Some(now);
        row.updated_at = now;

        info!(id = %row.id, status = ?row.status, "Customer return resolved");
        Ok(row)
    }
}

fn validate_return_qty(qty: i64) -> Result<(), ValidationError> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "return_qty".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
