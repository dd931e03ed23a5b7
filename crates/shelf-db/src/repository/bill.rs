//! # Bill Repository
//!
//! Persistence for bills and their line items.
//!
//! Bills are append-only: this module inserts and reads them, nothing
//! updates a bill after its transaction commits. Writing happens through
//! the transaction functions below, driven by the billing engine.

use shelf_core::{Bill, BillItem, BillWithItems};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

const BILL_COLUMNS: &str = "id, invoice_no, customer_name, net_amount_cents, discount_cents, \
     total_amount_cents, created_at, updated_at";

const BILL_ITEM_COLUMNS: &str = "id, bill_id, vendor_product_id, product_name_snapshot, \
     vendor_name_snapshot, vendor_code_snapshot, quantity, selling_price_cents, \
     line_total_cents, created_at";

/// Repository for reading bills.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Most recent bills, newest first, each with its line items.
    ///
    /// Bills created within the same timestamp tick keep insertion order
    /// (newest first) through the rowid tie-break.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<BillWithItems>> {
        debug!(limit = limit, "Listing recent bills");

        let sql = format!(
            "SELECT {BILL_COLUMNS} FROM bills
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?1"
        );
        let mut conn = self.pool.acquire().await?;
        let bills = sqlx::query_as::<_, Bill>(&sql)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        let mut result = Vec::with_capacity(bills.len());
        for bill in bills {
            let items = items_for_bill(&mut conn, &bill.id).await?;
            result.push(BillWithItems { bill, items });
        }

        Ok(result)
    }

    /// Looks a bill up by its invoice number.
    pub async fn get_by_invoice(&self, invoice_no: &str) -> DbResult<Option<BillWithItems>> {
        let mut conn = self.pool.acquire().await?;

        let Some(bill) = find_by_invoice(&mut conn, invoice_no).await? else {
            return Ok(None);
        };
        let items = items_for_bill(&mut conn, &bill.id).await?;

        Ok(Some(BillWithItems { bill, items }))
    }

    /// Counts bills (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction Functions
// =============================================================================

/// Inserts a bill header.
pub async fn insert_bill(conn: &mut SqliteConnection, bill: &Bill) -> DbResult<()> {
    debug!(id = %bill.id, invoice_no = %bill.invoice_no, "Inserting bill");

    sqlx::query(
        "INSERT INTO bills (
             id, invoice_no, customer_name,
             net_amount_cents, discount_cents, total_amount_cents,
             created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(&bill.id)
    .bind(&bill.invoice_no)
    .bind(&bill.customer_name)
    .bind(bill.net_amount_cents)
    .bind(bill.discount_cents)
    .bind(bill.total_amount_cents)
    .bind(bill.created_at)
    .bind(bill.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Inserts one line item. Lines must be inserted in bill order.
pub async fn insert_bill_item(conn: &mut SqliteConnection, item: &BillItem) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO bill_items (
             id, bill_id, vendor_product_id,
             product_name_snapshot, vendor_name_snapshot, vendor_code_snapshot,
             quantity, selling_price_cents, line_total_cents, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(&item.id)
    .bind(&item.bill_id)
    .bind(&item.vendor_product_id)
    .bind(&item.product_name_snapshot)
    .bind(&item.vendor_name_snapshot)
    .bind(&item.vendor_code_snapshot)
    .bind(item.quantity)
    .bind(item.selling_price_cents)
    .bind(item.line_total_cents)
    .bind(item.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Finds a bill by invoice number.
pub async fn find_by_invoice(
    conn: &mut SqliteConnection,
    invoice_no: &str,
) -> DbResult<Option<Bill>> {
    let sql = format!("SELECT {BILL_COLUMNS} FROM bills WHERE invoice_no = ?1");
    let bill = sqlx::query_as::<_, Bill>(&sql)
        .bind(invoice_no.trim())
        .fetch_optional(&mut *conn)
        .await?;

    Ok(bill)
}

/// Line items of a bill in the order they were billed.
pub async fn items_for_bill(conn: &mut SqliteConnection, bill_id: &str) -> DbResult<Vec<BillItem>> {
    let sql = format!(
        "SELECT {BILL_ITEM_COLUMNS} FROM bill_items
         WHERE bill_id = ?1
         ORDER BY rowid"
    );
    let items = sqlx::query_as::<_, BillItem>(&sql)
        .bind(bill_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(items)
}

/// Lines of a bill that sold the given vendor product, in bill order.
pub async fn lines_for_product(
    conn: &mut SqliteConnection,
    bill_id: &str,
    vendor_product_id: &str,
) -> DbResult<Vec<BillItem>> {
    let sql = format!(
        "SELECT {BILL_ITEM_COLUMNS} FROM bill_items
         WHERE bill_id = ?1 AND vendor_product_id = ?2
         ORDER BY rowid"
    );
    let items = sqlx::query_as::<_, BillItem>(&sql)
        .bind(bill_id)
        .bind(vendor_product_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(items)
}
