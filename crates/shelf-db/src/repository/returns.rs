//! # Returns Repository
//!
//! Persistence for vendor returns (`product_returns`) and customer returns
//! (`customer_product_returns`).
//!
//! ## Status Encoding
//! ```text
//! status:          1 = Pending   2 = Resolved   3 = Rejected
//! resolution_type: 1 = Refund    2 = Replacement        (nullable)
//! ```
//! Both enums derive `sqlx::Type` over their `i32` discriminants in
//! shelf-core, so rows decode straight into the domain types.

use chrono::{DateTime, Utc};
use shelf_core::{CustomerProductReturn, ProductReturn, ReturnStatus};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

const PRODUCT_RETURN_COLUMNS: &str = "id, vendor_product_id, return_qty, resolution_type, \
     status, reason, return_date, resolved_date, created_at, updated_at";

const CUSTOMER_RETURN_COLUMNS: &str = "id, vendor_product_id, bill_id, bill_item_id, \
     return_qty, customer_name, resolution_type, status, refund_amount_cents, reason, \
     return_date, resolved_date, created_at, updated_at";

/// Repository for reading returns.
#[derive(Debug, Clone)]
pub struct ReturnsRepository {
    pool: SqlitePool,
}

impl ReturnsRepository {
    /// Creates a new ReturnsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReturnsRepository { pool }
    }

    /// Gets a vendor return by ID.
    pub async fn get_vendor_return(&self, id: &str) -> DbResult<Option<ProductReturn>> {
        let sql = format!("SELECT {PRODUCT_RETURN_COLUMNS} FROM product_returns WHERE id = ?1");
        let row = sqlx::query_as::<_, ProductReturn>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Gets a customer return by ID.
    pub async fn get_customer_return(&self, id: &str) -> DbResult<Option<CustomerProductReturn>> {
        let sql = format!(
            "SELECT {CUSTOMER_RETURN_COLUMNS} FROM customer_product_returns WHERE id = ?1"
        );
        let row = sqlx::query_as::<_, CustomerProductReturn>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Customer returns recorded against a bill, oldest first.
    pub async fn customer_returns_for_bill(
        &self,
        bill_id: &str,
    ) -> DbResult<Vec<CustomerProductReturn>> {
        let sql = format!(
            "SELECT {CUSTOMER_RETURN_COLUMNS} FROM customer_product_returns
             WHERE bill_id = ?1
             ORDER BY rowid"
        );
        let rows = sqlx::query_as::<_, CustomerProductReturn>(&sql)
            .bind(bill_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

// =============================================================================
// Transaction Functions
// =============================================================================

/// Inserts a vendor return.
pub async fn insert_product_return(conn: &mut SqliteConnection, row: &ProductReturn) -> DbResult<()> {
    debug!(id = %row.id, vendor_product_id = %row.vendor_product_id, qty = row.return_qty, "Inserting product return");

    sqlx::query(
        "INSERT INTO product_returns (
             id, vendor_product_id, return_qty, resolution_type, status, reason,
             return_date, resolved_date, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(&row.id)
    .bind(&row.vendor_product_id)
    .bind(row.return_qty)
    .bind(row.resolution_type)
    .bind(row.status)
    .bind(&row.reason)
    .bind(row.return_date)
    .bind(row.resolved_date)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Inserts a customer return.
pub async fn insert_customer_return(
    conn: &mut SqliteConnection,
    row: &CustomerProductReturn,
) -> DbResult<()> {
    debug!(id = %row.id, bill_id = ?row.bill_id, qty = row.return_qty, "Inserting customer return");

    sqlx::query(
        "INSERT INTO customer_product_returns (
             id, vendor_product_id, bill_id, bill_item_id, return_qty, customer_name,
             resolution_type, status, refund_amount_cents, reason,
             return_date, resolved_date, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )
    .bind(&row.id)
    .bind(&row.vendor_product_id)
    .bind(&row.bill_id)
    .bind(&row.bill_item_id)
    .bind(row.return_qty)
    .bind(&row.customer_name)
    .bind(row.resolution_type)
    .bind(row.status)
    .bind(row.refund_amount_cents)
    .bind(&row.reason)
    .bind(row.return_date)
    .bind(row.resolved_date)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Quantity of a vendor product already taken back on a bill.
///
/// Rejected returns don't count; pending and resolved ones do.
pub async fn returned_quantity(
    conn: &mut SqliteConnection,
    bill_id: &str,
    vendor_product_id: &str,
) -> DbResult<i64> {
    let qty: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(return_qty), 0) FROM customer_product_returns
         WHERE bill_id = ?1 AND vendor_product_id = ?2 AND status != ?3",
    )
    .bind(bill_id)
    .bind(vendor_product_id)
    .bind(ReturnStatus::Rejected)
    .fetch_one(&mut *conn)
    .await?;

    Ok(qty)
}

/// Takes the write lock and reads a vendor return under it.
pub async fn lock_product_return(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<ProductReturn>> {
    let sql = format!(
        "UPDATE product_returns SET updated_at = updated_at
         WHERE id = ?1
         RETURNING {PRODUCT_RETURN_COLUMNS}"
    );
    let row = sqlx::query_as::<_, ProductReturn>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row)
}

/// Takes the write lock and reads a customer return under it.
pub async fn lock_customer_return(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<CustomerProductReturn>> {
    let sql = format!(
        "UPDATE customer_product_returns SET updated_at = updated_at
         WHERE id = ?1
         RETURNING {CUSTOMER_RETURN_COLUMNS}"
    );
    let row = sqlx::query_as::<_, CustomerProductReturn>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row)
}

/// Which returns table a status update targets.
#[derive(Debug, Clone, Copy)]
pub enum ReturnTable {
    Vendor,
    Customer,
}

impl ReturnTable {
    fn name(self) -> &'static str {
        match self {
            ReturnTable::Vendor => "product_returns",
            ReturnTable::Customer => "customer_product_returns",
        }
    }
}

/// Writes a new status and its resolution date.
pub async fn set_status(
    conn: &mut SqliteConnection,
    table: ReturnTable,
    id: &str,
    status: ReturnStatus,
    resolved_date: DateTime<Utc>,
) -> DbResult<()> {
    let sql = format!(
        "UPDATE {} SET status = ?2, resolved_date = ?3, updated_at = ?3 WHERE id = ?1",
        table.name()
    );
    let result = sqlx::query(&sql)
        .bind(id)
        .bind(status)
        .bind(resolved_date)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found(table.name(), id));
    }

    Ok(())
}
