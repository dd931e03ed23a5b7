//! # Invoice Numbering
//!
//! Hands out invoice numbers from the `invoice_sequence` counter row.
//!
//! The counter is advanced with `UPDATE ... RETURNING` inside the bill
//! transaction: the number is drawn under the write lock and becomes
//! visible only if the bill commits. A rolled-back bill also rolls back its
//! increment, so numbers stay gap-free.

use shelf_core::invoice::format_invoice_number;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Counter row used for bills.
const BILL_SEQUENCE: &str = "bill";

/// Draws the next invoice number, e.g. `INV00042`.
pub async fn next_invoice_number(conn: &mut SqliteConnection) -> DbResult<String> {
    let value: Option<i64> = sqlx::query_scalar(
        "UPDATE invoice_sequence SET value = value + 1 WHERE name = ?1 RETURNING value",
    )
    .bind(BILL_SEQUENCE)
    .fetch_optional(&mut *conn)
    .await?;

    let value = value.ok_or_else(|| DbError::not_found("InvoiceSequence", BILL_SEQUENCE))?;
    let invoice_no = format_invoice_number(value);

    debug!(invoice_no = %invoice_no, "Drew invoice number");
    Ok(invoice_no)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_numbers_are_sequential() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert_eq!(next_invoice_number(&mut tx).await.unwrap(), "INV00001");
        assert_eq!(next_invoice_number(&mut tx).await.unwrap(), "INV00002");
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_rollback_returns_the_number() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert_eq!(next_invoice_number(&mut tx).await.unwrap(), "INV00001");
        tx.rollback().await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert_eq!(next_invoice_number(&mut tx).await.unwrap(), "INV00001");
    }
}
