//! # Stock Ledger
//!
//! The only two operations allowed to change `vendor_products.stock`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  debit(conn, id, qty)                  credit(conn, id, qty)            │
//! │    1. qty > 0                            1. qty > 0                     │
//! │    2. lock row (UPDATE ... RETURNING)    2. lock row                    │
//! │    3. qty <= stock, else                 3. stock + qty                 │
//! │       InsufficientStock                  4. save                        │
//! │    4. stock - qty                                                       │
//! │    5. save                                                              │
//! │                                                                         │
//! │  Both run inside the caller's transaction: a later failure in the      │
//! │  same transaction rolls the change back.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use shelf_core::stock::apply_delta;
use shelf_core::{CoreError, ValidationError, VendorProduct};
use sqlx::SqliteConnection;
use tracing::{debug, error};

use crate::error::ServiceResult;
use crate::repository::catalog::{self, get_vendor_product_for_update, save_vendor_product};

/// Takes `qty` units out of stock.
///
/// ## Errors
/// - `Validation(MustBePositive)` for `qty <= 0`
/// - `VendorProductNotFound`
/// - `InsufficientStock` when `qty` exceeds the locked stock
pub async fn debit(
    conn: &mut SqliteConnection,
    vendor_product_id: &str,
    qty: i64,
) -> ServiceResult<VendorProduct> {
    ensure_positive(qty)?;

    let vp = get_vendor_product_for_update(conn, vendor_product_id).await?;

    if !vp.can_debit(qty) {
        let snapshot = catalog::line_snapshot(conn, vendor_product_id).await?;
        return Err(CoreError::InsufficientStock {
            product: snapshot.product_name,
            available: vp.stock,
            requested: qty,
        }
        .into());
    }

    adjust(conn, vp, -qty).await
}

/// Puts `qty` units back into stock.
pub async fn credit(
    conn: &mut SqliteConnection,
    vendor_product_id: &str,
    qty: i64,
) -> ServiceResult<VendorProduct> {
    ensure_positive(qty)?;

    let vp = get_vendor_product_for_update(conn, vendor_product_id).await?;
    adjust(conn, vp, qty).await
}

fn ensure_positive(qty: i64) -> Result<(), ValidationError> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

async fn adjust(
    conn: &mut SqliteConnection,
    mut vp: VendorProduct,
    delta: i64,
) -> ServiceResult<VendorProduct> {
    let next = apply_delta(&vp.id, vp.stock, delta).map_err(|e| {
        error!(vendor_product_id = %vp.id, stock = vp.stock, delta = delta, "Stock integrity failure");
        e
    })?;

    vp.stock = next;
    vp.updated_at = Utc::now();
    save_vendor_product(conn, &vp).await?;

    debug!(vendor_product_id = %vp.id, delta = delta, stock = vp.stock, "Stock adjusted");
    Ok(vp)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_vendor_product, stock_of, TestCatalog};
    use crate::{Database, DbConfig, DbError, ServiceError};

    #[tokio::test]
    async fn test_debit_and_credit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;
        let vp = seed_vendor_product(&db, &catalog, "Sugar", "SUG-1", 5000, 10).await;

        let mut tx = db.pool().begin().await.unwrap();
        let after = debit(&mut tx, &vp.id, 4).await.unwrap();
        assert_eq!(after.stock, 6);
        let after = credit(&mut tx, &vp.id, 1).await.unwrap();
        assert_eq!(after.stock, 7);
        tx.commit().await.unwrap();

        assert_eq!(stock_of(&db, &vp.id).await, 7);
    }

    #[tokio::test]
    async fn test_debit_to_exactly_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;
        let vp = seed_vendor_product(&db, &catalog, "Sugar", "SUG-1", 5000, 3).await;

        let mut tx = db.pool().begin().await.unwrap();
        assert_eq!(debit(&mut tx, &vp.id, 3).await.unwrap().stock, 0);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insufficient_stock_names_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;
        let vp = seed_vendor_product(&db, &catalog, "Sugar 1kg", "SUG-1", 5000, 2).await;

        let mut tx = db.pool().begin().await.unwrap();
        let err = debit(&mut tx, &vp.id, 3).await.unwrap_err();
        drop(tx);

        match err {
            ServiceError::Core(CoreError::InsufficientStock {
                product,
                available,
                requested,
            }) => {
                assert_eq!(product, "Sugar 1kg");
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stock_of(&db, &vp.id).await, 2);
    }

    #[tokio::test]
    async fn test_quantity_must_be_positive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;
        let vp = seed_vendor_product(&db, &catalog, "Sugar", "SUG-1", 5000, 2).await;

        let mut tx = db.pool().begin().await.unwrap();
        for qty in [0, -1] {
            assert!(matches!(
                debit(&mut tx, &vp.id, qty).await,
                Err(ServiceError::Core(CoreError::Validation(_)))
            ));
            assert!(matches!(
                credit(&mut tx, &vp.id, qty).await,
                Err(ServiceError::Core(CoreError::Validation(_)))
            ));
        }
    }

    #[tokio::test]
    async fn test_stock_check_constraint_backstop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;
        let vp = seed_vendor_product(&db, &catalog, "Sugar", "SUG-1", 5000, 2).await;

        let err = sqlx::query("UPDATE vendor_products SET stock = -1 WHERE id = ?1")
            .bind(&vp.id)
            .execute(db.pool())
            .await
            .unwrap_err();

        assert!(matches!(DbError::from(err), DbError::CheckViolation { .. }));
    }
}
