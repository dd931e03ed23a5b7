//! # Catalog Repository
//!
//! Categories, vendors, products and the sellable vendor-product rows.
//!
//! ## Two Kinds of Access
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CatalogRepository (pool)            Transaction functions (conn)       │
//! │  ─────────────────────────           ───────────────────────────        │
//! │  insert_category / vendor            get_vendor_product_for_update      │
//! │  insert_product                      lock_vendor_product                │
//! │  insert_vendor_product               save_vendor_product                │
//! │  update_vendor_product               line_snapshot                      │
//! │  get_vendor_product                                                     │
//! │  list_vendor_products                Used by the stock ledger and the   │
//! │                                      billing / returns engines, always  │
//! │  Catalog management, seeding         inside the caller's transaction.   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Locks
//! SQLite has no `SELECT ... FOR UPDATE`. [`lock_vendor_product`] issues a
//! no-op `UPDATE ... RETURNING` instead: the statement takes the database
//! write lock (waiting up to `busy_timeout`) and returns the row read under
//! that lock. Stock is therefore never read before the lock is held.

use chrono::Utc;
use shelf_core::validation::{
    validate_code, validate_name, validate_price_over_cost, validate_stock, validate_uuid,
};
use shelf_core::{Category, CoreError, Money, Product, Vendor, VendorProduct};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult, ServiceResult};

const VENDOR_PRODUCT_COLUMNS: &str = "id, product_id, vendor_id, vendor_code, price_cents, \
     cost_cents, stock, is_active, created_at, updated_at";

// =============================================================================
// Input Types
// =============================================================================

/// Fields for a new catalog product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub category_id: String,
}

/// Fields for a new vendor offer of a product.
#[derive(Debug, Clone)]
pub struct NewVendorProduct {
    pub product_id: String,
    pub vendor_id: String,
    pub vendor_code: String,
    pub price: Money,
    pub cost: Money,
    pub stock: i64,
}

/// Catalog data frozen onto a bill line at the time of sale.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LineSnapshot {
    pub product_name: String,
    pub vendor_name: String,
    pub vendor_code: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog records.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inserts an active category.
    pub async fn insert_category(&self, name: &str) -> ServiceResult<Category> {
        validate_name("name", name)?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %category.id, name = %category.name, "Inserting category");

        sqlx::query(
            "INSERT INTO categories (id, name, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(category.is_active)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts an active vendor.
    pub async fn insert_vendor(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> ServiceResult<Vendor> {
        validate_name("name", name)?;

        let now = Utc::now();
        let vendor = Vendor {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %vendor.id, name = %vendor.name, "Inserting vendor");

        sqlx::query(
            "INSERT INTO vendors (id, name, email, phone, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&vendor.id)
        .bind(&vendor.name)
        .bind(&vendor.email)
        .bind(&vendor.phone)
        .bind(vendor.is_active)
        .bind(vendor.created_at)
        .bind(vendor.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(vendor)
    }

    /// Inserts a product.
    ///
    /// ## Errors
    /// - `UniqueViolation` on a duplicate code or `(name, category)`
    /// - `Validation` when `category_id` is not a UUID
    /// - `ForeignKeyViolation` for an unknown category
    pub async fn insert_product(&self, new: &NewProduct) -> ServiceResult<Product> {
        validate_name("name", &new.name)?;
        validate_code("code", &new.code)?;
        validate_uuid("category_id", &new.category_id)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            code: new.code.trim().to_string(),
            description: new.description.clone(),
            category_id: new.category_id.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, code = %product.code, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                 id, name, code, description, category_id, is_active, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.description)
        .bind(&product.category_id)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a vendor offer with its opening stock.
    ///
    /// ## Errors
    /// - `Validation(PriceNotAboveCost)` unless `price > cost`
    /// - `UniqueViolation` on a second offer of the same product by the
    ///   same vendor, or a reused vendor code
    pub async fn insert_vendor_product(
        &self,
        new: &NewVendorProduct,
    ) -> ServiceResult<VendorProduct> {
        validate_uuid("product_id", &new.product_id)?;
        validate_uuid("vendor_id", &new.vendor_id)?;
        validate_code("vendor_code", &new.vendor_code)?;
        validate_price_over_cost(new.price, new.cost)?;
        validate_stock(new.stock)?;

        let now = Utc::now();
        let vp = VendorProduct {
            id: Uuid::new_v4().to_string(),
            product_id: new.product_id.clone(),
            vendor_id: new.vendor_id.clone(),
            vendor_code: new.vendor_code.trim().to_string(),
            price_cents: new.price.cents(),
            cost_cents: new.cost.cents(),
            stock: new.stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %vp.id, vendor_code = %vp.vendor_code, stock = vp.stock, "Inserting vendor product");

        sqlx::query(
            "INSERT INTO vendor_products (
                 id, product_id, vendor_id, vendor_code, price_cents, cost_cents,
                 stock, is_active, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&vp.id)
        .bind(&vp.product_id)
        .bind(&vp.vendor_id)
        .bind(&vp.vendor_code)
        .bind(vp.price_cents)
        .bind(vp.cost_cents)
        .bind(vp.stock)
        .bind(vp.is_active)
        .bind(vp.created_at)
        .bind(vp.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(vp)
    }

    /// Updates the commercial fields of a vendor offer.
    ///
    /// Stock is not written here; it only moves through the stock ledger.
    pub async fn update_vendor_product(&self, vp: &VendorProduct) -> ServiceResult<()> {
        validate_code("vendor_code", &vp.vendor_code)?;
        validate_price_over_cost(vp.price(), vp.cost())?;

        debug!(id = %vp.id, "Updating vendor product");

        let result = sqlx::query(
            "UPDATE vendor_products SET
                 vendor_code = ?2,
                 price_cents = ?3,
                 cost_cents = ?4,
                 is_active = ?5,
                 updated_at = ?6
             WHERE id = ?1",
        )
        .bind(&vp.id)
        .bind(&vp.vendor_code)
        .bind(vp.price_cents)
        .bind(vp.cost_cents)
        .bind(vp.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::VendorProductNotFound(vp.id.clone()).into());
        }

        Ok(())
    }

    /// Gets a vendor product by ID (unlocked read).
    pub async fn get_vendor_product(&self, id: &str) -> DbResult<Option<VendorProduct>> {
        let sql = format!("SELECT {VENDOR_PRODUCT_COLUMNS} FROM vendor_products WHERE id = ?1");
        let vp = sqlx::query_as::<_, VendorProduct>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vp)
    }

    /// Lists active vendor products, most recently created first.
    pub async fn list_vendor_products(&self, limit: u32) -> DbResult<Vec<VendorProduct>> {
        let sql = format!(
            "SELECT {VENDOR_PRODUCT_COLUMNS} FROM vendor_products
             WHERE is_active = 1
             ORDER BY created_at DESC
             LIMIT ?1"
        );
        let rows = sqlx::query_as::<_, VendorProduct>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed vendor products");
        Ok(rows)
    }

    /// Counts vendor products (for diagnostics and seeding).
    pub async fn count_vendor_products(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vendor_products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction Functions
// =============================================================================

/// Takes the write lock and reads the vendor product under it.
///
/// Returns `None` when the row doesn't exist (the lock is still held for
/// the rest of the transaction).
pub async fn lock_vendor_product(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<VendorProduct>> {
    let sql = format!(
        "UPDATE vendor_products SET updated_at = updated_at
         WHERE id = ?1
         RETURNING {VENDOR_PRODUCT_COLUMNS}"
    );
    let vp = sqlx::query_as::<_, VendorProduct>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    debug!(vendor_product_id = %id, found = vp.is_some(), "Locked vendor product");
    Ok(vp)
}

/// Locked read that fails with `VendorProductNotFound` for unknown ids.
pub async fn get_vendor_product_for_update(
    conn: &mut SqliteConnection,
    id: &str,
) -> ServiceResult<VendorProduct> {
    lock_vendor_product(conn, id)
        .await?
        .ok_or_else(|| CoreError::VendorProductNotFound(id.to_string()).into())
}

/// Persists the stock of a vendor product locked in this transaction.
pub async fn save_vendor_product(conn: &mut SqliteConnection, vp: &VendorProduct) -> DbResult<()> {
    let result = sqlx::query("UPDATE vendor_products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
        .bind(&vp.id)
        .bind(vp.stock)
        .bind(vp.updated_at)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("VendorProduct", &vp.id));
    }

    Ok(())
}

/// Product name, vendor name and vendor code of a vendor product.
pub async fn line_snapshot(conn: &mut SqliteConnection, vendor_product_id: &str) -> DbResult<LineSnapshot> {
    sqlx::query_as::<_, LineSnapshot>(
        "SELECT p.name AS product_name, v.name AS vendor_name, vp.vendor_code
         FROM vendor_products vp
         JOIN products p ON p.id = vp.product_id
         JOIN vendors v ON v.id = vp.vendor_id
         WHERE vp.id = ?1",
    )
    .bind(vendor_product_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("VendorProduct", vendor_product_id))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_vendor_product, TestCatalog};
    use crate::{Database, DbConfig, ServiceError};
    use shelf_core::ValidationError;

    #[tokio::test]
    async fn test_insert_and_get_vendor_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;

        let vp = seed_vendor_product(&db, &catalog, "Sugar 1kg", "SUG-1", 5000, 10).await;

        let loaded = db.catalog().get_vendor_product(&vp.id).await.unwrap().unwrap();
        assert_eq!(loaded.stock, 10);
        assert_eq!(loaded.price(), Money::from_cents(5000));
        assert_eq!(db.catalog().count_vendor_products().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_price_must_exceed_cost() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;
        let product = catalog.product(&db, "Rice 5kg", "RICE-5").await;

        let err = db
            .catalog()
            .insert_vendor_product(&NewVendorProduct {
                product_id: product.id,
                vendor_id: catalog.vendor.id.clone(),
                vendor_code: "R5".to_string(),
                price: Money::from_cents(1000),
                cost: Money::from_cents(1000),
                stock: 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::PriceNotAboveCost))
        ));
    }

    #[tokio::test]
    async fn test_vendor_cannot_offer_product_twice() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;
        let vp = seed_vendor_product(&db, &catalog, "Salt", "SALT-1", 300, 5).await;

        let err = db
            .catalog()
            .insert_vendor_product(&NewVendorProduct {
                product_id: vp.product_id.clone(),
                vendor_id: vp.vendor_id.clone(),
                vendor_code: "OTHER".to_string(),
                price: Money::from_cents(300),
                cost: Money::from_cents(100),
                stock: 5,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Db(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_product_needs_known_category() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut new = NewProduct {
            name: "Oats".to_string(),
            code: "OAT-1".to_string(),
            description: None,
            category_id: "groceries".to_string(),
        };

        let err = db.catalog().insert_product(&new).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));

        new.category_id = "550e8400-e29b-41d4-a716-446655440000".to_string();
        let err = db.catalog().insert_product(&new).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Db(DbError::ForeignKeyViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;
        let mut vp = seed_vendor_product(&db, &catalog, "Tea", "TEA-1", 900, 7).await;

        vp.price_cents = 1200;
        vp.stock = 999;
        db.catalog().update_vendor_product(&vp).await.unwrap();

        let loaded = db.catalog().get_vendor_product(&vp.id).await.unwrap().unwrap();
        assert_eq!(loaded.price_cents, 1200);
        assert_eq!(loaded.stock, 7);
    }

    #[tokio::test]
    async fn test_lock_unknown_vendor_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let err = get_vendor_product_for_update(&mut tx, "missing").await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Core(CoreError::VendorProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_line_snapshot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = TestCatalog::new(&db).await;
        let vp = seed_vendor_product(&db, &catalog, "Flour", "FLR-1", 400, 3).await;

        let mut conn = db.pool().acquire().await.unwrap();
        let snap = line_snapshot(&mut conn, &vp.id).await.unwrap();

        assert_eq!(snap.product_name, "Flour");
        assert_eq!(snap.vendor_name, catalog.vendor.name);
        assert_eq!(snap.vendor_code, "FLR-1");
    }
}
