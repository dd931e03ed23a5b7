//! Shared fixtures for the in-crate tests.

use shelf_core::{Category, Money, Product, Vendor, VendorProduct};

use crate::repository::catalog::{NewProduct, NewVendorProduct};
use crate::Database;

/// A category and a vendor to hang test products on.
pub struct TestCatalog {
    pub category: Category,
    pub vendor: Vendor,
}

impl TestCatalog {
    pub async fn new(db: &Database) -> Self {
        let category = db.catalog().insert_category("Groceries").await.unwrap();
        let vendor = db
            .catalog()
            .insert_vendor("Acme Wholesale", Some("orders@acme.test"), None)
            .await
            .unwrap();
        TestCatalog { category, vendor }
    }

    pub async fn product(&self, db: &Database, name: &str, code: &str) -> Product {
        db.catalog()
            .insert_product(&NewProduct {
                name: name.to_string(),
                code: code.to_string(),
                description: None,
                category_id: self.category.id.clone(),
            })
            .await
            .unwrap()
    }
}

/// Inserts a product plus a vendor offer for it. The vendor code doubles
/// as the product code; cost is half the price.
pub async fn seed_vendor_product(
    db: &Database,
    catalog: &TestCatalog,
    name: &str,
    vendor_code: &str,
    price_cents: i64,
    stock: i64,
) -> VendorProduct {
    let product = catalog.product(db, name, vendor_code).await;
    db.catalog()
        .insert_vendor_product(&NewVendorProduct {
            product_id: product.id,
            vendor_id: catalog.vendor.id.clone(),
            vendor_code: vendor_code.to_string(),
            price: Money::from_cents(price_cents),
            cost: Money::from_cents(price_cents / 2),
            stock,
        })
        .await
        .unwrap()
}

/// Current stock, read outside any transaction.
pub async fn stock_of(db: &Database, vendor_product_id: &str) -> i64 {
    db.catalog()
        .get_vendor_product(vendor_product_id)
        .await
        .unwrap()
        .unwrap()
        .stock
}
