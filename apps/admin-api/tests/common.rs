//! Common test utilities for admin API integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use shelf_admin_api::{create_router, ApiConfig, AppState};
use shelf_core::Money;
use shelf_db::{Database, DbConfig, NewProduct, NewVendorProduct};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct database access for seeding and assertions.
    pub db: Database,
    /// Category the seeded products are filed under.
    pub category_id: String,
    /// Vendor offering the seeded products.
    pub vendor_id: String,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("shelf.db");

        let config = ApiConfig {
            listen_addr: "127.0.0.1:0".into(),
            database_path: path.to_string_lossy().to_string(),
            ..ApiConfig::default()
        };

        let db = Database::new(DbConfig::new(&path))
            .await
            .expect("Failed to open database");

        let category = db
            .catalog()
            .insert_category("Groceries")
            .await
            .expect("Failed to create category");
        let vendor = db
            .catalog()
            .insert_vendor("Acme Wholesale", None, None)
            .await
            .expect("Failed to create vendor");

        let router: Router = create_router(AppState::new(db.clone(), config));
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            db,
            category_id: category.id,
            vendor_id: vendor.id,
            _temp_dir: temp_dir,
        }
    }

    /// Seeds a product with one vendor offer and returns the offer's id.
    pub async fn seed_product(&self, name: &str, code: &str, price_cents: i64, stock: i64) -> String {
        let product = self
            .db
            .catalog()
            .insert_product(&NewProduct {
                name: name.to_string(),
                code: code.to_string(),
                description: None,
                category_id: self.category_id.clone(),
            })
            .await
            .expect("Failed to create product");

        self.db
            .catalog()
            .insert_vendor_product(&NewVendorProduct {
                product_id: product.id,
                vendor_id: self.vendor_id.clone(),
                vendor_code: code.to_string(),
                price: Money::from_cents(price_cents),
                cost: Money::from_cents(price_cents / 2),
                stock,
            })
            .await
            .expect("Failed to create vendor product")
            .id
    }

    /// Current stock of a vendor product.
    pub async fn stock_of(&self, vendor_product_id: &str) -> i64 {
        self.db
            .catalog()
            .get_vendor_product(vendor_product_id)
            .await
            .expect("Failed to read vendor product")
            .expect("Vendor product missing")
            .stock
    }
}
