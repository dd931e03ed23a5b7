//! # Seed Data Generator
//!
//! Populates the database with a small catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./shelf_dev.db
//! cargo run -p shelf-db --bin seed
//!
//! # Specify database path
//! cargo run -p shelf-db --bin seed -- --db ./data/shelf.db
//! ```
//!
//! ## Generated Catalog
//! - One category per entry in `CATALOG`
//! - Two vendors, each offering every product under its own vendor code
//! - Prices between Rs 20 and Rs 900, cost at 70-85% of price
//! - Stock between 0 and 60 (some products start sold out)

use shelf_core::Money;
use shelf_db::{Database, DbConfig, NewProduct, NewVendorProduct};
use std::env;

/// Categories and the products filed under them.
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Grocery",
        "GRO",
        &[
            "Basmati Rice 5kg",
            "Sugar 1kg",
            "Wheat Flour 10kg",
            "Cooking Oil 1L",
            "Red Lentils 1kg",
            "Iodized Salt 800g",
        ],
    ),
    (
        "Beverages",
        "BEV",
        &[
            "Black Tea 450g",
            "Instant Coffee 100g",
            "Mango Juice 1L",
            "Mineral Water 1.5L",
        ],
    ),
    (
        "Household",
        "HSE",
        &[
            "Dishwash Bar",
            "Laundry Powder 1kg",
            "Floor Cleaner 500ml",
            "Toilet Roll 4-Pack",
        ],
    ),
    (
        "Personal Care",
        "PRC",
        &["Toothpaste 150g", "Shampoo 200ml", "Bath Soap", "Hand Wash 250ml"],
    ),
];

/// Vendors and the prefix of their vendor codes.
const VENDORS: &[(&str, &str, &str)] = &[
    ("Metro Wholesale", "MW", "orders@metro.example"),
    ("City Distributors", "CD", "sales@citydist.example"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./shelf_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shelf Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./shelf_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Shelf Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count_vendor_products().await?;
    if existing > 0 {
        println!("⚠ Database already has {} vendor products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = db.catalog();

    let mut vendors = Vec::with_capacity(VENDORS.len());
    for (name, prefix, email) in VENDORS {
        let vendor = catalog.insert_vendor(name, Some(*email), None).await?;
        vendors.push((vendor, *prefix));
    }
    println!("✓ {} vendors", vendors.len());

    let start = std::time::Instant::now();
    let mut generated = 0usize;

    for (category_name, code_prefix, products) in CATALOG {
        let category = catalog.insert_category(category_name).await?;

        for (product_idx, product_name) in products.iter().enumerate() {
            let product = catalog
                .insert_product(&NewProduct {
                    name: product_name.to_string(),
                    code: format!("{}-{:03}", code_prefix, product_idx + 1),
                    description: None,
                    category_id: category.id.clone(),
                })
                .await?;

            for (vendor_idx, (vendor, vendor_prefix)) in vendors.iter().enumerate() {
                let seed = generated * 7 + vendor_idx * 13;
                let offer = generate_offer(&product.id, &vendor.id, vendor_prefix, &product.code, seed);

                if let Err(e) = catalog.insert_vendor_product(&offer).await {
                    eprintln!("Failed to insert {}: {}", offer.vendor_code, e);
                    continue;
                }
                generated += 1;
            }
        }

        println!("  Seeded category {}", category_name);
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} vendor products in {:?}", generated, elapsed);

    let listed = catalog.list_vendor_products(5).await?;
    println!();
    println!("Sample:");
    for vp in listed {
        println!("  {:<12} stock {:>3}  price {}", vp.vendor_code, vp.stock, vp.price());
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one vendor offer with deterministic pseudo-random figures.
fn generate_offer(
    product_id: &str,
    vendor_id: &str,
    vendor_prefix: &str,
    product_code: &str,
    seed: usize,
) -> NewVendorProduct {
    // Rs 20.00 - Rs 900.00
    let price_cents = 2_000 + ((seed * 3_571) % 88_000) as i64;

    // 70-85% of price
    let cost_pct = 70 + (seed % 16) as i64;
    let cost_cents = price_cents * cost_pct / 100;

    // Every ninth offer starts sold out
    let stock = if seed % 9 == 0 { 0 } else { (seed % 61) as i64 };

    NewVendorProduct {
        product_id: product_id.to_string(),
        vendor_id: vendor_id.to_string(),
        vendor_code: format!("{}-{}", vendor_prefix, product_code),
        price: Money::from_cents(price_cents),
        cost: Money::from_cents(cost_cents),
        stock,
    }
}
