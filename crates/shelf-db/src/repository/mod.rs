//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Access Styles                                    │
//! │                                                                         │
//! │  Handler / seed                        Engine transaction               │
//! │       │                                     │                           │
//! │       │  db.bills().list_recent(5)          │  pool.begin()             │
//! │       ▼                                     ▼                           │
//! │  XxxRepository { pool }               free fns taking                  │
//! │  (one statement per call,             &mut SqliteConnection            │
//! │   autocommit reads / inserts)         (run inside the caller's tx)     │
//! │       │                                     │                           │
//! │       └──────────────┬──────────────────────┘                           │
//! │                      ▼                                                  │
//! │               SQLite Database                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Categories, vendors, products, vendor products
//! - [`BillRepository`](bill::BillRepository) - Bills and line items
//! - [`ReturnsRepository`](returns::ReturnsRepository) - Vendor and customer returns
//! - [`invoice`] - Invoice number counter

pub mod bill;
pub mod catalog;
pub mod invoice;
pub mod returns;
