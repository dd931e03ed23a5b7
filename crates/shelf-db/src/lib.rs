//! # shelf-db: Database Layer for the Shelf Back-Office
//!
//! SQLite storage plus every transaction that moves stock, written with
//! sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelf Data Flow                                  │
//! │                                                                         │
//! │  admin-api handler (POST /bills, POST /returns)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     shelf-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Engines     │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │               │    │               │    │  (embedded)  │  │   │
//! │  │   │ BillingEngine │───►│ CatalogRepo   │    │ 001_catalog  │  │   │
//! │  │   │ ReturnsEngine │    │ BillRepo      │    │ 002_billing  │  │   │
//! │  │   │      │        │    │ ReturnsRepo   │    │ 003_returns  │  │   │
//! │  │   │      ▼        │    │ invoice seq   │    │              │  │   │
//! │  │   │ stock ledger  │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and service error types
//! - [`repository`] - Repository implementations (catalog, bills, returns)
//! - [`ledger`] - Stock debit / credit inside a transaction
//! - [`billing`] - Bill creation
//! - [`returns`] - Vendor and customer returns
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelf_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/shelf.db")).await?;
//!
//! let created = db.billing().create_bill(new_bill).await?;
//! let recent = db.billing().list_recent_bills(5).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod returns;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use pool::{Database, DbConfig};

pub use billing::{BillingEngine, DEFAULT_RECENT_BILLS};
pub use returns::ReturnsEngine;

// Repository re-exports for convenience
pub use repository::bill::BillRepository;
pub use repository::catalog::{CatalogRepository, NewProduct, NewVendorProduct};
pub use repository::returns::ReturnsRepository;
