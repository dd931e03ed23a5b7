//! # Shelf Admin API
//!
//! HTTP surface of the back-office: billing, recent bills and returns.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Admin UI ──► axum router ──► handlers ──► shelf-db engines ──► SQLite │
//! │                   │                                                     │
//! │                   └── TraceLayer, CORS, body limit, timeout             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
