//! Application state.

use shelf_db::Database;

use crate::config::ApiConfig;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database pool with its repositories and engines.
    pub db: Database,

    /// Service configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        Self { db, config }
    }
}
