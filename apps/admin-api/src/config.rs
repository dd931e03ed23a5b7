//! Service configuration.
//!
//! Every setting comes from a `SHELF_*` environment variable and falls back
//! to a default suitable for local development.
//!
//! | Variable                         | Default                 |
//! |----------------------------------|-------------------------|
//! | `SHELF_LISTEN_ADDR`              | `0.0.0.0:8080`          |
//! | `SHELF_DATABASE_PATH`            | `./shelf.db`            |
//! | `SHELF_MAX_CONNECTIONS`          | `5`                     |
//! | `SHELF_BUSY_TIMEOUT_MS`          | `5000`                  |
//! | `SHELF_RECENT_BILLS`             | `5`                     |
//! | `SHELF_CORS_ORIGINS`             | `*`                     |
//! | `SHELF_MAX_BODY_BYTES`           | `1048576`               |
//! | `SHELF_REQUEST_TIMEOUT_SECONDS`  | `30`                    |

use std::str::FromStr;
use std::time::Duration;

use shelf_db::{DbConfig, DEFAULT_RECENT_BILLS};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable is set but does not parse.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address to listen on.
    pub listen_addr: String,

    /// SQLite database file.
    pub database_path: String,

    /// Pool size.
    pub max_connections: u32,

    /// How long a transaction waits for the write lock before `LockTimeout`.
    pub busy_timeout_ms: u64,

    /// Size of the `GET /bills` window.
    pub recent_bills_limit: u32,

    /// CORS allowed origins (`*` allows any).
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ApiConfig {
    /// Load configuration from the environment.
    ///
    /// Unset variables take their default; set-but-malformed ones are an
    /// error rather than being silently replaced.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            listen_addr: std::env::var("SHELF_LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            database_path: std::env::var("SHELF_DATABASE_PATH").unwrap_or(defaults.database_path),
            max_connections: parse_var("SHELF_MAX_CONNECTIONS", defaults.max_connections)?,
            busy_timeout_ms: parse_var("SHELF_BUSY_TIMEOUT_MS", defaults.busy_timeout_ms)?,
            recent_bills_limit: parse_var("SHELF_RECENT_BILLS", defaults.recent_bills_limit)?,
            cors_origins: std::env::var("SHELF_CORS_ORIGINS")
                .map(|s| split_origins(&s))
                .unwrap_or(defaults.cors_origins),
            max_body_bytes: parse_var("SHELF_MAX_BODY_BYTES", defaults.max_body_bytes)?,
            request_timeout_seconds: parse_var(
                "SHELF_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            )?,
        })
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_path: "./shelf.db".into(),
            max_connections: 5,
            busy_timeout_ms: 5_000,
            recent_bills_limit: DEFAULT_RECENT_BILLS,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.recent_bills_limit, 5);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("http://a.test, http://b.test,,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_malformed_value_is_rejected() {
        std::env::set_var("SHELF_TEST_PARSE_BAD", "five");
        let err = parse_var::<u32>("SHELF_TEST_PARSE_BAD", 5).unwrap_err();
        assert!(err.to_string().contains("SHELF_TEST_PARSE_BAD"));

        assert_eq!(parse_var::<u32>("SHELF_TEST_PARSE_UNSET", 7).unwrap(), 7);
    }
}
