//! Router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{bills, health, returns};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Database health check
/// - `POST /bills` - Create a bill
/// - `GET /bills` - Recent bills, newest first
/// - `GET /bills/:invoice_no` - One bill
/// - `POST /returns` - Vendor or customer return
/// - `POST /returns/vendor/:id/resolve` - Resolve or reject a vendor return
/// - `POST /returns/customer/:id/resolve` - Resolve or reject a customer return
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health::health))
        // Bills
        .route("/bills", post(bills::create_bill).get(bills::list_bills))
        .route("/bills/:invoice_no", get(bills::get_bill))
        // Returns
        .route("/returns", post(returns::create_return))
        .route(
            "/returns/vendor/:id/resolve",
            post(returns::resolve_vendor_return),
        )
        .route(
            "/returns/customer/:id/resolve",
            post(returns::resolve_customer_return),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
