//! API error types and responses.
//!
//! ## Error Body
//! ```text
//! { "success": false, "code": "insufficient_stock", "field": "items",
//!   "message": "Insufficient stock for product 'Sugar 1kg'. ..." }
//! ```
//! `field` names the request field the admin UI highlights; it is omitted
//! for errors that are not about one input.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shelf_core::CoreError;
use shelf_db::{DbError, ServiceError};

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client-correctable input error.
    #[error("bad request: {message}")]
    BadRequest {
        code: &'static str,
        field: Option<String>,
        message: String,
    },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid state transition.
    #[error("conflict: {message}")]
    Conflict {
        field: Option<String>,
        message: String,
    },

    /// Lock wait or pool exhaustion; the request may be retried.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Moves a bad-request error reported against `from` onto `to`.
    ///
    /// The same core error can come from different forms; a stock
    /// shortfall belongs to `items` on a bill but to `return_qty` on a
    /// vendor return.
    pub fn rescope(self, from: &str, to: &str) -> Self {
        match self {
            ApiError::BadRequest {
                code,
                field: Some(field),
                message,
            } if field == from => ApiError::BadRequest {
                code,
                field: Some(to.to_string()),
                message,
            },
            other => other,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, field, message) = match self {
            Self::BadRequest {
                code,
                field,
                message,
            } => (StatusCode::BAD_REQUEST, code, field, message),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", None, msg),
            Self::Conflict { field, message } => (StatusCode::CONFLICT, "conflict", field, message),
            Self::Unavailable(msg) => {
                tracing::warn!(error = %msg, "Request failed on a busy database");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unavailable",
                    None,
                    "The database is busy, please retry".to_string(),
                )
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    None,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            code: code.to_string(),
            field,
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(e) => e.into(),
            ServiceError::Db(e) => e.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let field = err.field().map(str::to_string);
        match err {
            CoreError::ReturnNotFound(id) => Self::NotFound(format!("Return not found: {id}")),
            CoreError::InvalidReturnTransition { .. } => Self::Conflict {
                field,
                message: err.to_string(),
            },
            e if e.is_integrity_failure() => Self::Internal(e.to_string()),
            CoreError::Validation(e) => Self::BadRequest {
                code: "validation_error",
                field,
                message: e.to_string(),
            },
            other => Self::BadRequest {
                code: core_code(&other),
                field,
                message: other.to_string(),
            },
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => Self::NotFound(err.to_string()),
            DbError::UniqueViolation { ref field, .. } => Self::BadRequest {
                code: "duplicate",
                field: Some(field.clone()),
                message: err.to_string(),
            },
            DbError::ForeignKeyViolation { .. } => Self::BadRequest {
                code: "invalid_reference",
                field: None,
                message: err.to_string(),
            },
            e if e.is_retryable() => Self::Unavailable(e.to_string()),
            e => Self::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            code: "invalid_body",
            field: None,
            message: rejection.body_text(),
        }
    }
}

fn core_code(err: &CoreError) -> &'static str {
    match err {
        CoreError::VendorProductNotFound(_) => "vendor_product_not_found",
        CoreError::InsufficientStock { .. } => "insufficient_stock",
        CoreError::EmptyBill => "empty_bill",
        CoreError::DiscountExceedsNet { .. } => "discount_exceeds_net",
        CoreError::InvoiceNotFound(_) => "invoice_not_found",
        CoreError::LineItemNotFound { .. } => "line_item_not_found",
        CoreError::ReturnExceedsSold { .. } => "return_exceeds_sold",
        CoreError::RefundExceedsLine { .. } => "refund_exceeds_line",
        CoreError::ReturnNotFound(_) => "return_not_found",
        CoreError::InvalidReturnTransition { .. } => "invalid_return_transition",
        CoreError::NegativeStock { .. } => "negative_stock",
        CoreError::Validation(_) => "validation_error",
    }
}
