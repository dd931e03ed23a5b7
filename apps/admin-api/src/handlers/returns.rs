//! Return handlers.
//!
//! `POST /returns` carries both kinds of return in one body; the
//! `return_type` field picks the kind before anything reaches the engine:
//!
//! ```text
//! return_type == "1"   ──► ReturnRequest::Vendor    (stock leaves the shop)
//! anything else        ──► ReturnRequest::Customer  (tied to an invoice)
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use shelf_core::{
    CreatedReturn, CustomerProductReturn, CustomerReturnRequest, Money, ProductReturn,
    ResolutionType, ReturnOutcome, ReturnRequest, VendorReturnRequest,
};

use super::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

/// Wire form of a return request.
#[derive(Debug, Deserialize)]
pub struct ReturnPayload {
    /// `"1"` (or `1`) for a vendor return.
    #[serde(default)]
    pub return_type: Option<Value>,
    #[serde(alias = "vendor_product")]
    pub vendor_product_id: String,
    pub return_qty: i64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub resolution_type: Option<ResolutionType>,
    #[serde(default)]
    pub invoice_num: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub refund_amount: Option<Money>,
}

impl ReturnPayload {
    /// True when the payload asks for a vendor return.
    pub fn is_vendor_return(&self) -> bool {
        match &self.return_type {
            Some(Value::String(s)) => s.trim() == "1",
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            _ => false,
        }
    }
}

impl From<ReturnPayload> for ReturnRequest {
    fn from(payload: ReturnPayload) -> Self {
        if payload.is_vendor_return() {
            ReturnRequest::Vendor(VendorReturnRequest {
                vendor_product_id: payload.vendor_product_id,
                return_qty: payload.return_qty,
                reason: payload.reason,
                resolution_type: payload.resolution_type,
            })
        } else {
            // A missing invoice number fails validation as `invoice_num`.
            ReturnRequest::Customer(CustomerReturnRequest {
                invoice_num: payload.invoice_num.unwrap_or_default(),
                vendor_product_id: payload.vendor_product_id,
                return_qty: payload.return_qty,
                customer_name: payload.customer_name,
                reason: payload.reason,
                resolution_type: payload.resolution_type,
                refund_amount: payload.refund_amount,
            })
        }
    }
}

/// Record a vendor or customer return.
pub async fn create_return(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReturnPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<CreatedReturn>>), ApiError> {
    let Json(payload) = payload?;
    let request = ReturnRequest::from(payload);
    let name = match request {
        ReturnRequest::Vendor(_) => "VendorProductReturn",
        ReturnRequest::Customer(_) => "CustomerProductReturn",
    };

    let created = state
        .db
        .returns_engine()
        .create(request)
        .await
        .map_err(|e| ApiError::from(e).rescope("items", "return_qty"))?;

    Ok((StatusCode::CREATED, Json(Envelope::created(name, created))))
}

/// Body of a resolve call.
#[derive(Debug, Deserialize)]
pub struct ResolvePayload {
    pub outcome: ReturnOutcome,
}

/// Resolve or reject a pending vendor return.
pub async fn resolve_vendor_return(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ResolvePayload>, JsonRejection>,
) -> Result<Json<Envelope<ProductReturn>>, ApiError> {
    let Json(payload) = payload?;

    let row = state
        .db
        .returns_engine()
        .resolve_vendor_return(&id, payload.outcome)
        .await?;

    Ok(Json(Envelope::updated("VendorProductReturn", row)))
}

/// Resolve or reject a pending customer return.
pub async fn resolve_customer_return(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ResolvePayload>, JsonRejection>,
) -> Result<Json<Envelope<CustomerProductReturn>>, ApiError> {
    let Json(payload) = payload?;

    let row = state
        .db
        .returns_engine()
        .resolve_customer_return(&id, payload.outcome)
        .await?;

    Ok(Json(Envelope::updated("CustomerProductReturn", row)))
}
