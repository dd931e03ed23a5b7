//! Bill handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use shelf_core::{BillWithItems, NewBill};

use super::Envelope;
use crate::error::ApiError;
use crate::state::AppState;

/// Create a bill.
///
/// Body: `{customer_name?, discount?, items: [{vendor_product_id, quantity,
/// selling_price}]}`, money in cents.
pub async fn create_bill(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewBill>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<BillWithItems>>), ApiError> {
    let Json(request) = payload?;

    let created = state.db.billing().create_bill(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::created("Bill", created)),
    ))
}

/// List the most recent bills, newest first.
pub async fn list_bills(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<BillWithItems>>>, ApiError> {
    let bills = state
        .db
        .billing()
        .list_recent_bills(state.config.recent_bills_limit)
        .await?;

    Ok(Json(Envelope::fetched("Bills", bills)))
}

/// Get one bill by invoice number.
pub async fn get_bill(
    State(state): State<Arc<AppState>>,
    Path(invoice_no): Path<String>,
) -> Result<Json<Envelope<BillWithItems>>, ApiError> {
    let bill = state
        .db
        .billing()
        .get_bill_by_invoice(&invoice_no)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bill not found: {invoice_no}")))?;

    Ok(Json(Envelope::fetched("Bill", bill)))
}
