//! Returns endpoint integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::{json, Value};

async fn sell(harness: &TestHarness, vp: &str, quantity: i64) -> String {
    let response = harness
        .server
        .post("/bills")
        .json(&json!({
            "customer_name": "Asha",
            "items": [{"vendor_product_id": vp, "quantity": quantity, "selling_price": 5000}]
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["invoice_no"].as_str().unwrap().to_string()
}

// ============================================================================
// Vendor Returns
// ============================================================================

#[tokio::test]
async fn vendor_return_debits_stock() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Milk", "MLK-1", 300, 10).await;

    let response = harness
        .server
        .post("/returns")
        .json(&json!({"return_type": "1", "vendor_product": vp, "return_qty": 2, "reason": "expired"}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "VendorProductReturn created successfully");
    assert_eq!(body["data"]["kind"], "vendor");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(harness.stock_of(&vp).await, 8);
}

#[tokio::test]
async fn vendor_return_over_stock_names_return_qty() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Milk", "MLK-1", 300, 1).await;

    let response = harness
        .server
        .post("/returns")
        .json(&json!({"return_type": "1", "vendor_product_id": vp, "return_qty": 2}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["field"], "return_qty");
    assert_eq!(harness.stock_of(&vp).await, 1);
}

#[tokio::test]
async fn rejecting_vendor_return_restores_stock() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Milk", "MLK-1", 300, 10).await;

    let created: Value = harness
        .server
        .post("/returns")
        .json(&json!({"return_type": "1", "vendor_product_id": vp, "return_qty": 4}))
        .await
        .json();
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = harness
        .server
        .post(&format!("/returns/vendor/{id}/resolve"))
        .json(&json!({"outcome": "rejected"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "rejected");
    assert_eq!(harness.stock_of(&vp).await, 10);

    harness
        .server
        .post(&format!("/returns/vendor/{id}/resolve"))
        .json(&json!({"outcome": "resolved"}))
        .await
        .assert_status(StatusCode::CONFLICT);
}

// ============================================================================
// Customer Returns
// ============================================================================

#[tokio::test]
async fn customer_return_leaves_stock_alone() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Sugar 1kg", "SUG-1", 5000, 10).await;
    let invoice = sell(&harness, &vp, 3).await;

    let response = harness
        .server
        .post("/returns")
        .json(&json!({
            "return_type": "2",
            "invoice_num": invoice,
            "vendor_product_id": vp,
            "return_qty": 1,
            "resolution_type": "refund",
            "refund_amount": 5000
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "CustomerProductReturn created successfully");
    assert_eq!(body["data"]["kind"], "customer");
    assert_eq!(body["data"]["customer_name"], "Asha");
    assert_eq!(body["data"]["refund_amount_cents"], 5000);
    assert_eq!(harness.stock_of(&vp).await, 7);
}

#[tokio::test]
async fn unknown_invoice_is_rejected() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Sugar 1kg", "SUG-1", 5000, 10).await;

    let response = harness
        .server
        .post("/returns")
        .json(&json!({"invoice_num": "INV99999", "vendor_product_id": vp, "return_qty": 1}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "invoice_not_found");
    assert_eq!(body["field"], "invoice_num");
    assert_eq!(body["message"], "Invalid invoice number: INV99999");
}

#[tokio::test]
async fn malformed_invoice_is_reported_as_unknown() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Sugar 1kg", "SUG-1", 5000, 10).await;

    let response = harness
        .server
        .post("/returns")
        .json(&json!({"invoice_num": "BILL-42", "vendor_product_id": vp, "return_qty": 1}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "invoice_not_found");
    assert_eq!(body["message"], "Invalid invoice number: BILL-42");
}

#[tokio::test]
async fn missing_invoice_is_rejected() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Sugar 1kg", "SUG-1", 5000, 10).await;

    let response = harness
        .server
        .post("/returns")
        .json(&json!({"vendor_product_id": vp, "return_qty": 1}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["field"], "invoice_num");
}

#[tokio::test]
async fn customer_cannot_return_more_than_sold() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Sugar 1kg", "SUG-1", 5000, 10).await;
    let invoice = sell(&harness, &vp, 2).await;

    let response = harness
        .server
        .post("/returns")
        .json(&json!({"invoice_num": invoice, "vendor_product_id": vp, "return_qty": 3}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "return_exceeds_sold");
    assert_eq!(body["field"], "return_qty");
}

#[tokio::test]
async fn resolving_unknown_return_is_not_found() {
    let harness = TestHarness::new().await;

    harness
        .server
        .post("/returns/customer/missing/resolve")
        .json(&json!({"outcome": "resolved"}))
        .await
        .assert_status_not_found();
}
