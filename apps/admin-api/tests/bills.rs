//! Bill endpoint integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::{json, Value};

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_bill_returns_created() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Sugar 1kg", "SUG-1", 5000, 10).await;

    let response = harness
        .server
        .post("/bills")
        .json(&json!({
            "customer_name": "Asha",
            "discount": 1000,
            "items": [{"vendor_product_id": vp, "quantity": 3, "selling_price": 5000}]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Bill created successfully");
    assert_eq!(body["data"]["invoice_no"], "INV00001");
    assert_eq!(body["data"]["net_amount_cents"], 15000);
    assert_eq!(body["data"]["total_amount_cents"], 14000);
    assert_eq!(body["data"]["items"][0]["product_name_snapshot"], "Sugar 1kg");
    assert_eq!(body["data"]["items"][0]["vendor_name_snapshot"], "Acme Wholesale");

    assert_eq!(harness.stock_of(&vp).await, 7);
}

#[tokio::test]
async fn create_bill_accepts_vendor_product_alias() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Tea", "TEA-1", 800, 5).await;

    harness
        .server
        .post("/bills")
        .json(&json!({"items": [{"vendor_product": vp, "quantity": 1, "selling_price": 800}]}))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn insufficient_stock_is_field_scoped_and_rolls_back() {
    let harness = TestHarness::new().await;
    let plenty = harness.seed_product("Rice", "RICE-1", 9000, 10).await;
    let scarce = harness.seed_product("Sugar 1kg", "SUG-1", 5000, 2).await;

    let response = harness
        .server
        .post("/bills")
        .json(&json!({
            "items": [
                {"vendor_product_id": plenty, "quantity": 1, "selling_price": 9000},
                {"vendor_product_id": scarce, "quantity": 5, "selling_price": 5000}
            ]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "insufficient_stock");
    assert_eq!(body["field"], "items");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Insufficient stock for product 'Sugar 1kg'"));

    assert_eq!(harness.stock_of(&plenty).await, 10);
    assert_eq!(harness.stock_of(&scarce).await, 2);
}

#[tokio::test]
async fn empty_bill_is_rejected() {
    let harness = TestHarness::new().await;

    let response = harness.server.post("/bills").json(&json!({"items": []})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["field"], "items");
    assert_eq!(body["message"], "At least one bill item is required.");
}

#[tokio::test]
async fn discount_over_net_is_rejected() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Salt", "SALT-1", 100, 10).await;

    let response = harness
        .server
        .post("/bills")
        .json(&json!({
            "discount": 500,
            "items": [{"vendor_product_id": vp, "quantity": 2, "selling_price": 100}]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["field"], "discount");
    assert_eq!(harness.stock_of(&vp).await, 10);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/bills")
        .json(&json!({"items": "not a list"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_body");
}

#[tokio::test]
async fn oversized_body_is_rejected_before_validation() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Salt", "SALT-1", 100, 10).await;

    let response = harness
        .server
        .post("/bills")
        .json(&json!({
            "customer_name": "x".repeat(2 * 1024 * 1024),
            "items": [{"vendor_product_id": vp, "quantity": 1, "selling_price": 100}]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_body");
    assert_eq!(harness.stock_of(&vp).await, 10);
}

// ============================================================================
// List / Get
// ============================================================================

#[tokio::test]
async fn list_bills_newest_first() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Salt", "SALT-1", 100, 100).await;

    for _ in 0..6 {
        harness
            .server
            .post("/bills")
            .json(&json!({"items": [{"vendor_product_id": vp, "quantity": 1, "selling_price": 100}]}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = harness.server.get("/bills").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Bills fetched successfully");
    let bills = body["data"].as_array().unwrap();
    assert_eq!(bills.len(), 5);
    assert_eq!(bills[0]["invoice_no"], "INV00006");
    assert_eq!(bills[4]["invoice_no"], "INV00002");
    assert_eq!(bills[0]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn get_bill_by_invoice() {
    let harness = TestHarness::new().await;
    let vp = harness.seed_product("Salt", "SALT-1", 100, 10).await;

    harness
        .server
        .post("/bills")
        .json(&json!({"items": [{"vendor_product_id": vp, "quantity": 1, "selling_price": 100}]}))
        .await
        .assert_status(StatusCode::CREATED);

    let response = harness.server.get("/bills/INV00001").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["invoice_no"], "INV00001");

    harness.server.get("/bills/INV00042").await.assert_status_not_found();
}
