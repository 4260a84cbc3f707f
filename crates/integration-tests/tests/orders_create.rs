//! Integration tests for the order placement pipeline's pre-persistence
//! contract: the validation matrix with its exact 400 bodies, and the
//! persistence-failure 500 body.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use mangaiyar_integration_tests::{body_json, json_request, test_router};

fn valid_payload() -> serde_json::Value {
    json!({
        "items": [{
            "product": "c9bf9e57-1685-4c89-bafb-ff5af830be8a",
            "qty": 2,
            "price": 50,
            "productTitle": "Farm Cucumber",
            "productImage": "https://img.example/cucumber.jpg"
        }],
        "shippingAddress": {
            "name": "A",
            "email": "a@x.com",
            "phone": "9999999999",
            "address": "1 St",
            "city": "C",
            "pin": "600001"
        },
        "total": 100,
        "paymentMethod": "cod"
    })
}

async fn create_order(payload: &serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = test_router()
        .oneshot(json_request("POST", "/api/orders/create", payload))
        .await
        .expect("router responds");
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn missing_items_is_400() {
    let mut payload = valid_payload();
    payload.as_object_mut().expect("object").remove("items");

    let (status, body) = create_order(&payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Items are required"}));
}

#[tokio::test]
async fn empty_items_is_400() {
    let mut payload = valid_payload();
    payload["items"] = json!([]);

    let (status, body) = create_order(&payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Items are required"}));
}

#[tokio::test]
async fn missing_shipping_address_is_400() {
    let mut payload = valid_payload();
    payload
        .as_object_mut()
        .expect("object")
        .remove("shippingAddress");

    let (status, body) = create_order(&payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Shipping address is required"}));
}

#[tokio::test]
async fn missing_total_is_400() {
    let mut payload = valid_payload();
    payload.as_object_mut().expect("object").remove("total");

    let (status, body) = create_order(&payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Total is required"}));
}

#[tokio::test]
async fn zero_total_is_400() {
    let mut payload = valid_payload();
    payload["total"] = json!(0);

    let (status, body) = create_order(&payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Total is required"}));
}

#[tokio::test]
async fn missing_payment_method_is_400() {
    let mut payload = valid_payload();
    payload
        .as_object_mut()
        .expect("object")
        .remove("paymentMethod");

    let (status, body) = create_order(&payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "Payment method is required"}));
}

#[tokio::test]
async fn customer_accepted_as_shipping_address_alias() {
    // Validation passes with `customer` only; the request then proceeds to
    // persistence, which fails against the unreachable test database. The
    // point is that it does NOT fail shipping-address validation.
    let mut payload = valid_payload();
    let address = payload
        .as_object_mut()
        .expect("object")
        .remove("shippingAddress")
        .expect("present");
    payload["customer"] = address;

    let (status, body) = create_order(&payload).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Error creating order"}));
}

#[tokio::test]
async fn persistence_failure_is_500_with_generic_message() {
    // Snapshots are caller-supplied, so no enrichment lookup happens; the
    // pipeline reaches the store and fails there.
    let (status, body) = create_order(&valid_payload()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Error creating order"}));
}

#[tokio::test]
async fn non_uuid_product_reference_is_not_an_input_error() {
    // A weak product reference that parses to nothing is a dangling
    // reference, not a 400: the request clears validation and enrichment
    // (which leaves the snapshots empty without touching the catalog) and
    // only the unreachable store fails it.
    let payload = json!({
        "items": [{"product": "p1", "qty": 2, "price": 50}],
        "shippingAddress": {"name": "A", "email": "a@x.com", "phone": "9999999999",
                            "address": "1 St", "city": "C", "pin": "600001"},
        "total": 100,
        "paymentMethod": "cod"
    });

    let (status, body) = create_order(&payload).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Error creating order"}));
}

#[tokio::test]
async fn validation_runs_before_any_database_access() {
    // A request failing validation answers immediately even though the
    // database is unreachable: no enrichment, no persist attempt.
    let started = std::time::Instant::now();
    let (status, _) = create_order(&json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        started.elapsed() < std::time::Duration::from_millis(500),
        "validation must not touch the pool"
    );
}
