//! Cart endpoints: mutations, coupon and pricing.

use quickcart_integration_tests::{TestServer, decimal, json};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let resp = server.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_add_update_remove() {
    let server = TestServer::start().await;

    let cart = json(server.post("/cart/add", &json!({ "product_id": "p1" })).await).await;
    assert_eq!(cart["item_count"], 1);

    let cart = json(
        server
            .post("/cart/add", &json!({ "product_id": "p1", "quantity": 2 }))
            .await,
    )
    .await;
    assert_eq!(cart["item_count"], 3);
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));

    let cart = json(
        server
            .post("/cart/update", &json!({ "product_id": "p1", "quantity": 5 }))
            .await,
    )
    .await;
    assert_eq!(cart["items"][0]["quantity"], 5);

    let cart = json(server.post("/cart/remove", &json!({ "product_id": "p1" })).await).await;
    assert_eq!(cart["items"][0]["quantity"], 4);

    let cart = json(
        server
            .post("/cart/update", &json!({ "product_id": "p1", "quantity": 0 }))
            .await,
    )
    .await;
    assert_eq!(cart["item_count"], 0);
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let server = TestServer::start().await;
    let resp = server.post("/cart/add", &json!({ "product_id": "p999" })).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_free_delivery_above_threshold() {
    let server = TestServer::start().await;

    // Two packs of milk at 30: 60 pays the delivery fee
    let cart = json(
        server
            .post("/cart/add", &json!({ "product_id": "p4", "quantity": 2 }))
            .await,
    )
    .await;
    assert_eq!(decimal(&cart["breakdown"]["delivery_fee"]), Decimal::from(20));
    assert_eq!(decimal(&cart["breakdown"]["total"]), Decimal::from(80));
    assert_eq!(cart["free_delivery"], false);

    // Plus two packs of chips at 20: 100 ships free
    let cart = json(
        server
            .post("/cart/add", &json!({ "product_id": "p7", "quantity": 2 }))
            .await,
    )
    .await;
    assert_eq!(decimal(&cart["breakdown"]["subtotal"]), Decimal::from(100));
    assert_eq!(decimal(&cart["breakdown"]["delivery_fee"]), Decimal::ZERO);
    assert_eq!(decimal(&cart["breakdown"]["total"]), Decimal::from(100));
    assert_eq!(cart["free_delivery"], true);
}

#[tokio::test]
async fn test_coupon_discount_and_rejection() {
    let server = TestServer::start().await;
    server
        .post("/cart/add", &json!({ "product_id": "p4", "quantity": 10 }))
        .await;

    let resp = server.post("/cart/coupon", &json!({ "code": "HALFOFF" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = json(server.post("/cart/coupon", &json!({ "code": " first100 " })).await).await;
    assert_eq!(body["outcome"], "applied");
    assert_eq!(body["cart"]["coupon_applied"], true);
    assert_eq!(decimal(&body["cart"]["breakdown"]["discount"]), Decimal::from(30));
    assert_eq!(decimal(&body["cart"]["breakdown"]["total"]), Decimal::from(270));

    let body = json(server.post("/cart/coupon", &json!({ "code": "FIRST100" })).await).await;
    assert_eq!(body["outcome"], "already_applied");
    assert_eq!(decimal(&body["cart"]["breakdown"]["discount"]), Decimal::from(30));
}

#[tokio::test]
async fn test_coupon_discount_is_capped() {
    let server = TestServer::start().await;
    // Two bags of atta at 325
    server
        .post("/cart/add", &json!({ "product_id": "p9", "quantity": 2 }))
        .await;
    let body = json(server.post("/cart/coupon", &json!({ "code": "FIRST100" })).await).await;
    assert_eq!(decimal(&body["cart"]["breakdown"]["discount"]), Decimal::from(50));
    assert_eq!(decimal(&body["cart"]["breakdown"]["total"]), Decimal::from(600));
}

#[tokio::test]
async fn test_cart_toasts_are_listed() {
    let server = TestServer::start().await;
    server.post("/cart/add", &json!({ "product_id": "p3" })).await;

    let toasts = json(server.get("/notifications").await).await;
    let titles: Vec<&str> = toasts
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|t| t["title"].as_str())
        .collect();
    assert!(titles.contains(&"Added to cart"));
}

#[tokio::test]
async fn test_dismiss_toast() {
    let server = TestServer::start().await;
    server.post("/cart/add", &json!({ "product_id": "p3" })).await;

    let toasts = json(server.get("/notifications").await).await;
    let id = toasts[0]["id"].as_str().map(str::to_owned).unwrap_or_default();

    let resp = server.delete(&format!("/notifications/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = server.delete(&format!("/notifications/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let toasts = json(server.get("/notifications").await).await;
    assert!(toasts.as_array().into_iter().flatten().all(|t| t["id"] != id.as_str()));
}
