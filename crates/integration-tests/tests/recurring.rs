//! Auth-gated recurring items.

use quickcart_integration_tests::{TestServer, json};
use reqwest::StatusCode;
use serde_json::json;

async fn login(server: &TestServer) {
    let resp = server
        .post(
            "/login",
            &json!({ "email": "ravi@example.com", "password": "secret" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_requires_login() {
    let server = TestServer::start().await;

    let resp = server.get("/recurring-orders").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = json(resp).await;
    assert_eq!(body["error"], "Unauthorized: Please log in to continue");

    let resp = server
        .post("/recurring-orders", &json!({ "product_id": "p4" }))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_list_delete() {
    let server = TestServer::start().await;
    login(&server).await;

    let resp = server
        .post(
            "/recurring-orders",
            &json!({
                "product_id": "p4",
                "quantity": 2,
                "frequency": "weekly",
                "delivery_time": "07:30"
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let item = json(resp).await;
    assert_eq!(item["userId"], "user-1");
    assert_eq!(item["deliveryTime"], "07:30");
    assert_eq!(item["isActive"], true);
    let id = item["id"].as_str().map(str::to_owned).unwrap_or_default();

    let items = json(server.get("/recurring-orders").await).await;
    assert_eq!(items.as_array().map(Vec::len), Some(1));
    assert_eq!(items[0]["product"]["name"], "Amul Milk");

    let resp = server.delete(&format!("/recurring-orders/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = server.delete(&format!("/recurring-orders/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let items = json(server.get("/recurring-orders").await).await;
    assert_eq!(items.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_unknown_product_is_rejected() {
    let server = TestServer::start().await;
    login(&server).await;

    let resp = server
        .post("/recurring-orders", &json!({ "product_id": "p999" }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_revokes_access() {
    let server = TestServer::start().await;
    login(&server).await;
    assert_eq!(
        server.get("/recurring-orders").await.status(),
        StatusCode::OK
    );

    let resp = server.post("/logout", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        server.get("/recurring-orders").await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_cannot_delete_another_users_item() {
    let server = TestServer::start().await;
    login(&server).await;
    let item = json(
        server
            .post("/recurring-orders", &json!({ "product_id": "p4" }))
            .await,
    )
    .await;
    let id = item["id"].as_str().map(str::to_owned).unwrap_or_default();

    let resp = server
        .post(
            "/signup",
            &json!({ "name": "Meera", "email": "meera@example.com", "password": "secret1" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = server.delete(&format!("/recurring-orders/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    login(&server).await;
    let items = json(server.get("/recurring-orders").await).await;
    assert_eq!(items.as_array().map(Vec::len), Some(1));
}
