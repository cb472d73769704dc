//! Integration tests for the cart page and its mutations.
//!
//! Every mutation redirects back to a page that re-fetches from the
//! backend, so these tests assert on backend calls as much as on pages.

use hiwhiw_integration_tests::{TestApp, cart_with_one_entry, empty_cart, location, mock_json};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_cart_page_renders_backend_cart() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    mock_json(&app.backend, "GET", "/api/cart", cart_with_one_entry()).await;

    let response = app.get("/cart").await;
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Green curry"));
    assert!(body.contains("no chili"));
    assert!(body.contains("฿90"));
    assert!(body.contains("name=\"item_count\" value=\"2\""));
}

#[tokio::test]
async fn test_quantity_zero_removes_entry() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    Mock::given(method("DELETE"))
        .and(path("/api/cart/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Removed"})))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/cart/update", &[("cart_item_id", "4"), ("quantity", "0")])
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/cart");

    let calls = app.backend_calls().await;
    assert_eq!(calls, vec![("DELETE".to_string(), "/api/cart/4".to_string())]);
}

#[tokio::test]
async fn test_positive_quantity_updates_entry() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    Mock::given(method("PUT"))
        .and(path("/api/cart/4"))
        .and(body_json(json!({"quantity": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Updated"})))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/cart/update", &[("cart_item_id", "4"), ("quantity", "3")])
        .await;
    assert_eq!(location(&response), "/cart");
}

#[tokio::test]
async fn test_page_refetches_after_mutation() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    mock_json(&app.backend, "DELETE", "/api/cart/4", json!({"message": "Removed"})).await;
    mock_json(&app.backend, "GET", "/api/cart", empty_cart()).await;

    let response = app
        .post_form("/cart/remove", &[("cart_item_id", "4")])
        .await;
    let next = location(&response).to_string();
    let page = app.get(&next).await.text().await.unwrap();
    assert!(page.contains("Your cart is empty"));

    let calls = app.backend_calls().await;
    assert_eq!(
        calls,
        vec![
            ("DELETE".to_string(), "/api/cart/4".to_string()),
            ("GET".to_string(), "/api/cart".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_empty_cart_order_is_refused_without_backend_call() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;

    let response = app.post_form("/cart/order", &[("item_count", "0")]).await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/cart?error=Your%20cart%20is%20empty");

    assert!(app.backend_calls().await.is_empty());
}

#[tokio::test]
async fn test_successful_order_lands_on_history() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    mock_json(
        &app.backend,
        "POST",
        "/api/orders",
        json!({"message": "Orders created", "order_ids": [12]}),
    )
    .await;
    mock_json(&app.backend, "GET", "/api/orders/history", json!([])).await;

    let response = app.post_form("/cart/order", &[("item_count", "2")]).await;
    let next = location(&response).to_string();
    assert!(next.starts_with("/history?success="));

    let page = app.get(&next).await.text().await.unwrap();
    assert!(page.contains("Order placed!"));
}

#[tokio::test]
async fn test_failed_order_shows_backend_message() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Cart is empty"})))
        .mount(&app.backend)
        .await;
    mock_json(&app.backend, "GET", "/api/cart", empty_cart()).await;

    let response = app.post_form("/cart/order", &[("item_count", "1")]).await;
    let next = location(&response).to_string();
    assert!(next.starts_with("/cart?error="));

    let page = app.get(&next).await.text().await.unwrap();
    assert!(page.contains("Could not place order: Cart is empty"));
}
