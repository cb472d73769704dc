//! Integration tests for browsing restaurants and adding dishes to the cart.

use hiwhiw_integration_tests::{TestApp, location, mock_json};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn restaurant_json(id: i32, name: &str, location: &str) -> serde_json::Value {
    json!({
        "id": id, "user_id": 2, "owner_name": "Somying", "name": name,
        "open_time": "10:00", "close_time": "12:00", "location": location,
        "pickup_time": "12:30", "pickup_location": "IT building", "menu_count": 2
    })
}

fn menu_json() -> serde_json::Value {
    json!({
        "restaurant": {
            "id": 1, "name": "Auntie Maew Curry Rice",
            "pickup_time": "12:30", "pickup_location": "IT building"
        },
        "menu": [
            {"id": 10, "restaurant_id": 1, "name": "Green curry", "price": 45},
            {"id": 11, "restaurant_id": 1, "name": "Basil pork", "price": 50}
        ]
    })
}

#[tokio::test]
async fn test_home_search_filters_restaurants() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    mock_json(
        &app.backend,
        "GET",
        "/api/restaurants",
        json!([
            restaurant_json(1, "Auntie Maew Curry Rice", "Canteen 2"),
            restaurant_json(2, "Uncle Lek Noodles", "Front gate market"),
        ]),
    )
    .await;

    let body = app.get("/home?q=gate").await.text().await.unwrap();
    assert!(body.contains("Uncle Lek Noodles"));
    assert!(!body.contains("Auntie Maew Curry Rice"));
    assert!(body.contains("value=\"gate\""));

    let body = app.get("/home?q=sushi").await.text().await.unwrap();
    assert!(body.contains("No restaurants match"));
}

#[tokio::test]
async fn test_add_to_cart_clamps_quantity_and_flags_item_on_refetched_menu() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    Mock::given(method("POST"))
        .and(path("/api/cart"))
        .and(body_json(json!({"menu_item_id": 10, "quantity": 1, "note": "no chili"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "Added"})))
        .expect(1)
        .mount(&app.backend)
        .await;
    mock_json(&app.backend, "GET", "/api/restaurants/1/menu", menu_json()).await;

    let response = app
        .post_form(
            "/restaurant/1/cart",
            &[("menu_item_id", "10"), ("quantity", "0"), ("note", " no chili ")],
        )
        .await;
    assert_eq!(response.status(), 303);
    let next = location(&response).to_string();
    assert_eq!(next, "/restaurant/1?added=10");

    let body = app.get(&next).await.text().await.unwrap();
    assert_eq!(body.matches("Added ✓").count(), 1);
    assert!(body.contains("Basil pork"));

    let calls = app.backend_calls().await;
    assert_eq!(
        calls,
        vec![
            ("POST".to_string(), "/api/cart".to_string()),
            ("GET".to_string(), "/api/restaurants/1/menu".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_failed_add_to_cart_returns_with_error() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    Mock::given(method("POST"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Menu item not found"})))
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/restaurant/1/cart", &[("menu_item_id", "99"), ("quantity", "2")])
        .await;
    assert_eq!(
        location(&response),
        "/restaurant/1?error=Could%20not%20add%20to%20cart"
    );
}

#[tokio::test]
async fn test_malformed_added_flag_still_renders_menu() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    mock_json(&app.backend, "GET", "/api/restaurants/1/menu", menu_json()).await;

    for uri in ["/restaurant/1?added=", "/restaurant/1?added=green"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), 200, "{uri}");
        let body = response.text().await.unwrap();
        assert!(body.contains("Green curry"));
        assert!(!body.contains("Added ✓"));
    }
}
