//! Integration tests for login and logout.

use hiwhiw_integration_tests::{TestApp, location, mock_json};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_blank_password_is_rejected_locally() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/login", &[("username", "user1"), ("password", "")])
        .await;
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(body.contains("Please enter username and password"));
    assert!(body.contains("value=\"user1\""), "username should be kept");

    assert!(app.backend.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_backend_rejection_message_is_shown() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/login", &[("username", "user1"), ("password", "wrong")])
        .await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Invalid credentials"));

    // Still logged out.
    assert_eq!(location(&app.get("/home").await), "/");
}

#[tokio::test]
async fn test_login_shows_display_name() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    mock_json(&app.backend, "GET", "/api/restaurants", json!([])).await;

    let response = app.get("/home").await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Somchai"));
}

#[tokio::test]
async fn test_logout_clears_session_even_if_backend_fails() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app.post_form("/logout", &[]).await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/");

    assert_eq!(location(&app.get("/home").await), "/");
}
