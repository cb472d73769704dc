//! Integration tests for the session guard.
//!
//! Protected pages must bounce anonymous visitors before any backend call.

use hiwhiw_integration_tests::{TestApp, location};

#[tokio::test]
async fn test_health_needs_no_session() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login_without_backend_calls() {
    let app = TestApp::spawn().await;

    for page in [
        "/home",
        "/restaurant/1",
        "/cart",
        "/history",
        "/order/5",
        "/chat/5",
        "/chat-delivery/1",
        "/profile",
        "/create-restaurant",
        "/my-restaurant/1",
    ] {
        let response = app.get(page).await;
        assert_eq!(response.status(), 303, "{page} should redirect");
        assert_eq!(location(&response), "/", "{page} should redirect to login");
    }

    assert!(app.backend_calls().await.is_empty());
}

#[tokio::test]
async fn test_protected_forms_redirect_to_login() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/cart/order", &[("item_count", "2")]).await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/");

    assert!(app.backend_calls().await.is_empty());
}

#[tokio::test]
async fn test_event_streams_are_unauthorized_without_session() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/chat/5/stream").await.status(), 401);
    assert_eq!(app.get("/chat-delivery/1/stream").await.status(), 401);
}

#[tokio::test]
async fn test_login_page_sends_logged_in_users_home() {
    let app = TestApp::spawn().await;
    app.login_as(1, "Somchai").await;

    let response = app.get("/").await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/home");
}
