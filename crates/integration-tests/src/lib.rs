//! Integration tests for Hiw-Hiw.
//!
//! Each test starts the storefront on a random local port in front of a
//! [`wiremock`] stand-in for the backend REST API, then drives it with a
//! cookie-keeping HTTP client the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hiwhiw-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let app = TestApp::spawn().await;
//! app.login_as(1, "Somchai").await;
//!
//! let response = app.get("/cart").await;
//! assert_eq!(response.status(), 200);
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::time::Duration;

use hiwhiw_storefront::config::StorefrontConfig;
use hiwhiw_storefront::state::AppState;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, header::LOCATION};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Chat refresh interval used by the test server.
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A running storefront and the mocked backend behind it.
pub struct TestApp {
    /// Mocked backend REST API, mounted at `/api`.
    pub backend: MockServer,
    /// Storefront base URL, e.g. `http://127.0.0.1:49152`.
    pub address: String,
    /// Browser-like client: keeps cookies, does not follow redirects.
    pub client: Client,
}

impl TestApp {
    /// Start a storefront against a fresh mocked backend.
    pub async fn spawn() -> Self {
        let backend = MockServer::start().await;

        let config = StorefrontConfig {
            chat_poll_interval: TEST_POLL_INTERVAL,
            ..StorefrontConfig::for_backend(format!("{}/api", backend.uri()))
        };
        let state = AppState::new(config).unwrap();
        let app = hiwhiw_storefront::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            backend,
            address,
            client,
        }
    }

    /// Log in through the login form as the given backend user.
    pub async fn login_as(&self, user_id: i32, display_name: &str) {
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Login successful",
                "user": {
                    "id": user_id,
                    "username": format!("user{user_id}"),
                    "display_name": display_name
                }
            })))
            .mount(&self.backend)
            .await;

        let username = format!("user{user_id}");
        let response = self
            .post_form(
                "/login",
                &[("username", username.as_str()), ("password", "password1")],
            )
            .await;
        assert_eq!(location(&response), "/home", "login should land on /home");
    }

    /// GET a storefront path.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.address))
            .send()
            .await
            .unwrap()
    }

    /// POST a form to a storefront path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.address))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Backend requests received so far, excluding logins.
    pub async fn backend_calls(&self) -> Vec<(String, String)> {
        self.backend
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() != "/api/login")
            .map(|r| (r.method.to_string(), r.url.path().to_string()))
            .collect()
    }
}

/// `Location` header of a redirect, or an empty string.
#[must_use]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Respond to `method path` with a JSON body.
pub async fn mock_json(server: &MockServer, verb: &str, route: &str, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// A cart with one entry (Green curry x2 from restaurant 1).
#[must_use]
pub fn cart_with_one_entry() -> serde_json::Value {
    json!({
        "restaurants": [{
            "restaurant": {
                "id": 1,
                "name": "Auntie Maew Curry Rice",
                "pickup_time": "12:30",
                "pickup_location": "IT building"
            },
            "items": [{
                "id": 4,
                "menu_item_id": 10,
                "name": "Green curry",
                "price": 45,
                "quantity": 2,
                "note": "no chili",
                "total": 90
            }],
            "subtotal": 90
        }],
        "total": 90,
        "item_count": 2
    })
}

/// An empty cart.
#[must_use]
pub fn empty_cart() -> serde_json::Value {
    json!({"restaurants": [], "total": 0, "item_count": 0})
}
