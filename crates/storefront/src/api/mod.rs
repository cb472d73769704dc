//! Client for the Hiw-Hiw backend REST API.
//!
//! # Architecture
//!
//! - One request path for every endpoint: JSON content type, optional
//!   `X-User-Id` identity header, JSON response body
//! - The backend is the source of truth - no caching, no local sync
//! - One attempt per call: no retry, no backoff, a per-request timeout only
//! - Every failure collapses into [`ApiError`]
//!
//! The identity is passed explicitly by the caller (usually the
//! [`CurrentUser`](crate::models::CurrentUser) taken from the session).
//! Calls made with `None` are anonymous.
//!
//! # Example
//!
//! ```rust,ignore
//! use hiwhiw_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let user = client.login("user1", &SecretString::from("password1")).await?.user;
//! let cart = client.cart(user.id).await?;
//! ```

mod auth;
mod cart;
mod messages;
mod orders;
mod restaurants;
pub mod types;
mod users;

pub use types::*;

use std::sync::Arc;

use hiwhiw_core::UserId;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ApiConfig;

/// Header carrying the caller's user ID.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Message used when a failed response carries no `error` field.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Server {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// Server-supplied `error` message, or [`DEFAULT_ERROR_MESSAGE`].
        message: String,
    },
}

impl ApiError {
    /// Message suitable for showing to the user.
    ///
    /// Server messages are passed through; transport and parse failures
    /// collapse into the generic message.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Server { message, .. } => message,
            Self::Http(_) | Self::Parse(_) => DEFAULT_ERROR_MESSAGE,
        }
    }

    /// HTTP status returned by the backend, if it answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }
}

/// Body of a failed backend response.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the backend REST API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialization failure).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Start a request to `endpoint`, attaching the identity header when a
    /// user is given.
    fn request(&self, method: Method, endpoint: &str, identity: Option<UserId>) -> RequestBuilder {
        let url = format!("{}{endpoint}", self.inner.base_url);
        let builder = self
            .inner
            .client
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match identity {
            Some(user_id) => builder.header(USER_ID_HEADER, user_id.to_string()),
            None => builder,
        }
    }

    /// Send a request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
            tracing::warn!(status = %status, message = %message, "Backend returned non-success status");
            return Err(ApiError::Server { status, message });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hiwhiw_core::RestaurantId;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig::new(format!("{}/api", server.uri()))).unwrap()
    }

    #[tokio::test]
    async fn test_identity_header_attached_when_user_given() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .and(header("X-User-Id", "7"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "restaurants": [],
                "total": 0,
                "item_count": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cart = client_for(&server).await.cart(UserId::new(7)).await.unwrap();
        assert_eq!(cart.item_count, 0);
    }

    #[tokio::test]
    async fn test_anonymous_call_has_no_identity_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Login successful",
                "user": {"id": 1, "username": "user1", "display_name": "Somchai"}
            })))
            .mount(&server)
            .await;

        let password = secrecy::SecretString::from("password1");
        let response = client_for(&server)
            .await
            .login("user1", &password)
            .await
            .unwrap();
        assert_eq!(response.user.id, UserId::new(1));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("x-user-id"));
    }

    #[tokio::test]
    async fn test_server_error_message_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Cart is empty"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .create_order(UserId::new(1))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Cart is empty");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_server_error_without_message_uses_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/restaurants/9"))
            .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .restaurant(UserId::new(1), RestaurantId::new(9))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_unparseable_success_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/restaurants"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .restaurants(UserId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
        assert_eq!(err.user_message(), DEFAULT_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_single_attempt_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/history"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).await.order_history(UserId::new(1)).await;
        assert!(result.is_err());
    }
}
