//! Login, logout and auth check.

use hiwhiw_core::UserId;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::{Acknowledgement, ApiClient, ApiError, AuthStatus, LoginRequest, LoginResponse};

impl ApiClient {
    /// Log in with a username and password.
    ///
    /// This is the only call made without an identity header.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` with the backend's message when the
    /// credentials are rejected.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };
        self.execute(self.request(Method::POST, "/login", None).json(&body))
            .await
    }

    /// Tell the backend the user is logging out.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn logout(&self, user: UserId) -> Result<Acknowledgement, ApiError> {
        self.execute(self.request(Method::POST, "/logout", Some(user)))
            .await
    }

    /// Ask the backend whether `user` is still a known, authenticated user.
    ///
    /// A 401 is an answer, not a failure: it maps to an unauthenticated
    /// status.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures and any other non-success
    /// status.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn check_auth(&self, user: UserId) -> Result<AuthStatus, ApiError> {
        match self
            .execute(self.request(Method::GET, "/check-auth", Some(user)))
            .await
        {
            Err(ApiError::Server { status, .. }) if status == StatusCode::UNAUTHORIZED => {
                Ok(AuthStatus::default())
            }
            other => other,
        }
    }
}
