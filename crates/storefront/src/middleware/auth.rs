//! Session guard.
//!
//! Every page except login is guarded by [`RequireSession`]: it reads the
//! stored [`CurrentUser`] and, if there is none, answers with a redirect to
//! the login page before the handler runs. No backend call is made for a
//! request that fails the guard.
//!
//! This is a presence check only. The backend decides what the user may do.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Path unauthenticated requests are sent to.
pub const LOGIN_PATH: &str = "/";

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn cart_page(
///     State(state): State<AppState>,
///     RequireSession(user): RequireSession,
/// ) -> impl IntoResponse {
///     let cart = state.api().cart(user.id).await;
///     // ...
/// }
/// ```
pub struct RequireSession(pub CurrentUser);

/// Rejection for requests without a session user.
#[derive(Debug)]
pub enum SessionRejection {
    /// Redirect to the login page (page and form requests).
    RedirectToLogin,
    /// Unauthorized response (event streams, which cannot follow redirects).
    Unauthorized,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_stream = parts.uri.path().ends_with("/stream");
        let reject = || {
            if is_stream {
                SessionRejection::Unauthorized
            } else {
                SessionRejection::RedirectToLogin
            }
        };

        // Set by SessionManagerLayer
        let session = parts.extensions.get::<Session>().ok_or_else(reject)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(reject)?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Used by the login page, which sends logged-in users straight on.
pub struct OptionalSession(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the logged-in user in the session.
///
/// The session ID is cycled first so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Replace the stored user after a profile change, keeping the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn update_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Remove the user from the session and drop the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session.flush().await
}
