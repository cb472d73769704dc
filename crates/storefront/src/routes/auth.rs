//! Login and logout.
//!
//! Credentials go straight to the backend; the storefront never sees more
//! than the user record the backend returns.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{LOGIN_PATH, OptionalSession, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::views::{Notice, NoticeQuery};

/// Where users land after logging in.
pub const HOME_PATH: &str = "/home";

/// Shown when either credential is blank.
pub const MISSING_CREDENTIALS: &str = "Please enter username and password";

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub notice: Notice,
}

/// Display the login page, or send a logged-in user on to the home page.
pub async fn login_page(
    OptionalSession(user): OptionalSession,
    Query(query): Query<NoticeQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to(HOME_PATH).into_response();
    }

    LoginTemplate {
        username: String::new(),
        notice: query.into(),
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let username = form.username.trim().to_string();
    if username.is_empty() || form.password.trim().is_empty() {
        return LoginTemplate {
            username,
            notice: Notice::error(MISSING_CREDENTIALS),
        }
        .into_response();
    }

    let password = SecretString::from(form.password);
    let response = match state.api().login(&username, &password).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(username = %username, error = %e, "Login failed");
            return LoginTemplate {
                username,
                notice: Notice::error(e.user_message()),
            }
            .into_response();
        }
    };

    let user: CurrentUser = response.user;
    if let Err(e) = set_current_user(&session, &user).await {
        return AppError::from(e).into_response();
    }

    set_sentry_user(&user.id, Some(&user.username));
    add_breadcrumb("auth", "Logged in", None);
    tracing::info!(user_id = %user.id, "User logged in");

    Redirect::to(HOME_PATH).into_response()
}

/// Log out.
///
/// The session is cleared whatever the backend says.
pub async fn logout(
    State(state): State<AppState>,
    OptionalSession(user): OptionalSession,
    session: Session,
) -> Redirect {
    if let Some(user) = user {
        if let Err(e) = state.api().logout(user.id).await {
            tracing::warn!(user_id = %user.id, error = %e, "Backend logout failed");
        }
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    clear_sentry_user();

    Redirect::to(LOGIN_PATH)
}
