//! Profile page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::Profile;
use crate::middleware::{RequireSession, update_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::views::{Nav, Notice, NoticeQuery, Tab, redirect_with_error, redirect_with_success};

const PROFILE_PATH: &str = "/profile";

/// Display name form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub display_name: String,
}

/// A restaurant the user runs.
#[derive(Debug, Clone)]
pub struct OwnedRestaurantView {
    pub id: String,
    pub name: String,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub notice: Notice,
    pub username: String,
    pub display_name: String,
    pub restaurants: Vec<OwnedRestaurantView>,
}

/// Display the profile.
///
/// Falls back to the session copy of the user if the backend is unavailable.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Query(notice): Query<NoticeQuery>,
) -> ProfileTemplate {
    let profile = state.api().profile(user.id).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch profile");
        Profile {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            restaurants: Vec::new(),
        }
    });

    ProfileTemplate {
        nav: Nav::new(&user, Tab::Profile),
        notice: notice.into(),
        username: profile.username,
        display_name: profile.display_name,
        restaurants: profile
            .restaurants
            .into_iter()
            .map(|r| OwnedRestaurantView {
                id: r.id.to_string(),
                name: r.name,
            })
            .collect(),
    }
}

/// Change the display name, then refresh the session copy.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Redirect {
    let display_name = form.display_name.trim();
    if display_name.is_empty() {
        return redirect_with_error(PROFILE_PATH, "Display name cannot be empty");
    }

    if let Err(e) = state.api().update_profile(user.id, display_name).await {
        tracing::error!(error = %e, "Failed to update profile");
        return redirect_with_error(
            PROFILE_PATH,
            &format!("Could not update profile: {}", e.user_message()),
        );
    }

    let updated = CurrentUser {
        display_name: display_name.to_string(),
        ..user
    };
    if let Err(e) = update_current_user(&session, &updated).await {
        tracing::error!("Failed to refresh session user: {}", e);
    }

    redirect_with_success(PROFILE_PATH, "Profile updated")
}
