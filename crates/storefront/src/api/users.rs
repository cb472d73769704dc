//! User profile.

use hiwhiw_core::UserId;
use reqwest::Method;
use tracing::instrument;

use super::{Acknowledgement, ApiClient, ApiError, Profile, ProfileUpdate};

impl ApiClient {
    /// Fetch the user's profile and owned restaurants.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn profile(&self, user: UserId) -> Result<Profile, ApiError> {
        self.execute(self.request(Method::GET, "/user/profile", Some(user)))
            .await
    }

    /// Change the user's display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn update_profile(
        &self,
        user: UserId,
        display_name: &str,
    ) -> Result<Acknowledgement, ApiError> {
        self.execute(
            self.request(Method::PUT, "/user/profile", Some(user))
                .json(&ProfileUpdate { display_name }),
        )
        .await
    }
}
