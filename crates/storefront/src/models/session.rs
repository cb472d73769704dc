//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use hiwhiw_core::UserId;

/// Session-stored user identity.
///
/// Returned by the backend on login and kept for the life of the session.
/// Every backend call made on the user's behalf carries `id` as its
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Name shown to other users.
    pub display_name: String,
}

impl CurrentUser {
    /// Name to greet the user with, falling back to the login name.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_name_falls_back_to_username() {
        let mut user = CurrentUser {
            id: UserId::new(1),
            username: "user1".to_string(),
            display_name: "Somchai".to_string(),
        };
        assert_eq!(user.greeting_name(), "Somchai");

        user.display_name = "  ".to_string();
        assert_eq!(user.greeting_name(), "user1");
    }
}
