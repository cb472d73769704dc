//! Shared page furniture and display formatting.
//!
//! Templates only print what they are given. Anything needing a decision
//! (which tab is active, how a timestamp reads, which actions an order
//! offers) is worked out here or in the page's own view structs.

use std::str::FromStr;

use axum::response::Redirect;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer};

use crate::models::CurrentUser;

/// Backend timestamps are naive UTC; pages show Thai local time.
const DISPLAY_UTC_OFFSET_SECS: i32 = 7 * 60 * 60;

// =============================================================================
// Navigation
// =============================================================================

/// Bottom navigation tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Cart,
    History,
    Profile,
    /// Pages reached from within a flow (menu, chat, management).
    None,
}

impl Tab {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Cart => "cart",
            Self::History => "history",
            Self::Profile => "profile",
            Self::None => "",
        }
    }
}

/// Header and navigation bar data shared by every logged-in page.
#[derive(Debug, Clone)]
pub struct Nav {
    pub user_name: String,
    pub active: Tab,
}

impl Nav {
    #[must_use]
    pub fn new(user: &CurrentUser, active: Tab) -> Self {
        Self {
            user_name: user.greeting_name().to_string(),
            active,
        }
    }

    /// CSS class for a navigation link.
    #[must_use]
    pub fn class(&self, tab: &str) -> &'static str {
        if self.active != Tab::None && self.active.as_str() == tab {
            "nav-link active"
        } else {
            "nav-link"
        }
    }
}

// =============================================================================
// Notices
// =============================================================================

/// `?error=` / `?success=` carried across a post/redirect/get.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Banner shown at the top of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Notice {
    /// A page-local error (validation failure, re-rendered form).
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            success: None,
        }
    }
}

impl From<NoticeQuery> for Notice {
    fn from(query: NoticeQuery) -> Self {
        let keep = |m: Option<String>| m.filter(|m| !m.trim().is_empty());
        Self {
            error: keep(query.error),
            success: keep(query.success),
        }
    }
}

/// Redirect to `path` with an error banner.
#[must_use]
pub fn redirect_with_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_param(path, "error", message))
}

/// Redirect to `path` with a success banner.
#[must_use]
pub fn redirect_with_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_param(path, "success", message))
}

/// Append a query parameter to a path that may already carry a query.
#[must_use]
pub fn with_param(path: &str, key: &str, value: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{key}={}", urlencoding::encode(value))
}

/// Deserialize an optional query or form value, treating a blank or
/// unparseable value as absent.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]` so a stale or
/// hand-edited link falls back to the page default instead of a 400.
///
/// # Errors
///
/// Only if the value is not a string at all.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()))
}

// =============================================================================
// Time
// =============================================================================

fn to_local(timestamp: NaiveDateTime) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(DISPLAY_UTC_OFFSET_SECS).map_or_else(
        || timestamp.and_utc().fixed_offset(),
        |offset| offset.from_utc_datetime(&timestamp),
    )
}

/// Clock time, e.g. `11:30`. Used for chat bubbles.
#[must_use]
pub fn clock_time(timestamp: NaiveDateTime) -> String {
    to_local(timestamp).format("%H:%M").to_string()
}

/// Day and time, e.g. `1 Mar 11:30`. Used for order cards.
#[must_use]
pub fn short_date(timestamp: NaiveDateTime) -> String {
    to_local(timestamp).format("%-d %b %H:%M").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hiwhiw_core::UserId;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_times_shift_to_thai_local() {
        assert_eq!(clock_time(at(4, 30)), "11:30");
        assert_eq!(short_date(at(20, 5)), "2 Mar 03:05");
    }

    #[test]
    fn test_with_param_encodes_and_joins() {
        assert_eq!(
            with_param("/cart", "error", "Your cart is empty"),
            "/cart?error=Your%20cart%20is%20empty"
        );
        assert_eq!(
            with_param("/my-restaurant/3?tab=menu", "success", "ok"),
            "/my-restaurant/3?tab=menu&success=ok"
        );
    }

    #[test]
    fn test_notice_drops_blank_messages() {
        let notice = Notice::from(NoticeQuery {
            error: Some("  ".to_string()),
            success: Some("Saved".to_string()),
        });
        assert_eq!(notice.error, None);
        assert_eq!(notice.success.as_deref(), Some("Saved"));
    }

    #[derive(Debug, Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "lenient")]
        with: Option<UserId>,
    }

    #[test]
    fn test_lenient_drops_blank_and_malformed_values() {
        let parse = |uri: &'static str| {
            let uri = axum::http::Uri::from_static(uri);
            axum::extract::Query::<Lenient>::try_from_uri(&uri)
                .unwrap()
                .0
                .with
        };
        assert_eq!(parse("/chat-delivery/3?with=9"), Some(UserId::new(9)));
        assert_eq!(parse("/chat-delivery/3?with="), None);
        assert_eq!(parse("/chat-delivery/3?with=abc"), None);
        assert_eq!(parse("/chat-delivery/3"), None);
    }

    #[test]
    fn test_nav_marks_active_tab() {
        let user = CurrentUser {
            id: UserId::new(1),
            username: "user1".to_string(),
            display_name: "Somchai".to_string(),
        };
        let nav = Nav::new(&user, Tab::Cart);
        assert_eq!(nav.class("cart"), "nav-link active");
        assert_eq!(nav.class("home"), "nav-link");
        assert_eq!(Nav::new(&user, Tab::None).class(""), "nav-link");
    }
}
