//! Storefront-side models.
//!
//! Backend entities live in [`crate::api::types`]; this module only holds
//! what the storefront itself keeps in the session.

pub mod session;

pub use session::CurrentUser;
pub use session::keys as session_keys;
