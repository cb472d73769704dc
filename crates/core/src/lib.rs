//! Hiw-Hiw Core - Shared types library.
//!
//! This crate provides common types used across the Hiw-Hiw components:
//! - `storefront` - Server-rendered pickup-ordering front end
//! - `integration-tests` - End-to-end tests against a mocked backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The
//! backend REST API is the source of truth for every entity; these types
//! only give its JSON shapes stronger names.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
