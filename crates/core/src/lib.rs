//! Tidepool Core - Shared types library.
//!
//! Common types used by the Tidepool storefront: type-safe entity IDs and
//! a validated email address.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
