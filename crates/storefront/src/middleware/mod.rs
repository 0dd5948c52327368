//! Middleware and request extractors.

pub mod auth;
pub mod identity;
pub mod session;

pub use auth::OptionalAuth;
pub use identity::{current_owner, resolve_or_create_owner};
pub use session::create_session_layer;
