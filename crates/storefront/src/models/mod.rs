//! Domain types for the storefront.
//!
//! These are validated domain objects separate from raw database rows and
//! request payloads.

pub mod cart;
pub mod chat;
pub mod owner;
pub mod product;
pub mod user;

pub use cart::CartLine;
pub use chat::{ChatRole, ChatTurn};
pub use owner::Owner;
pub use product::Product;
pub use user::CurrentUser;

/// Session keys for data stored via tower-sessions.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for Google OAuth state (CSRF protection).
    pub const GOOGLE_OAUTH_STATE: &str = "google_oauth_state";
}
