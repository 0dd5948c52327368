//! Cart ownership.
//!
//! Every cart row is scoped to exactly one [`Owner`]: either an
//! authenticated user (stable id from the users table) or an anonymous
//! guest (opaque random id carried in a cookie). An `Owner` is computed
//! fresh per request and never persisted as a value - only its id survives,
//! via the session, the guest cookie, or a cart row's foreign key.

use tidepool_core::{GuestId, UserId};

/// The identity a cart is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Authenticated user.
    User(UserId),
    /// Anonymous guest identified by cookie.
    Guest(GuestId),
}

impl Owner {
    /// Short kind label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Guest(_) => "guest",
        }
    }

    /// Whether this owner is an anonymous guest.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest(_))
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Guest(id) => write!(f, "guest:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_kind() {
        assert_eq!(Owner::Guest(GuestId::random()).kind(), "guest");
        assert_eq!(Owner::User(UserId::random()).kind(), "user");
    }

    #[test]
    fn test_owner_display_includes_id() {
        let id = GuestId::random();
        let owner = Owner::Guest(id);
        assert_eq!(owner.to_string(), format!("guest:{id}"));
    }
}
