//! Session-stored user identity.

use serde::{Deserialize, Serialize};

use tidepool_core::{Email, UserId};

/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}
