//! Shared newtype wrappers.
//!
//! - [`id`] - Type-safe entity IDs
//! - [`email`] - Validated email addresses

pub mod email;
pub mod id;

pub use email::{Email, EmailError};
pub use id::{CartLineId, GuestId, ProductId, UserId};
