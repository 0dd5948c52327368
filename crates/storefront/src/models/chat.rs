//! Chat conversation types.
//!
//! The chat widget sends its full history with every request; there is no
//! server-side conversation store.

use serde::{Deserialize, Serialize};

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// End user.
    User,
    /// Generative model.
    Model,
}

/// One prior turn in the conversation, as supplied by the client.
///
/// Only plain text survives the round trip to the client; tool-call turns
/// exist solely inside a single request's agent loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who spoke.
    pub role: ChatRole,
    /// What was said.
    pub text: String,
}
