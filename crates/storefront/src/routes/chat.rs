//! Shopping assistant endpoint.
//!
//! The chat widget is stateless on the server: each request carries the
//! full prior conversation, and the response includes both the raw
//! Markdown (for the client to resend as history) and rendered HTML.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::markdown::RenderableDocument;
use crate::models::ChatTurn;
use crate::state::AppState;

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's new message.
    pub message: String,
    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Response body for the chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Always "model".
    pub role: &'static str,
    /// Raw Markdown reply, for the client to resend as history.
    pub content: String,
    /// Rendered HTML for display.
    pub renderable: RenderableDocument,
}

/// Produce an assistant reply.
///
/// Failures surface as `{"error": "..."}` with a server-error status.
///
/// # Route
///
/// `POST /api/chat`
#[instrument(skip_all, fields(history_len = request.history.len()))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let reply = state
        .assistant()
        .reply(&request.history, &request.message)
        .await?;

    Ok(Json(ChatResponse {
        role: "model",
        content: reply.text,
        renderable: reply.renderable,
    }))
}
