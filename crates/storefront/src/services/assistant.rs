//! Shopping assistant service.
//!
//! Orchestrates the conversation with the model:
//! 1. Convert the client-supplied history to model format
//! 2. Call the model with the catalog search tool declared
//! 3. Execute requested searches and feed results back
//! 4. Loop until the model answers with text, bounded by a round cap

use tracing::{info, instrument, warn};

use crate::gemini::tools::search_products_declaration;
use crate::gemini::{
    Content, FunctionDeclaration, GeminiError, GenerativeModel, ToolError, ToolRunner,
};
use crate::markdown::{RenderableDocument, render_reply};
use crate::models::{ChatRole, ChatTurn};

/// System prompt for the shopping assistant.
const SYSTEM_PROMPT: &str = "\
You are a friendly shopping assistant for an online store that sells \
Electronics, Clothing, Shoes, and Accessories.

Use the search_products function to look up real products whenever the \
user asks about merchandise, prices, or availability. Never invent \
products or prices; only recommend items returned by the search. If a \
search comes back empty, say so and suggest broadening the request.

Answer in short Markdown without tables. When you list products, bold \
each name and include its price.";

/// Maximum model rounds per request to prevent infinite tool loops.
const MAX_TOOL_ROUNDS: usize = 6;

/// Errors that can occur while producing an assistant reply.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Model API error.
    #[error("model error: {0}")]
    Model(#[from] GeminiError),

    /// The model requested a tool that was never declared.
    #[error("model requested unknown tool: {0}")]
    UnknownTool(String),

    /// The model kept requesting tools past the round cap.
    #[error("too many tool rounds")]
    TooManyToolRounds,

    /// The model produced a turn with neither text nor a tool call.
    #[error("model produced an empty reply")]
    EmptyReply,
}

impl From<ToolError> for AssistantError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::UnknownTool(name) => Self::UnknownTool(name),
            ToolError::Gemini(err) => Self::Model(err),
        }
    }
}

/// A completed assistant reply.
#[derive(Debug, Clone)]
pub struct AssistantReply {
    /// The raw Markdown text, echoed back so the client can resend it as
    /// history.
    pub text: String,
    /// The rendered HTML for display.
    pub renderable: RenderableDocument,
}

/// Shopping assistant service, generic over its model and tool backends.
pub struct AssistantService<M, T> {
    model: M,
    tools: T,
}

impl<M: GenerativeModel, T: ToolRunner> AssistantService<M, T> {
    /// Create a new assistant service.
    #[must_use]
    pub const fn new(model: M, tools: T) -> Self {
        Self { model, tools }
    }

    /// Produce a reply to `message` given the prior conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the model fails, requests an unknown tool, or
    /// exceeds the tool round cap.
    #[instrument(skip_all, fields(history_len = history.len()))]
    pub async fn reply(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<AssistantReply, AssistantError> {
        let mut contents: Vec<Content> = history.iter().map(to_content).collect();
        contents.push(Content::user_text(message));

        let declarations: Vec<FunctionDeclaration> = vec![search_products_declaration()];

        for round in 1..=MAX_TOOL_ROUNDS {
            let turn = self
                .model
                .generate(SYSTEM_PROMPT, contents.clone(), &declarations)
                .await?;

            if let Some(call) = turn.first_function_call() {
                info!(round, tool = %call.name, "executing tool call");

                let call = call.clone();
                let result = self.tools.run(&call).await?;

                contents.push(turn);
                contents.push(Content::function_response(call.name, result));
                continue;
            }

            let Some(text) = turn.text() else {
                return Err(AssistantError::EmptyReply);
            };

            return Ok(AssistantReply {
                renderable: render_reply(&text),
                text,
            });
        }

        warn!("model exceeded tool round cap");
        Err(AssistantError::TooManyToolRounds)
    }
}

/// Convert a client history turn to model format.
fn to_content(turn: &ChatTurn) -> Content {
    match turn.role {
        ChatRole::User => Content::user_text(&turn.text),
        ChatRole::Model => Content::model_text(&turn.text),
    }
}
