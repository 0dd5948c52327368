//! Error types for Gemini API interactions.

use serde::Deserialize;

/// Errors from the Gemini API client.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rate limited by the API (contains retry-after seconds).
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// API key rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Structured error returned by the API.
    #[error("API error ({status}): {message}")]
    Api {
        /// Error status (e.g. "INVALID_ARGUMENT").
        status: String,
        /// Human-readable message.
        message: String,
    },

    /// The API returned no usable candidate.
    #[error("Empty response from model")]
    EmptyResponse,
}

/// Error response body from the Gemini API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// The error details.
    pub error: ApiErrorDetail,
}

/// Inner error details.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    /// HTTP status code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Status string (e.g. "RESOURCE_EXHAUSTED").
    pub status: String,
}
