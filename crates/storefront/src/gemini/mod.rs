//! Gemini API client for the shopping assistant.
//!
//! The [`client::GenerativeModel`] and [`tools::ToolRunner`] traits are the
//! seams the assistant service is written against; production wires in
//! [`GeminiClient`] and [`ProductTools`], tests substitute scripted fakes.

pub mod client;
pub mod error;
pub mod tools;
pub mod types;

pub use client::{GeminiClient, GenerativeModel};
pub use error::GeminiError;
pub use tools::{ProductTools, ToolError, ToolRunner};
pub use types::{Content, FunctionCall, FunctionDeclaration, Part};
