//! Types for the Gemini API.
//!
//! These types match the Gemini `generateContent` REST format for function
//! calling.

use serde::{Deserialize, Serialize};

/// A turn in a Gemini conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The role of the turn ("user" or "model").
    pub role: String,
    /// The parts making up the turn.
    pub parts: Vec<Part>,
}

impl Content {
    /// A user text turn.
    #[must_use]
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// A model text turn.
    #[must_use]
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// A function-response turn carrying a tool's output back to the model.
    ///
    /// Function responses are sent under the "user" role per the
    /// `generateContent` contract.
    #[must_use]
    pub fn function_response(name: impl Into<String>, response: serde_json::Value) -> Self {
        let name = name.into();
        Self {
            role: "user".to_string(),
            parts: vec![Part::FunctionResponse {
                function_response: FunctionResponse { name, response },
            }],
        }
    }

    /// The first function call in this turn, if any.
    ///
    /// Only the first call is honored; the tool surface is a single
    /// function and parallel calls are not supported.
    #[must_use]
    pub fn first_function_call(&self) -> Option<&FunctionCall> {
        self.parts.iter().find_map(|part| match part {
            Part::FunctionCall { function_call } => Some(function_call),
            _ => None,
        })
    }

    /// All text parts concatenated, or `None` if the turn has no text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let mut out = String::new();
        for part in &self.parts {
            if let Part::Text { text } = part {
                out.push_str(text);
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }
}

/// One part of a [`Content`] turn.
///
/// Untagged: the variants are distinguished by their unique field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text.
    Text {
        /// The text content.
        text: String,
    },
    /// A function call requested by the model.
    FunctionCall {
        /// The call details.
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
    },
    /// A function result sent back to the model.
    FunctionResponse {
        /// The response details.
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
}

/// A function call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the declared function.
    pub name: String,
    /// Arguments as a JSON object.
    #[serde(default)]
    pub args: serde_json::Value,
}

/// A function result returned to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// Name of the function that produced this result.
    pub name: String,
    /// The result payload.
    pub response: serde_json::Value,
}

/// A function the model may call.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    /// Function name.
    pub name: String,
    /// What the function does, for the model's benefit.
    pub description: String,
    /// Parameter schema in the Gemini schema dialect.
    pub parameters: serde_json::Value,
}

/// Request body for `generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    /// Conversation so far.
    pub contents: Vec<Content>,
    /// System prompt.
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    /// Declared tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDeclarations>>,
}

/// System prompt wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInstruction {
    /// Prompt parts.
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    /// A text-only system prompt.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text { text: text.into() }],
        }
    }
}

/// Tool wrapper holding function declarations.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclarations {
    /// The declared functions.
    #[serde(rename = "functionDeclarations")]
    pub function_declarations: Vec<FunctionDeclaration>,
}

/// Response body from `generateContent`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    /// Candidate completions; the first is used.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One candidate completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// The generated turn.
    pub content: Option<Content>,
    /// Why generation stopped (e.g. "STOP", "MAX_TOKENS").
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_part_roundtrip() {
        let part: Part = serde_json::from_str(r#"{"text":"hello"}"#).expect("deserialize");
        assert!(matches!(part, Part::Text { ref text } if text == "hello"));
    }

    #[test]
    fn test_function_call_part_deserializes() {
        let json = r#"{"functionCall":{"name":"search_products","args":{"query":"shoes"}}}"#;
        let part: Part = serde_json::from_str(json).expect("deserialize");
        match part {
            Part::FunctionCall { function_call } => {
                assert_eq!(function_call.name, "search_products");
                assert_eq!(function_call.args["query"], "shoes");
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_function_call_args_default_to_null() {
        let json = r#"{"functionCall":{"name":"search_products"}}"#;
        let part: Part = serde_json::from_str(json).expect("deserialize");
        match part {
            Part::FunctionCall { function_call } => {
                assert!(function_call.args.is_null());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_first_function_call_skips_text() {
        let content = Content {
            role: "model".to_string(),
            parts: vec![
                Part::Text {
                    text: "Let me look".to_string(),
                },
                Part::FunctionCall {
                    function_call: FunctionCall {
                        name: "search_products".to_string(),
                        args: serde_json::json!({}),
                    },
                },
            ],
        };
        let call = content.first_function_call().expect("call");
        assert_eq!(call.name, "search_products");
    }

    #[test]
    fn test_text_concatenates_parts() {
        let content = Content {
            role: "model".to_string(),
            parts: vec![
                Part::Text {
                    text: "Hello ".to_string(),
                },
                Part::Text {
                    text: "world".to_string(),
                },
            ],
        };
        assert_eq!(content.text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_system_instruction_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text("hi")],
            system_instruction: Some(SystemInstruction::text("be helpful")),
            tools: None,
        };
        let json = serde_json::to_string(&request).expect("serialize");
        assert!(json.contains("\"systemInstruction\""));
        assert!(!json.contains("\"tools\""));
    }
}
