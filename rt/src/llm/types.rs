//! LLM request/response types for roadtrip
//!
//! Provider-agnostic shapes; each client translates them to its wire format.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::Schema;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction
    pub system_prompt: String,

    /// Conversation messages (a single user message for trip planning)
    pub messages: Vec<Message>,

    /// Formal output schema; when set the provider must return bare JSON
    pub response_schema: Option<Schema>,

    /// Real-world lookup capability offered to the model
    pub grounding: Option<GroundingTool>,

    /// Sampling temperature
    pub temperature: f32,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Lookup capability the service may consult while generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroundingTool {
    /// Mapping/geocoding lookups
    #[default]
    Maps,
    /// General web search
    Search,
}

impl GroundingTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maps => "maps",
            Self::Search => "search",
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Sources the service consulted, reported in tool-augmented calls
    pub grounding_sources: Vec<GroundingSource>,

    /// Why the model stopped
    pub finish_reason: FinishReason,

    /// Token usage for cost tracking
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Plain text response with no metadata
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// A source the service cited while grounding its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingSource {
    pub title: Option<String>,
    pub uri: String,
}

/// Why the model stopped generating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FinishReason {
    #[default]
    Stop,
    MaxTokens,
    Safety,
    Other(String),
}

impl FinishReason {
    /// Parse from Gemini's finishReason string
    pub fn from_gemini(s: &str) -> Self {
        debug!(%s, "FinishReason::from_gemini: called");
        match s {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => FinishReason::Safety,
            other => FinishReason::Other(other.to_string()),
        }
    }

    /// Parse from OpenAI's finish_reason string
    pub fn from_openai(s: &str) -> Self {
        debug!(%s, "FinishReason::from_openai: called");
        match s {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::MaxTokens,
            "content_filter" => FinishReason::Safety,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let m = Message::user("hello");
        assert_eq!(m.role, Role::User);
        assert_eq!(m.content, "hello");
    }

    #[test]
    fn test_finish_reason_parsing() {
        assert_eq!(FinishReason::from_gemini("STOP"), FinishReason::Stop);
        assert_eq!(FinishReason::from_gemini("MAX_TOKENS"), FinishReason::MaxTokens);
        assert_eq!(FinishReason::from_gemini("SAFETY"), FinishReason::Safety);
        assert_eq!(
            FinishReason::from_gemini("MALFORMED_FUNCTION_CALL"),
            FinishReason::Other("MALFORMED_FUNCTION_CALL".to_string())
        );
        assert_eq!(FinishReason::from_openai("length"), FinishReason::MaxTokens);
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            input_tokens: 1200,
            output_tokens: 800,
        };
        assert_eq!(usage.total(), 2000);
    }

    #[test]
    fn test_grounding_tool_serde() {
        let tool: GroundingTool = serde_json::from_str("\"search\"").unwrap();
        assert_eq!(tool, GroundingTool::Search);
        assert_eq!(GroundingTool::default().as_str(), "maps");
    }
}
