//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for OpenAI's Chat Completions API. A
//! response schema becomes a `json_schema` response format. Grounding tools
//! are not available on this endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{CompletionRequest, CompletionResponse, FinishReason, LlmClient, LlmError, Role, TokenUsage};
use crate::config::LlmConfig;

/// Name attached to the structured output format
const SCHEMA_NAME: &str = "trip_itinerary";

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Option<Duration>,
}

impl OpenAIClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config.get_api_key().map_err(|e| LlmError::Config(e.to_string()))?;

        let timeout = config.timeout_ms.map(Duration::from_millis);

        let mut builder = Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        let http = builder.build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, request: &CompletionRequest) -> Result<serde_json::Value, LlmError> {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        if let Some(tool) = request.grounding {
            return Err(LlmError::Unsupported {
                provider: "openai".to_string(),
                feature: format!("{} grounding", tool.as_str()),
            });
        }

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];
        messages.extend(request.messages.iter().map(|msg| {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            serde_json::json!({ "role": role, "content": msg.content })
        }));

        let max_tokens = request.max_tokens.min(self.max_tokens);

        // GPT-5.x and o1/o3 models use max_completion_tokens instead of max_tokens
        let uses_completion_tokens =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
        });

        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if let Some(schema) = &request.response_schema {
            debug!("build_request_body: adding json_schema response format");
            body["response_format"] = serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "schema": schema.to_json_schema(),
                    "strict": false,
                },
            });
        }

        Ok(body)
    }

    /// Parse the OpenAI API response
    fn parse_response(&self, api_response: OpenAIResponse) -> CompletionResponse {
        debug!(choices = api_response.choices.len(), "parse_response: called");
        let choice = api_response.choices.into_iter().next();

        let (content, finish_reason) = match choice {
            Some(c) => (
                c.message.content,
                c.finish_reason
                    .as_deref()
                    .map(FinishReason::from_openai)
                    .unwrap_or_default(),
            ),
            None => (None, FinishReason::Other("NO_CHOICES".to_string())),
        };

        CompletionResponse {
            content,
            grounding_sources: Vec::new(),
            finish_reason,
            usage: api_response
                .usage
                .map(|u| TokenUsage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                })
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    fn provider(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request)?;

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_send(e, self.timeout))?;

        if !response.status().is_success() {
            let err = LlmError::from_response(response).await;
            debug!(error = %err, "complete: request rejected");
            return Err(err);
        }

        let api_response: OpenAIResponse = response.json().await?;
        let parsed = self.parse_response(api_response);
        info!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            finish_reason = ?parsed.finish_reason,
            "complete: success"
        );
        Ok(parsed)
    }
}

// API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{GroundingTool, Message};
    use crate::schema::Schema;

    fn client(model: &str, max_tokens: u32) -> OpenAIClient {
        OpenAIClient {
            model: model.to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            http: Client::new(),
            max_tokens,
            timeout: None,
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: "You are helpful".to_string(),
            messages: vec![Message::user("Hello")],
            response_schema: None,
            grounding: None,
            temperature: 0.2,
            max_tokens: 1000,
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let body = client("gpt-4o", 8192).build_request_body(&request()).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are helpful");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_max_tokens_capped() {
        let mut req = request();
        req.max_tokens = 5000;
        let body = client("gpt-4o", 1000).build_request_body(&req).unwrap();
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_completion_tokens_for_reasoning_models() {
        let body = client("gpt-5-mini", 8192).build_request_body(&request()).unwrap();
        assert_eq!(body["max_completion_tokens"], 1000);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_schema_becomes_response_format() {
        let mut req = request();
        req.response_schema = Some(Schema::object().required("tripName", Schema::string()));
        let body = client("gpt-4o", 8192).build_request_body(&req).unwrap();

        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], SCHEMA_NAME);
        assert_eq!(body["response_format"]["json_schema"]["schema"]["type"], "object");
    }

    #[test]
    fn test_grounding_rejected() {
        let mut req = request();
        req.grounding = Some(GroundingTool::Maps);
        let err = client("gpt-4o", 8192).build_request_body(&req).unwrap_err();
        assert!(matches!(err, LlmError::Unsupported { .. }));
    }

    #[test]
    fn test_parse_response() {
        let raw = serde_json::json!({
            "choices": [{ "message": { "content": "{}" }, "finish_reason": "stop" }],
            "usage": { "prompt_tokens": 5, "completion_tokens": 7 }
        });
        let api: OpenAIResponse = serde_json::from_value(raw).unwrap();
        let parsed = client("gpt-4o", 8192).parse_response(api);

        assert_eq!(parsed.content.as_deref(), Some("{}"));
        assert_eq!(parsed.finish_reason, FinishReason::Stop);
        assert_eq!(parsed.usage.total(), 12);
    }
}
