//! Gemini API client implementation
//!
//! Implements the LlmClient trait for the `generateContent` endpoint. A
//! response schema becomes `generationConfig.responseSchema`; a grounding
//! tool becomes an entry in `tools`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{
    CompletionRequest, CompletionResponse, FinishReason, GroundingSource, GroundingTool, LlmClient, LlmError, Role,
    TokenUsage,
};
use crate::config::LlmConfig;

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Option<Duration>,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
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

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let contents: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": msg.content }],
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": request.system_prompt }] },
            "contents": contents,
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens.min(self.max_tokens),
            },
        });

        if let Some(schema) = &request.response_schema {
            debug!("build_request_body: adding response schema");
            body["generationConfig"]["responseMimeType"] = serde_json::json!("application/json");
            body["generationConfig"]["responseSchema"] = schema.to_gemini();
        }

        if let Some(tool) = request.grounding {
            debug!(tool = %tool.as_str(), "build_request_body: adding grounding tool");
            let key = match tool {
                GroundingTool::Maps => "googleMaps",
                GroundingTool::Search => "googleSearch",
            };
            let mut entry = serde_json::Map::new();
            entry.insert(key.to_string(), serde_json::json!({}));
            body["tools"] = serde_json::json!([entry]);
        }

        body
    }

    /// Parse the Gemini API response
    fn parse_response(&self, api_response: GeminiResponse) -> CompletionResponse {
        debug!(candidates = api_response.candidates.len(), "parse_response: called");

        let usage = api_response
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        let Some(candidate) = api_response.candidates.into_iter().next() else {
            let reason = api_response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| FinishReason::from_gemini(&r))
                .unwrap_or(FinishReason::Other("NO_CANDIDATES".to_string()));
            return CompletionResponse {
                content: None,
                grounding_sources: Vec::new(),
                finish_reason: reason,
                usage,
            };
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let grounding_sources = candidate
            .grounding_metadata
            .map(|m| {
                m.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web.or(chunk.maps))
                    .filter_map(|source| {
                        source.uri.map(|uri| GroundingSource {
                            title: source.title,
                            uri,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        CompletionResponse {
            content: (!text.is_empty()).then_some(text),
            grounding_sources,
            finish_reason: candidate
                .finish_reason
                .as_deref()
                .map(FinishReason::from_gemini)
                .unwrap_or_default(),
            usage,
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.clone())
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

        let api_response: GeminiResponse = response.json().await?;
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
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
    grounding_metadata: Option<GeminiGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GeminiGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GeminiGroundingChunk {
    web: Option<GeminiSource>,
    maps: Option<GeminiSource>,
}

#[derive(Debug, Deserialize)]
struct GeminiSource {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
