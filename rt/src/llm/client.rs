//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// This is the only seam between the planner and the external service.
/// Implementations send exactly one request per call and never retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name for logging
    fn provider(&self) -> &str;

    /// Send a single completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
