//! LLM Client module for roadtrip
//!
//! Provides the planning service seam and its provider implementations.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use types::{
    CompletionRequest, CompletionResponse, FinishReason, GroundingSource, GroundingTool, Message, Role, TokenUsage,
};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "gemini" and "openai" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::Config(format!(
                "Unknown LLM provider: '{}'. Supported: gemini, openai",
                other
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_unknown_provider() {
        let config = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[test]
    #[serial]
    fn test_missing_api_key() {
        let config = LlmConfig {
            api_key_env: "ROADTRIP_FACTORY_KEY_UNSET".to_string(),
            ..Default::default()
        };
        unsafe { std::env::remove_var("ROADTRIP_FACTORY_KEY_UNSET") };
        let err = create_client(&config).err().unwrap();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    #[serial]
    fn test_creates_each_provider() {
        unsafe { std::env::set_var("ROADTRIP_FACTORY_KEY", "k") };
        for provider in ["gemini", "openai"] {
            let config = LlmConfig {
                provider: provider.to_string(),
                api_key_env: "ROADTRIP_FACTORY_KEY".to_string(),
                ..Default::default()
            };
            let client = create_client(&config).unwrap();
            assert_eq!(client.provider(), provider);
        }
        unsafe { std::env::remove_var("ROADTRIP_FACTORY_KEY") };
    }
}
