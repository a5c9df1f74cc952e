//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Unsupported by provider {provider}: {feature}")]
    Unsupported { provider: String, feature: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Whether re-invoking later could plausibly succeed
    ///
    /// Nothing is retried automatically; this only informs logging.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::ApiError { status, .. } => *status >= 500 || *status == 408,
            LlmError::Network(_) => true,
            LlmError::Timeout(_) => true,
            LlmError::InvalidResponse(_) => false,
            LlmError::Unsupported { .. } => false,
            LlmError::Config(_) => false,
        }
    }

    /// Error for a non-success HTTP response
    ///
    /// 429 honours a numeric `retry-after` header, defaulting to 60 seconds.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(60);
            return LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            };
        }
        let message = response.text().await.unwrap_or_default();
        LlmError::ApiError { status, message }
    }

    /// Map a send failure, recognising client-side timeouts
    pub(crate) fn from_send(error: reqwest::Error, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(limit) if error.is_timeout() => LlmError::Timeout(limit),
            _ => LlmError::Network(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transient() {
        // Rate limited is transient
        assert!(
            LlmError::RateLimited {
                retry_after: Duration::from_secs(60)
            }
            .is_transient()
        );

        // 5xx errors are transient
        assert!(
            LlmError::ApiError {
                status: 503,
                message: "Unavailable".to_string()
            }
            .is_transient()
        );

        // 4xx errors are not
        assert!(
            !LlmError::ApiError {
                status: 400,
                message: "Bad request".to_string()
            }
            .is_transient()
        );

        assert!(LlmError::Timeout(Duration::from_secs(30)).is_transient());
        assert!(!LlmError::InvalidResponse("Bad JSON".to_string()).is_transient());
        assert!(
            !LlmError::Unsupported {
                provider: "openai".to_string(),
                feature: "grounding".to_string()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_display() {
        let err = LlmError::ApiError {
            status: 403,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error 403: quota exceeded");
    }
}
