//! Planning error types

use thiserror::Error;

use crate::domain::ValidationError;
use crate::llm::LlmError;
use crate::schema::SchemaViolation;

/// Shown to the user for any generation failure that is not their input
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate trip plan. Please check your internet connection or try fewer destinations.";

/// Errors that can occur while generating a plan
#[derive(Debug, Error)]
pub enum PlanError {
    /// Input rejected before any service call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Planning service failed: {0}")]
    Service(#[from] LlmError),

    /// Reply is not a JSON document, even after fence stripping
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    /// Reply parses but does not match the itinerary contract
    #[error("Schema violation at {path}: {reason}")]
    SchemaViolation { path: String, reason: String },

    #[error("A trip plan is already being generated")]
    AlreadyGenerating,

    #[error("Prompt template error: {0}")]
    Prompt(String),
}

impl PlanError {
    /// Message suitable for the user; details stay in the log
    pub fn user_message(&self) -> String {
        match self {
            PlanError::InvalidInput(message) => message.clone(),
            PlanError::AlreadyGenerating => self.to_string(),
            _ => GENERATION_FAILED_MESSAGE.to_string(),
        }
    }
}

impl From<SchemaViolation> for PlanError {
    fn from(violation: SchemaViolation) -> Self {
        PlanError::SchemaViolation {
            path: violation.path,
            reason: violation.reason,
        }
    }
}

impl From<ValidationError> for PlanError {
    fn from(error: ValidationError) -> Self {
        PlanError::InvalidInput(error.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_failures_collapse_to_banner() {
        let err = PlanError::Service(LlmError::ApiError {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);

        let err = PlanError::MalformedOutput("eof".to_string());
        assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
    }

    #[test]
    fn test_invalid_input_keeps_its_message() {
        let err = PlanError::InvalidInput("Add at least one destination".to_string());
        assert_eq!(err.user_message(), "Add at least one destination");
    }

    #[test]
    fn test_from_schema_violation() {
        let err: PlanError = SchemaViolation {
            path: "days[0].segments".to_string(),
            reason: "missing required field".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Schema violation at days[0].segments: missing required field");
    }
}
