//! Trip planning against the external model
//!
//! The flow for one generation is:
//!
//! 1. [`build_plan_request`] validates the input and renders the instructions
//! 2. [`PlanRequest::to_completion_request`] shapes it for the configured mode
//! 3. an [`LlmClient`](crate::llm::LlmClient) executes the call
//! 4. [`parse_plan_response`] turns the raw text into a [`TripItinerary`](crate::domain::TripItinerary)
//!
//! [`Planner`] strings these steps together.

mod contract;
mod error;
mod request;
mod response;
mod service;

pub use crate::llm::GroundingTool;
pub use contract::{coordinates_schema, itinerary_contract, segment_schema};
pub use error::{GENERATION_FAILED_MESSAGE, PlanError};
pub use request::{PlanRequest, build_plan_request, build_plan_request_with};
pub use response::{parse_plan_response, strip_code_fence};
pub use service::{PLAN_MAX_TOKENS, Planner};

use serde::{Deserialize, Serialize};

/// How the planning service is asked for structured output
///
/// Chosen by configuration, never per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvocationMode {
    /// Contract sent as a formal response schema; the reply is bare JSON
    #[default]
    StrictSchema,
    /// A grounding tool is enabled and the contract is restated in the prompt
    ToolAugmented,
}

impl InvocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrictSchema => "strict-schema",
            Self::ToolAugmented => "tool-augmented",
        }
    }

    /// Whether the contract travels as a formal schema
    pub fn sends_schema(&self) -> bool {
        matches!(self, Self::StrictSchema)
    }

    /// Reduce raw model text to the JSON document it should contain
    ///
    /// Tool-augmented replies may wrap the document in a markdown fence.
    pub fn preprocess<'a>(&self, raw: &'a str) -> &'a str {
        match self {
            Self::StrictSchema => raw.trim(),
            Self::ToolAugmented => strip_code_fence(raw),
        }
    }
}

impl std::fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
