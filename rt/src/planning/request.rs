//! Plan request construction

use tracing::debug;

use super::{InvocationMode, PlanError, itinerary_contract};
use crate::config::PlannerConfig;
use crate::domain::{Destination, TripPreferences};
use crate::llm::{CompletionRequest, Message};
use crate::prompts::{PlanPromptContext, PromptLoader};
use crate::schema::Schema;

/// Everything needed to ask the service for one itinerary
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Standing policy: route ordering, drive ceiling, overnights, coordinates
    pub system_instruction: String,
    /// Per-trip instructions
    pub instructions: String,
    /// Shape the reply must take
    pub output_contract: Schema,
    pub mode: InvocationMode,
}

impl PlanRequest {
    /// Shape this request for a service call
    ///
    /// Strict-schema sends the contract as a response schema; tool-augmented
    /// enables the configured grounding tool and relies on the inline copy.
    pub fn to_completion_request(&self, config: &PlannerConfig, max_tokens: u32) -> CompletionRequest {
        debug!(mode = %self.mode, "to_completion_request: called");
        let (response_schema, grounding) = match self.mode {
            InvocationMode::StrictSchema => (Some(self.output_contract.clone()), None),
            InvocationMode::ToolAugmented => (None, Some(config.grounding)),
        };

        CompletionRequest {
            system_prompt: self.system_instruction.clone(),
            messages: vec![Message::user(self.instructions.clone())],
            response_schema,
            grounding,
            temperature: config.temperature,
            max_tokens,
        }
    }
}

/// Build a plan request from embedded prompts
pub fn build_plan_request(
    destinations: &[Destination],
    prefs: &TripPreferences,
    mode: InvocationMode,
) -> Result<PlanRequest, PlanError> {
    build_plan_request_with(&PromptLoader::embedded_only(), destinations, prefs, mode)
}

/// Build a plan request using the given prompt loader
///
/// Fails with [`PlanError::InvalidInput`] when there are no destinations, no
/// start city, or a value out of range. Nothing is sent in that case.
pub fn build_plan_request_with(
    loader: &PromptLoader,
    destinations: &[Destination],
    prefs: &TripPreferences,
    mode: InvocationMode,
) -> Result<PlanRequest, PlanError> {
    debug!(destinations = destinations.len(), %mode, "build_plan_request_with: called");

    if destinations.is_empty() {
        return Err(PlanError::InvalidInput("Add at least one destination".to_string()));
    }
    if !prefs.has_start_city() {
        return Err(PlanError::InvalidInput("Set a starting city".to_string()));
    }
    for destination in destinations {
        destination.validate()?;
    }
    prefs.validate()?;

    let output_contract = itinerary_contract();

    let mut context = PlanPromptContext::new(destinations, prefs);
    if !mode.sends_schema() {
        let inline = serde_json::to_string_pretty(&output_contract.to_json_schema())
            .map_err(|e| PlanError::Prompt(e.to_string()))?;
        context = context.with_inline_contract(inline);
    }

    let system_instruction = loader.plan_system().map_err(|e| PlanError::Prompt(e.to_string()))?;
    let instructions = loader
        .render_plan_request(&context)
        .map_err(|e| PlanError::Prompt(e.to_string()))?;

    Ok(PlanRequest {
        system_instruction,
        instructions,
        output_contract,
        mode,
    })
}
