//! Planner: one generation from input to validated itinerary

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{InvocationMode, PlanError, PlanRequest, build_plan_request_with, parse_plan_response};
use crate::config::PlannerConfig;
use crate::domain::{Destination, TripItinerary, TripPreferences};
use crate::llm::{FinishReason, LlmClient};
use crate::prompts::PromptLoader;

/// Response budget requested for a plan; clients cap it by their config
pub const PLAN_MAX_TOKENS: u32 = 8192;

/// Runs planning calls against an [`LlmClient`]
///
/// Stateless between calls. A failed call is reported once and never retried.
pub struct Planner {
    client: Arc<dyn LlmClient>,
    config: PlannerConfig,
    prompts: PromptLoader,
}

impl Planner {
    pub fn new(client: Arc<dyn LlmClient>, config: PlannerConfig) -> Self {
        debug!(provider = %client.provider(), mode = %config.mode, "Planner::new: called");
        let prompts = PromptLoader::with_override_dir(config.prompts_dir.as_deref());
        Self {
            client,
            config,
            prompts,
        }
    }

    pub fn mode(&self) -> InvocationMode {
        self.config.mode
    }

    /// Build the request without sending it
    pub fn build_request(
        &self,
        destinations: &[Destination],
        prefs: &TripPreferences,
    ) -> Result<PlanRequest, PlanError> {
        build_plan_request_with(&self.prompts, destinations, prefs, self.config.mode)
    }

    /// Generate an itinerary
    ///
    /// Invalid input fails before the service is contacted.
    pub async fn generate(
        &self,
        destinations: &[Destination],
        prefs: &TripPreferences,
    ) -> Result<TripItinerary, PlanError> {
        debug!(destinations = destinations.len(), "generate: called");
        let request = self.build_request(destinations, prefs)?;
        let completion = request.to_completion_request(&self.config, PLAN_MAX_TOKENS);

        info!(
            provider = %self.client.provider(),
            mode = %self.config.mode,
            start = %prefs.start_city,
            destinations = destinations.len(),
            "generate: calling planning service"
        );
        let response = self.client.complete(completion).await.map_err(|e| {
            warn!(error = %e, transient = e.is_transient(), "generate: planning service failed");
            PlanError::Service(e)
        })?;

        debug!(tokens = response.usage.total(), "generate: planning service responded");
        for source in &response.grounding_sources {
            debug!(uri = %source.uri, title = ?source.title, "generate: grounding source");
        }
        if response.finish_reason != FinishReason::Stop {
            warn!(finish_reason = ?response.finish_reason, "generate: response did not finish normally");
        }

        let raw = response
            .content
            .ok_or_else(|| PlanError::MalformedOutput("no text in planning service response".to_string()))?;

        let itinerary = parse_plan_response(&raw, self.config.mode).inspect_err(|e| {
            warn!(error = %e, "generate: rejected planning service output");
            debug!(raw = %raw, "generate: rejected output");
        })?;

        for issue in itinerary.consistency_issues() {
            warn!(%issue, "generate: itinerary inconsistency");
        }

        info!(
            trip = %itinerary.trip_name,
            days = itinerary.days.len(),
            km = itinerary.total_distance_estimate_km,
            "generate: plan ready"
        );
        Ok(itinerary)
    }
}
