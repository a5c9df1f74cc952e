//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::{Destination, ReturnRouteStyle, StopsFrequency, TripPreferences};

/// Values substituted into the `plan-request` template
#[derive(Debug, Clone, Serialize)]
pub struct PlanPromptContext {
    pub start_city: String,
    /// Destinations as "Name (n days stay)", comma separated
    pub destination_list: String,
    pub max_drive_hours: String,
    pub round_trip: bool,
    /// Return route wording; only present for round trips
    pub return_route: Option<String>,
    pub start_date: String,
    pub stops_frequency: String,
    pub break_policy: String,
    pub amenity_type: String,
    /// Contract restated in the prompt when no formal schema is sent
    pub inline_contract: Option<String>,
}

impl PlanPromptContext {
    pub fn new(destinations: &[Destination], prefs: &TripPreferences) -> Self {
        debug!(destinations = destinations.len(), "PlanPromptContext::new: called");
        let destination_list = destinations
            .iter()
            .map(Destination::describe_stay)
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            start_city: prefs.start_city.trim().to_string(),
            destination_list,
            max_drive_hours: format!("{}", prefs.max_drive_hours_per_day),
            round_trip: prefs.round_trip,
            return_route: prefs.effective_return_style().map(|style| return_route_text(style).to_string()),
            start_date: prefs.start_date.format("%Y-%m-%d").to_string(),
            stops_frequency: prefs.stops_frequency.to_string(),
            break_policy: break_policy_text(prefs.stops_frequency),
            amenity_type: prefs.amenity_type.clone(),
            inline_contract: None,
        }
    }

    pub fn with_inline_contract(mut self, contract: String) -> Self {
        self.inline_contract = Some(contract);
        self
    }
}

fn return_route_text(style: ReturnRouteStyle) -> &'static str {
    match style {
        ReturnRouteStyle::Loop => {
            "Loop (plan a different return path through new areas and avoid backtracking on the same roads)"
        }
        ReturnRouteStyle::Retrace => "Retrace (fastest or same path back preferred)",
    }
}

fn break_policy_text(frequency: StopsFrequency) -> String {
    match frequency.break_interval_hours() {
        Some(hours) => format!("take a break about every {} hours", hours),
        None => "minimize breaks and maximize driving stints".to_string(),
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates found in `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            hbs: Self::engine(),
            user_dir: dir.exists().then(|| dir.to_path_buf()),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    /// Loader for an optional override directory
    pub fn with_override_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::new(dir),
            None => Self::embedded_only(),
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle "&" and quotes
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from user override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// System instruction for planning calls
    pub fn plan_system(&self) -> Result<String> {
        self.load_template("plan-system")
    }

    /// Render the per-trip instructions
    pub fn render_plan_request(&self, context: &PlanPromptContext) -> Result<String> {
        let template = self.load_template("plan-request")?;
        info!(
            "Rendering template 'plan-request' from {} (inline contract: {})",
            context.start_city,
            context.inline_contract.is_some()
        );

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template plan-request: {}", e))
    }
}
