//! Plan response parsing and validation

use serde_json::Value;
use tracing::debug;

use super::{InvocationMode, PlanError, itinerary_contract};
use crate::domain::{RouteSegment, SegmentType, TripItinerary};
use crate::schema::{field_path, index_path};

/// Remove a markdown code fence around a reply, then trim
///
/// Handles a leading "```" or "```json" line and a trailing "```".
pub fn strip_code_fence(raw: &str) -> &str {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest.strip_prefix("json").unwrap_or(rest),
        };
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Parse raw model text into a validated itinerary
///
/// No repair is attempted; semantic inconsistencies pass through untouched.
pub fn parse_plan_response(raw: &str, mode: InvocationMode) -> Result<TripItinerary, PlanError> {
    debug!(len = raw.len(), %mode, "parse_plan_response: called");
    let text = mode.preprocess(raw);
    if text.is_empty() {
        return Err(PlanError::MalformedOutput("empty response".to_string()));
    }

    let value: Value = serde_json::from_str(text).map_err(|e| PlanError::MalformedOutput(e.to_string()))?;

    itinerary_contract().validate(&value)?;
    check_segment_coordinates(&value)?;

    serde_json::from_value(value).map_err(|e| PlanError::SchemaViolation {
        path: "$".to_string(),
        reason: e.to_string(),
    })
}

/// Point-kind segments must carry coordinates
///
/// Runs after contract validation, so every field read here is well typed.
fn check_segment_coordinates(value: &Value) -> Result<(), PlanError> {
    let days = value.get("days").and_then(Value::as_array).into_iter().flatten();
    for (d, day) in days.enumerate() {
        let segments_path = field_path(&index_path("days", d), "segments");
        let segments = day.get("segments").and_then(Value::as_array).into_iter().flatten();
        for (s, segment) in segments.enumerate() {
            let Some(segment_type) = segment
                .get("type")
                .and_then(Value::as_str)
                .and_then(|t| t.parse::<SegmentType>().ok())
            else {
                continue;
            };
            let has_location = segment
                .get("locationName")
                .and_then(Value::as_str)
                .is_some_and(|name| !name.trim().is_empty());
            let has_coordinates = segment.get("coordinates").is_some_and(|c| !c.is_null());

            if RouteSegment::is_point_kind(segment_type, has_location) && !has_coordinates {
                return Err(PlanError::SchemaViolation {
                    path: field_path(&index_path(&segments_path, s), "coordinates"),
                    reason: format!("{} segment is a map point and needs coordinates", segment_type),
                });
            }
        }
    }
    Ok(())
}
