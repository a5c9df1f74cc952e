//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when no override file exists.

/// Standing policy for every planning call
pub const PLAN_SYSTEM: &str = r#"You are an expert travel logistics planner. Your goal is to plan the best possible road trip.

Inputs provided:
1. A starting city.
2. A list of destinations to visit, each with a stay duration (e.g., "Paris (2 days stay)").
3. A maximum number of driving hours per day.
4. Whether to return to the start (round trip).
5. Preferences for stop frequency and the kind of stops.
6. The return route style for round trips: 'loop' (different path back) or 'retrace' (same path back).

Your tasks:
1. ROUTE ORDER: Reorder the destinations to minimize total driving time, treating the starting city as the fixed anchor.
2. ROUTE SHAPE:
   - Round trip with 'loop': plan a circular route. The return leg should use different highways and stopovers than the outbound leg. Avoid backtracking on the same roads.
   - Round trip with 'retrace': reverse the outbound route or take the fastest path back.
3. SCHEDULE: Break the trip into days.
   - Honour each stay duration. A city with a 2 day stay occupies 2 full days with minimal driving (mostly VISIT segments).
   - Total driving time on any day must NOT exceed the daily limit.
4. BREAKS: Insert BREAK segments according to the requested stop frequency, and choose break locations that match the preferred stop type.
5. OVERNIGHTS: End every day with an OVERNIGHT segment stating where to sleep.
6. DAYLIGHT: Prefer driving during daylight hours.
7. GEOLOCATION: Provide accurate latitude and longitude for the start location and for every named stop in the segments.
"#;

/// Per-trip instructions, rendered with a [`PlanPromptContext`](super::PlanPromptContext)
pub const PLAN_REQUEST: &str = r#"Plan a road trip starting from: {{start_city}}.
Destinations to visit (and required stay duration): {{destination_list}}.
Max driving hours per day: {{max_drive_hours}}.
Round trip: {{#if round_trip}}Yes{{else}}No, end at last destination{{/if}}.
{{#if return_route}}Return Route Style: {{return_route}}.
{{/if}}Start Date: {{start_date}}.
Stop Frequency: {{stops_frequency}} ({{break_policy}}).
Preferred Stop Type: {{amenity_type}}.

Please provide a structured itinerary with GPS coordinates for mapping.
{{#if inline_contract}}

Respond with only a JSON object matching this schema, with no other text:
{{inline_contract}}
{{/if}}"#;

/// Get an embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "plan-system" => Some(PLAN_SYSTEM),
        "plan-request" => Some(PLAN_REQUEST),
        _ => None,
    }
}
