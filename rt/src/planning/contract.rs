//! Output contract for the planning service

use crate::domain::SegmentType;
use crate::schema::Schema;

pub fn coordinates_schema() -> Schema {
    Schema::object()
        .required("latitude", Schema::number().range(Some(-90.0), Some(90.0)))
        .required("longitude", Schema::number().range(Some(-180.0), Some(180.0)))
}

/// One segment of a day
///
/// `coordinates` is declared optional here because its required-ness
/// depends on the segment kind; the response parser enforces it.
pub fn segment_schema() -> Schema {
    let kinds: Vec<&str> = SegmentType::ALL.iter().map(|t| t.as_str()).collect();
    Schema::object()
        .required("type", Schema::string_enum(&kinds).describe("Type of activity"))
        .required(
            "description",
            Schema::string().describe("Short description of what is happening"),
        )
        .required(
            "durationHours",
            Schema::number()
                .range(Some(0.0), None)
                .describe("Estimated duration in hours"),
        )
        .optional(
            "locationName",
            Schema::string().describe("The city or place name relevant to this segment"),
        )
        .optional(
            "coordinates",
            coordinates_schema().describe("GPS coordinates of the locationName"),
        )
        .optional(
            "notes",
            Schema::string().describe("Tips, warnings, or scenic route suggestions"),
        )
}

fn day_schema() -> Schema {
    Schema::object()
        .required("dayNumber", Schema::integer().range(Some(1.0), None))
        .required("title", Schema::string().describe("Summary title for the day"))
        .required("totalDriveHours", Schema::number().range(Some(0.0), None))
        .required("segments", Schema::array(segment_schema()))
}

/// The complete itinerary the service must return
pub fn itinerary_contract() -> Schema {
    Schema::object()
        .required("tripName", Schema::string().describe("A catchy name for this road trip"))
        .required(
            "startLocation",
            Schema::object()
                .required("name", Schema::string())
                .required("coordinates", coordinates_schema()),
        )
        .required("totalDays", Schema::integer().range(Some(1.0), None))
        .required("totalDistanceEstimateKm", Schema::number().range(Some(0.0), None))
        .required("days", Schema::array(day_schema()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaKind;

    #[test]
    fn test_top_level_required_fields() {
        let contract = itinerary_contract();
        assert_eq!(
            contract.required_names(),
            vec!["tripName", "startLocation", "totalDays", "totalDistanceEstimateKm", "days"]
        );
    }

    #[test]
    fn test_segment_type_enumeration() {
        let segment = segment_schema();
        let kind = &segment.property("type").unwrap().schema.kind;
        match kind {
            SchemaKind::String { allowed } => {
                assert_eq!(allowed, &vec!["DRIVE", "VISIT", "OVERNIGHT", "BREAK"]);
            }
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(segment.required_names(), vec!["type", "description", "durationHours"]);
    }

    #[test]
    fn test_rendered_for_gemini() {
        let rendered = itinerary_contract().to_gemini();
        let segment = &rendered["properties"]["days"]["items"]["properties"]["segments"]["items"];
        assert_eq!(segment["properties"]["type"]["enum"][3], "BREAK");
        assert_eq!(segment["properties"]["coordinates"]["required"][0], "latitude");
        assert_eq!(rendered["propertyOrdering"][0], "tripName");
    }
}
