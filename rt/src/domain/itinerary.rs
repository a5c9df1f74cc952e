//! Itinerary schema: the plan returned by the planning service

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of activity a segment describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentType {
    Drive,
    Visit,
    Overnight,
    Break,
}

impl SegmentType {
    pub const ALL: [SegmentType; 4] = [Self::Drive, Self::Visit, Self::Overnight, Self::Break];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drive => "DRIVE",
            Self::Visit => "VISIT",
            Self::Overnight => "OVERNIGHT",
            Self::Break => "BREAK",
        }
    }
}

impl std::fmt::Display for SegmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SegmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown segment type '{}'", s))
    }
}

/// WGS84 position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLocation {
    pub name: String,
    pub coordinates: Coordinates,
}

/// One atomic unit of a day's plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegment {
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    pub description: String,
    pub duration_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RouteSegment {
    /// Location name, treating a blank string as absent
    pub fn location(&self) -> Option<&str> {
        self.location_name.as_deref().filter(|name| !name.trim().is_empty())
    }

    /// Whether a segment of this shape is a point on the map
    ///
    /// Transit legs without a named stop are not points.
    pub fn is_point_kind(segment_type: SegmentType, has_location: bool) -> bool {
        segment_type != SegmentType::Drive || has_location
    }

    /// Eligible for map placement: has coordinates and is a point kind
    pub fn is_mappable(&self) -> bool {
        self.coordinates.is_some() && Self::is_point_kind(self.segment_type, self.location().is_some())
    }

    /// Heading shown for the segment: the location if named, else the description
    pub fn title(&self) -> &str {
        self.location().unwrap_or(&self.description)
    }
}

/// One day of the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day_number: u32,
    pub title: String,
    pub total_drive_hours: f64,
    pub segments: Vec<RouteSegment>,
}

impl DayPlan {
    /// Sum of DRIVE segment durations
    pub fn drive_hours_sum(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.segment_type == SegmentType::Drive)
            .map(|s| s.duration_hours)
            .sum()
    }
}

/// The complete plan, sole output of a planning call and sole renderer input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripItinerary {
    pub trip_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_location: Option<StartLocation>,
    pub total_days: u32,
    pub total_distance_estimate_km: f64,
    pub days: Vec<DayPlan>,
}

/// A semantic inconsistency in an otherwise well-formed itinerary
#[derive(Debug, Clone, PartialEq)]
pub enum ConsistencyIssue {
    /// Day at `index` should be numbered `expected`
    NonContiguousDay { index: usize, expected: u32, found: u32 },
    /// `totalDays` disagrees with the number of day entries
    DayCountMismatch { total_days: u32, actual: usize },
    /// Declared drive hours are far from the sum of DRIVE segments
    DriveHoursMismatch { day_number: u32, declared: f64, computed: f64 },
}

impl std::fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonContiguousDay { index, expected, found } => {
                write!(f, "day at position {} is numbered {}, expected {}", index, found, expected)
            }
            Self::DayCountMismatch { total_days, actual } => {
                write!(f, "totalDays is {} but {} days are listed", total_days, actual)
            }
            Self::DriveHoursMismatch {
                day_number,
                declared,
                computed,
            } => write!(
                f,
                "day {} declares {}h driving but its drive segments sum to {}h",
                day_number, declared, computed
            ),
        }
    }
}

/// Drive-hour discrepancy tolerated before it is reported
const DRIVE_HOURS_ABS_TOLERANCE: f64 = 1.0;
const DRIVE_HOURS_REL_TOLERANCE: f64 = 0.25;

impl TripItinerary {
    /// All segments in itinerary order
    pub fn segments(&self) -> impl Iterator<Item = &RouteSegment> {
        self.days.iter().flat_map(|d| d.segments.iter())
    }

    pub fn total_drive_hours(&self) -> f64 {
        self.days.iter().map(|d| d.total_drive_hours).sum()
    }

    /// Report inconsistencies without rejecting or repairing anything
    pub fn consistency_issues(&self) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();

        if self.days.len() != self.total_days as usize {
            issues.push(ConsistencyIssue::DayCountMismatch {
                total_days: self.total_days,
                actual: self.days.len(),
            });
        }

        for (index, day) in self.days.iter().enumerate() {
            let expected = index as u32 + 1;
            if day.day_number != expected {
                issues.push(ConsistencyIssue::NonContiguousDay {
                    index,
                    expected,
                    found: day.day_number,
                });
            }

            let computed = day.drive_hours_sum();
            let scale = day.total_drive_hours.max(computed);
            let tolerance = DRIVE_HOURS_ABS_TOLERANCE.max(scale * DRIVE_HOURS_REL_TOLERANCE);
            if (day.total_drive_hours - computed).abs() > tolerance {
                issues.push(ConsistencyIssue::DriveHoursMismatch {
                    day_number: day.day_number,
                    declared: day.total_drive_hours,
                    computed,
                });
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(segment_type: SegmentType, hours: f64) -> RouteSegment {
        RouteSegment {
            segment_type,
            description: format!("{} segment", segment_type),
            duration_hours: hours,
            location_name: None,
            coordinates: None,
            notes: None,
        }
    }

    fn day(day_number: u32, total_drive_hours: f64, segments: Vec<RouteSegment>) -> DayPlan {
        DayPlan {
            day_number,
            title: format!("Day {}", day_number),
            total_drive_hours,
            segments,
        }
    }

    fn itinerary(days: Vec<DayPlan>) -> TripItinerary {
        TripItinerary {
            trip_name: "Test Trip".to_string(),
            start_location: None,
            total_days: days.len() as u32,
            total_distance_estimate_km: 100.0,
            days,
        }
    }

    #[test]
    fn test_segment_type_wire_names() {
        let json = serde_json::to_string(&SegmentType::Overnight).unwrap();
        assert_eq!(json, "\"OVERNIGHT\"");
        assert_eq!("BREAK".parse::<SegmentType>(), Ok(SegmentType::Break));
        assert!("break".parse::<SegmentType>().is_err());
    }

    #[test]
    fn test_drive_without_location_is_not_mappable() {
        let mut drive = segment(SegmentType::Drive, 2.0);
        drive.coordinates = Some(Coordinates::new(45.5, -122.6));
        assert!(!drive.is_mappable());

        drive.location_name = Some("   ".to_string());
        assert!(!drive.is_mappable());

        drive.location_name = Some("Centralia".to_string());
        assert!(drive.is_mappable());
    }

    #[test]
    fn test_visit_with_coordinates_is_mappable() {
        let mut visit = segment(SegmentType::Visit, 3.0);
        assert!(!visit.is_mappable());

        visit.location_name = Some("Portland".to_string());
        visit.coordinates = Some(Coordinates::new(45.5, -122.6));
        assert!(visit.is_mappable());
    }

    #[test]
    fn test_title_falls_back_to_description() {
        let mut s = segment(SegmentType::Break, 0.5);
        assert_eq!(s.title(), "BREAK segment");
        s.location_name = Some("Rest Area".to_string());
        assert_eq!(s.title(), "Rest Area");
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let json = serde_json::to_value(segment(SegmentType::Drive, 1.0)).unwrap();
        assert_eq!(json["type"], "DRIVE");
        assert_eq!(json["durationHours"], 1.0);
        assert!(json.get("locationName").is_none());
        assert!(json.get("coordinates").is_none());
    }

    #[test]
    fn test_consistent_itinerary_has_no_issues() {
        let trip = itinerary(vec![
            day(1, 3.0, vec![segment(SegmentType::Drive, 3.0), segment(SegmentType::Visit, 2.0)]),
            day(2, 0.0, vec![segment(SegmentType::Visit, 6.0)]),
        ]);
        assert!(trip.consistency_issues().is_empty());
        assert_eq!(trip.total_drive_hours(), 3.0);
    }

    #[test]
    fn test_flags_gross_drive_hours_mismatch() {
        let trip = itinerary(vec![day(1, 9.0, vec![segment(SegmentType::Drive, 2.0)])]);
        let issues = trip.consistency_issues();
        assert_eq!(
            issues,
            vec![ConsistencyIssue::DriveHoursMismatch {
                day_number: 1,
                declared: 9.0,
                computed: 2.0
            }]
        );
    }

    #[test]
    fn test_tolerates_small_drive_hours_rounding() {
        let trip = itinerary(vec![day(
            1,
            5.0,
            vec![segment(SegmentType::Drive, 2.25), segment(SegmentType::Drive, 2.25)],
        )]);
        assert!(trip.consistency_issues().is_empty());
    }

    #[test]
    fn test_flags_day_numbering_and_count() {
        let mut trip = itinerary(vec![day(1, 0.0, vec![]), day(3, 0.0, vec![])]);
        trip.total_days = 3;

        let issues = trip.consistency_issues();
        assert!(issues.contains(&ConsistencyIssue::DayCountMismatch {
            total_days: 3,
            actual: 2
        }));
        assert!(issues.contains(&ConsistencyIssue::NonContiguousDay {
            index: 1,
            expected: 2,
            found: 3
        }));
    }
}
