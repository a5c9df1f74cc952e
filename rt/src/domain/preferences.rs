//! Travel preferences

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::ValidationError;

/// Lowest accepted daily drive ceiling
pub const MIN_DRIVE_HOURS: f64 = 2.0;

/// Highest accepted daily drive ceiling
pub const MAX_DRIVE_HOURS: f64 = 12.0;

pub const DEFAULT_MAX_DRIVE_HOURS: f64 = 6.0;

pub const DEFAULT_AMENITY_TYPE: &str = "Scenic & Local Gems";

/// How a round trip gets back to the start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnRouteStyle {
    /// Fastest or same path back
    Retrace,
    /// Different roads and stopovers on the way back
    #[default]
    Loop,
}

impl ReturnRouteStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrace => "retrace",
            Self::Loop => "loop",
        }
    }
}

impl std::fmt::Display for ReturnRouteStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReturnRouteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "retrace" => Ok(Self::Retrace),
            "loop" => Ok(Self::Loop),
            other => Err(format!("unknown return route style '{}' (expected retrace or loop)", other)),
        }
    }
}

/// How often to stop for breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopsFrequency {
    Low,
    #[default]
    Medium,
    High,
}

impl StopsFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Approximate hours of driving between breaks, `None` for as few as possible
    pub fn break_interval_hours(&self) -> Option<u32> {
        match self {
            Self::High => Some(2),
            Self::Medium => Some(3),
            Self::Low => None,
        }
    }
}

impl std::fmt::Display for StopsFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StopsFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown stop frequency '{}' (expected low, medium or high)", other)),
        }
    }
}

/// Trip-wide preferences
///
/// Missing fields in a persisted record are filled from [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripPreferences {
    pub start_city: String,
    pub max_drive_hours_per_day: f64,
    pub round_trip: bool,
    /// Only meaningful when `round_trip` is set
    pub return_route_style: ReturnRouteStyle,
    pub start_date: NaiveDate,
    pub stops_frequency: StopsFrequency,
    /// Free-text category biasing the kind of suggested stops
    pub amenity_type: String,
}

impl Default for TripPreferences {
    fn default() -> Self {
        Self {
            start_city: String::new(),
            max_drive_hours_per_day: DEFAULT_MAX_DRIVE_HOURS,
            round_trip: false,
            return_route_style: ReturnRouteStyle::default(),
            start_date: Local::now().date_naive(),
            stops_frequency: StopsFrequency::default(),
            amenity_type: DEFAULT_AMENITY_TYPE.to_string(),
        }
    }
}

impl TripPreferences {
    /// Return style that applies to this trip, if it returns to the start
    pub fn effective_return_style(&self) -> Option<ReturnRouteStyle> {
        self.round_trip.then_some(self.return_route_style)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let hours = self.max_drive_hours_per_day;
        if !hours.is_finite() || !(MIN_DRIVE_HOURS..=MAX_DRIVE_HOURS).contains(&hours) {
            return Err(ValidationError::new(format!(
                "max drive hours per day must be between {} and {}, got {}",
                MIN_DRIVE_HOURS, MAX_DRIVE_HOURS, hours
            )));
        }
        Ok(())
    }

    pub fn has_start_city(&self) -> bool {
        !self.start_city.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = TripPreferences::default();
        assert_eq!(prefs.max_drive_hours_per_day, 6.0);
        assert_eq!(prefs.start_city, "");
        assert!(!prefs.round_trip);
        assert_eq!(prefs.return_route_style, ReturnRouteStyle::Loop);
        assert_eq!(prefs.stops_frequency, StopsFrequency::Medium);
        assert_eq!(prefs.amenity_type, "Scenic & Local Gems");
        assert!(prefs.validate().is_ok());
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let prefs: TripPreferences =
            serde_json::from_str(r#"{"startCity": "Seattle", "roundTrip": true}"#).unwrap();

        assert_eq!(prefs.start_city, "Seattle");
        assert!(prefs.round_trip);
        assert_eq!(prefs.max_drive_hours_per_day, DEFAULT_MAX_DRIVE_HOURS);
        assert_eq!(prefs.amenity_type, DEFAULT_AMENITY_TYPE);
    }

    #[test]
    fn test_wire_format() {
        let prefs = TripPreferences {
            start_city: "Seattle".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            stops_frequency: StopsFrequency::High,
            return_route_style: ReturnRouteStyle::Retrace,
            ..Default::default()
        };
        let json = serde_json::to_value(&prefs).unwrap();

        assert_eq!(json["startDate"], "2026-06-01");
        assert_eq!(json["stopsFrequency"], "high");
        assert_eq!(json["returnRouteStyle"], "retrace");
        assert_eq!(json["maxDriveHoursPerDay"], 6.0);
    }

    #[test]
    fn test_return_style_ignored_one_way() {
        let mut prefs = TripPreferences::default();
        assert_eq!(prefs.effective_return_style(), None);

        prefs.round_trip = true;
        assert_eq!(prefs.effective_return_style(), Some(ReturnRouteStyle::Loop));
    }

    #[test]
    fn test_drive_hours_range() {
        let mut prefs = TripPreferences::default();
        for ok in [2.0, 7.5, 12.0] {
            prefs.max_drive_hours_per_day = ok;
            assert!(prefs.validate().is_ok(), "{} should be accepted", ok);
        }
        for bad in [1.9, 12.5, f64::NAN] {
            prefs.max_drive_hours_per_day = bad;
            assert!(prefs.validate().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_break_intervals() {
        assert_eq!(StopsFrequency::High.break_interval_hours(), Some(2));
        assert_eq!(StopsFrequency::Medium.break_interval_hours(), Some(3));
        assert_eq!(StopsFrequency::Low.break_interval_hours(), None);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("LOOP".parse::<ReturnRouteStyle>(), Ok(ReturnRouteStyle::Loop));
        assert_eq!("high".parse::<StopsFrequency>(), Ok(StopsFrequency::High));
        assert!("sometimes".parse::<StopsFrequency>().is_err());
    }
}
