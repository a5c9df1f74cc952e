//! A place the user wants to visit

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ValidationError;

/// Destination with the number of days to stay there
///
/// Input order carries no meaning for the final route; the planner may
/// reorder destinations freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub name: String,
    pub duration_days: u32,
}

impl Destination {
    /// Create a destination, trimming the name
    pub fn new(name: impl AsRef<str>, duration_days: u32) -> Result<Self, ValidationError> {
        let name = name.as_ref().trim();
        debug!(%name, duration_days, "Destination::new: called");
        let destination = Self {
            name: name.to_string(),
            duration_days,
        };
        destination.validate()?;
        Ok(destination)
    }

    /// Destination carried over from the legacy plain-name list
    ///
    /// Legacy entries become one-day stays. Blank names have no counterpart
    /// and yield `None`.
    pub fn from_legacy_name(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        (!name.is_empty()).then(|| Self {
            name: name.to_string(),
            duration_days: 1,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("destination name must not be empty"));
        }
        if self.duration_days < 1 {
            return Err(ValidationError::new(format!(
                "stay at {} must be at least 1 day",
                self.name
            )));
        }
        Ok(())
    }

    /// Prompt form, e.g. "Portland (2 days stay)"
    pub fn describe_stay(&self) -> String {
        format!("{} ({} days stay)", self.name, self.duration_days)
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let unit = if self.duration_days == 1 { "day" } else { "days" };
        write!(f, "{} ({} {})", self.name, self.duration_days, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_name() {
        let d = Destination::new("  Portland ", 2).unwrap();
        assert_eq!(d.name, "Portland");
        assert_eq!(d.duration_days, 2);
    }

    #[test]
    fn test_rejects_blank_name() {
        assert!(Destination::new("   ", 1).is_err());
    }

    #[test]
    fn test_rejects_zero_days() {
        let err = Destination::new("Boise", 0).unwrap_err();
        assert!(err.to_string().contains("Boise"));
    }

    #[test]
    fn test_describe_stay() {
        let d = Destination::new("Portland", 2).unwrap();
        assert_eq!(d.describe_stay(), "Portland (2 days stay)");
    }

    #[test]
    fn test_serializes_camel_case() {
        let d = Destination::new("Portland", 2).unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Portland", "durationDays": 2}));
    }
}
