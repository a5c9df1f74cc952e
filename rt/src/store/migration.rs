//! Persisted destination list shapes

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Destination, ValidationError};

/// Every destination list shape that has been written to storage
///
/// Older versions stored bare names; current versions store full records.
/// Variant order matters: the current shape is tried first.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersistedDestinations {
    Current(Vec<Destination>),
    Legacy(Vec<String>),
}

/// Why a persisted destination list could not be used
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("unrecognized destination list shape")]
    UnknownShape(#[source] serde_json::Error),

    #[error("invalid destination: {0}")]
    Invalid(#[from] ValidationError),
}

/// Decode a persisted destination list, upgrading the legacy shape
///
/// A list of plain names becomes one-day stays in the same order. Blank
/// legacy names are skipped; the rest of the list is kept.
pub fn migrate_destinations(value: Value) -> Result<Vec<Destination>, MigrationError> {
    let persisted: PersistedDestinations = serde_json::from_value(value).map_err(MigrationError::UnknownShape)?;
    let destinations = match persisted {
        PersistedDestinations::Current(list) => list,
        PersistedDestinations::Legacy(names) => {
            tracing::info!(count = names.len(), "migrate_destinations: upgrading legacy name list");
            names
                .iter()
                .enumerate()
                .filter_map(|(index, name)| {
                    let destination = Destination::from_legacy_name(name);
                    if destination.is_none() {
                        tracing::warn!(index, "migrate_destinations: skipping blank legacy name");
                    }
                    destination
                })
                .collect()
        }
    };
    for destination in &destinations {
        destination.validate()?;
    }
    Ok(destinations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_current_shape() {
        let list = migrate_destinations(json!([{"name": "Portland", "durationDays": 2}])).unwrap();
        assert_eq!(list, vec![Destination::new("Portland", 2).unwrap()]);
    }

    #[test]
    fn test_legacy_shape() {
        let list = migrate_destinations(json!(["Portland", "Boise"])).unwrap();
        assert_eq!(
            list,
            vec![Destination::new("Portland", 1).unwrap(), Destination::new("Boise", 1).unwrap()]
        );
    }

    #[test]
    fn test_legacy_blank_names_skipped() {
        let list = migrate_destinations(json!([" Portland", "", "Boise ", "   "])).unwrap();
        assert_eq!(
            list,
            vec![Destination::new("Portland", 1).unwrap(), Destination::new("Boise", 1).unwrap()]
        );
    }

    #[test]
    fn test_empty_list() {
        assert!(migrate_destinations(json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_shapes_rejected() {
        for value in [
            json!({"name": "Portland"}),
            json!("Portland"),
            json!([1, 2, 3]),
            json!(["Portland", {"name": "Boise", "durationDays": 1}]),
        ] {
            assert!(
                matches!(migrate_destinations(value.clone()), Err(MigrationError::UnknownShape(_))),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_invalid_records_rejected() {
        let err = migrate_destinations(json!([{"name": "Boise", "durationDays": 0}])).unwrap_err();
        assert!(matches!(err, MigrationError::Invalid(_)));
    }

    proptest! {
        #[test]
        fn prop_legacy_names_keep_order(names in proptest::collection::vec("[ ]{0,2}[A-Za-z ]{0,15}", 0..12)) {
            let expected: Vec<&str> = names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()).collect();
            let list = migrate_destinations(json!(names.clone())).unwrap();
            prop_assert_eq!(list.len(), expected.len());
            for (destination, name) in list.iter().zip(&expected) {
                prop_assert_eq!(destination.name.as_str(), *name);
                prop_assert_eq!(destination.duration_days, 1);
            }
        }
    }
}
