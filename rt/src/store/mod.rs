//! Itinerary store: durable state for one trip
//!
//! Three independent slots, each persisted as its own keystore record:
//!
//! | slot         | key                     | when absent      |
//! |--------------|-------------------------|------------------|
//! | destinations | `roadtrip_destinations` | empty list       |
//! | preferences  | `roadtrip_preferences`  | defaults         |
//! | itinerary    | `roadtrip_plan`         | `None`           |
//!
//! A slot whose record cannot be decoded falls back to its default without
//! affecting the others. Preferences degrade per field: a malformed field
//! keeps its default while the rest of the stored record still applies. Every mutation updates memory first, then writes
//! only its own slot.

mod error;
mod migration;

pub use error::StoreError;
pub use migration::{MigrationError, migrate_destinations};

use std::path::Path;

use keystore::{KeyStore, KeyStoreError};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::{Destination, TripItinerary, TripPreferences};

pub const DESTINATIONS_KEY: &str = "roadtrip_destinations";
pub const PREFERENCES_KEY: &str = "roadtrip_preferences";
pub const PLAN_KEY: &str = "roadtrip_plan";

/// Canonical copy of destinations, preferences and the last plan
#[derive(Debug)]
pub struct ItineraryStore {
    keystore: KeyStore,
    destinations: Vec<Destination>,
    preferences: TripPreferences,
    itinerary: Option<TripItinerary>,
}

impl ItineraryStore {
    /// Open the store directory and load all three slots
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let keystore = KeyStore::open(dir.as_ref()).map_err(StoreError::Open)?;
        Ok(Self::load(keystore))
    }

    /// Load every slot from an open keystore
    ///
    /// Never fails: absent or unreadable records yield defaults.
    pub fn load(keystore: KeyStore) -> Self {
        debug!(path = %keystore.path().display(), "ItineraryStore::load: called");
        let destinations = load_destinations(&keystore);
        let preferences = load_preferences(&keystore);
        let itinerary = load_itinerary(&keystore);
        info!(
            destinations = destinations.len(),
            has_plan = itinerary.is_some(),
            "ItineraryStore::load: loaded trip state"
        );
        Self {
            keystore,
            destinations,
            preferences,
            itinerary,
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn preferences(&self) -> &TripPreferences {
        &self.preferences
    }

    pub fn itinerary(&self) -> Option<&TripItinerary> {
        self.itinerary.as_ref()
    }

    pub fn path(&self) -> &Path {
        self.keystore.path()
    }

    pub fn add_destination(&mut self, destination: Destination) -> Result<(), StoreError> {
        debug!(name = %destination.name, "add_destination: called");
        destination.validate()?;
        self.destinations.push(destination);
        self.save_destinations()
    }

    /// Remove and return the destination at `index`
    pub fn remove_destination(&mut self, index: usize) -> Result<Destination, StoreError> {
        debug!(index, "remove_destination: called");
        if index >= self.destinations.len() {
            return Err(StoreError::NoSuchDestination {
                index,
                len: self.destinations.len(),
            });
        }
        let removed = self.destinations.remove(index);
        self.save_destinations()?;
        Ok(removed)
    }

    pub fn set_destinations(&mut self, destinations: Vec<Destination>) -> Result<(), StoreError> {
        debug!(count = destinations.len(), "set_destinations: called");
        for destination in &destinations {
            destination.validate()?;
        }
        self.destinations = destinations;
        self.save_destinations()
    }

    pub fn set_preferences(&mut self, preferences: TripPreferences) -> Result<(), StoreError> {
        debug!("set_preferences: called");
        preferences.validate()?;
        self.preferences = preferences;
        self.save_preferences()
    }

    /// Edit preferences in place; rejected edits leave them unchanged
    pub fn update_preferences<F>(&mut self, edit: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut TripPreferences),
    {
        let mut preferences = self.preferences.clone();
        edit(&mut preferences);
        self.set_preferences(preferences)
    }

    /// Replace the plan; `None` removes its record
    pub fn set_itinerary(&mut self, itinerary: Option<TripItinerary>) -> Result<(), StoreError> {
        debug!(some = itinerary.is_some(), "set_itinerary: called");
        self.itinerary = itinerary;
        match &self.itinerary {
            Some(plan) => write(&self.keystore, PLAN_KEY, plan),
            None => remove(&self.keystore, PLAN_KEY),
        }
    }

    /// Clear all three slots
    ///
    /// Memory is reset before any write, so it is consistent even when a
    /// record could not be removed. The first such failure is returned.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        info!("reset: clearing trip state");
        self.destinations.clear();
        self.preferences = TripPreferences::default();
        self.itinerary = None;

        let results = [DESTINATIONS_KEY, PREFERENCES_KEY, PLAN_KEY].map(|key| remove(&self.keystore, key));
        results.into_iter().collect()
    }

    fn save_destinations(&self) -> Result<(), StoreError> {
        write(&self.keystore, DESTINATIONS_KEY, &self.destinations)
    }

    fn save_preferences(&self) -> Result<(), StoreError> {
        write(&self.keystore, PREFERENCES_KEY, &self.preferences)
    }
}

fn write<T: Serialize + ?Sized>(keystore: &KeyStore, key: &'static str, value: &T) -> Result<(), StoreError> {
    keystore.set(key, value).map_err(|source| {
        warn!(%key, error = %source, "storage write failed");
        StoreError::Write { key, source }
    })
}

fn remove(keystore: &KeyStore, key: &'static str) -> Result<(), StoreError> {
    keystore.remove(key).map(|_| ()).map_err(|source| {
        warn!(%key, error = %source, "storage remove failed");
        StoreError::Write { key, source }
    })
}

/// Log a record that could not be read, telling corrupt content from I/O failure
fn read_failed(key: &str, error: &KeyStoreError, fallback: &str) {
    if error.is_corrupt() {
        warn!(%key, %error, "stored record is corrupt, {}", fallback);
    } else {
        warn!(%key, %error, "storage read error, {}", fallback);
    }
}

fn load_destinations(keystore: &KeyStore) -> Vec<Destination> {
    let value = match keystore.get_value(DESTINATIONS_KEY) {
        Ok(Some(value)) => value,
        Ok(None) => return Vec::new(),
        Err(e) => {
            read_failed(DESTINATIONS_KEY, &e, "using empty list");
            return Vec::new();
        }
    };
    migrate_destinations(value).unwrap_or_else(|e| {
        warn!(key = DESTINATIONS_KEY, error = %e, "stored destinations unusable, using empty list");
        Vec::new()
    })
}

fn load_preferences(keystore: &KeyStore) -> TripPreferences {
    match keystore.get_value(PREFERENCES_KEY) {
        Ok(Some(Value::Object(fields))) => merge_preferences(fields),
        Ok(Some(_)) => {
            warn!(key = PREFERENCES_KEY, "stored preferences are not a record, using defaults");
            TripPreferences::default()
        }
        Ok(None) => TripPreferences::default(),
        Err(e) => {
            read_failed(PREFERENCES_KEY, &e, "using defaults");
            TripPreferences::default()
        }
    }
}

/// Overlay stored preference fields on the defaults one at a time
///
/// A field that does not decode, or that makes the preferences invalid,
/// keeps its default; the other fields are still applied.
fn merge_preferences(stored: Map<String, Value>) -> TripPreferences {
    let mut accepted = Map::new();
    for (field, value) in stored {
        let mut candidate = accepted.clone();
        candidate.insert(field.clone(), value);
        match serde_json::from_value::<TripPreferences>(Value::Object(candidate.clone())) {
            Ok(prefs) if prefs.validate().is_ok() => accepted = candidate,
            Ok(_) => warn!(key = PREFERENCES_KEY, %field, "stored preference out of range, using default"),
            Err(e) => warn!(key = PREFERENCES_KEY, %field, error = %e, "stored preference unreadable, using default"),
        }
    }
    serde_json::from_value(Value::Object(accepted)).unwrap_or_default()
}

fn load_itinerary(keystore: &KeyStore) -> Option<TripItinerary> {
    keystore.get::<TripItinerary>(PLAN_KEY).unwrap_or_else(|e| {
        read_failed(PLAN_KEY, &e, "no plan loaded");
        None
    })
}
