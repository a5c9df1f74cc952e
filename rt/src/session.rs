//! Trip session: the store plus the generation state machine
//!
//! A session owns one [`ItineraryStore`] and one [`Planner`]. At most one
//! generation runs at a time; a second trigger while one is in flight is
//! refused rather than cancelling the first. The itinerary slot is written
//! only when a generation fully succeeds; a failed write is logged and never
//! turns a successful generation into an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::domain::TripItinerary;
use crate::planning::{PlanError, Planner};
use crate::store::ItineraryStore;

/// Whether a generation is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating,
}

/// Clears the in-flight flag when a generation ends, including on cancellation
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct TripSession {
    store: Mutex<ItineraryStore>,
    planner: Planner,
    generating: AtomicBool,
}

impl TripSession {
    pub fn new(store: ItineraryStore, planner: Planner) -> Self {
        Self {
            store: Mutex::new(store),
            planner,
            generating: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> GenerationState {
        if self.generating.load(Ordering::SeqCst) {
            GenerationState::Generating
        } else {
            GenerationState::Idle
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Access the store; never held across a service call
    pub fn store(&self) -> MutexGuard<'_, ItineraryStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Generate a plan from the stored destinations and preferences
    ///
    /// On success the plan replaces the stored one. On any failure the
    /// stored plan is left untouched.
    pub async fn generate(&self) -> Result<TripItinerary, PlanError> {
        debug!("TripSession::generate: called");
        if self
            .generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("TripSession::generate: refused, generation already in flight");
            return Err(PlanError::AlreadyGenerating);
        }
        let _in_flight = InFlight(&self.generating);

        let (destinations, preferences) = {
            let store = self.store();
            (store.destinations().to_vec(), store.preferences().clone())
        };

        let itinerary = self.planner.generate(&destinations, &preferences).await?;

        match self.store().set_itinerary(Some(itinerary.clone())) {
            Ok(()) => info!(trip = %itinerary.trip_name, "TripSession::generate: plan saved"),
            Err(e) => warn!(error = %e, "TripSession::generate: plan kept in memory but not persisted"),
        }
        Ok(itinerary)
    }
}
