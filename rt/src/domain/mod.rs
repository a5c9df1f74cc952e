//! Domain types for road trip planning
//!
//! These types are the data contract shared by every other module: the
//! request builder targets them, the response parser validates into them,
//! the store persists them and the renderers read them.
//!
//! Field names serialize in camelCase. The same JSON is used for the
//! persisted state and for the planning service's output contract.

mod destination;
mod itinerary;
mod preferences;

pub use destination::Destination;
pub use itinerary::{
    ConsistencyIssue, Coordinates, DayPlan, RouteSegment, SegmentType, StartLocation, TripItinerary,
};
pub use preferences::{
    DEFAULT_AMENITY_TYPE, DEFAULT_MAX_DRIVE_HOURS, MAX_DRIVE_HOURS, MIN_DRIVE_HOURS, ReturnRouteStyle,
    StopsFrequency, TripPreferences,
};

use thiserror::Error;

/// A user-supplied value that cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
