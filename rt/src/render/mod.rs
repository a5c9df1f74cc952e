//! Read-only views of an itinerary
//!
//! Both views take `&TripItinerary` and hold no state between renders.

mod map;
mod style;
mod timeline;

pub use map::{
    Bounds, DEFAULT_CENTER, DEFAULT_ZOOM, FIT_PADDING_PX, MapLayers, MapMarker, Popup, SINGLE_POINT_ZOOM, Viewport,
};
pub use style::{MarkerKind, MarkerStyle, PATH_COLOR, PATH_WEIGHT};
pub use timeline::{Timeline, format_duration, format_thousands};
