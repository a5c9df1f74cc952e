//! Map layers: markers, route path and viewport
//!
//! Layers are rebuilt from scratch for every itinerary. Only mappable points
//! become markers: the start location, plus every segment with coordinates
//! that is not an unnamed transit leg.

use serde_json::{Value, json};

use super::style::{MarkerKind, MarkerStyle, PATH_COLOR, PATH_WEIGHT};
use super::timeline::format_duration;
use crate::domain::{Coordinates, TripItinerary};

/// Padding applied when fitting the view to the route
pub const FIT_PADDING_PX: u32 = 50;

/// Zoom used when only one point is known
pub const SINGLE_POINT_ZOOM: u8 = 11;

/// Continental view used when nothing is mappable
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    latitude: 39.8283,
    longitude: -98.5795,
};
pub const DEFAULT_ZOOM: u8 = 4;

/// Content of a marker popup
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    /// Segment type; absent for the start point
    pub badge: Option<&'static str>,
    pub duration: Option<String>,
    pub description: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub position: Coordinates,
    pub popup: Popup,
}

impl MapMarker {
    pub fn style(&self) -> &'static MarkerStyle {
        self.kind.style()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl Bounds {
    /// Smallest box containing every point, `None` when empty
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Coordinates>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Bounds>, p| {
            Some(match acc {
                None => Bounds {
                    south_west: *p,
                    north_east: *p,
                },
                Some(b) => Bounds {
                    south_west: Coordinates::new(
                        b.south_west.latitude.min(p.latitude),
                        b.south_west.longitude.min(p.longitude),
                    ),
                    north_east: Coordinates::new(
                        b.north_east.latitude.max(p.latitude),
                        b.north_east.longitude.max(p.longitude),
                    ),
                },
            })
        })
    }
}

/// Initial map view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    /// Fit the route, two or more points
    Fit { bounds: Bounds, padding_px: u32 },
    /// Center on the only point
    Center { center: Coordinates, zoom: u8 },
    /// Nothing to show
    Default { center: Coordinates, zoom: u8 },
}

/// Everything needed to draw an itinerary on a map
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayers {
    pub markers: Vec<MapMarker>,
    /// Route through all markers in order; empty unless there are two or more
    pub path: Vec<Coordinates>,
    pub viewport: Viewport,
}

impl MapLayers {
    pub fn build(itinerary: &TripItinerary) -> Self {
        let mut markers = Vec::new();

        if let Some(start) = &itinerary.start_location {
            markers.push(MapMarker {
                kind: MarkerKind::Start,
                position: start.coordinates,
                popup: Popup {
                    title: start.name.clone(),
                    badge: None,
                    duration: None,
                    description: "Starting Point".to_string(),
                    notes: None,
                },
            });
        }

        for segment in itinerary.segments() {
            let Some(position) = segment.coordinates.filter(|_| segment.is_mappable()) else {
                continue;
            };
            let kind = MarkerKind::Segment(segment.segment_type);
            markers.push(MapMarker {
                kind,
                position,
                popup: Popup {
                    title: segment.title().to_string(),
                    badge: kind.badge(),
                    duration: Some(format_duration(segment.duration_hours)),
                    description: segment.description.clone(),
                    notes: segment.notes.clone(),
                },
            });
        }

        let points: Vec<Coordinates> = markers.iter().map(|m| m.position).collect();
        let viewport = match points.as_slice() {
            [] => Viewport::Default {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
            [only] => Viewport::Center {
                center: *only,
                zoom: SINGLE_POINT_ZOOM,
            },
            _ => match Bounds::enclosing(&points) {
                Some(bounds) => Viewport::Fit {
                    bounds,
                    padding_px: FIT_PADDING_PX,
                },
                None => Viewport::Default {
                    center: DEFAULT_CENTER,
                    zoom: DEFAULT_ZOOM,
                },
            },
        };
        let path = if points.len() > 1 { points } else { Vec::new() };

        Self {
            markers,
            path,
            viewport,
        }
    }

    /// Export as a GeoJSON FeatureCollection
    ///
    /// Positions are `[longitude, latitude]`. The viewport travels as a
    /// foreign member so a viewer can restore the same initial view.
    pub fn to_geojson(&self) -> Value {
        let mut features: Vec<Value> = self
            .markers
            .iter()
            .map(|m| {
                let style = m.style();
                json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": lon_lat(&m.position) },
                    "properties": {
                        "kind": m.kind.as_str(),
                        "title": m.popup.title,
                        "badge": m.popup.badge,
                        "duration": m.popup.duration,
                        "description": m.popup.description,
                        "notes": m.popup.notes,
                        "marker-color": style.hex(),
                        "marker-radius": style.radius,
                        "z-order": style.z_order,
                    }
                })
            })
            .collect();

        if !self.path.is_empty() {
            features.push(json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": self.path.iter().map(lon_lat).collect::<Vec<_>>(),
                },
                "properties": { "kind": "ROUTE", "stroke": PATH_COLOR, "stroke-width": PATH_WEIGHT }
            }));
        }

        let viewport = match &self.viewport {
            Viewport::Fit { bounds, padding_px } => json!({
                "fit": [lon_lat(&bounds.south_west), lon_lat(&bounds.north_east)],
                "padding": padding_px,
            }),
            Viewport::Center { center, zoom } | Viewport::Default { center, zoom } => json!({
                "center": lon_lat(center),
                "zoom": zoom,
            }),
        };

        json!({
            "type": "FeatureCollection",
            "features": features,
            "viewport": viewport,
        })
    }
}

fn lon_lat(c: &Coordinates) -> [f64; 2] {
    [c.longitude, c.latitude]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayPlan, RouteSegment, SegmentType, StartLocation};

    fn segment(segment_type: SegmentType, location: Option<&str>, at: Option<(f64, f64)>) -> RouteSegment {
        RouteSegment {
            segment_type,
            description: format!("{} stop", segment_type),
            duration_hours: 1.5,
            location_name: location.map(str::to_string),
            coordinates: at.map(|(lat, lon)| Coordinates::new(lat, lon)),
            notes: None,
        }
    }

    fn itinerary(start: bool, segments: Vec<RouteSegment>) -> TripItinerary {
        TripItinerary {
            trip_name: "Map Test".to_string(),
            start_location: start.then(|| StartLocation {
                name: "Seattle".to_string(),
                coordinates: Coordinates::new(47.6, -122.3),
            }),
            total_days: 1,
            total_distance_estimate_km: 100.0,
            days: vec![DayPlan {
                day_number: 1,
                title: "Day".to_string(),
                total_drive_hours: 1.5,
                segments,
            }],
        }
    }

    #[test]
    fn test_marker_eligibility() {
        let layers = MapLayers::build(&itinerary(
            true,
            vec![
                segment(SegmentType::Drive, None, Some((46.0, -122.0))),
                segment(SegmentType::Visit, Some("Portland"), Some((45.5, -122.6))),
                segment(SegmentType::Break, Some("Nowhere"), None),
            ],
        ));

        let kinds: Vec<_> = layers.markers.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MarkerKind::Start, MarkerKind::Segment(SegmentType::Visit)]);
        assert_eq!(layers.path.len(), 2);
    }

    #[test]
    fn test_popups() {
        let layers = MapLayers::build(&itinerary(
            true,
            vec![segment(SegmentType::Visit, Some("Portland"), Some((45.5, -122.6)))],
        ));

        let start = &layers.markers[0].popup;
        assert_eq!(start.title, "Seattle");
        assert_eq!(start.badge, None);
        assert_eq!(start.description, "Starting Point");

        let visit = &layers.markers[1].popup;
        assert_eq!(visit.title, "Portland");
        assert_eq!(visit.badge, Some("VISIT"));
        assert_eq!(visit.duration.as_deref(), Some("1.5 hr"));
    }

    #[test]
    fn test_viewports() {
        let none = MapLayers::build(&itinerary(false, vec![]));
        assert_eq!(
            none.viewport,
            Viewport::Default {
                center: DEFAULT_CENTER,
                zoom: 4
            }
        );
        assert!(none.path.is_empty());

        let one = MapLayers::build(&itinerary(true, vec![]));
        assert_eq!(
            one.viewport,
            Viewport::Center {
                center: Coordinates::new(47.6, -122.3),
                zoom: 11
            }
        );
        assert!(one.path.is_empty());

        let two = MapLayers::build(&itinerary(
            true,
            vec![segment(SegmentType::Overnight, Some("Portland"), Some((45.5, -122.6)))],
        ));
        match two.viewport {
            Viewport::Fit { bounds, padding_px } => {
                assert_eq!(padding_px, 50);
                assert_eq!(bounds.south_west, Coordinates::new(45.5, -122.6));
                assert_eq!(bounds.north_east, Coordinates::new(47.6, -122.3));
            }
            other => panic!("unexpected viewport {:?}", other),
        }
    }

    #[test]
    fn test_geojson_export() {
        let layers = MapLayers::build(&itinerary(
            true,
            vec![segment(SegmentType::Visit, Some("Portland"), Some((45.5, -122.6)))],
        ));
        let geojson = layers.to_geojson();

        assert_eq!(geojson["type"], "FeatureCollection");
        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([-122.3, 47.6]));
        assert_eq!(features[0]["properties"]["marker-color"], "#10b981");
        assert_eq!(features[1]["properties"]["badge"], "VISIT");
        assert_eq!(features[2]["geometry"]["type"], "LineString");
        assert_eq!(geojson["viewport"]["padding"], 50);
    }
}
