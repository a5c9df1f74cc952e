//! Text timeline of an itinerary

use std::fmt::Write;

use colored::Colorize;

use super::style::MarkerKind;
use crate::domain::{RouteSegment, TripItinerary};

/// Segment duration for display: minutes below an hour, else hours
pub fn format_duration(hours: f64) -> String {
    if hours < 1.0 {
        format!("{} min", (hours * 60.0).round() as i64)
    } else {
        format!("{} hr", hours)
    }
}

/// Whole number with thousands separators, e.g. `1,234`
pub fn format_thousands(value: f64) -> String {
    let digits = format!("{}", value.round().abs() as u64);
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value.round() < 0.0 {
        out.insert(0, '-');
    }
    out
}

/// Renders the trip header and day-by-day timeline
#[derive(Debug, Clone, Copy)]
pub struct Timeline {
    color: bool,
}

impl Timeline {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Trip name with duration, distance and start
    pub fn header(&self, itinerary: &TripItinerary) -> String {
        let mut out = String::new();
        let name = if self.color {
            itinerary.trip_name.bold().to_string()
        } else {
            itinerary.trip_name.clone()
        };
        let _ = writeln!(out, "{}", name);

        let mut stats = vec![
            format!("Duration: {} Days", itinerary.total_days),
            format!("Distance: ~{} km", format_thousands(itinerary.total_distance_estimate_km)),
        ];
        if let Some(start) = &itinerary.start_location {
            stats.push(format!("Start: {}", start.name));
        }
        let _ = writeln!(out, "  {}", stats.join(" | "));
        out
    }

    /// Header followed by every day and its segments
    pub fn render(&self, itinerary: &TripItinerary) -> String {
        let mut out = self.header(itinerary);

        for day in &itinerary.days {
            let heading = format!("Day {} · {}", day.day_number, day.title);
            let heading = if self.color {
                heading.bold().to_string()
            } else {
                heading
            };
            let _ = writeln!(out, "\n{}  ({}h driving)", heading, day.total_drive_hours);

            for segment in &day.segments {
                self.segment(&mut out, segment);
            }
        }

        let _ = writeln!(out, "\n--- End of Itinerary ---");
        out
    }

    fn segment(&self, out: &mut String, segment: &RouteSegment) {
        let style = MarkerKind::Segment(segment.segment_type).style();
        let title = if self.color {
            style.paint(segment.title()).to_string()
        } else {
            segment.title().to_string()
        };
        let _ = writeln!(
            out,
            "  {} {}  [{}]",
            style.icon,
            title,
            format_duration(segment.duration_hours)
        );

        if let Some(location) = segment.location()
            && segment.description != location
        {
            let _ = writeln!(out, "     {}", segment.description);
        }
        if let Some(notes) = segment.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            let note = format!("\"{}\"", notes);
            let note = if self.color { note.italic().to_string() } else { note };
            let _ = writeln!(out, "     {}", note);
        }
    }
}
