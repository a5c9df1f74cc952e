//! Visual style per marker kind, shared by the timeline and the map

use colored::{ColoredString, Colorize};

use crate::domain::SegmentType;

/// What a point on the timeline or map represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    Segment(SegmentType),
}

impl MarkerKind {
    /// Type badge shown in popups; the start point has none
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            MarkerKind::Start => None,
            MarkerKind::Segment(t) => Some(t.as_str()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Start => "START",
            MarkerKind::Segment(t) => t.as_str(),
        }
    }

    pub fn style(&self) -> &'static MarkerStyle {
        match self {
            MarkerKind::Start => &START,
            MarkerKind::Segment(SegmentType::Visit) => &VISIT,
            MarkerKind::Segment(SegmentType::Overnight) => &OVERNIGHT,
            MarkerKind::Segment(SegmentType::Break) => &BREAK,
            MarkerKind::Segment(SegmentType::Drive) => &DRIVE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub icon: &'static str,
    /// Fill color as RGB
    pub color: (u8, u8, u8),
    /// Marker radius in pixels
    pub radius: u32,
    /// Stacking order; higher draws on top
    pub z_order: i32,
}

impl MarkerStyle {
    /// Color as `#rrggbb`
    pub fn hex(&self) -> String {
        let (r, g, b) = self.color;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Apply this style's color to terminal text
    pub fn paint(&self, text: &str) -> ColoredString {
        let (r, g, b) = self.color;
        text.truecolor(r, g, b)
    }
}

const START: MarkerStyle = MarkerStyle {
    icon: "🏁",
    color: (0x10, 0xb9, 0x81),
    radius: 9,
    z_order: 1000,
};

const VISIT: MarkerStyle = MarkerStyle {
    icon: "📍",
    color: (0xef, 0x44, 0x44),
    radius: 8,
    z_order: 500,
};

const OVERNIGHT: MarkerStyle = MarkerStyle {
    icon: "🌙",
    color: (0x63, 0x66, 0xf1),
    radius: 8,
    z_order: 400,
};

const BREAK: MarkerStyle = MarkerStyle {
    icon: "☕",
    color: (0xf5, 0x9e, 0x0b),
    radius: 5,
    z_order: 0,
};

// Drive stops that carry a location get the neutral style
const DRIVE: MarkerStyle = MarkerStyle {
    icon: "🚗",
    color: (0x64, 0x74, 0x8b),
    radius: 6,
    z_order: 0,
};

/// Route line color
pub const PATH_COLOR: &str = "#6366f1";

/// Route line width in pixels
pub const PATH_WEIGHT: u32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_table() {
        let start = MarkerKind::Start.style();
        assert_eq!(start.hex(), "#10b981");
        assert_eq!(start.radius, 9);
        assert_eq!(start.z_order, 1000);

        let visit = MarkerKind::Segment(SegmentType::Visit).style();
        assert_eq!(visit.hex(), "#ef4444");
        assert_eq!(visit.z_order, 500);

        assert_eq!(MarkerKind::Segment(SegmentType::Overnight).style().hex(), "#6366f1");
        assert_eq!(MarkerKind::Segment(SegmentType::Break).style().radius, 5);
        assert_eq!(MarkerKind::Segment(SegmentType::Drive).style().hex(), "#64748b");
    }

    #[test]
    fn test_badges() {
        assert_eq!(MarkerKind::Start.badge(), None);
        assert_eq!(MarkerKind::Segment(SegmentType::Break).badge(), Some("BREAK"));
    }
}
