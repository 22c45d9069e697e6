//! Marker geometry and identity types.

use std::fmt;

use super::Color;

/// Unique identifier for a marker.
///
/// Identifiers are opaque strings. They are generated once when a drag starts
/// and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(String);

impl MarkerId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MarkerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner X coordinate
    pub x: f64,
    /// Top-left corner Y coordinate
    pub y: f64,
    /// Width of the rectangle
    pub width: f64,
    /// Height of the rectangle
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build the rectangle spanned by a drag from `anchor` to `pointer`.
    ///
    /// Works for a drag in any of the four directions: the top-left corner is
    /// the anchor on axes where the pointer moved forward, and the pointer
    /// where it moved backward. Width and height are never negative.
    pub fn from_drag(anchor: Point, pointer: Point) -> Self {
        let dx = pointer.x - anchor.x;
        let dy = pointer.y - anchor.y;
        Self {
            x: if dx >= 0.0 { anchor.x } else { pointer.x },
            y: if dy >= 0.0 { anchor.y } else { pointer.y },
            width: dx.abs(),
            height: dy.abs(),
        }
    }

    /// Check if a point is inside the rectangle (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Get the area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether every field is finite and the rectangle lies in the
    /// non-negative quadrant with a non-negative size.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// A named, colored rectangle annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Unique identifier.
    pub id: MarkerId,
    /// Geometry in image-pixel coordinates.
    pub rect: Rect,
    /// Color fixed at creation.
    pub color: Color,
    /// User-editable label, possibly empty.
    pub name: String,
}

impl Marker {
    /// Create an unnamed marker.
    pub fn new(id: MarkerId, rect: Rect, color: Color) -> Self {
        Self {
            id,
            rect,
            color,
            name: String::new(),
        }
    }

    /// Set the marker's name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
