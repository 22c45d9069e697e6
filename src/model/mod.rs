//! Data models for MarkerX.

mod color;
mod marker;

pub use color::Color;
pub use marker::{Marker, MarkerId, Point, Rect};
