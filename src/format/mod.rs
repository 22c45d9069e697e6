//! Marker set import/export.
//!
//! MarkerX has a single exchange format: a JSON object keyed by marker id
//! (see [`markers_json`]). Export writes it verbatim; import parses it into a
//! [`MarkersDocument`] which is validated as a whole before it may replace
//! the current markers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use markerx::format::MarkersDocument;
//!
//! let document = MarkersDocument::from_slice(&bytes)?;
//! store.replace_all(document)?;
//! ```

mod error;
pub mod markers_json;

#[cfg(test)]
mod tests;

pub use error::FormatError;
pub use markers_json::{ColorEntry, MarkerEntry, MarkersDocument};

/// Default file name offered when exporting markers.
pub const DEFAULT_EXPORT_FILENAME: &str = "markers.json";
