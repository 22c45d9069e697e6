//! The MarkerX JSON exchange format.
//!
//! A marker set is stored as a single JSON object whose keys are marker ids
//! and whose values are the marker records:
//!
//! ```json
//! {
//!   "5f0c…": {
//!     "id": "5f0c…",
//!     "startX": 40,
//!     "startY": 30,
//!     "width": 60,
//!     "height": 70,
//!     "color": { "r": 230, "g": 12, "b": 200 },
//!     "name": "door"
//!   }
//! }
//! ```
//!
//! Parsing only checks the JSON shape. Range and consistency checks happen in
//! [`MarkersDocument::into_markers`], which either accepts every record or
//! rejects the document.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::format::error::FormatError;
use crate::model::{Color, Marker, MarkerId, Rect};

/// One marker record as it appears in the exchange format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerEntry {
    /// Marker id, must equal the key the record is stored under.
    pub id: String,
    /// Top-left corner X coordinate
    pub start_x: f64,
    /// Top-left corner Y coordinate
    pub start_y: f64,
    /// Rectangle width
    pub width: f64,
    /// Rectangle height
    pub height: f64,
    /// Marker color
    pub color: ColorEntry,
    /// Marker label. Older files may omit it.
    #[serde(default)]
    pub name: String,
}

impl MarkerEntry {
    /// Convert from the internal marker type.
    pub fn from_marker(marker: &Marker) -> Self {
        Self {
            id: marker.id.as_str().to_string(),
            start_x: marker.rect.x,
            start_y: marker.rect.y,
            width: marker.rect.width,
            height: marker.rect.height,
            color: ColorEntry::from_color(marker.color),
            name: marker.name.clone(),
        }
    }

    /// Validate the record and convert it to the internal marker type.
    pub fn to_marker(&self) -> Result<Marker, FormatError> {
        let fields = [
            ("startX", self.start_x),
            ("startY", self.start_y),
            ("width", self.width),
            ("height", self.height),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(FormatError::invalid_geometry(
                    &self.id,
                    format!("{field} is not a finite number"),
                ));
            }
            if value < 0.0 {
                return Err(FormatError::invalid_geometry(
                    &self.id,
                    format!("{field} is negative ({value})"),
                ));
            }
        }

        let color = self.color.to_color(&self.id)?;
        let rect = Rect::new(self.start_x, self.start_y, self.width, self.height);
        Ok(Marker::new(MarkerId::new(self.id.clone()), rect, color).with_name(self.name.clone()))
    }
}

/// Color record of the exchange format.
///
/// Channels are read as wide integers so out-of-range values can be reported
/// precisely instead of failing as a generic type error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub r: i64,
    pub g: i64,
    pub b: i64,
}

impl ColorEntry {
    /// Convert from the internal color type.
    pub fn from_color(color: Color) -> Self {
        Self {
            r: i64::from(color.r),
            g: i64::from(color.g),
            b: i64::from(color.b),
        }
    }

    /// Validate the channels and convert to the internal color type.
    ///
    /// `id` names the owning marker in the error.
    pub fn to_color(&self, id: &str) -> Result<Color, FormatError> {
        let channel = |name: &'static str, value: i64| {
            u8::try_from(value).map_err(|_| FormatError::ColorOutOfRange {
                id: id.to_string(),
                channel: name,
                value,
            })
        };
        Ok(Color::new(
            channel("r", self.r)?,
            channel("g", self.g)?,
            channel("b", self.b)?,
        ))
    }
}

/// A parsed marker set: the records in document order, keyed by the object
/// key they were stored under.
///
/// Duplicate keys are kept so that validation can reject them instead of
/// silently letting the last one win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkersDocument {
    entries: Vec<(String, MarkerEntry)>,
}

impl MarkersDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from markers. Records are ordered by id so exports are
    /// stable across runs.
    pub fn from_markers<'a>(markers: impl IntoIterator<Item = &'a Marker>) -> Self {
        let mut entries: Vec<(String, MarkerEntry)> = markers
            .into_iter()
            .map(|marker| (marker.id.as_str().to_string(), MarkerEntry::from_marker(marker)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    /// Append a record under `key`.
    pub fn insert(&mut self, key: impl Into<String>, entry: MarkerEntry) {
        self.entries.push((key.into(), entry));
    }

    /// Look up the first record stored under `key`.
    pub fn get(&self, key: &str) -> Option<&MarkerEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// Iterate over `(key, record)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MarkerEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Number of records, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the document has no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from raw file bytes (UTF-8 JSON).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FormatError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to compact JSON.
    pub fn to_json_compact(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validate every record and build the marker collection.
    ///
    /// Fails on the first record that is inconsistent: a key that differs
    /// from the record's id, a repeated key, geometry that is negative or not
    /// finite, or a color channel outside `0..=255`.
    pub fn into_markers(self) -> Result<HashMap<MarkerId, Marker>, FormatError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        let mut markers = HashMap::with_capacity(self.entries.len());

        for (key, entry) in self.entries {
            if key != entry.id {
                return Err(FormatError::IdMismatch { key, id: entry.id });
            }
            if !seen.insert(key.clone()) {
                return Err(FormatError::DuplicateId { id: key });
            }
            let marker = entry.to_marker()?;
            markers.insert(marker.id.clone(), marker);
        }

        Ok(markers)
    }
}

impl Serialize for MarkersDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, e)| (k, e)))
    }
}

impl<'de> Deserialize<'de> for MarkersDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = MarkersDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping marker ids to marker records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, entry)) = map.next_entry::<String, MarkerEntry>()? {
                    entries.push((key, entry));
                }
                Ok(MarkersDocument { entries })
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}
