//! Marker storage for a single image.
//!
//! [`MarkerStore`] owns the authoritative marker collection. It never creates
//! identifiers itself: ids arrive with the markers, generated by the
//! interaction engine. Every effective mutation bumps the revision, sets the
//! dirty flag and notifies subscribed listeners; no-op calls (renaming or
//! deleting a missing id, clearing an empty store) change nothing.

use std::collections::HashMap;
use std::fmt;

use crate::format::{FormatError, MarkersDocument};
use crate::model::{Marker, MarkerId, Point};

/// A change applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A marker was inserted or replaced.
    Upserted(MarkerId),
    /// A marker's name changed.
    Renamed(MarkerId),
    /// A marker was removed.
    Deleted(MarkerId),
    /// All markers were removed.
    Cleared,
    /// The whole collection was replaced by an import.
    Replaced {
        /// Number of markers after the import
        count: usize,
    },
}

/// Handle returned by [`MarkerStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Storage for the markers of one document, keyed by id.
#[derive(Default)]
pub struct MarkerStore {
    /// All markers, keyed by their ID.
    markers: HashMap<MarkerId, Marker>,
    /// Change listeners in subscription order.
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
    /// Incremented on every effective change.
    revision: u64,
    /// Set when markers change, cleared by the renderer after a repaint.
    dirty: bool,
}

impl fmt::Debug for MarkerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerStore")
            .field("markers", &self.markers)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Insert a marker, replacing any marker with the same id.
    ///
    /// Returns the replaced marker, if there was one.
    pub fn upsert(&mut self, marker: Marker) -> Option<Marker> {
        let id = marker.id.clone();
        let previous = self.markers.insert(id.clone(), marker);
        self.notify(StoreEvent::Upserted(id));
        previous
    }

    /// Replace the name of an existing marker.
    ///
    /// Unknown ids are ignored. Returns whether a marker was renamed.
    pub fn rename(&mut self, id: &MarkerId, name: impl Into<String>) -> bool {
        let Some(marker) = self.markers.get_mut(id) else {
            log::debug!("Rename ignored, no marker {}", id);
            return false;
        };
        let name = name.into();
        if marker.name == name {
            return true;
        }
        marker.name = name;
        self.notify(StoreEvent::Renamed(id.clone()));
        true
    }

    /// Remove a marker by ID. Unknown ids are ignored.
    pub fn delete(&mut self, id: &MarkerId) -> Option<Marker> {
        let removed = self.markers.remove(id);
        match removed {
            Some(_) => self.notify(StoreEvent::Deleted(id.clone())),
            None => log::debug!("Delete ignored, no marker {}", id),
        }
        removed
    }

    /// Remove all markers.
    pub fn clear(&mut self) {
        if self.markers.is_empty() {
            return;
        }
        self.markers.clear();
        self.notify(StoreEvent::Cleared);
    }

    /// Replace the whole collection with the markers of an imported document.
    ///
    /// The document is validated first. If any record is invalid the current
    /// markers stay exactly as they were and the error is returned.
    pub fn replace_all(&mut self, document: MarkersDocument) -> Result<usize, FormatError> {
        let markers = document.into_markers()?;
        let count = markers.len();
        self.markers = markers;
        self.notify(StoreEvent::Replaced { count });
        Ok(count)
    }

    /// Parse JSON text and [`replace_all`](Self::replace_all) with it.
    pub fn replace_all_from_json(&mut self, json: &str) -> Result<usize, FormatError> {
        self.replace_all(MarkersDocument::from_json(json)?)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get a marker by ID.
    pub fn get(&self, id: &MarkerId) -> Option<&Marker> {
        self.markers.get(id)
    }

    /// Check if a marker with this id exists.
    pub fn contains(&self, id: &MarkerId) -> bool {
        self.markers.contains_key(id)
    }

    /// Get all markers in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    /// The underlying collection.
    pub fn markers(&self) -> &HashMap<MarkerId, Marker> {
        &self.markers
    }

    /// All markers ordered by id, for renderers that want a stable paint order.
    pub fn snapshot(&self) -> Vec<&Marker> {
        let mut markers: Vec<&Marker> = self.markers.values().collect();
        markers.sort_by(|a, b| a.id.cmp(&b.id));
        markers
    }

    /// Get the number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Check if there are no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Find the marker under a point.
    ///
    /// When markers overlap, the smallest one wins so that a marker drawn
    /// inside a larger one stays reachable.
    pub fn marker_at(&self, point: Point) -> Option<&MarkerId> {
        self.markers
            .values()
            .filter(|m| m.rect.contains(point))
            .min_by(|a, b| {
                a.rect
                    .area()
                    .total_cmp(&b.rect.area())
                    .then_with(|| a.id.cmp(&b.id))
            })
            .map(|m| &m.id)
    }

    // ========================================================================
    // Import/Export
    // ========================================================================

    /// Produce the exchange document for the current markers.
    pub fn serialize(&self) -> MarkersDocument {
        MarkersDocument::from_markers(self.markers.values())
    }

    /// Export markers to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, FormatError> {
        self.serialize().to_json()
    }

    /// Export markers to a compact JSON string.
    pub fn to_json_compact(&self) -> Result<String, FormatError> {
        self.serialize().to_json_compact()
    }

    // ========================================================================
    // Change tracking
    // ========================================================================

    /// Counter incremented on every effective change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check if the store has been modified since last clear_dirty().
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after repainting.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Register a listener called after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        self.revision += 1;
        self.dirty = true;
        log::trace!("Store revision {}: {:?}", self.revision, event);
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}
