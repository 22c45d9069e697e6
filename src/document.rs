//! A single marking session: one image, its markers, and the interaction
//! state that edits them.
//!
//! [`Document`] is what a host UI talks to. Commands from buttons and menus
//! map to its methods, raw pointer and key events are routed through it to the
//! [`InteractionEngine`], and [`Document::render_state`] gathers everything a
//! renderer needs for one repaint.

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::format::{FormatError, MarkersDocument};
use crate::interaction::{
    EventOutcome, InteractionEngine, InteractionMode, KeyCode, KeyboardSubscription, Modifiers,
    Surface,
};
use crate::model::{Marker, MarkerId, Point};
use crate::store::MarkerStore;

/// The image markers are drawn on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Where the image was loaded from, if it came from disk.
    pub path: Option<PathBuf>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageRef {
    /// Reference an image the host decoded itself.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            path: None,
            width,
            height,
        }
    }

    /// Attach the path the image came from.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn surface(&self) -> Surface {
        Surface::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Everything a renderer draws for one frame.
#[derive(Debug)]
pub struct RenderState<'a> {
    /// Current interaction mode
    pub mode: InteractionMode,
    /// Stored markers sorted by id, without the one being drawn
    pub markers: Vec<&'a Marker>,
    /// The marker being drawn, at its latest geometry
    pub draft: Option<&'a Marker>,
    /// Marker whose name field has focus
    pub naming_target: Option<&'a MarkerId>,
    /// The loaded image, if any
    pub image: Option<&'a ImageRef>,
    /// Store revision the markers were taken at
    pub revision: u64,
}

/// One image with its markers and interaction state.
#[derive(Debug, Default)]
pub struct Document {
    store: MarkerStore,
    engine: InteractionEngine,
    image: Option<ImageRef>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document using the preferences and keybindings of `config`.
    pub fn with_config(config: &AppConfig) -> Self {
        let engine = InteractionEngine::new()
            .with_live_preview(config.preferences.live_preview)
            .with_bindings(config.keybindings.clone());
        Self::with_engine(engine)
    }

    /// Create a document around a preconfigured engine.
    pub fn with_engine(engine: InteractionEngine) -> Self {
        Self {
            store: MarkerStore::new(),
            engine,
            image: None,
        }
    }

    pub fn store(&self) -> &MarkerStore {
        &self.store
    }

    /// Mutable store access, for subscribing listeners and clearing the
    /// dirty flag.
    pub fn store_mut(&mut self) -> &mut MarkerStore {
        &mut self.store
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut InteractionEngine {
        &mut self.engine
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn mode(&self) -> InteractionMode {
        self.engine.mode()
    }

    /// Gather the state for a repaint.
    pub fn render_state(&self) -> RenderState<'_> {
        let draft = self.engine.draft();
        let markers = self
            .store
            .snapshot()
            .into_iter()
            .filter(|marker| draft.is_none_or(|draft| draft.id != marker.id))
            .collect();
        RenderState {
            mode: self.engine.mode(),
            markers,
            draft,
            naming_target: self.engine.naming_target(),
            image: self.image.as_ref(),
            revision: self.store.revision(),
        }
    }

    /// The marker under `point`, for click-to-name hit testing.
    pub fn marker_at(&self, point: Point) -> Option<&MarkerId> {
        self.store.marker_at(point)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub fn start_marking(&mut self) -> EventOutcome {
        self.engine.start_marking()
    }

    pub fn cancel(&mut self) -> EventOutcome {
        self.engine.cancel(&mut self.store)
    }

    /// Drop all markers, the interaction state and the loaded image.
    pub fn reset_all(&mut self) {
        self.engine.reset();
        self.engine.set_surface(None);
        self.store.clear();
        self.image = None;
        log::info!("Document reset");
    }

    /// Delete a marker. Unknown ids are ignored.
    ///
    /// If the marker is being named or drawn, that ends first, so the engine
    /// never points at a marker the store no longer has.
    pub fn delete_marker(&mut self, id: &MarkerId) -> Option<Marker> {
        self.engine.marker_removed(id);
        self.engine.observe_ids([id]);
        let removed = self.store.delete(id);
        if removed.is_some() {
            log::info!("Deleted marker {} (remaining: {})", id, self.store.len());
        }
        removed
    }

    /// Rename a marker directly. Returns false for unknown ids.
    pub fn rename_marker(&mut self, id: &MarkerId, name: &str) -> bool {
        self.store.rename(id, name)
    }

    pub fn begin_naming(&mut self, id: &MarkerId) -> EventOutcome {
        self.engine.begin_naming(id, &self.store)
    }

    pub fn name_changed(&mut self, text: &str) -> EventOutcome {
        self.engine.name_changed(text, &mut self.store)
    }

    pub fn end_naming(&mut self) -> EventOutcome {
        self.engine.end_naming()
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn pointer_down(&mut self, position: Point) -> EventOutcome {
        self.engine.pointer_down(position, &self.store)
    }

    pub fn pointer_move(&mut self, position: Point) -> EventOutcome {
        self.engine.pointer_move(position)
    }

    pub fn pointer_up(&mut self, position: Point) -> EventOutcome {
        self.engine.pointer_up(position, &mut self.store)
    }

    /// Apply coalesced pointer movement. Call once per frame.
    pub fn on_frame(&mut self) -> EventOutcome {
        self.engine.on_frame(&mut self.store)
    }

    pub fn key_pressed(&mut self, key: KeyCode, modifiers: Modifiers) -> EventOutcome {
        self.engine.key_pressed(key, modifiers, &mut self.store)
    }

    /// Route key events to the document until the guard is dropped.
    pub fn subscribe_keyboard(&self) -> KeyboardSubscription {
        self.engine.subscribe_keyboard()
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// Replace all markers with the contents of an exported file.
    ///
    /// On failure nothing changes: markers and interaction state stay as they
    /// were. On success any drawing or naming in progress is dropped.
    pub fn import_from_bytes(&mut self, bytes: &[u8]) -> Result<usize, FormatError> {
        let result = MarkersDocument::from_slice(bytes)
            .and_then(|document| self.store.replace_all(document));
        match result {
            Ok(count) => {
                self.engine.reset();
                self.engine.observe_ids(self.store.markers().keys());
                log::info!("Imported {} markers", count);
                Ok(count)
            }
            Err(e) => {
                log::warn!("Import rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Export all markers as pretty-printed JSON.
    pub fn export_to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let json = self.store.to_json()?;
        log::info!("Exported {} markers", self.store.len());
        Ok(json.into_bytes())
    }

    /// Read a file and [`import_from_bytes`](Self::import_from_bytes) it.
    pub fn import_from_path(&mut self, path: &Path) -> Result<usize, FormatError> {
        let bytes = std::fs::read(path)?;
        self.import_from_bytes(&bytes)
    }

    /// Write the export to a file.
    pub fn export_to_path(&self, path: &Path) -> Result<(), FormatError> {
        let bytes = self.export_to_bytes()?;
        std::fs::write(path, bytes)?;
        log::debug!("Wrote markers to {:?}", path);
        Ok(())
    }

    // ========================================================================
    // Image
    // ========================================================================

    /// Load an image's dimensions from disk and make it the drawing surface.
    ///
    /// Only the header is read. Existing markers are kept.
    pub fn load_image(&mut self, path: &Path) -> Result<&ImageRef, image::ImageError> {
        let (width, height) = image::image_dimensions(path)?;
        log::info!("Loaded image {:?} ({}x{})", path, width, height);
        Ok(self.set_image(ImageRef::new(width, height).with_path(path)))
    }

    /// Use an image the host decoded itself as the drawing surface.
    pub fn set_image(&mut self, image: ImageRef) -> &ImageRef {
        self.engine.set_surface(Some(image.surface()));
        self.image.insert(image)
    }

    /// Forget the image. Drawing is no longer bounded by its size.
    pub fn clear_image(&mut self) {
        self.engine.set_surface(None);
        self.image = None;
    }
}
