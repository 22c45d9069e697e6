//! MarkerX - rectangle marker annotation for a single image
//!
//! The crate is the core a host UI builds on: a [`MarkerStore`] holding named,
//! colored rectangles, an [`InteractionEngine`] turning pointer and keyboard
//! input into marker edits, and a JSON exchange format for import and export.
//! [`Document`] ties them together with the loaded image.

pub mod color_utils;
pub mod config;
pub mod constants;
pub mod document;
pub mod format;
pub mod interaction;
pub mod keybindings;
pub mod model;
pub mod store;

pub use config::{AppConfig, ConfigError, LogLevel};
pub use document::{Document, ImageRef, RenderState};
pub use format::{FormatError, MarkersDocument};
pub use interaction::{EventOutcome, InteractionEngine, InteractionMode};
pub use keybindings::{KeyAction, KeyBindings};
pub use model::{Color, Marker, MarkerId, Point, Rect};
pub use store::{ListenerId, MarkerStore, StoreEvent};

#[cfg(not(target_arch = "wasm32"))]
pub use config::init_logging;
