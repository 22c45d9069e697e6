//! Pointer and keyboard interaction.
//!
//! The [`InteractionEngine`] is the only writer that creates markers. Hosts
//! forward raw input to it and repaint whenever an [`EventOutcome`] says so.

mod engine;
mod ids;
mod keyboard;
mod scheduler;


pub use engine::{EventOutcome, InteractionEngine, InteractionMode, Surface};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use keyboard::{KeyCode, KeyboardFocus, KeyboardSubscription, Modifiers};
pub use scheduler::FrameScheduler;
