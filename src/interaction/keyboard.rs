//! Keyboard input types and the scoped keyboard subscription.
//!
//! The engine only reacts to key events while at least one
//! [`KeyboardSubscription`] is alive. A host takes a subscription when the
//! marking surface becomes active and simply drops it when the surface goes
//! away. The release happens in `Drop`, so every exit path releases it.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Keyboard keys the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Space,
}

impl KeyCode {
    /// Lowercase letter keys so bindings match regardless of shift or caps lock.
    pub fn normalized(self) -> Self {
        match self {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Whether a command modifier (ctrl, alt or meta) is held. Shift alone
    /// does not count.
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Tracks live keyboard subscriptions.
#[derive(Debug, Clone, Default)]
pub struct KeyboardFocus {
    holders: Rc<Cell<usize>>,
}

impl KeyboardFocus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening for key events until the returned guard is dropped.
    pub fn subscribe(&self) -> KeyboardSubscription {
        self.holders.set(self.holders.get() + 1);
        log::debug!("Keyboard subscription acquired ({} active)", self.holders.get());
        KeyboardSubscription {
            holders: Rc::clone(&self.holders),
        }
    }

    /// Check if any subscription is alive.
    pub fn is_active(&self) -> bool {
        self.holders.get() > 0
    }
}

/// Guard keeping keyboard input routed to the engine.
#[derive(Debug)]
#[must_use = "key events are ignored once the subscription is dropped"]
pub struct KeyboardSubscription {
    holders: Rc<Cell<usize>>,
}

impl Drop for KeyboardSubscription {
    fn drop(&mut self) {
        self.holders.set(self.holders.get().saturating_sub(1));
        log::debug!("Keyboard subscription released ({} active)", self.holders.get());
    }
}
