//! Customizable keybindings for MarkerX.
//!
//! Maps key presses to the interaction commands a host would otherwise
//! trigger from buttons.

use serde::{Deserialize, Serialize};

use crate::interaction::{KeyCode, Modifiers};

/// Command triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Arm the engine to draw a new marker
    StartMarking,
    /// Cancel the drawing in progress, disarm, or leave naming
    Cancel,
    /// Finish naming the current marker
    ConfirmName,
}

/// Keybinding configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Hotkey for starting a new marker
    pub start_marking: KeyCode,
    /// Hotkey for cancelling the current interaction
    pub cancel: KeyCode,
    /// Hotkey for committing a marker name
    pub confirm_name: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            start_marking: KeyCode::Char('m'),
            cancel: KeyCode::Escape,
            confirm_name: KeyCode::Enter,
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action that corresponds to a key press, if any.
    ///
    /// Presses with ctrl, alt or meta held never match, so host shortcuts
    /// such as Ctrl+M pass through untouched.
    pub fn action_for_key(&self, key: KeyCode, modifiers: Modifiers) -> Option<KeyAction> {
        if modifiers.has_command() {
            return None;
        }
        let key = key.normalized();
        if key == self.cancel.normalized() {
            Some(KeyAction::Cancel)
        } else if key == self.confirm_name.normalized() {
            Some(KeyAction::ConfirmName)
        } else if key == self.start_marking.normalized() {
            Some(KeyAction::StartMarking)
        } else {
            None
        }
    }

    /// Get the hotkey for an action.
    pub fn key_for_action(&self, action: KeyAction) -> KeyCode {
        match action {
            KeyAction::StartMarking => self.start_marking,
            KeyAction::Cancel => self.cancel,
            KeyAction::ConfirmName => self.confirm_name,
        }
    }

    /// Set the hotkey for an action.
    pub fn set_key(&mut self, action: KeyAction, key: KeyCode) {
        match action {
            KeyAction::StartMarking => self.start_marking = key,
            KeyAction::Cancel => self.cancel = key,
            KeyAction::ConfirmName => self.confirm_name = key,
        }
    }

    /// Check if a key is already bound to an action other than `exclude`.
    pub fn key_conflict(&self, key: KeyCode, exclude: Option<KeyAction>) -> Option<KeyAction> {
        [
            KeyAction::StartMarking,
            KeyAction::Cancel,
            KeyAction::ConfirmName,
        ]
        .into_iter()
        .filter(|action| Some(*action) != exclude)
        .find(|action| self.key_for_action(*action).normalized() == key.normalized())
    }
}
