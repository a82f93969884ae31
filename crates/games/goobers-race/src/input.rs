use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use goobers_core::player::ControlScheme;

/// Actions a racer requests on one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dash: bool,
}

/// Keys currently held down, shared by every racer in the arena.
///
/// Key identifiers are compared case-insensitively. There is no debouncing
/// here; jump and dash rate limits live in the physics step.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    keys_down: HashSet<String>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        self.keys_down.insert(key.to_lowercase());
    }

    pub fn on_key_up(&mut self, key: &str) {
        self.keys_down.remove(&key.to_lowercase());
    }

    /// Check if a key is currently held. Unbound (empty) keys never are.
    pub fn is_held(&self, key: &str) -> bool {
        !key.is_empty() && self.keys_down.contains(&key.to_lowercase())
    }

    /// Read one racer's four actions.
    pub fn sample(&self, controls: &ControlScheme) -> ActionInput {
        ActionInput {
            left: self.is_held(&controls.left),
            right: self.is_held(&controls.right),
            jump: self.is_held(&controls.jump),
            dash: self.is_held(&controls.dash),
        }
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys_down.clear();
    }

    pub fn held_count(&self) -> usize {
        self.keys_down.len()
    }
}
