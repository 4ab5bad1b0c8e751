//! Frame-coherent keyboard state.
//!
//! Physical key codes are used throughout so bindings work the same on any
//! keyboard layout.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Tracks held keys plus the press/release edges of the current frame.
///
/// Forward every winit [`KeyEvent`] through [`on_key_event`](Self::on_key_event)
/// (or [`on_key`](Self::on_key) in tests), query with the accessors, and call
/// [`clear_transients`](Self::clear_transients) at end of frame.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<PhysicalKey>,
    just_pressed: HashSet<PhysicalKey>,
    just_released: HashSet<PhysicalKey>,
}

impl KeyboardState {
    /// An empty keyboard state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a winit [`KeyEvent`]. Repeat events are ignored.
    pub fn on_key_event(&mut self, event: &KeyEvent) {
        if event.repeat {
            return;
        }
        self.on_key(event.physical_key, event.state);
    }

    /// Processes a key transition directly (platform-independent, test-friendly).
    pub fn on_key(&mut self, key: PhysicalKey, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.held.insert(key);
                self.just_pressed.insert(key);
            }
            ElementState::Released => {
                self.held.remove(&key);
                self.just_released.insert(key);
            }
        }
    }

    /// Whether the key is currently held.
    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.held.contains(&key)
    }

    /// Whether the key transitioned to pressed this frame.
    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Whether the key transitioned to released this frame.
    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.just_released.contains(&key)
    }

    /// Clears the per-frame edge sets. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
