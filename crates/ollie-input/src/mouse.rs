//! Frame-coherent mouse state.
//!
//! Accumulates winit cursor/button events during a frame and answers the two
//! questions the camera rig asks: how far did the mouse move, and is the
//! orbit button held. When the cursor is captured, raw device motion is used
//! instead of cursor-position differences.

use glam::Vec2;
use winit::event::{ElementState, MouseButton};

/// Per-button press/release tracking for a single frame.
#[derive(Debug, Clone, Copy, Default)]
struct ButtonFrame {
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
}

fn button_index(button: MouseButton) -> usize {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
        MouseButton::Back | MouseButton::Forward | MouseButton::Other(_) => 3,
    }
}

/// Frame-coherent mouse state.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    delta: Vec2,
    buttons: [ButtonFrame; 4],
    captured: bool,
}

impl MouseState {
    /// A zeroed mouse state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a `CursorMoved` event. Ignored for delta purposes while
    /// captured (raw motion is authoritative then).
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if !self.captured {
            self.delta += new_pos - self.position;
        }
        self.position = new_pos;
    }

    /// Processes a raw `DeviceEvent::MouseMotion` delta (used when captured).
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// Processes a `MouseInput` event.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        let frame = &mut self.buttons[button_index(button)];
        match state {
            ElementState::Pressed => {
                frame.pressed = true;
                frame.just_pressed = true;
            }
            ElementState::Released => {
                frame.pressed = false;
                frame.just_released = true;
            }
        }
    }

    /// Marks the cursor as captured (hidden and grabbed by the host window).
    /// The host owns the actual window grab; this only switches which event
    /// stream feeds [`delta`](Self::delta).
    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
    }

    /// Clears per-frame transients. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        for frame in &mut self.buttons {
            frame.just_pressed = false;
            frame.just_released = false;
        }
    }

    /// Cursor position in window-logical coordinates.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Accumulated movement delta this frame.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Whether a button is currently held.
    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].pressed
    }

    /// Whether a button was pressed this frame.
    #[must_use]
    pub fn just_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].just_pressed
    }

    /// Whether a button was released this frame.
    #[must_use]
    pub fn just_button_released(&self, button: MouseButton) -> bool {
        self.buttons[button_index(button)].just_released
    }

    /// Whether the cursor is currently captured.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_from_cursor_positions() {
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(100.0, 100.0);
        mouse.clear_transients();
        mouse.on_cursor_moved(112.0, 95.0);
        assert!((mouse.delta() - Vec2::new(12.0, -5.0)).length() < 1e-6);
    }

    #[test]
    fn test_raw_motion_only_counts_while_captured() {
        let mut mouse = MouseState::new();
        mouse.on_raw_motion(5.0, 0.0);
        assert_eq!(mouse.delta(), Vec2::ZERO);

        mouse.set_captured(true);
        mouse.on_raw_motion(5.0, 3.0);
        assert_eq!(mouse.delta(), Vec2::new(5.0, 3.0));
    }

    #[test]
    fn test_cursor_moves_ignored_while_captured() {
        let mut mouse = MouseState::new();
        mouse.set_captured(true);
        mouse.on_cursor_moved(50.0, 50.0);
        assert_eq!(mouse.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_button_edges() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Right, ElementState::Pressed);
        assert!(mouse.is_button_pressed(MouseButton::Right));
        assert!(mouse.just_button_pressed(MouseButton::Right));

        mouse.clear_transients();
        mouse.on_button(MouseButton::Right, ElementState::Released);
        assert!(!mouse.is_button_pressed(MouseButton::Right));
        assert!(mouse.just_button_released(MouseButton::Right));
    }

    #[test]
    fn test_delta_resets_each_frame() {
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(10.0, 10.0);
        mouse.clear_transients();
        assert_eq!(mouse.delta(), Vec2::ZERO);
    }
}
