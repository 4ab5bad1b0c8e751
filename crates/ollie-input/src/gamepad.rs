//! Gamepad input wrapping [`gilrs`].
//!
//! [`GamepadManager`] polls gilrs once per frame, filters stick axes through
//! a deadzone, and tracks button edges. The ride layer only ever looks at one
//! pad (the first connected), so the manager exposes
//! [`active`](GamepadManager::active) rather than a full roster.

use gilrs::{Axis, Button, EventType, Gilrs};
use glam::Vec2;
use std::collections::HashMap;
use tracing::info;

/// Pad buttons used by the ride bindings, named positionally so they work
/// across Xbox / PlayStation / generic pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PadButton {
    /// A / Cross.
    South,
    /// B / Circle.
    East,
    /// Y / Triangle.
    North,
    /// X / Square.
    West,
    LeftShoulder,
    RightShoulder,
    LeftStickClick,
    RightStickClick,
    Start,
    Select,
}

impl PadButton {
    fn from_gilrs(button: Button) -> Option<Self> {
        match button {
            Button::South => Some(Self::South),
            Button::East => Some(Self::East),
            Button::North => Some(Self::North),
            Button::West => Some(Self::West),
            Button::LeftTrigger => Some(Self::LeftShoulder),
            Button::RightTrigger => Some(Self::RightShoulder),
            Button::LeftThumb => Some(Self::LeftStickClick),
            Button::RightThumb => Some(Self::RightStickClick),
            Button::Start => Some(Self::Start),
            Button::Select => Some(Self::Select),
            _ => None,
        }
    }
}

/// Per-button frame state.
#[derive(Debug, Clone, Copy, Default)]
struct ButtonFrame {
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
}

/// Snapshot of the active gamepad for one frame.
#[derive(Debug, Clone, Default)]
pub struct GamepadState {
    name: String,
    connected: bool,
    left_stick: Vec2,
    right_stick: Vec2,
    buttons: HashMap<PadButton, ButtonFrame>,
}

impl GamepadState {
    /// Human-readable pad name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the pad is currently connected.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Left stick after deadzone filtering. x: left(-1)..right(+1), y: down(-1)..up(+1).
    #[must_use]
    pub fn left_stick(&self) -> Vec2 {
        self.left_stick
    }

    /// Right stick after deadzone filtering.
    #[must_use]
    pub fn right_stick(&self) -> Vec2 {
        self.right_stick
    }

    /// Whether `button` is currently held.
    #[must_use]
    pub fn is_button_pressed(&self, button: PadButton) -> bool {
        self.buttons.get(&button).is_some_and(|b| b.pressed)
    }

    /// Whether `button` was first pressed this frame.
    #[must_use]
    pub fn just_button_pressed(&self, button: PadButton) -> bool {
        self.buttons.get(&button).is_some_and(|b| b.just_pressed)
    }

    /// Whether `button` was released this frame.
    #[must_use]
    pub fn just_button_released(&self, button: PadButton) -> bool {
        self.buttons.get(&button).is_some_and(|b| b.just_released)
    }

    fn clear_frame(&mut self) {
        for frame in self.buttons.values_mut() {
            frame.just_pressed = false;
            frame.just_released = false;
        }
    }
}

/// Polls gilrs and maintains the active pad snapshot.
pub struct GamepadManager {
    gilrs: Option<Gilrs>,
    state: GamepadState,
    deadzone: f32,
}

impl GamepadManager {
    /// Creates a manager. A missing platform backend is logged and treated
    /// as "no pad ever connects" rather than an error.
    #[must_use]
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(err) => {
                info!("gamepad backend unavailable: {err}");
                None
            }
        };
        let mut manager = Self {
            gilrs,
            state: GamepadState::default(),
            deadzone: 0.15,
        };
        if let Some(gilrs) = &manager.gilrs
            && let Some((_, pad)) = gilrs.gamepads().find(|(_, g)| g.is_connected())
        {
            manager.state.connected = true;
            manager.state.name = pad.name().to_string();
        }
        manager
    }

    /// Sets the stick deadzone threshold.
    pub fn set_deadzone(&mut self, value: f32) {
        self.deadzone = value.clamp(0.0, 0.99);
    }

    /// The active pad snapshot, or `None` when nothing is connected.
    #[must_use]
    pub fn active(&self) -> Option<&GamepadState> {
        self.state.connected.then_some(&self.state)
    }

    /// Drains gilrs events and updates the snapshot. Call once per frame.
    pub fn update(&mut self) {
        self.state.clear_frame();
        let Some(gilrs) = &mut self.gilrs else {
            return;
        };

        while let Some(event) = gilrs.next_event() {
            match event.event {
                EventType::Connected => {
                    self.state.connected = true;
                    self.state.name = gilrs.gamepad(event.id).name().to_string();
                    info!(pad = %self.state.name, "gamepad connected");
                }
                EventType::Disconnected => {
                    self.state.connected = false;
                    info!(pad = %self.state.name, "gamepad disconnected");
                }
                EventType::AxisChanged(axis, raw, _) => {
                    let value = apply_deadzone(raw, self.deadzone);
                    match axis {
                        Axis::LeftStickX => self.state.left_stick.x = value,
                        Axis::LeftStickY => self.state.left_stick.y = value,
                        Axis::RightStickX => self.state.right_stick.x = value,
                        Axis::RightStickY => self.state.right_stick.y = value,
                        _ => {}
                    }
                }
                EventType::ButtonPressed(button, _) => {
                    if let Some(pad_button) = PadButton::from_gilrs(button) {
                        let frame = self.state.buttons.entry(pad_button).or_default();
                        frame.pressed = true;
                        frame.just_pressed = true;
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(pad_button) = PadButton::from_gilrs(button) {
                        let frame = self.state.buttons.entry(pad_button).or_default();
                        frame.pressed = false;
                        frame.just_released = true;
                    }
                }
                _ => {}
            }
        }
    }
}

impl Default for GamepadManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Deadzone with rescaling: below the threshold snaps to zero, the remaining
/// range is stretched back to `[0, 1]`, sign preserved.
fn apply_deadzone(raw: f32, deadzone: f32) -> f32 {
    let abs = raw.abs();
    if abs < deadzone {
        return 0.0;
    }
    let rescaled = (abs - deadzone) / (1.0 - deadzone);
    rescaled.min(1.0).copysign(raw)
}

/// Builds pad snapshots without hardware, for tests.
#[cfg(test)]
pub(crate) struct MockPad {
    state: GamepadState,
    deadzone: f32,
}

#[cfg(test)]
impl MockPad {
    pub fn new() -> Self {
        Self {
            state: GamepadState {
                name: "Test Pad".to_string(),
                connected: true,
                ..GamepadState::default()
            },
            deadzone: 0.15,
        }
    }

    pub fn set_deadzone(&mut self, value: f32) {
        self.deadzone = value.clamp(0.0, 0.99);
    }

    pub fn set_left_stick(&mut self, x: f32, y: f32) {
        self.state.left_stick = Vec2::new(
            apply_deadzone(x, self.deadzone),
            apply_deadzone(y, self.deadzone),
        );
    }

    pub fn set_right_stick(&mut self, x: f32, y: f32) {
        self.state.right_stick = Vec2::new(
            apply_deadzone(x, self.deadzone),
            apply_deadzone(y, self.deadzone),
        );
    }

    pub fn press(&mut self, button: PadButton) {
        let frame = self.state.buttons.entry(button).or_default();
        frame.pressed = true;
        frame.just_pressed = true;
    }

    pub fn release(&mut self, button: PadButton) {
        let frame = self.state.buttons.entry(button).or_default();
        frame.pressed = false;
        frame.just_released = true;
    }

    pub fn clear_frame(&mut self) {
        self.state.clear_frame();
    }

    pub fn state(&self) -> &GamepadState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone_filters_small_values() {
        assert_eq!(apply_deadzone(0.1, 0.15), 0.0);
        assert_eq!(apply_deadzone(-0.1, 0.15), 0.0);
    }

    #[test]
    fn test_deadzone_rescales_above_threshold() {
        // (0.575 - 0.15) / 0.85 = 0.5
        let value = apply_deadzone(0.575, 0.15);
        assert!((value - 0.5).abs() < 0.01, "got {value}");
        assert!((apply_deadzone(-0.575, 0.15) + 0.5).abs() < 0.01);
    }

    #[test]
    fn test_full_deflection_stays_in_range() {
        assert!((apply_deadzone(1.0, 0.15) - 1.0).abs() < 1e-6);
        assert!((apply_deadzone(-1.0, 0.15) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mock_pad_button_edges() {
        let mut pad = MockPad::new();
        pad.press(PadButton::North);
        assert!(pad.state().is_button_pressed(PadButton::North));
        assert!(pad.state().just_button_pressed(PadButton::North));

        pad.clear_frame();
        pad.release(PadButton::North);
        assert!(!pad.state().is_button_pressed(PadButton::North));
        assert!(pad.state().just_button_released(PadButton::North));
    }

    #[test]
    fn test_mock_pad_sticks_respect_deadzone() {
        let mut pad = MockPad::new();
        pad.set_right_stick(0.05, 0.9);
        assert_eq!(pad.state().right_stick().x, 0.0);
        assert!(pad.state().right_stick().y > 0.8);
    }
}
