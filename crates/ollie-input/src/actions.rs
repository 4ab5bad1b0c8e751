//! Ride action map: binds physical inputs to the semantic actions the ride
//! layer cares about.
//!
//! [`InputMap`] is RON-serializable so keybindings can live in the user
//! config; [`resolve_actions`] recomputes [`ActionState`] once per frame from
//! the current trackers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use winit::event::MouseButton;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::gamepad::{GamepadState, PadButton};
use crate::keyboard::KeyboardState;
use crate::mouse::MouseState;

/// Serde helper for [`KeyCode`], which has no native serde support.
/// Keys serialize as their debug names (e.g. `"KeyG"`).
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        string_to_keycode(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }

    fn string_to_keycode(s: &str) -> Option<KeyCode> {
        Some(match s {
            "KeyA" => KeyCode::KeyA,
            "KeyC" => KeyCode::KeyC,
            "KeyD" => KeyCode::KeyD,
            "KeyE" => KeyCode::KeyE,
            "KeyF" => KeyCode::KeyF,
            "KeyG" => KeyCode::KeyG,
            "KeyQ" => KeyCode::KeyQ,
            "KeyR" => KeyCode::KeyR,
            "KeyS" => KeyCode::KeyS,
            "KeyV" => KeyCode::KeyV,
            "KeyW" => KeyCode::KeyW,
            "KeyX" => KeyCode::KeyX,
            "KeyZ" => KeyCode::KeyZ,
            "Space" => KeyCode::Space,
            "Tab" => KeyCode::Tab,
            "Escape" => KeyCode::Escape,
            "ShiftLeft" => KeyCode::ShiftLeft,
            "ShiftRight" => KeyCode::ShiftRight,
            "ControlLeft" => KeyCode::ControlLeft,
            "ControlRight" => KeyCode::ControlRight,
            "AltLeft" => KeyCode::AltLeft,
            _ => return None,
        })
    }
}

/// Semantic ride actions.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum RideAction {
    /// Move forward.
    MoveForward,
    /// Move backward.
    MoveBack,
    /// Strafe left.
    MoveLeft,
    /// Strafe right.
    MoveRight,
    /// Sprint.
    Sprint,
    /// Crouch.
    Crouch,
    /// Hold to charge a mount, complete to get on the board.
    Mount,
    /// Hold to steer the orbit camera manually (mouse control only).
    OrbitEngage,
    /// Snap the orbit camera back behind the board.
    OrbitReset,
}

/// Wrapper for [`MouseButton`] with serde support.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MouseButtonBinding {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

impl MouseButtonBinding {
    /// The corresponding winit button.
    #[must_use]
    pub fn to_winit(self) -> MouseButton {
        match self {
            Self::Left => MouseButton::Left,
            Self::Right => MouseButton::Right,
            Self::Middle => MouseButton::Middle,
        }
    }
}

/// Analog pad axes usable as bindings.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum GamepadAxisBinding {
    /// Left stick horizontal, signed.
    LeftStickX,
    /// Left stick vertical, signed.
    LeftStickY,
}

/// A physical input that can drive a [`RideAction`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RideBinding {
    /// A keyboard key (physical scan code).
    Key(#[serde(with = "keycode_serde")] KeyCode),
    /// A mouse button.
    MouseButton(MouseButtonBinding),
    /// A gamepad button.
    GamepadButton(PadButton),
    /// A signed gamepad axis.
    GamepadAxis(GamepadAxisBinding),
}

/// Maps actions to bindings. Multiple bindings per action combine by
/// summation, clamped to `[-1, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMap {
    /// The binding table.
    pub bindings: HashMap<RideAction, Vec<RideBinding>>,
}

impl Default for InputMap {
    fn default() -> Self {
        Self::default_skate()
    }
}

impl InputMap {
    /// An empty map with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Default skate bindings: WASD + left stick movement, Shift sprint,
    /// G / North mount, right-mouse orbit engage, middle-mouse / right-stick
    /// click orbit reset.
    #[must_use]
    pub fn default_skate() -> Self {
        let mut bindings: HashMap<RideAction, Vec<RideBinding>> = HashMap::new();

        bindings.insert(
            RideAction::MoveForward,
            vec![
                RideBinding::Key(KeyCode::KeyW),
                RideBinding::GamepadAxis(GamepadAxisBinding::LeftStickY),
            ],
        );
        bindings.insert(RideAction::MoveBack, vec![RideBinding::Key(KeyCode::KeyS)]);
        bindings.insert(RideAction::MoveLeft, vec![RideBinding::Key(KeyCode::KeyA)]);
        bindings.insert(
            RideAction::MoveRight,
            vec![
                RideBinding::Key(KeyCode::KeyD),
                RideBinding::GamepadAxis(GamepadAxisBinding::LeftStickX),
            ],
        );
        bindings.insert(
            RideAction::Sprint,
            vec![
                RideBinding::Key(KeyCode::ShiftLeft),
                RideBinding::GamepadButton(PadButton::LeftStickClick),
            ],
        );
        bindings.insert(
            RideAction::Crouch,
            vec![
                RideBinding::Key(KeyCode::ControlLeft),
                RideBinding::GamepadButton(PadButton::East),
            ],
        );
        bindings.insert(
            RideAction::Mount,
            vec![
                RideBinding::Key(KeyCode::KeyG),
                RideBinding::GamepadButton(PadButton::North),
            ],
        );
        bindings.insert(
            RideAction::OrbitEngage,
            vec![RideBinding::MouseButton(MouseButtonBinding::Right)],
        );
        bindings.insert(
            RideAction::OrbitReset,
            vec![
                RideBinding::MouseButton(MouseButtonBinding::Middle),
                RideBinding::GamepadButton(PadButton::RightStickClick),
            ],
        );

        Self { bindings }
    }

    /// Replaces the bindings for one action.
    pub fn set_bindings(&mut self, action: RideAction, bindings: Vec<RideBinding>) {
        self.bindings.insert(action, bindings);
    }

    /// The bindings for one action, empty when unbound.
    #[must_use]
    pub fn get_bindings(&self, action: RideAction) -> &[RideBinding] {
        self.bindings.get(&action).map_or(&[], |v| v.as_slice())
    }

    /// Serializes to a RON string.
    ///
    /// # Errors
    /// Returns an error when serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserializes from a RON string.
    ///
    /// # Errors
    /// Returns an error when the RON is malformed.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}

/// Threshold below which an action counts as inactive.
const ACTIVATION_THRESHOLD: f32 = 0.001;

/// Per-frame resolved action values with edge detection.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    values: HashMap<RideAction, f32>,
    prev_values: HashMap<RideAction, f32>,
}

impl ActionState {
    /// An empty action state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The analog value of an action, in `[-1, 1]`.
    #[must_use]
    pub fn value(&self, action: RideAction) -> f32 {
        self.values.get(&action).copied().unwrap_or(0.0)
    }

    /// Whether the action is above the activation threshold.
    #[must_use]
    pub fn is_active(&self, action: RideAction) -> bool {
        self.value(action).abs() > ACTIVATION_THRESHOLD
    }

    /// True only on the frame the action became active.
    #[must_use]
    pub fn just_activated(&self, action: RideAction) -> bool {
        let prev = self.prev_values.get(&action).copied().unwrap_or(0.0);
        self.is_active(action) && prev.abs() <= ACTIVATION_THRESHOLD
    }

    /// True only on the frame the action became inactive.
    #[must_use]
    pub fn just_deactivated(&self, action: RideAction) -> bool {
        let prev = self.prev_values.get(&action).copied().unwrap_or(0.0);
        !self.is_active(action) && prev.abs() > ACTIVATION_THRESHOLD
    }
}

/// Recomputes `state` from the current trackers. Call once per frame after
/// event collection.
pub fn resolve_actions(
    map: &InputMap,
    keyboard: &KeyboardState,
    mouse: &MouseState,
    gamepad: Option<&GamepadState>,
    state: &mut ActionState,
) {
    state.prev_values.clone_from(&state.values);
    state.values.clear();

    for (action, bindings) in &map.bindings {
        let mut value = 0.0_f32;
        for binding in bindings {
            value += read_binding(binding, keyboard, mouse, gamepad);
        }
        state.values.insert(*action, value.clamp(-1.0, 1.0));
    }
}

fn read_binding(
    binding: &RideBinding,
    keyboard: &KeyboardState,
    mouse: &MouseState,
    gamepad: Option<&GamepadState>,
) -> f32 {
    match binding {
        RideBinding::Key(code) => {
            if keyboard.is_pressed(PhysicalKey::Code(*code)) {
                1.0
            } else {
                0.0
            }
        }
        RideBinding::MouseButton(button) => {
            if mouse.is_button_pressed(button.to_winit()) {
                1.0
            } else {
                0.0
            }
        }
        RideBinding::GamepadButton(button) => {
            if gamepad.is_some_and(|pad| pad.is_button_pressed(*button)) {
                1.0
            } else {
                0.0
            }
        }
        RideBinding::GamepadAxis(axis) => gamepad.map_or(0.0, |pad| match axis {
            GamepadAxisBinding::LeftStickX => pad.left_stick().x,
            GamepadAxisBinding::LeftStickY => pad.left_stick().y,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::MockPad;
    use winit::event::ElementState;

    fn press(kb: &mut KeyboardState, code: KeyCode) {
        kb.on_key(PhysicalKey::Code(code), ElementState::Pressed);
    }

    fn release(kb: &mut KeyboardState, code: KeyCode) {
        kb.on_key(PhysicalKey::Code(code), ElementState::Released);
    }

    #[test]
    fn test_key_binding_activates_action() {
        let map = InputMap::default_skate();
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::KeyG);

        let mouse = MouseState::new();
        let mut state = ActionState::new();
        resolve_actions(&map, &kb, &mouse, None, &mut state);

        assert!(state.is_active(RideAction::Mount));
        assert!((state.value(RideAction::Mount) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mount_press_edge() {
        let map = InputMap::default_skate();
        let mut kb = KeyboardState::new();
        let mouse = MouseState::new();
        let mut state = ActionState::new();

        press(&mut kb, KeyCode::KeyG);
        resolve_actions(&map, &kb, &mouse, None, &mut state);
        assert!(state.just_activated(RideAction::Mount));

        resolve_actions(&map, &kb, &mouse, None, &mut state);
        assert!(!state.just_activated(RideAction::Mount));
        assert!(state.is_active(RideAction::Mount));

        release(&mut kb, KeyCode::KeyG);
        resolve_actions(&map, &kb, &mouse, None, &mut state);
        assert!(state.just_deactivated(RideAction::Mount));
    }

    #[test]
    fn test_gamepad_axis_gives_analog_value() {
        let map = InputMap::default_skate();
        let kb = KeyboardState::new();
        let mouse = MouseState::new();

        let mut pad = MockPad::new();
        pad.set_deadzone(0.0);
        pad.set_left_stick(0.0, 0.75);

        let mut state = ActionState::new();
        resolve_actions(&map, &kb, &mouse, Some(pad.state()), &mut state);

        let value = state.value(RideAction::MoveForward);
        assert!((value - 0.75).abs() < 0.01, "got {value}");
    }

    #[test]
    fn test_combined_bindings_clamped() {
        let map = InputMap::default_skate();
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::KeyW);
        let mouse = MouseState::new();

        let mut pad = MockPad::new();
        pad.set_deadzone(0.0);
        pad.set_left_stick(0.0, 0.8);

        let mut state = ActionState::new();
        resolve_actions(&map, &kb, &mouse, Some(pad.state()), &mut state);

        assert!((state.value(RideAction::MoveForward) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unbound_action_is_inactive() {
        let map = InputMap::new();
        let kb = KeyboardState::new();
        let mouse = MouseState::new();
        let mut state = ActionState::new();
        resolve_actions(&map, &kb, &mouse, None, &mut state);
        assert!(!state.is_active(RideAction::Sprint));
    }

    #[test]
    fn test_map_round_trips_through_ron() {
        let map = InputMap::default_skate();
        let ron_str = map.to_ron().unwrap();
        let restored = InputMap::from_ron(&ron_str).unwrap();
        assert_eq!(
            restored.get_bindings(RideAction::Mount),
            map.get_bindings(RideAction::Mount)
        );
        assert_eq!(restored.bindings.len(), map.bindings.len());
    }

    #[test]
    fn test_rebinding_replaces_old_binding() {
        let mut map = InputMap::default_skate();
        map.set_bindings(RideAction::Mount, vec![RideBinding::Key(KeyCode::KeyF)]);

        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::KeyG);
        let mouse = MouseState::new();
        let mut state = ActionState::new();
        resolve_actions(&map, &kb, &mouse, None, &mut state);
        assert!(!state.is_active(RideAction::Mount), "old key must not fire");

        press(&mut kb, KeyCode::KeyF);
        resolve_actions(&map, &kb, &mouse, None, &mut state);
        assert!(state.is_active(RideAction::Mount));
    }
}
