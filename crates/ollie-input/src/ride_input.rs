//! The per-frame input snapshot the ride service consumes.

use glam::Vec2;

use crate::actions::{ActionState, InputMap, RideAction, resolve_actions};
use crate::gamepad::GamepadState;
use crate::keyboard::KeyboardState;
use crate::mouse::MouseState;

/// Everything the ride service wants to know about input this frame,
/// device-agnostic.
///
/// `look_delta` is already in radians: the collector applies mouse
/// sensitivity or stick rate before the snapshot is built. `requires_engage`
/// tells the camera rig whether manual orbit is gated behind the engage
/// button (mouse control) or always live (pad stick).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RideInput {
    /// Movement input. x: strafe right(+), y: forward(+). Length ≤ 1.
    pub motion_axis: Vec2,
    /// Whether the mount action is held.
    pub mount_held: bool,
    /// True only on the frame the mount action was first pressed.
    pub mount_pressed: bool,
    /// Whether the sprint action is held.
    pub sprint_held: bool,
    /// Whether the crouch action is held.
    pub crouch_held: bool,
    /// Orbit angle deltas this frame, radians. x: yaw, y: pitch (positive = up).
    pub look_delta: Vec2,
    /// Whether manual orbit input is currently engaged.
    pub orbit_engaged: bool,
    /// True only on the frame the orbit-reset action was pressed.
    pub orbit_reset_pressed: bool,
    /// Whether this device gates manual orbit behind the engage button.
    pub requires_engage: bool,
}

impl RideInput {
    /// A snapshot with no input at all (mouse scheme).
    #[must_use]
    pub fn idle() -> Self {
        Self {
            requires_engage: true,
            ..Self::default()
        }
    }
}

/// Builds [`RideInput`] snapshots from the raw trackers.
pub struct RideInputCollector {
    /// Radians of orbit per pixel of mouse travel.
    pub mouse_sensitivity: f32,
    /// Invert the vertical orbit axis.
    pub invert_y: bool,
    /// Radians per second of orbit at full stick deflection.
    pub stick_orbit_rate: f32,
    map: InputMap,
    actions: ActionState,
    pad_was_last_device: bool,
}

impl RideInputCollector {
    /// Creates a collector over the given binding map.
    #[must_use]
    pub fn new(map: InputMap) -> Self {
        Self {
            mouse_sensitivity: 0.0022,
            invert_y: false,
            stick_orbit_rate: 2.6,
            map,
            actions: ActionState::new(),
            pad_was_last_device: false,
        }
    }

    /// Resolves actions and condenses the trackers into one snapshot.
    /// Call once per frame, before the trackers clear their transients.
    pub fn collect(
        &mut self,
        keyboard: &KeyboardState,
        mouse: &MouseState,
        gamepad: Option<&GamepadState>,
        dt: f32,
    ) -> RideInput {
        resolve_actions(&self.map, keyboard, mouse, gamepad, &mut self.actions);

        let stick = gamepad.map_or(Vec2::ZERO, GamepadState::right_stick);
        let mouse_delta = mouse.delta();
        if stick != Vec2::ZERO {
            self.pad_was_last_device = true;
        } else if mouse_delta != Vec2::ZERO {
            self.pad_was_last_device = false;
        }

        let y_sign = if self.invert_y { -1.0 } else { 1.0 };
        let (look_delta, orbit_engaged, requires_engage) = if self.pad_was_last_device {
            // Stick orbit is rate-based and always engaged.
            let delta = Vec2::new(stick.x, stick.y * y_sign) * self.stick_orbit_rate * dt;
            (delta, stick != Vec2::ZERO, false)
        } else {
            // Mouse orbit: screen-down is positive delta.y, pitch-up is
            // positive look_delta.y.
            let delta = Vec2::new(mouse_delta.x, -mouse_delta.y * y_sign) * self.mouse_sensitivity;
            (delta, self.actions.is_active(RideAction::OrbitEngage), true)
        };

        let motion = Vec2::new(
            self.actions.value(RideAction::MoveRight) - self.actions.value(RideAction::MoveLeft),
            self.actions.value(RideAction::MoveForward) - self.actions.value(RideAction::MoveBack),
        );

        RideInput {
            motion_axis: motion.clamp_length_max(1.0),
            mount_held: self.actions.is_active(RideAction::Mount),
            mount_pressed: self.actions.just_activated(RideAction::Mount),
            sprint_held: self.actions.is_active(RideAction::Sprint),
            crouch_held: self.actions.is_active(RideAction::Crouch),
            look_delta,
            orbit_engaged,
            orbit_reset_pressed: self.actions.just_activated(RideAction::OrbitReset),
            requires_engage,
        }
    }
}
