//! Frame-coherent input trackers and the ride action map.
//!
//! Raw winit/gilrs events are accumulated into per-frame state
//! ([`KeyboardState`], [`MouseState`], [`GamepadState`]), resolved through a
//! rebindable [`InputMap`], and condensed into the single [`RideInput`]
//! snapshot the ride service consumes each tick.

pub mod actions;
pub mod gamepad;
pub mod keyboard;
pub mod mouse;
pub mod ride_input;

pub use actions::{
    ActionState, GamepadAxisBinding, InputMap, MouseButtonBinding, RideAction, RideBinding,
    resolve_actions,
};
pub use gamepad::{GamepadManager, GamepadState, PadButton};
pub use keyboard::KeyboardState;
pub use mouse::MouseState;
pub use ride_input::{RideInput, RideInputCollector};
