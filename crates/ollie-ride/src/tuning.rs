//! Host-overridable camera rig tuning.
//!
//! Most rig constants are behavioral and fixed in `camera_rig`; the values
//! here are the ones a host reasonably wants to adjust per game, so they are
//! carried on the service and can be fed from the user config.

/// Rig values the host may override.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigTuning {
    /// Fallback follow distance behind the board when the camera's configured
    /// offset is degenerate, in meters.
    pub fallback_offset_back: f32,
    /// Fallback follow height above the board, in meters.
    pub fallback_offset_up: f32,
    /// Minimum FOV multiplier change rate, per second.
    pub fov_rate_floor: f32,
    /// Radius of the camera collision sweep, in meters.
    pub collision_radius: f32,
}

impl Default for RigTuning {
    fn default() -> Self {
        Self {
            fallback_offset_back: 3.2,
            fallback_offset_up: 1.45,
            fov_rate_floor: 2.5,
            collision_radius: 0.25,
        }
    }
}
