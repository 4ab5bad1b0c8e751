//! Traits the host implements over its player, board, and camera objects.

use glam::{Quat, Vec3};

/// Read/write access to the local player.
///
/// Velocity comes in two flavors: the host's own smoothed estimator and the
/// raw per-frame movement vector. The momentum tracker always takes the
/// larger of the two after flattening, so a single slow frame cannot hide a
/// sprint.
pub trait PlayerSurface {
    /// Velocity from the host's smoothed velocity estimator.
    fn smoothed_velocity(&self) -> Vec3;
    /// The raw movement vector applied this frame.
    fn raw_movement(&self) -> Vec3;
    /// World-space facing direction.
    fn forward(&self) -> Vec3;
    /// World-space orientation, used to map movement input into world space.
    fn rotation(&self) -> Quat;
    /// Whether the sprint action is currently active.
    fn is_sprinting(&self) -> bool;
    /// The current sprint speed multiplier (1.0 when not sprinting).
    fn sprint_multiplier(&self) -> f32;
    /// Whether the player is crouched.
    fn is_crouched(&self) -> bool;
    /// Crouch progress: 1.0 standing, approaching 0.0 fully crouched.
    fn standing_scale(&self) -> f32;
    /// Base walk speed in m/s.
    fn walk_speed(&self) -> f32;
    /// Per-player move speed multiplier.
    fn move_speed_multiplier(&self) -> f32;
    /// Global move speed multiplier.
    fn global_speed_multiplier(&self) -> f32;
    /// Whether a stun effect is halving the player's speed.
    fn is_stunned(&self) -> bool;
    /// Force-hides or restores the local first-person body mesh.
    fn set_body_hidden(&mut self, hidden: bool);
}

/// Read/write access to one mountable board.
pub trait BoardSurface {
    /// Whether the board object is still alive and enabled.
    fn is_alive(&self) -> bool;
    /// Whether the local player is currently riding this board.
    fn is_riding(&self) -> bool;
    /// World-space position of the board (the camera rig anchor).
    fn position(&self) -> Vec3;
    /// World-space forward direction of the board.
    fn forward(&self) -> Vec3;
    /// Current rigid-body velocity.
    fn velocity(&self) -> Vec3;
    /// Overwrites the rigid-body velocity.
    fn set_velocity(&mut self, velocity: Vec3);
    /// The board's configured top speed, used for FOV scaling.
    fn top_speed(&self) -> f32;
}

/// The follow-camera parameters the host camera component was configured
/// with. Degenerate offsets (shorter than the zero threshold) make the rig
/// fall back to its own tuning constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigParams {
    /// Distance behind the board, in meters.
    pub offset_back: f32,
    /// Height above the board, in meters.
    pub offset_up: f32,
    /// FOV multiplier at standstill.
    pub fov_min_multiplier: f32,
    /// FOV multiplier at top speed.
    pub fov_max_multiplier: f32,
    /// Configured FOV change rate, per second.
    pub fov_change_rate: f32,
}

impl Default for RigParams {
    fn default() -> Self {
        Self {
            offset_back: 3.1,
            offset_up: 1.35,
            fov_min_multiplier: 1.0,
            fov_max_multiplier: 1.12,
            fov_change_rate: 0.9,
        }
    }
}

/// Read/write access to the ride camera component.
pub trait CameraSurface {
    /// Whether the camera component is still alive and enabled.
    fn is_alive(&self) -> bool;
    /// Current world-space camera position.
    fn position(&self) -> Vec3;
    /// Current world-space camera rotation.
    fn rotation(&self) -> Quat;
    /// Writes the camera pose for this frame.
    fn set_pose(&mut self, position: Vec3, rotation: Quat);
    /// The camera's base vertical field of view, in degrees.
    fn base_fov(&self) -> f32;
    /// Writes the effective field of view for this frame, in degrees.
    fn set_fov(&mut self, fov: f32);
    /// The follow-offset and FOV configuration of this camera.
    fn rig_params(&self) -> RigParams;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rig_params_are_usable() {
        let p = RigParams::default();
        assert!(p.offset_back > 0.0);
        assert!(p.offset_up > 0.0);
        assert!(p.fov_max_multiplier >= p.fov_min_multiplier);
        assert!(p.fov_change_rate > 0.0);
    }
}
