//! Aggregate host lookup and the collision query seam.

use glam::Vec3;

use crate::handles::{BoardHandle, CameraHandle};
use crate::surfaces::{BoardSurface, CameraSurface, PlayerSurface};

/// Swept-sphere collision queries against the host's world geometry.
///
/// The rig casts from its anchor toward the desired camera position and pulls
/// the camera in front of whatever it hits. The host decides what counts as
/// camera-blocking geometry.
pub trait CollisionWorld {
    /// Casts a sphere of `radius` from `origin` along the normalized `dir`,
    /// up to `max_dist`. Returns the travel distance to the first hit, or
    /// `None` when the sweep is clear.
    fn sphere_cast(&self, origin: Vec3, dir: Vec3, max_dist: f32, radius: f32) -> Option<f32>;
}

/// Everything the ride service can reach in the host, resolved per call.
///
/// Every accessor returns an `Option`; a `None` anywhere means the object is
/// gone or disabled and the calling entry point becomes a no-op. Mutable and
/// shared accessors are separate so a single `&mut dyn HostWorld` can serve
/// both read and write paths.
pub trait HostWorld {
    /// The local player, if one exists.
    fn player(&self) -> Option<&dyn PlayerSurface>;
    /// Mutable access to the local player.
    fn player_mut(&mut self) -> Option<&mut dyn PlayerSurface>;
    /// Resolves a board handle.
    fn board(&self, handle: BoardHandle) -> Option<&dyn BoardSurface>;
    /// Mutable access to a board.
    fn board_mut(&mut self, handle: BoardHandle) -> Option<&mut dyn BoardSurface>;
    /// Resolves a camera handle.
    fn camera(&self, handle: CameraHandle) -> Option<&dyn CameraSurface>;
    /// Mutable access to a camera.
    fn camera_mut(&mut self, handle: CameraHandle) -> Option<&mut dyn CameraSurface>;
    /// The collision world for camera sweeps, when available.
    fn collision(&self) -> Option<&dyn CollisionWorld>;
}
