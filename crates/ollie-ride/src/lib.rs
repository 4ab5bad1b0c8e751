//! Ride-feel corrections layered onto a host skateboard simulation.
//!
//! Three cooperating subsystems owned by one [`RideService`]:
//! momentum transfer on mount (velocity sampled while the mount action
//! charges), residual velocity shaping on dismount, and a follow/orbit
//! camera rig with manual-override blending and collision avoidance.
//!
//! The service never owns the player, board, or camera; it reaches them
//! through the `ollie-host` trait seam, treats every missing object as a
//! silent no-op, and keeps all of its state rebuildable from
//! [`RideService::reset`] on scene load.

pub mod camera_rig;
pub mod dismount;
pub mod momentum;
pub mod phase;
pub mod service;
pub mod tuning;

#[cfg(test)]
pub(crate) mod test_support;

pub use camera_rig::CameraRig;
pub use dismount::ResidualPush;
pub use phase::TransitionPhase;
pub use service::RideService;
pub use tuning::RigTuning;
