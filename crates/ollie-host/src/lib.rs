//! The read/write surface the ride layer holds against its host simulation.
//!
//! The host owns the player, board, and camera objects and their physics;
//! this crate defines the narrow trait seam through which the ride service
//! observes and nudges them, plus the stable handles the host issues for
//! keyed lookups and the monotonic level clock all expiries are computed
//! against.

pub mod clock;
pub mod handles;
pub mod surfaces;
pub mod world;

pub use clock::LevelClock;
pub use handles::{BoardHandle, CameraHandle};
pub use surfaces::{BoardSurface, CameraSurface, PlayerSurface, RigParams};
pub use world::{CollisionWorld, HostWorld};
