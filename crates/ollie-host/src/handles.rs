//! Stable handles issued by the host for keyed lookups.
//!
//! The ride layer never keys state on runtime object identity; the host hands
//! out a handle when it creates a board or camera and resolves it on every
//! call. A handle outliving its object simply stops resolving, which the
//! service treats as a silent no-op.

/// Identifies one mountable board for the lifetime of the level.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct BoardHandle(pub u64);

/// Identifies one ride camera component for the lifetime of the level.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct CameraHandle(pub u64);
