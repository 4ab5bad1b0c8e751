//! Dismount residual shaping: rewrite the host's requested residual push so
//! stepping off a moving board carries believable momentum.
//!
//! Context is captured once at dismount-begin from the board's horizontal
//! velocity and the player's horizontal forward, consumed by the next
//! residual adjustment, and cleared at dismount-end.

use glam::Vec3;
use tracing::trace;

use ollie_math::{APPROX_ZERO_SQ, flatten, lerp, normalize_or_zero, slerp_dir};

/// Board speeds below this yield a pure stop (direction only, no push).
pub(crate) const MIN_RESIDUAL_SPEED: f32 = 0.65;
/// Push force per unit of board speed.
const FORCE_PER_SPEED: f32 = 16.0;
/// Force clamp bounds.
pub(crate) const FORCE_MIN: f32 = 24.0;
pub(crate) const FORCE_MAX: f32 = 155.0;
/// Push duration base and per-speed growth.
const DURATION_BASE: f32 = 0.09;
const DURATION_PER_SPEED: f32 = 0.012;
/// Duration clamp bounds.
pub(crate) const DURATION_MIN: f32 = 0.11;
pub(crate) const DURATION_MAX: f32 = 0.22;
/// Velocity-direction weight range, scaled by forward/velocity alignment.
const VELOCITY_WEIGHT_MIN: f32 = 0.2;
const VELOCITY_WEIGHT_MAX: f32 = 0.65;

/// The residual push parameters the host resolved for a dismount, rewritten
/// in place by [`ResidualShaper::adjust`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResidualPush {
    /// Push direction. Not required to be unit length on input.
    pub direction: Vec3,
    /// Push force.
    pub force: f32,
    /// Push duration in seconds.
    pub duration: f32,
}

/// Motion context captured at dismount-begin.
#[derive(Clone, Copy, Debug)]
struct DismountContext {
    flat_board_velocity: Vec3,
    flat_player_forward: Vec3,
}

/// Holds at most one pending dismount context.
#[derive(Debug, Default)]
pub(crate) struct ResidualShaper {
    context: Option<DismountContext>,
}

impl ResidualShaper {
    /// Captures context from the board and player motion at dismount-begin.
    pub fn begin(&mut self, board_velocity: Vec3, player_forward: Vec3) {
        self.context = Some(DismountContext {
            flat_board_velocity: flatten(board_velocity),
            flat_player_forward: flatten(player_forward),
        });
    }

    /// Clears any pending context. Call at dismount-end.
    pub fn end(&mut self) {
        self.context = None;
    }

    /// Whether a context is pending.
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Rewrites the host's residual push from the captured context. Passes
    /// the push through unchanged when no context is pending or no direction
    /// can be resolved.
    pub fn adjust(&self, push: &mut ResidualPush) {
        let Some(context) = self.context else {
            return;
        };

        let forward = normalize_or_zero(context.flat_player_forward);
        let velocity_dir = normalize_or_zero(context.flat_board_velocity);

        let resolved = if velocity_dir.length_squared() > APPROX_ZERO_SQ
            && forward.length_squared() > APPROX_ZERO_SQ
        {
            // Trust the board's travel direction more the better it agrees
            // with where the player is facing.
            let alignment = ((forward.dot(velocity_dir) + 1.0) * 0.5).clamp(0.0, 1.0);
            let weight = lerp(VELOCITY_WEIGHT_MIN, VELOCITY_WEIGHT_MAX, alignment);
            slerp_dir(forward, velocity_dir, weight)
        } else if velocity_dir.length_squared() > APPROX_ZERO_SQ {
            velocity_dir
        } else if forward.length_squared() > APPROX_ZERO_SQ {
            forward
        } else {
            normalize_or_zero(flatten(push.direction))
        };

        if resolved.length_squared() <= APPROX_ZERO_SQ {
            return;
        }

        let speed = context.flat_board_velocity.length();
        if speed < MIN_RESIDUAL_SPEED {
            push.direction = resolved;
            push.force = 0.0;
            push.duration = 0.0;
            trace!(speed, "dismount below residual floor, pure stop");
            return;
        }

        push.direction = resolved;
        push.force = (speed * FORCE_PER_SPEED).clamp(FORCE_MIN, FORCE_MAX);
        push.duration = (DURATION_BASE + speed * DURATION_PER_SPEED).clamp(DURATION_MIN, DURATION_MAX);
        trace!(speed, force = push.force, "dismount residual shaped");
    }
}
