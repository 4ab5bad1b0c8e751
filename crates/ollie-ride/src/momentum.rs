//! Mount momentum: sample the player's velocity while the mount action
//! charges, then transfer the best of it onto the board when the mount
//! completes.
//!
//! Sampling is defensive about noise: a near-zero measurement never
//! overwrites a good sample, and a sample that sits unconsumed past its TTL
//! is dropped by the per-frame tick. The sprint-carry flag is sticky across
//! captures for the same board so a sprint released just before mounting
//! still counts.

use glam::Vec3;
use rustc_hash::FxHashMap;
use tracing::debug;

use ollie_host::{BoardHandle, PlayerSurface};
use ollie_input::RideInput;
use ollie_math::{
    APPROX_ZERO_SQ, clamp_direction_about_y, flatten, normalize_or_zero, slerp_dir,
};

/// Seconds an unconsumed sample survives.
pub(crate) const MOUNT_SAMPLE_TTL: f32 = 1.25;
/// Transfers slower than this are dropped entirely.
pub(crate) const MIN_TRANSFER_SPEED: f32 = 0.9;
/// Upper bound on the transferred board speed.
pub(crate) const MAX_TRANSFER_SPEED: f32 = 8.5;
/// Measured speed is boosted by this factor before clamping.
const TRANSFER_MULTIPLIER: f32 = 1.15;
/// Maximum deviation of the transfer direction from board forward.
pub(crate) const MAX_DIRECTION_ANGLE: f32 = 55.0 * std::f32::consts::PI / 180.0;
/// Sprint multiplier floor applied to predictions under sprint carry.
const SPRINT_MULTIPLIER_FLOOR: f32 = 1.9;
/// Blend toward the predicted velocity when it beats the measurement under carry.
const PREDICTED_SPEED_BLEND: f32 = 0.45;
/// Blend of the resolved direction toward the predicted direction.
const PREDICTED_DIRECTION_BLEND: f32 = 0.25;
/// Speed penalty while stunned.
const STUN_PENALTY: f32 = 0.5;

/// The best horizontal velocity seen while the mount action was held.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MountSample {
    flat_velocity: Vec3,
    captured_at: f32,
    had_sprint_carry: bool,
}

/// Per-board mount samples plus the transfer resolution logic.
#[derive(Debug, Default)]
pub(crate) struct MomentumTracker {
    samples: FxHashMap<BoardHandle, MountSample>,
}

impl MomentumTracker {
    /// Drops samples older than the TTL. Call every tick.
    pub fn expire_stale(&mut self, now: f32) {
        self.samples
            .retain(|_, sample| now - sample.captured_at <= MOUNT_SAMPLE_TTL);
    }

    /// Removes any sample for `board`.
    pub fn discard(&mut self, board: BoardHandle) {
        self.samples.remove(&board);
    }

    /// Clears all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    #[cfg(test)]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Records the player's velocity for `board` while the mount action is
    /// held and the player is not yet riding.
    ///
    /// The stored sample is replaced on the press edge, when no sample
    /// exists, or when the new measurement is faster; the sprint-carry flag
    /// is OR'd across captures either way.
    pub fn capture(
        &mut self,
        board: BoardHandle,
        riding: bool,
        input: &RideInput,
        player: &dyn PlayerSurface,
        now: f32,
        sprint_carry_active: bool,
    ) {
        if riding || !input.mount_held {
            self.samples.remove(&board);
            return;
        }

        let measured = measure_flat_velocity(player);
        if measured.length_squared() <= APPROX_ZERO_SQ {
            return;
        }

        let mut sprint_carry = sprint_carry_active;
        let mut should_update = input.mount_pressed;
        match self.samples.get(&board) {
            None => should_update = true,
            Some(prior) => {
                sprint_carry = sprint_carry || prior.had_sprint_carry;
                if measured.length_squared() > prior.flat_velocity.length_squared() {
                    should_update = true;
                }
            }
        }

        if should_update {
            self.samples.insert(
                board,
                MountSample {
                    flat_velocity: measured,
                    captured_at: now,
                    had_sprint_carry: sprint_carry,
                },
            );
        }
    }

    /// Consumes the sample for `board` and resolves the velocity to write
    /// onto it, or `None` when no meaningful push exists.
    pub fn resolve_transfer(
        &mut self,
        board: BoardHandle,
        board_forward: Vec3,
        input: &RideInput,
        player: &dyn PlayerSurface,
        sprint_carry_active: bool,
    ) -> Option<Vec3> {
        let mut measured = measure_flat_velocity(player);
        let mut sprint_carry = sprint_carry_active;
        if let Some(sample) = self.samples.remove(&board) {
            if sample.flat_velocity.length_squared() > measured.length_squared() {
                measured = sample.flat_velocity;
            }
            sprint_carry = sprint_carry || sample.had_sprint_carry;
        }

        let predicted = predict_input_flat_velocity(player, input, sprint_carry);
        let mut chosen = measured;
        if chosen.length_squared() <= APPROX_ZERO_SQ {
            chosen = predicted;
        } else if predicted.length_squared() > chosen.length_squared() && sprint_carry {
            chosen = chosen.lerp(predicted, PREDICTED_SPEED_BLEND);
        }

        let transfer_speed = chosen.length();
        if transfer_speed < MIN_TRANSFER_SPEED {
            return None;
        }

        let direction = resolve_mount_direction(chosen, predicted, flatten(board_forward));
        if direction.length_squared() <= APPROX_ZERO_SQ {
            return None;
        }

        let final_speed =
            (transfer_speed * TRANSFER_MULTIPLIER).clamp(MIN_TRANSFER_SPEED, MAX_TRANSFER_SPEED);
        debug!(speed = final_speed, "mount momentum transfer");
        Some(direction * final_speed)
    }
}

/// The larger of the host's smoothed velocity estimate and the raw per-frame
/// movement vector, both flattened.
pub(crate) fn measure_flat_velocity(player: &dyn PlayerSurface) -> Vec3 {
    let smoothed = flatten(player.smoothed_velocity());
    let raw = flatten(player.raw_movement());
    if raw.length_squared() > smoothed.length_squared() {
        raw
    } else {
        smoothed
    }
}

/// The velocity the player's current movement input would produce, from the
/// host's movement-speed constants. Sprint carry floors the sprint
/// multiplier so a just-released sprint still predicts sprint speed.
pub(crate) fn predict_input_flat_velocity(
    player: &dyn PlayerSurface,
    input: &RideInput,
    force_sprint_floor: bool,
) -> Vec3 {
    let axis = input.motion_axis;
    // Forward is -Z in local space.
    let mut local = Vec3::new(axis.x, 0.0, -axis.y);
    if local.length_squared() <= APPROX_ZERO_SQ {
        return Vec3::ZERO;
    }
    if local.length_squared() > 1.0 {
        local = local.normalize();
    }

    let world = normalize_or_zero(flatten(player.rotation() * local));
    if world.length_squared() <= APPROX_ZERO_SQ {
        return Vec3::ZERO;
    }

    let mut sprint = player.sprint_multiplier();
    if force_sprint_floor {
        sprint = sprint.max(SPRINT_MULTIPLIER_FLOOR);
    }
    let crouch = if player.is_crouched() {
        1.0 - 0.4 * (1.0 - player.standing_scale())
    } else {
        1.0
    };

    let mut speed = player.walk_speed()
        * sprint
        * crouch
        * player.global_speed_multiplier()
        * player.move_speed_multiplier();
    if player.is_stunned() {
        speed *= STUN_PENALTY;
    }

    world * speed
}

/// Resolves the transfer direction: the measured direction nudged toward the
/// predicted one, clamped into a cone about the board's forward axis.
pub(crate) fn resolve_mount_direction(
    measured_velocity: Vec3,
    predicted_velocity: Vec3,
    board_forward: Vec3,
) -> Vec3 {
    let board_dir = normalize_or_zero(board_forward);
    let measured_dir = normalize_or_zero(measured_velocity);
    let predicted_dir = normalize_or_zero(predicted_velocity);

    let mut chosen = measured_dir;
    if chosen.length_squared() <= APPROX_ZERO_SQ {
        chosen = predicted_dir;
    } else if predicted_dir.length_squared() > APPROX_ZERO_SQ && chosen.dot(predicted_dir) > 0.0 {
        chosen = slerp_dir(chosen, predicted_dir, PREDICTED_DIRECTION_BLEND);
    }
    if chosen.length_squared() <= APPROX_ZERO_SQ {
        chosen = board_dir;
    }
    if chosen.length_squared() <= APPROX_ZERO_SQ {
        return Vec3::ZERO;
    }
    if board_dir.length_squared() <= APPROX_ZERO_SQ {
        return chosen;
    }

    let limited = clamp_direction_about_y(chosen, board_dir, MAX_DIRECTION_ANGLE);
    if limited.dot(board_dir) < 0.0 {
        return board_dir;
    }
    limited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockPlayer;
    use glam::Vec2;

    fn held_input() -> RideInput {
        RideInput {
            mount_held: true,
            ..RideInput::idle()
        }
    }

    fn pressed_input() -> RideInput {
        RideInput {
            mount_held: true,
            mount_pressed: true,
            ..RideInput::idle()
        }
    }

    const BOARD: BoardHandle = BoardHandle(1);

    #[test]
    fn test_capture_requires_held_button() {
        let mut tracker = MomentumTracker::default();
        let player = MockPlayer::moving(Vec3::new(0.0, 0.0, -4.0));
        tracker.capture(BOARD, false, &RideInput::idle(), &player, 0.0, false);
        assert_eq!(tracker.sample_count(), 0);
    }

    #[test]
    fn test_capture_discards_when_riding() {
        let mut tracker = MomentumTracker::default();
        let player = MockPlayer::moving(Vec3::new(0.0, 0.0, -4.0));
        tracker.capture(BOARD, false, &pressed_input(), &player, 0.0, false);
        assert_eq!(tracker.sample_count(), 1);

        tracker.capture(BOARD, true, &held_input(), &player, 0.1, false);
        assert_eq!(tracker.sample_count(), 0);
    }

    #[test]
    fn test_zero_velocity_does_not_overwrite_sample() {
        let mut tracker = MomentumTracker::default();
        let fast = MockPlayer::moving(Vec3::new(0.0, 0.0, -5.0));
        tracker.capture(BOARD, false, &pressed_input(), &fast, 0.0, false);

        let idle = MockPlayer::moving(Vec3::ZERO);
        tracker.capture(BOARD, false, &held_input(), &idle, 0.1, false);

        let transfer = tracker
            .resolve_transfer(BOARD, Vec3::NEG_Z, &held_input(), &idle, false)
            .expect("sample should drive the transfer");
        assert!(transfer.length() > 5.0);
    }

    #[test]
    fn test_slower_measurement_keeps_faster_sample() {
        let mut tracker = MomentumTracker::default();
        let fast = MockPlayer::moving(Vec3::new(0.0, 0.0, -6.0));
        tracker.capture(BOARD, false, &pressed_input(), &fast, 0.0, false);

        let slow = MockPlayer::moving(Vec3::new(0.0, 0.0, -2.0));
        tracker.capture(BOARD, false, &held_input(), &slow, 0.1, false);

        let idle = MockPlayer::moving(Vec3::ZERO);
        let transfer = tracker
            .resolve_transfer(BOARD, Vec3::NEG_Z, &held_input(), &idle, false)
            .unwrap();
        assert!((transfer.length() - 6.9).abs() < 1e-3, "6·1.15 expected");
    }

    #[test]
    fn test_press_edge_replaces_even_when_slower() {
        let mut tracker = MomentumTracker::default();
        let fast = MockPlayer::moving(Vec3::new(0.0, 0.0, -6.0));
        tracker.capture(BOARD, false, &pressed_input(), &fast, 0.0, false);

        let slow = MockPlayer::moving(Vec3::new(0.0, 0.0, -2.0));
        tracker.capture(BOARD, false, &pressed_input(), &slow, 0.1, false);

        let idle = MockPlayer::moving(Vec3::ZERO);
        let transfer = tracker
            .resolve_transfer(BOARD, Vec3::NEG_Z, &held_input(), &idle, false)
            .unwrap();
        assert!((transfer.length() - 2.3).abs() < 1e-3, "2·1.15 expected");
    }

    #[test]
    fn test_sprint_carry_is_sticky() {
        let mut tracker = MomentumTracker::default();
        let player = MockPlayer::moving(Vec3::new(0.0, 0.0, -3.0));
        tracker.capture(BOARD, false, &pressed_input(), &player, 0.0, true);
        // Later captures without carry must not clear the flag.
        let faster = MockPlayer::moving(Vec3::new(0.0, 0.0, -3.5));
        tracker.capture(BOARD, false, &held_input(), &faster, 0.2, false);

        let sample = tracker.samples.get(&BOARD).unwrap();
        assert!(sample.had_sprint_carry);
    }

    #[test]
    fn test_samples_expire_after_ttl() {
        let mut tracker = MomentumTracker::default();
        let player = MockPlayer::moving(Vec3::new(0.0, 0.0, -4.0));
        tracker.capture(BOARD, false, &pressed_input(), &player, 0.0, false);

        tracker.expire_stale(MOUNT_SAMPLE_TTL);
        assert_eq!(tracker.sample_count(), 1, "TTL boundary is inclusive");

        tracker.expire_stale(MOUNT_SAMPLE_TTL + 0.01);
        assert_eq!(tracker.sample_count(), 0);
    }

    #[test]
    fn test_transfer_speed_is_clamped() {
        let mut tracker = MomentumTracker::default();
        let very_fast = MockPlayer::moving(Vec3::new(0.0, 0.0, -40.0));
        let transfer = tracker
            .resolve_transfer(BOARD, Vec3::NEG_Z, &held_input(), &very_fast, false)
            .unwrap();
        assert!((transfer.length() - MAX_TRANSFER_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_slow_walk_produces_no_push() {
        let mut tracker = MomentumTracker::default();
        let slow = MockPlayer::moving(Vec3::new(0.0, 0.0, -0.5));
        let transfer =
            tracker.resolve_transfer(BOARD, Vec3::NEG_Z, &held_input(), &slow, false);
        assert!(transfer.is_none());
    }

    #[test]
    fn test_stationary_with_input_uses_prediction() {
        let mut tracker = MomentumTracker::default();
        let mut player = MockPlayer::moving(Vec3::ZERO);
        player.sprint_multiplier = 2.0;
        let input = RideInput {
            mount_held: true,
            motion_axis: Vec2::new(0.0, 1.0),
            ..RideInput::idle()
        };
        let transfer = tracker
            .resolve_transfer(BOARD, Vec3::NEG_Z, &input, &player, false)
            .expect("prediction should carry the transfer");
        // walk 2.4 × sprint 2.0 = 4.8, × 1.15 = 5.52 along forward (-Z).
        assert!((transfer.length() - 5.52).abs() < 1e-2);
        assert!(transfer.z < 0.0);
    }

    #[test]
    fn test_stationary_without_input_is_a_no_op() {
        let mut tracker = MomentumTracker::default();
        let player = MockPlayer::moving(Vec3::ZERO);
        let transfer =
            tracker.resolve_transfer(BOARD, Vec3::NEG_Z, &held_input(), &player, false);
        assert!(transfer.is_none());
    }

    #[test]
    fn test_sprint_carry_blends_toward_faster_prediction() {
        let mut tracker = MomentumTracker::default();
        let mut player = MockPlayer::moving(Vec3::new(0.0, 0.0, -2.0));
        player.sprint_multiplier = 1.0; // floored to 1.9 under carry
        let input = RideInput {
            mount_held: true,
            motion_axis: Vec2::new(0.0, 1.0),
            ..RideInput::idle()
        };
        // predicted = 2.4 × 1.9 = 4.56 > measured 2.0, carry set:
        // chosen = lerp(2.0, 4.56, 0.45) = 3.152, × 1.15 = 3.6248.
        let transfer = tracker
            .resolve_transfer(BOARD, Vec3::NEG_Z, &input, &player, true)
            .unwrap();
        assert!((transfer.length() - 3.6248).abs() < 1e-2, "{}", transfer.length());
    }

    #[test]
    fn test_direction_clamped_to_cone() {
        let measured = Vec3::new(1.0, 0.0, -1.0).normalize() * 5.0; // 45° off forward
        let dir = resolve_mount_direction(measured, Vec3::ZERO, Vec3::NEG_Z);
        assert!(dir.dot(Vec3::NEG_Z) > 0.0);

        let sideways = Vec3::X * 5.0; // 90° off forward
        let clamped = resolve_mount_direction(sideways, Vec3::ZERO, Vec3::NEG_Z);
        let angle = clamped.angle_between(Vec3::NEG_Z);
        assert!(
            angle <= MAX_DIRECTION_ANGLE + 1e-4,
            "angle {} exceeds clamp",
            angle.to_degrees()
        );
        assert!(clamped.dot(Vec3::NEG_Z) > 0.0);
    }

    #[test]
    fn test_direction_falls_back_to_board_forward() {
        let dir = resolve_mount_direction(Vec3::ZERO, Vec3::ZERO, Vec3::X);
        assert!((dir - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_opposed_prediction_is_not_blended() {
        let measured = Vec3::NEG_Z * 4.0;
        let predicted = Vec3::Z * 4.0;
        let dir = resolve_mount_direction(measured, predicted, Vec3::NEG_Z);
        assert!((dir - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_measurement_takes_larger_of_estimator_and_raw() {
        let mut player = MockPlayer::moving(Vec3::new(0.0, 0.0, -2.0));
        player.raw_movement = Vec3::new(0.0, 3.0, -5.0); // vertical must be ignored
        let measured = measure_flat_velocity(&player);
        assert!((measured - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn test_prediction_applies_crouch_and_stun() {
        let mut player = MockPlayer::moving(Vec3::ZERO);
        player.is_crouched = true;
        player.standing_scale = 0.5;
        player.is_stunned = true;
        let input = RideInput {
            motion_axis: Vec2::new(0.0, 1.0),
            ..RideInput::idle()
        };
        let predicted = predict_input_flat_velocity(&player, &input, false);
        // 2.4 × crouch (1 − 0.4·0.5 = 0.8) × stun 0.5 = 0.96.
        assert!((predicted.length() - 0.96).abs() < 1e-3);
    }
}
