//! Frame-rate-independent smoothing primitives.
//!
//! Two families: exponential decay (`value += (target - value) * (1 - e^(-rate·dt))`),
//! which converges without state, and critically damped smoothing (`smooth_damp`),
//! which carries a velocity and settles without overshoot. The camera rig uses the
//! first for pose following and the second for distance, orbit angles, and blend
//! weights.

use glam::{Quat, Vec3};

/// Linear interpolation between two scalars.
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fraction of the remaining distance to cover this frame for an exponential
/// decay at `rate` per second. Always in `[0, 1]`.
#[must_use]
pub fn exp_decay_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Moves `current` toward `target` by exponential decay.
#[must_use]
pub fn exp_decay_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, exp_decay_factor(rate, dt))
}

/// Rotates `current` toward `target` by exponential decay (slerp fraction).
#[must_use]
pub fn exp_decay_quat(current: Quat, target: Quat, rate: f32, dt: f32) -> Quat {
    current.slerp(target, exp_decay_factor(rate, dt))
}

/// Critically damped smoothing of a scalar toward `target`.
///
/// `velocity` is carried between calls and must start at zero. `smooth_time`
/// is roughly the time to cover most of the distance; the result never
/// overshoots the target.
#[must_use]
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Clamp to the target if the spring would carry us past it.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

/// [`smooth_damp`] over the shortest angular path, for wrapping angles in
/// radians.
#[must_use]
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let delta = wrap_angle(target - current);
    smooth_damp(current, current + delta, velocity, smooth_time, dt)
}

/// Component-wise critically damped smoothing of a vector.
#[must_use]
pub fn smooth_damp_vec3(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    Vec3::new(
        smooth_damp(current.x, target.x, &mut velocity.x, smooth_time, dt),
        smooth_damp(current.y, target.y, &mut velocity.y, smooth_time, dt),
        smooth_damp(current.z, target.z, &mut velocity.z, smooth_time, dt),
    )
}

/// Wraps an angle to `(-π, π]`.
fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_exp_decay_factor_bounds() {
        assert!((exp_decay_factor(11.0, 0.0)).abs() < 1e-6);
        let f = exp_decay_factor(11.0, 10.0);
        assert!(f > 0.999 && f <= 1.0);
    }

    #[test]
    fn test_exp_decay_converges() {
        let mut v = Vec3::ZERO;
        let target = Vec3::new(4.0, 0.0, -2.0);
        for _ in 0..120 {
            v = exp_decay_vec3(v, target, 11.0, 1.0 / 60.0);
        }
        assert!((v - target).length() < 1e-3);
    }

    #[test]
    fn test_exp_decay_is_monotonic() {
        let mut v = 0.0_f32;
        let mut prev = v;
        for _ in 0..60 {
            v = lerp(v, 1.0, exp_decay_factor(8.0, 1.0 / 60.0));
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let mut value = 0.0_f32;
        let mut velocity = 0.0_f32;
        for _ in 0..600 {
            value = smooth_damp(value, 5.0, &mut velocity, 0.3, 1.0 / 60.0);
            assert!(value <= 5.0 + 1e-5, "overshot: {value}");
        }
        assert!((value - 5.0).abs() < 1e-2);
    }

    #[test]
    fn test_smooth_damp_starts_slow() {
        let mut velocity = 0.0_f32;
        let step = smooth_damp(0.0, 1.0, &mut velocity, 2.6, 1.0 / 60.0);
        assert!(step < 0.01, "long smooth times pull in gently, got {step}");
    }

    #[test]
    fn test_smooth_damp_shorter_time_is_faster() {
        let mut v_fast = 0.0;
        let mut v_slow = 0.0;
        let mut fast = 0.0_f32;
        let mut slow = 0.0_f32;
        for _ in 0..30 {
            fast = smooth_damp(fast, 1.0, &mut v_fast, 0.08, 1.0 / 60.0);
            slow = smooth_damp(slow, 1.0, &mut v_slow, 0.48, 1.0 / 60.0);
        }
        assert!(fast > slow);
    }

    #[test]
    fn test_smooth_damp_angle_takes_short_path() {
        let mut velocity = 0.0_f32;
        // 350° to 10°: the short path crosses zero, moving +20° not -340°.
        let current = 350.0_f32.to_radians();
        let target = 10.0_f32.to_radians();
        let next = smooth_damp_angle(current, target, &mut velocity, 0.05, 1.0 / 60.0);
        assert!(next > current, "should increase through the wrap point");
    }

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!(wrap_angle(0.0).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_damp_vec3_matches_scalar() {
        let mut vel = Vec3::ZERO;
        let mut vel_x = 0.0_f32;
        let v = smooth_damp_vec3(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            &mut vel,
            0.2,
            1.0 / 60.0,
        );
        let x = smooth_damp(1.0, 3.0, &mut vel_x, 0.2, 1.0 / 60.0);
        assert!((v.x - x).abs() < 1e-6);
        assert!(v.y.abs() < 1e-6);
    }
}
