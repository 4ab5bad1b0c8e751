//! Horizontal-plane vector operations.
//!
//! The ride layer reasons almost entirely about flat (XZ-plane) directions:
//! velocities are flattened before comparison, and transfer directions are
//! clamped to a cone about the board's forward axis.

use glam::{Quat, Vec3};

/// Squared-length threshold below which a vector is treated as zero.
pub const APPROX_ZERO_SQ: f32 = 1e-4;

/// Zeroes the vertical component of `v`.
#[must_use]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Normalizes `v`, or returns `Vec3::ZERO` when it is shorter than the
/// [`APPROX_ZERO_SQ`] threshold.
#[must_use]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    if v.length_squared() <= APPROX_ZERO_SQ {
        Vec3::ZERO
    } else {
        v.normalize()
    }
}

/// Spherically interpolates between two direction vectors.
///
/// Both inputs must be unit length. The result rotates `a` toward `b` along
/// the great-circle arc by fraction `t`, staying unit length throughout;
/// unlike a lerp-normalize, the angular speed is constant.
#[must_use]
pub fn slerp_dir(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    let arc = Quat::from_rotation_arc(a, b);
    (Quat::IDENTITY.slerp(arc, t) * a).normalize_or_zero()
}

/// Signed angle in radians from `from` to `to`, measured about +Y.
///
/// Positive is counter-clockwise when viewed from above. Inputs need not be
/// unit length; vertical components are ignored.
#[must_use]
pub fn signed_angle_about_y(from: Vec3, to: Vec3) -> f32 {
    let a = flatten(from);
    let b = flatten(to);
    let cross_y = a.z * b.x - a.x * b.z;
    cross_y.atan2(a.dot(b))
}

/// Rotates `v` about the +Y axis by `angle` radians.
#[must_use]
pub fn rotate_about_y(v: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * v
}

/// Clamps `dir` to within `±max_angle` radians of `reference`, about +Y.
///
/// Returns the rotated unit direction. When either input is degenerate the
/// other is returned unchanged (or zero when both are).
#[must_use]
pub fn clamp_direction_about_y(dir: Vec3, reference: Vec3, max_angle: f32) -> Vec3 {
    let dir = normalize_or_zero(flatten(dir));
    let reference = normalize_or_zero(flatten(reference));
    if reference == Vec3::ZERO {
        return dir;
    }
    if dir == Vec3::ZERO {
        return reference;
    }

    let angle = signed_angle_about_y(reference, dir);
    let clamped = angle.clamp(-max_angle, max_angle);
    normalize_or_zero(rotate_about_y(reference, clamped))
}
