//! Math helpers shared by the ride-feel crates: horizontal-plane vector
//! operations and frame-rate-independent smoothing.

pub mod smoothing;
pub mod vector;

pub use smoothing::{
    exp_decay_factor, exp_decay_quat, exp_decay_vec3, lerp, smooth_damp, smooth_damp_angle,
    smooth_damp_vec3,
};
pub use vector::{
    APPROX_ZERO_SQ, clamp_direction_about_y, flatten, normalize_or_zero, rotate_about_y,
    signed_angle_about_y, slerp_dir,
};
