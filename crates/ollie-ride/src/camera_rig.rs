//! The follow/orbit skateboard camera.
//!
//! While a rig is active it fully owns camera pose and FOV: every tick it
//! computes an automatic follow pose from the board's smoothed forward, a
//! manual orbit pose from the player's look input, blends the two by a
//! manual weight that engages fast and releases slow, resolves collision
//! with a sphere cast, and settles onto the result with exponential
//! smoothing so the camera never jumps.
//!
//! The mount starts with a pull-in: the smoothed distance begins near zero
//! and damps out to the follow distance while the rotation stays frozen at
//! the pose captured at rig start, masking the remount pop. The first-person
//! body is hidden for the first fraction of that pull-in.

use glam::{Mat3, Quat, Vec2, Vec3};

use ollie_host::{BoardHandle, BoardSurface, CameraHandle, CameraSurface, CollisionWorld, RigParams};
use ollie_input::RideInput;
use ollie_math::{
    APPROX_ZERO_SQ, exp_decay_factor, exp_decay_quat, exp_decay_vec3, flatten, lerp,
    normalize_or_zero, smooth_damp, smooth_damp_angle,
};

use crate::tuning::RigTuning;

/// Decay rate of the smoothed board forward, per second.
const FORWARD_DECAY_RATE: f32 = 11.0;
/// Smooth-damp time for the camera distance (the mount pull-in).
const DISTANCE_SMOOTH_TIME: f32 = 2.6;
/// Seconds for the mount blend to ramp from 0 to 1.
const MOUNT_BLEND_TIME: f32 = 2.0;
/// Smooth-damp time for the orbit angles.
const ORBIT_SMOOTH_TIME: f32 = 0.06;
/// Smooth-damp time for the manual weight while input is held.
const MANUAL_ENGAGE_TIME: f32 = 0.08;
/// Smooth-damp time for the manual weight after release.
const MANUAL_RELEASE_TIME: f32 = 0.48;
/// Seconds after the last manual input before release decay starts.
const MANUAL_RELEASE_GRACE: f32 = 0.05;
/// Pull the camera this far in front of a collision hit.
const COLLISION_PADDING: f32 = 0.36;
/// The camera never sits closer to the anchor than this.
const MIN_CAMERA_DISTANCE: f32 = 0.6;
/// Exponential smoothing rate of the final position, per second.
const POSITION_SMOOTH_RATE: f32 = 11.5;
/// Exponential smoothing rate of the final rotation, per second.
const ROTATION_SMOOTH_RATE: f32 = 14.5;
/// Orbit pitch bounds, radians.
const PITCH_MIN: f32 = -22.0 * std::f32::consts::PI / 180.0;
const PITCH_MAX: f32 = 86.0 * std::f32::consts::PI / 180.0;
/// Seconds the first-person body stays force-hidden after rig start.
const BODY_HIDE_DURATION: f32 = 0.28;
/// Mount-blend progress past which the body can be shown again.
const UNHIDE_MIN_BLEND: f32 = 0.35;
/// Distance fraction past which the body can be shown again.
const UNHIDE_MIN_DISTANCE_FRACTION: f32 = 0.3;
/// Height of the rig anchor above the board origin.
const ANCHOR_HEIGHT: f32 = 1.05;

/// The pose and FOV the rig resolved for one frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CameraFrame {
    pub position: Vec3,
    pub rotation: Quat,
    pub fov: f32,
}

/// State of one active skateboard camera rig.
///
/// At most one rig exists at a time, and it is only valid while its camera
/// and board are alive; the service re-validates both before every update
/// and tears the rig down otherwise.
#[derive(Clone, Debug)]
pub struct CameraRig {
    camera: CameraHandle,
    board: BoardHandle,
    params: RigParams,

    // Smoothed pose, distinct from the per-tick desired pose.
    position: Vec3,
    rotation: Quat,
    held_rotation: Quat,

    // Auto-follow state.
    smoothed_forward: Vec3,
    mount_blend: f32,

    // Orbit state.
    target_yaw: f32,
    target_pitch: f32,
    yaw: f32,
    pitch: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    manual_weight: f32,
    manual_weight_velocity: f32,
    last_manual_at: f32,

    // Distance state.
    target_distance: f32,
    distance: f32,
    distance_velocity: f32,

    // FOV state.
    base_fov: f32,
    fov_multiplier: f32,

    // Body-visibility state.
    pub(crate) body_hidden: bool,
    body_hide_until: f32,
}

impl CameraRig {
    /// Builds a rig from the current camera pose. The caller is responsible
    /// for hiding the first-person body afterwards.
    pub(crate) fn begin(
        camera: CameraHandle,
        board: BoardHandle,
        camera_surface: &dyn CameraSurface,
        board_surface: &dyn BoardSurface,
        input: &RideInput,
        tuning: &RigTuning,
        now: f32,
    ) -> Self {
        let params = camera_surface.rig_params();
        let forward = {
            let f = normalize_or_zero(flatten(board_surface.forward()));
            if f == Vec3::ZERO { Vec3::NEG_Z } else { f }
        };
        let offset = follow_offset(&params, tuning, forward);
        let target_distance = offset.length();

        // Seed orbit angles from where the camera already is, so engaging
        // manual control right away does not snap.
        let rotation = camera_surface.rotation();
        let seed_dir = {
            let back = normalize_or_zero(rotation * Vec3::Z);
            if back == Vec3::ZERO {
                normalize_or_zero(offset)
            } else {
                back
            }
        };
        let (yaw, pitch) = yaw_pitch_of(seed_dir);
        let pitch = pitch.clamp(PITCH_MIN, PITCH_MAX);

        let manual_weight = if input.requires_engage { 0.0 } else { 1.0 };

        Self {
            camera,
            board,
            params,
            position: camera_surface.position(),
            rotation,
            held_rotation: rotation,
            smoothed_forward: forward,
            mount_blend: 0.0,
            target_yaw: yaw,
            target_pitch: pitch,
            yaw,
            pitch,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            manual_weight,
            manual_weight_velocity: 0.0,
            last_manual_at: now - MANUAL_RELEASE_GRACE - 1.0,
            target_distance,
            // Near-zero smoothed distance at start gives the pull-in.
            distance: 0.0,
            distance_velocity: 0.0,
            base_fov: camera_surface.base_fov(),
            fov_multiplier: 1.0,
            body_hidden: true,
            body_hide_until: now + BODY_HIDE_DURATION,
        }
    }

    /// The camera this rig owns.
    pub(crate) fn camera(&self) -> CameraHandle {
        self.camera
    }

    /// The board this rig follows.
    pub(crate) fn board(&self) -> BoardHandle {
        self.board
    }

    /// Current auto-vs-manual blend weight.
    pub fn manual_weight(&self) -> f32 {
        self.manual_weight
    }

    /// Current smoothed camera distance from the anchor.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Advances the rig one tick and returns the pose/FOV to write.
    pub(crate) fn advance(
        &mut self,
        dt: f32,
        now: f32,
        input: &RideInput,
        board: &dyn BoardSurface,
        collision: Option<&dyn CollisionWorld>,
        tuning: &RigTuning,
    ) -> CameraFrame {
        let anchor = board.position() + Vec3::Y * ANCHOR_HEIGHT;

        // Follow the board's heading with a decayed forward so quick flicks
        // of the board do not whip the camera.
        let board_forward = normalize_or_zero(flatten(board.forward()));
        if board_forward != Vec3::ZERO {
            let next = normalize_or_zero(exp_decay_vec3(
                self.smoothed_forward,
                board_forward,
                FORWARD_DECAY_RATE,
                dt,
            ));
            if next != Vec3::ZERO {
                self.smoothed_forward = next;
            }
        }

        let auto_offset = follow_offset(&self.params, tuning, self.smoothed_forward);
        self.target_distance = auto_offset.length();
        self.distance = smooth_damp(
            self.distance,
            self.target_distance,
            &mut self.distance_velocity,
            DISTANCE_SMOOTH_TIME,
            dt,
        );

        let auto_dir = {
            let d = normalize_or_zero(auto_offset);
            if d == Vec3::ZERO { Vec3::Y } else { d }
        };
        let auto_position = anchor + auto_dir * self.distance;
        let auto_rotation = look_rotation(anchor - auto_position, self.rotation);

        self.mount_blend = (self.mount_blend + dt / MOUNT_BLEND_TIME).min(1.0);

        let (desired_position, desired_rotation) = if self.mount_blend < 1.0 {
            // Pull-in: rotation stays frozen at the pose captured at start.
            (auto_position, self.held_rotation)
        } else {
            self.update_orbit(dt, now, input, auto_dir);

            let manual_dir = orbit_dir(self.yaw, self.pitch);
            let manual_position = anchor + manual_dir * self.distance;
            let manual_rotation = look_rotation(anchor - manual_position, self.rotation);

            (
                auto_position.lerp(manual_position, self.manual_weight),
                auto_rotation.slerp(manual_rotation, self.manual_weight),
            )
        };

        let desired_position =
            resolve_collision(anchor, desired_position, collision, tuning.collision_radius);

        // Never jump to the desired pose.
        self.position = exp_decay_vec3(self.position, desired_position, POSITION_SMOOTH_RATE, dt);
        self.rotation = exp_decay_quat(self.rotation, desired_rotation, ROTATION_SMOOTH_RATE, dt)
            .normalize();

        // FOV widens with board speed.
        let top_speed = board.top_speed().max(0.01);
        let speed_fraction = (flatten(board.velocity()).length() / top_speed).clamp(0.0, 1.0);
        let target_multiplier = lerp(
            self.params.fov_min_multiplier,
            self.params.fov_max_multiplier,
            speed_fraction,
        );
        let fov_rate = tuning.fov_rate_floor.max(self.params.fov_change_rate * 4.0);
        self.fov_multiplier = lerp(
            self.fov_multiplier,
            target_multiplier,
            exp_decay_factor(fov_rate, dt),
        );

        CameraFrame {
            position: self.position,
            rotation: self.rotation,
            fov: self.base_fov * self.fov_multiplier,
        }
    }

    /// Whether the forced body hide has served its purpose: the hide window
    /// elapsed and the camera has pulled far enough back that the view no
    /// longer clips through the body.
    pub(crate) fn should_unhide_body(&self, now: f32) -> bool {
        self.body_hidden
            && now >= self.body_hide_until
            && (self.mount_blend > UNHIDE_MIN_BLEND
                || self.distance >= UNHIDE_MIN_DISTANCE_FRACTION * self.target_distance)
    }

    fn update_orbit(&mut self, dt: f32, now: f32, input: &RideInput, auto_dir: Vec3) {
        let manual_active = input.orbit_engaged && input.look_delta != Vec2::ZERO;

        if input.orbit_reset_pressed {
            // Hard reset: snap the orbit to the auto pose and drop manual
            // control entirely.
            let (auto_yaw, auto_pitch) = yaw_pitch_of(auto_dir);
            self.target_yaw = auto_yaw;
            self.target_pitch = auto_pitch.clamp(PITCH_MIN, PITCH_MAX);
            self.yaw = self.target_yaw;
            self.pitch = self.target_pitch;
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
            self.manual_weight = 0.0;
            self.manual_weight_velocity = 0.0;
            return;
        }

        if manual_active {
            self.target_yaw += input.look_delta.x;
            self.target_pitch = (self.target_pitch + input.look_delta.y).clamp(PITCH_MIN, PITCH_MAX);
            self.last_manual_at = now;
            self.manual_weight = smooth_damp(
                self.manual_weight,
                1.0,
                &mut self.manual_weight_velocity,
                MANUAL_ENGAGE_TIME,
                dt,
            );
        } else if now - self.last_manual_at > MANUAL_RELEASE_GRACE {
            self.manual_weight = smooth_damp(
                self.manual_weight,
                0.0,
                &mut self.manual_weight_velocity,
                MANUAL_RELEASE_TIME,
                dt,
            );
        }

        self.yaw = smooth_damp_angle(
            self.yaw,
            self.target_yaw,
            &mut self.yaw_velocity,
            ORBIT_SMOOTH_TIME,
            dt,
        );
        self.pitch = smooth_damp(
            self.pitch,
            self.target_pitch,
            &mut self.pitch_velocity,
            ORBIT_SMOOTH_TIME,
            dt,
        );
    }
}

/// The configured follow offset for a given board forward, falling back to
/// the tuning constants when the configured offsets are degenerate.
fn follow_offset(params: &RigParams, tuning: &RigTuning, forward: Vec3) -> Vec3 {
    let (back, up) = if Vec2::new(params.offset_back, params.offset_up).length_squared()
        <= APPROX_ZERO_SQ
    {
        (tuning.fallback_offset_back, tuning.fallback_offset_up)
    } else {
        (params.offset_back, params.offset_up)
    };
    -forward * back + Vec3::Y * up
}

/// Unit direction from the anchor toward the camera for the given orbit
/// angles. Yaw 0 / pitch 0 is directly behind a board facing -Z.
fn orbit_dir(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
}

/// Inverse of [`orbit_dir`]: yaw and pitch of a unit direction.
fn yaw_pitch_of(dir: Vec3) -> (f32, f32) {
    let yaw = dir.x.atan2(dir.z);
    let pitch = dir.y.clamp(-1.0, 1.0).asin();
    (yaw, pitch)
}

/// A rotation looking along `forward` with world-up reference, or `current`
/// when the direction is degenerate or vertical.
fn look_rotation(forward: Vec3, current: Quat) -> Quat {
    let f = normalize_or_zero(forward);
    if f == Vec3::ZERO {
        return current;
    }
    let back = -f;
    let right = Vec3::Y.cross(back);
    if right.length_squared() < APPROX_ZERO_SQ {
        return current;
    }
    let right = right.normalize();
    let up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
}

/// Clamps the desired camera position to just in front of the first sweep
/// hit between the anchor and the camera.
fn resolve_collision(
    anchor: Vec3,
    desired: Vec3,
    collision: Option<&dyn CollisionWorld>,
    radius: f32,
) -> Vec3 {
    let Some(world) = collision else {
        return desired;
    };
    let to_camera = desired - anchor;
    if to_camera.length_squared() <= APPROX_ZERO_SQ {
        return desired;
    }
    let distance = to_camera.length();
    let dir = to_camera / distance;
    match world.sphere_cast(anchor, dir, distance, radius) {
        Some(hit) => {
            let clamped = (hit - COLLISION_PADDING)
                .max(MIN_CAMERA_DISTANCE)
                .min(distance);
            anchor + dir * clamped
        }
        None => desired,
    }
}
