//! The single-owner ride service: all state, all entry points.
//!
//! One instance is constructed at host-attach time and torn down at detach;
//! the host calls the entry points from its own per-frame and
//! mount/dismount/camera lifecycle methods. Entry points that return `bool`
//! report whether the service handled the event, in which case the host
//! skips its own logic for that event.
//!
//! Everything here runs on the host's main simulation thread. The only
//! ordering rule is that [`tick`](RideService::tick) runs before the other
//! entry points each frame, so expiries are current.

use tracing::debug;

use glam::Vec3;

use ollie_host::{BoardHandle, CameraHandle, HostWorld, LevelClock};
use ollie_input::RideInput;

use crate::camera_rig::CameraRig;
use crate::dismount::{ResidualPush, ResidualShaper};
use crate::momentum::MomentumTracker;
use crate::phase::{PhaseTimer, TransitionPhase};
use crate::tuning::RigTuning;

/// Seconds after the last sprinting tick that sprint carry stays active.
const SPRINT_CARRY_WINDOW: f32 = 0.9;
/// Sentinel deadline meaning "never".
const NEVER: f32 = -100.0;
/// Floor for host-requested camera transform blend durations on dismount.
const DISMOUNT_CAMERA_LERP_FLOOR: f32 = 0.3;
/// Floor for host-requested FOV blend durations on dismount.
const DISMOUNT_FOV_LERP_FLOOR: f32 = 0.24;

/// Owns the momentum tracker, dismount shaper, and camera rig.
pub struct RideService {
    clock: LevelClock,
    sprint_carry_until: f32,
    phase: PhaseTimer,
    momentum: MomentumTracker,
    residual: ResidualShaper,
    rig: Option<CameraRig>,
    tuning: RigTuning,
    /// True while a rig-forced body hide has not been restored yet. Survives
    /// rig teardown so a scene reset can always undo the hide.
    body_hidden_pending: bool,
}

impl Default for RideService {
    fn default() -> Self {
        Self::new(RigTuning::default())
    }
}

impl RideService {
    /// A fresh service with the given rig tuning.
    #[must_use]
    pub fn new(tuning: RigTuning) -> Self {
        Self {
            clock: LevelClock::new(),
            sprint_carry_until: NEVER,
            phase: PhaseTimer::default(),
            momentum: MomentumTracker::default(),
            residual: ResidualShaper::default(),
            rig: None,
            tuning,
            body_hidden_pending: false,
        }
    }

    /// Clears every map and stateful field, restoring a forced body hide.
    /// Called at host-attach and on every scene load.
    pub fn reset(&mut self, host: &mut dyn HostWorld) {
        let hid_body =
            self.body_hidden_pending || self.rig.as_ref().is_some_and(|rig| rig.body_hidden);
        if hid_body && let Some(player) = host.player_mut() {
            player.set_body_hidden(false);
        }
        self.body_hidden_pending = false;
        self.rig = None;
        self.momentum.clear();
        self.residual.end();
        self.phase.clear();
        self.sprint_carry_until = NEVER;
        self.clock.reset();
        debug!("ride service reset");
    }

    /// Scene-load notification; equivalent to [`reset`](Self::reset).
    pub fn notify_scene_initialized(&mut self, host: &mut dyn HostWorld) {
        self.reset(host);
    }

    /// Per-frame bookkeeping: advances the clock, refreshes sprint carry,
    /// expires the transition phase and stale mount samples.
    pub fn tick(&mut self, dt: f32, host: &dyn HostWorld) {
        self.clock.advance(dt);
        let now = self.clock.now();

        if host.player().is_some_and(|player| player.is_sprinting()) {
            self.sprint_carry_until = now + SPRINT_CARRY_WINDOW;
        }

        self.phase.expire(now);
        self.momentum.expire_stale(now);
    }

    /// Level time as of the last tick.
    #[must_use]
    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    /// The current transition phase.
    #[must_use]
    pub fn transition_phase(&self) -> TransitionPhase {
        self.phase.get()
    }

    /// The active camera rig, if any.
    #[must_use]
    pub fn rig(&self) -> Option<&CameraRig> {
        self.rig.as_ref()
    }

    // ── Mount momentum ──────────────────────────────────────────────

    /// Samples the player's velocity for `board` while the mount action
    /// charges. Call from the mountable's per-frame update.
    pub fn capture_mount_sample(
        &mut self,
        board: BoardHandle,
        input: &RideInput,
        host: &dyn HostWorld,
    ) {
        let Some(board_surface) = host.board(board) else {
            return;
        };
        let riding = board_surface.is_riding();
        let Some(player) = host.player() else {
            return;
        };
        let now = self.clock.now();
        let carry = now <= self.sprint_carry_until;
        self.momentum.capture(board, riding, input, player, now, carry);
    }

    /// Marks the mount transition and takes one immediate sample, covering
    /// mounts that happen without prior per-frame sampling.
    pub fn begin_mount(&mut self, board: BoardHandle, input: &RideInput, host: &dyn HostWorld) {
        self.phase.set(TransitionPhase::Mount, self.clock.now());
        self.capture_mount_sample(board, input, host);
    }

    /// Resolves and applies the transfer velocity after the host completes
    /// the mount.
    pub fn apply_mount_momentum(
        &mut self,
        board: BoardHandle,
        input: &RideInput,
        host: &mut dyn HostWorld,
    ) {
        let carry = self.clock.now() <= self.sprint_carry_until;
        let velocity = {
            let Some(board_surface) = host.board(board) else {
                return;
            };
            if !board_surface.is_alive() {
                return;
            }
            let forward = board_surface.forward();
            let Some(player) = host.player() else {
                return;
            };
            self.momentum
                .resolve_transfer(board, forward, input, player, carry)
        };

        let Some(velocity) = velocity else {
            return;
        };
        if let Some(board_surface) = host.board_mut(board) {
            board_surface.set_velocity(velocity);
        }
    }

    // ── Dismount shaping ────────────────────────────────────────────

    /// Marks the dismount transition, tears down the camera rig (leaving
    /// body visibility for the dismount flow to re-evaluate), and captures
    /// the motion context for the residual push.
    pub fn begin_dismount(&mut self, board: BoardHandle, host: &mut dyn HostWorld) {
        self.phase.set(TransitionPhase::Dismount, self.clock.now());
        self.teardown_rig(host, false);

        self.residual.end();
        let Some(player) = host.player() else {
            return;
        };
        let player_forward = player.forward();
        let board_velocity = host
            .board(board)
            .filter(|b| b.is_alive())
            .map_or(Vec3::ZERO, |b| b.velocity());
        self.residual.begin(board_velocity, player_forward);
    }

    /// Drops the pending dismount context. Call once after each dismount
    /// completes, whether or not the residual adjustment ran.
    pub fn end_dismount(&mut self) {
        self.residual.end();
    }

    /// Rewrites the host's residual push parameters from the pending
    /// dismount context; passes them through unchanged when none is pending.
    pub fn adjust_dismount_residual(&self, push: &mut ResidualPush) {
        self.residual.adjust(push);
    }

    /// Raises a host-requested camera blend duration to the dismount floor.
    /// Never shortens, and only applies during the dismount window.
    pub fn smooth_dismount_camera(&self, lerp_time: &mut f32) {
        if self.phase.get() == TransitionPhase::Dismount {
            *lerp_time = lerp_time.max(DISMOUNT_CAMERA_LERP_FLOOR);
        }
    }

    /// Raises a host-requested FOV blend duration to the dismount floor.
    pub fn smooth_dismount_fov(&self, lerp_time: &mut f32) {
        if self.phase.get() == TransitionPhase::Dismount {
            *lerp_time = lerp_time.max(DISMOUNT_FOV_LERP_FLOOR);
        }
    }

    // ── Camera rig ──────────────────────────────────────────────────

    /// Starts the custom skateboard camera for a mount. Returns `true` when
    /// the rig took over, in which case the host skips its own camera-start
    /// logic.
    pub fn begin_custom_camera(
        &mut self,
        camera: CameraHandle,
        board: BoardHandle,
        input: &RideInput,
        host: &mut dyn HostWorld,
    ) -> bool {
        if self.rig.is_some() {
            self.teardown_rig(host, true);
        }

        let now = self.clock.now();
        let mut rig = {
            let Some(camera_surface) = host.camera(camera) else {
                return false;
            };
            if !camera_surface.is_alive() {
                return false;
            }
            let Some(board_surface) = host.board(board) else {
                return false;
            };
            if !board_surface.is_alive() {
                return false;
            }
            CameraRig::begin(
                camera,
                board,
                camera_surface,
                board_surface,
                input,
                &self.tuning,
                now,
            )
        };

        // Mask the pull-out pop behind a short first-person body hide.
        if let Some(player) = host.player_mut() {
            player.set_body_hidden(true);
            self.body_hidden_pending = true;
        } else {
            rig.body_hidden = false;
        }

        debug!(camera = camera.0, board = board.0, "camera rig started");
        self.rig = Some(rig);
        true
    }

    /// Whether the rig currently owns this camera. The host suppresses its
    /// own camera update while this is `true`.
    #[must_use]
    pub fn has_custom_camera(&self, camera: CameraHandle) -> bool {
        self.rig.as_ref().is_some_and(|rig| rig.camera() == camera)
    }

    /// Runs the rig for one frame and writes pose and FOV to the camera.
    /// Returns `true` when handled; `false` hands control back to the host
    /// (including the frame the rig tears itself down on a dead camera or
    /// board).
    pub fn run_camera_update(
        &mut self,
        camera: CameraHandle,
        input: &RideInput,
        dt: f32,
        host: &mut dyn HostWorld,
    ) -> bool {
        let board = match &self.rig {
            Some(rig) if rig.camera() == camera => rig.board(),
            _ => return false,
        };

        let camera_alive = host.camera(camera).is_some_and(|c| c.is_alive());
        let board_alive = host.board(board).is_some_and(|b| b.is_alive());
        if !camera_alive || !board_alive {
            self.teardown_rig(host, true);
            return false;
        }

        let now = self.clock.now();
        let frame = {
            let Some(rig) = self.rig.as_mut() else {
                return false;
            };
            let Some(board_surface) = host.board(board) else {
                return false;
            };
            rig.advance(dt, now, input, board_surface, host.collision(), &self.tuning)
        };

        if let Some(camera_surface) = host.camera_mut(camera) {
            camera_surface.set_pose(frame.position, frame.rotation);
            camera_surface.set_fov(frame.fov);
        }

        let unhide = self.rig.as_ref().is_some_and(|rig| rig.should_unhide_body(now));
        if unhide {
            if let Some(player) = host.player_mut() {
                player.set_body_hidden(false);
            }
            if let Some(rig) = self.rig.as_mut() {
                rig.body_hidden = false;
            }
            self.body_hidden_pending = false;
        }

        true
    }

    /// Tears the rig down when its camera component is destroyed.
    pub fn notify_camera_destroyed(&mut self, camera: CameraHandle, host: &mut dyn HostWorld) {
        if self.rig.as_ref().is_some_and(|rig| rig.camera() == camera) {
            self.teardown_rig(host, true);
        }
    }

    /// Drops the active rig. Restores body visibility only when requested;
    /// dismount-begin suppresses restoration so the dismount flow
    /// re-evaluates visibility itself.
    fn teardown_rig(&mut self, host: &mut dyn HostWorld, restore_visibility: bool) {
        // take() before touching the host, so a callback re-entering the
        // service never sees a half-dead rig.
        let Some(rig) = self.rig.take() else {
            return;
        };
        if rig.body_hidden
            && restore_visibility
            && let Some(player) = host.player_mut()
        {
            player.set_body_hidden(false);
            self.body_hidden_pending = false;
        }
        debug!(camera = rig.camera().0, "camera rig ended");
    }
}
