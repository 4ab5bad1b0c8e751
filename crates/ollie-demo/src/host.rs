//! A minimal scripted host: one player, one board, one camera, and a
//! corridor that squeezes the follow camera.
//!
//! Just enough kinematics to exercise the ride service end to end: the
//! player walks by teleport-integration, the board coasts with light drag,
//! and the collision world is a single analytic corridor.

use glam::{Quat, Vec3};

use ollie_host::{
    BoardHandle, BoardSurface, CameraHandle, CameraSurface, CollisionWorld, HostWorld,
    PlayerSurface, RigParams,
};

/// Light drag applied to the coasting board, per second.
const BOARD_DRAG: f32 = 0.12;

pub struct DemoPlayer {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
    pub sprinting: bool,
    pub body_hidden: bool,
}

impl DemoPlayer {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            sprinting: false,
            body_hidden: false,
        }
    }

    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// The speed the scripted walk/sprint phase moves the player at.
    pub fn scripted_speed(&self) -> f32 {
        if self.sprinting { 2.4 * 1.9 } else { 2.4 }
    }
}

impl PlayerSurface for DemoPlayer {
    fn smoothed_velocity(&self) -> Vec3 {
        self.velocity
    }
    fn raw_movement(&self) -> Vec3 {
        self.velocity
    }
    fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
    fn rotation(&self) -> Quat {
        self.rotation
    }
    fn is_sprinting(&self) -> bool {
        self.sprinting
    }
    fn sprint_multiplier(&self) -> f32 {
        if self.sprinting { 1.9 } else { 1.0 }
    }
    fn is_crouched(&self) -> bool {
        false
    }
    fn standing_scale(&self) -> f32 {
        1.0
    }
    fn walk_speed(&self) -> f32 {
        2.4
    }
    fn move_speed_multiplier(&self) -> f32 {
        1.0
    }
    fn global_speed_multiplier(&self) -> f32 {
        1.0
    }
    fn is_stunned(&self) -> bool {
        false
    }
    fn set_body_hidden(&mut self, hidden: bool) {
        self.body_hidden = hidden;
    }
}

pub struct DemoBoard {
    pub position: Vec3,
    pub forward: Vec3,
    pub velocity: Vec3,
    pub riding: bool,
}

impl DemoBoard {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -2.0),
            forward: Vec3::NEG_Z,
            velocity: Vec3::ZERO,
            riding: false,
        }
    }

    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.velocity *= 1.0 - (BOARD_DRAG * dt).min(1.0);
    }
}

impl BoardSurface for DemoBoard {
    fn is_alive(&self) -> bool {
        true
    }
    fn is_riding(&self) -> bool {
        self.riding
    }
    fn position(&self) -> Vec3 {
        self.position
    }
    fn forward(&self) -> Vec3 {
        self.forward
    }
    fn velocity(&self) -> Vec3 {
        self.velocity
    }
    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
    fn top_speed(&self) -> f32 {
        8.5
    }
}

pub struct DemoCamera {
    pub position: Vec3,
    pub rotation: Quat,
    pub fov: f32,
}

impl DemoCamera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 1.5),
            rotation: Quat::IDENTITY,
            fov: 60.0,
        }
    }
}

impl CameraSurface for DemoCamera {
    fn is_alive(&self) -> bool {
        true
    }
    fn position(&self) -> Vec3 {
        self.position
    }
    fn rotation(&self) -> Quat {
        self.rotation
    }
    fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }
    fn base_fov(&self) -> f32 {
        60.0
    }
    fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
    }
    fn rig_params(&self) -> RigParams {
        RigParams::default()
    }
}

/// A corridor between two z planes where camera sweeps hit after 1.4 m.
pub struct Corridor {
    pub z_min: f32,
    pub z_max: f32,
    pub clearance: f32,
}

impl CollisionWorld for Corridor {
    fn sphere_cast(&self, origin: Vec3, _dir: Vec3, max_dist: f32, radius: f32) -> Option<f32> {
        if origin.z < self.z_min || origin.z > self.z_max {
            return None;
        }
        let hit = (self.clearance - radius).max(0.0);
        (hit < max_dist).then_some(hit)
    }
}

/// The world the demo scenario runs in.
pub struct DemoHost {
    pub player: DemoPlayer,
    pub board: DemoBoard,
    pub camera: DemoCamera,
    pub corridor: Corridor,
    pub board_handle: BoardHandle,
    pub camera_handle: CameraHandle,
}

impl DemoHost {
    pub fn new() -> Self {
        Self {
            player: DemoPlayer::new(),
            board: DemoBoard::new(),
            camera: DemoCamera::new(),
            corridor: Corridor {
                z_min: -26.0,
                z_max: -16.0,
                clearance: 1.4,
            },
            board_handle: BoardHandle(1),
            camera_handle: CameraHandle(1),
        }
    }

    /// Advances the kinematics one frame.
    pub fn integrate(&mut self, dt: f32) {
        self.board.integrate(dt);
        if self.board.riding {
            // Riding: the player goes where the board goes.
            self.player.velocity = self.board.velocity;
            self.player.position = self.board.position;
        } else {
            self.player.integrate(dt);
        }
    }
}

impl HostWorld for DemoHost {
    fn player(&self) -> Option<&dyn PlayerSurface> {
        Some(&self.player)
    }
    fn player_mut(&mut self) -> Option<&mut dyn PlayerSurface> {
        Some(&mut self.player)
    }
    fn board(&self, handle: BoardHandle) -> Option<&dyn BoardSurface> {
        (handle == self.board_handle).then_some(&self.board as &dyn BoardSurface)
    }
    fn board_mut(&mut self, handle: BoardHandle) -> Option<&mut dyn BoardSurface> {
        if handle != self.board_handle {
            return None;
        }
        Some(&mut self.board as &mut dyn BoardSurface)
    }
    fn camera(&self, handle: CameraHandle) -> Option<&dyn CameraSurface> {
        (handle == self.camera_handle).then_some(&self.camera as &dyn CameraSurface)
    }
    fn camera_mut(&mut self, handle: CameraHandle) -> Option<&mut dyn CameraSurface> {
        if handle != self.camera_handle {
            return None;
        }
        Some(&mut self.camera as &mut dyn CameraSurface)
    }
    fn collision(&self) -> Option<&dyn CollisionWorld> {
        Some(&self.corridor)
    }
}
