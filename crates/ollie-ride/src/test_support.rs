//! Mock host world used by the rig and service tests.

use glam::{Quat, Vec3};

use ollie_host::{
    BoardHandle, BoardSurface, CameraHandle, CameraSurface, CollisionWorld, HostWorld,
    PlayerSurface, RigParams,
};

pub(crate) struct MockPlayer {
    pub smoothed_velocity: Vec3,
    pub raw_movement: Vec3,
    pub forward: Vec3,
    pub rotation: Quat,
    pub is_sprinting: bool,
    pub sprint_multiplier: f32,
    pub is_crouched: bool,
    pub standing_scale: f32,
    pub walk_speed: f32,
    pub move_speed_multiplier: f32,
    pub global_speed_multiplier: f32,
    pub is_stunned: bool,
    pub body_hidden: bool,
}

impl MockPlayer {
    /// A standing player whose velocity estimator reads `velocity`.
    pub fn moving(velocity: Vec3) -> Self {
        Self {
            smoothed_velocity: velocity,
            raw_movement: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            rotation: Quat::IDENTITY,
            is_sprinting: false,
            sprint_multiplier: 1.0,
            is_crouched: false,
            standing_scale: 1.0,
            walk_speed: 2.4,
            move_speed_multiplier: 1.0,
            global_speed_multiplier: 1.0,
            is_stunned: false,
            body_hidden: false,
        }
    }
}

impl PlayerSurface for MockPlayer {
    fn smoothed_velocity(&self) -> Vec3 {
        self.smoothed_velocity
    }
    fn raw_movement(&self) -> Vec3 {
        self.raw_movement
    }
    fn forward(&self) -> Vec3 {
        self.forward
    }
    fn rotation(&self) -> Quat {
        self.rotation
    }
    fn is_sprinting(&self) -> bool {
        self.is_sprinting
    }
    fn sprint_multiplier(&self) -> f32 {
        self.sprint_multiplier
    }
    fn is_crouched(&self) -> bool {
        self.is_crouched
    }
    fn standing_scale(&self) -> f32 {
        self.standing_scale
    }
    fn walk_speed(&self) -> f32 {
        self.walk_speed
    }
    fn move_speed_multiplier(&self) -> f32 {
        self.move_speed_multiplier
    }
    fn global_speed_multiplier(&self) -> f32 {
        self.global_speed_multiplier
    }
    fn is_stunned(&self) -> bool {
        self.is_stunned
    }
    fn set_body_hidden(&mut self, hidden: bool) {
        self.body_hidden = hidden;
    }
}

pub(crate) struct MockBoard {
    pub alive: bool,
    pub riding: bool,
    pub position: Vec3,
    pub forward: Vec3,
    pub velocity: Vec3,
    pub top_speed: f32,
}

impl MockBoard {
    pub fn facing_neg_z() -> Self {
        Self {
            alive: true,
            riding: false,
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            velocity: Vec3::ZERO,
            top_speed: 8.5,
        }
    }
}

impl BoardSurface for MockBoard {
    fn is_alive(&self) -> bool {
        self.alive
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
        self.top_speed
    }
}

pub(crate) struct MockCamera {
    pub alive: bool,
    pub position: Vec3,
    pub rotation: Quat,
    pub base_fov: f32,
    pub fov: f32,
    pub params: RigParams,
}

impl MockCamera {
    pub fn at(position: Vec3) -> Self {
        Self {
            alive: true,
            position,
            rotation: Quat::IDENTITY,
            base_fov: 60.0,
            fov: 60.0,
            params: RigParams::default(),
        }
    }
}

impl CameraSurface for MockCamera {
    fn is_alive(&self) -> bool {
        self.alive
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
        self.base_fov
    }
    fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
    }
    fn rig_params(&self) -> RigParams {
        self.params
    }
}

/// A world with a single wall at a fixed distance along every sweep.
pub(crate) struct WallWorld {
    pub hit_distance: f32,
}

impl CollisionWorld for WallWorld {
    fn sphere_cast(&self, _origin: Vec3, _dir: Vec3, max_dist: f32, _radius: f32) -> Option<f32> {
        (self.hit_distance < max_dist).then_some(self.hit_distance)
    }
}

/// One player, at most one board and one camera, and an optional wall.
pub(crate) struct MockHost {
    pub player: Option<MockPlayer>,
    pub board: Option<MockBoard>,
    pub camera: Option<MockCamera>,
    pub wall: Option<WallWorld>,
    pub board_handle: BoardHandle,
    pub camera_handle: CameraHandle,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            player: Some(MockPlayer::moving(Vec3::ZERO)),
            board: Some(MockBoard::facing_neg_z()),
            camera: Some(MockCamera::at(Vec3::new(0.0, 1.6, 3.0))),
            wall: None,
            board_handle: BoardHandle(1),
            camera_handle: CameraHandle(1),
        }
    }

    pub fn player_ref(&self) -> &MockPlayer {
        self.player.as_ref().expect("player present")
    }

    pub fn board_ref(&self) -> &MockBoard {
        self.board.as_ref().expect("board present")
    }

    pub fn player_mut_ref(&mut self) -> &mut MockPlayer {
        self.player.as_mut().expect("player present")
    }

    pub fn board_mut_ref(&mut self) -> &mut MockBoard {
        self.board.as_mut().expect("board present")
    }

    pub fn camera_mut_ref(&mut self) -> &mut MockCamera {
        self.camera.as_mut().expect("camera present")
    }
}

impl HostWorld for MockHost {
    fn player(&self) -> Option<&dyn PlayerSurface> {
        self.player.as_ref().map(|p| p as &dyn PlayerSurface)
    }
    fn player_mut(&mut self) -> Option<&mut dyn PlayerSurface> {
        self.player.as_mut().map(|p| p as &mut dyn PlayerSurface)
    }
    fn board(&self, handle: BoardHandle) -> Option<&dyn BoardSurface> {
        if handle != self.board_handle {
            return None;
        }
        self.board.as_ref().map(|b| b as &dyn BoardSurface)
    }
    fn board_mut(&mut self, handle: BoardHandle) -> Option<&mut dyn BoardSurface> {
        if handle != self.board_handle {
            return None;
        }
        self.board.as_mut().map(|b| b as &mut dyn BoardSurface)
    }
    fn camera(&self, handle: CameraHandle) -> Option<&dyn CameraSurface> {
        if handle != self.camera_handle {
            return None;
        }
        self.camera.as_ref().map(|c| c as &dyn CameraSurface)
    }
    fn camera_mut(&mut self, handle: CameraHandle) -> Option<&mut dyn CameraSurface> {
        if handle != self.camera_handle {
            return None;
        }
        self.camera.as_mut().map(|c| c as &mut dyn CameraSurface)
    }
    fn collision(&self) -> Option<&dyn CollisionWorld> {
        self.wall.as_ref().map(|w| w as &dyn CollisionWorld)
    }
}
