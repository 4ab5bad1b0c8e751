//! Headless scripted demo of the ride layer.
//!
//! Drives a full sprint → charge → mount → ride → orbit → dismount sequence
//! through the real input trackers and the ride service, logging what the
//! momentum transfer, residual shaper, and camera rig decide along the way.
//!
//! Run with `cargo run -p ollie-demo`, or
//! `cargo run -p ollie-demo -- --seconds 12 --log-level debug`.

mod host;

use clap::Parser;
use glam::Vec3;
use tracing::{info, warn};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use ollie_config::{CliArgs, Config, default_config_dir};
use ollie_host::PlayerSurface;
use ollie_input::{InputMap, KeyboardState, MouseState, RideInputCollector};
use ollie_ride::{ResidualPush, RideService, RigTuning};

use host::DemoHost;

/// Demo-specific arguments on top of the shared CLI surface.
#[derive(Parser, Debug)]
#[command(name = "ollie-demo", about = "Scripted skateboard ride demo")]
struct DemoArgs {
    #[command(flatten)]
    common: CliArgs,

    /// Length of the scripted run in seconds.
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Simulation tick rate in Hz.
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f32,
}

fn main() {
    let args = DemoArgs::parse();

    let config_dir = args
        .common
        .config
        .clone()
        .unwrap_or_else(default_config_dir);
    let (mut config, config_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    config.apply_cli_overrides(&args.common);

    ollie_log::init_logging(None, cfg!(debug_assertions), Some(&config));
    if let Some(err) = config_error {
        warn!("falling back to default config: {err}");
    }

    run(&args, &config);
}

/// Frame windows of the scripted timeline, in seconds.
const SPRINT_FROM: f32 = 0.2;
const CHARGE_FROM: f32 = 1.5;
const MOUNT_AT: f32 = 1.8;
const ORBIT_FROM: f32 = 4.0;
const ORBIT_UNTIL: f32 = 5.0;
const DISMOUNT_AT: f32 = 8.0;

fn run(args: &DemoArgs, config: &Config) {
    let dt = 1.0 / args.tick_rate.max(1.0);
    let ticks = (args.seconds.max(0.0) * args.tick_rate) as u32;

    let tuning = RigTuning {
        fallback_offset_back: config.camera.fallback_offset_back,
        fallback_offset_up: config.camera.fallback_offset_up,
        fov_rate_floor: config.camera.fov_rate_floor,
        collision_radius: config.camera.collision_radius,
    };

    let mut host = DemoHost::new();
    let mut service = RideService::new(tuning);
    service.reset(&mut host);

    let mut keyboard = KeyboardState::new();
    let mut mouse = MouseState::new();
    mouse.set_captured(true);
    let mut collector = RideInputCollector::new(InputMap::default_skate());
    collector.mouse_sensitivity *= config.input.mouse_sensitivity;
    collector.invert_y = config.input.invert_y;
    collector.stick_orbit_rate = config.input.stick_orbit_rate;

    let board = host.board_handle;
    let camera = host.camera_handle;
    let mut mounted = false;
    let mut dismounted = false;

    info!(ticks, dt, "scripted ride starting");

    for tick in 0..ticks {
        let t = tick as f32 * dt;

        // ── Scripted input events ───────────────────────────────────
        if crossed(t, dt, SPRINT_FROM) {
            keyboard.on_key(PhysicalKey::Code(KeyCode::KeyW), ElementState::Pressed);
            keyboard.on_key(PhysicalKey::Code(KeyCode::ShiftLeft), ElementState::Pressed);
        }
        if crossed(t, dt, CHARGE_FROM) {
            keyboard.on_key(PhysicalKey::Code(KeyCode::KeyG), ElementState::Pressed);
        }
        if crossed(t, dt, ORBIT_FROM) {
            mouse.on_button(MouseButton::Right, ElementState::Pressed);
        }
        if t >= ORBIT_FROM && t < ORBIT_UNTIL {
            // Slow sweep to the right, slightly up.
            mouse.on_raw_motion(6.0, -1.5);
        }
        if crossed(t, dt, ORBIT_UNTIL) {
            mouse.on_button(MouseButton::Right, ElementState::Released);
        }

        let input = collector.collect(&keyboard, &mouse, None, dt);

        // ── Host frame ──────────────────────────────────────────────
        host.player.sprinting = input.sprint_held && !mounted;
        if !mounted && t >= SPRINT_FROM {
            host.player.velocity = Vec3::NEG_Z * host.player.scripted_speed();
        }
        host.integrate(dt);

        service.tick(dt, &host);

        if !mounted && input.mount_held {
            service.capture_mount_sample(board, &input, &host);
        }

        if !mounted && t >= MOUNT_AT {
            mounted = true;
            service.begin_mount(board, &input, &host);
            host.board.riding = true;
            host.player.sprinting = false;
            service.apply_mount_momentum(board, &input, &mut host);
            info!(
                speed = host.board.velocity.length(),
                "mounted: momentum transferred"
            );

            let handled = service.begin_custom_camera(camera, board, &input, &mut host);
            info!(handled, "custom camera requested");
        }

        if mounted && !dismounted {
            service.run_camera_update(camera, &input, dt, &mut host);
        }

        if mounted && !dismounted && t >= DISMOUNT_AT {
            dismounted = true;
            service.begin_dismount(board, &mut host);

            // The push the host itself would have requested.
            let mut push = ResidualPush {
                direction: host.player.forward(),
                force: 40.0,
                duration: 0.1,
            };
            service.adjust_dismount_residual(&mut push);
            service.end_dismount();

            host.board.riding = false;
            host.player.velocity = push.direction * (push.force * push.duration * 0.25);
            info!(
                force = push.force,
                duration = push.duration,
                "dismounted: residual push shaped"
            );

            let mut camera_lerp = 0.12;
            service.smooth_dismount_camera(&mut camera_lerp);
            let mut fov_lerp = 0.1;
            service.smooth_dismount_fov(&mut fov_lerp);
            info!(camera_lerp, fov_lerp, "dismount blend floors applied");
        }

        if tick % (args.tick_rate as u32).max(1) == 0 {
            let (distance, weight) = service
                .rig()
                .map_or((0.0, 0.0), |rig| (rig.distance(), rig.manual_weight()));
            info!(
                t,
                board_speed = host.board.velocity.length(),
                cam_distance = distance,
                manual_weight = weight,
                fov = host.camera.fov,
                body_hidden = host.player.body_hidden,
                "frame"
            );
        }

        keyboard.clear_transients();
        mouse.clear_transients();
    }

    info!(
        final_board_speed = host.board.velocity.length(),
        final_player_speed = host.player.velocity.length(),
        "scripted ride finished"
    );
}

/// Whether `threshold` falls inside this frame's `[t, t + dt)` window.
fn crossed(t: f32, dt: f32, threshold: f32) -> bool {
    t >= threshold && t - dt < threshold
}
