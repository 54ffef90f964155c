//! Headless petanque sandbox
//!
//! Builds a scene from a config file (or the defaults), steps it on a fixed
//! timestep and logs body transforms where a renderer would draw them.
//!
//! Usage: `petanque_headless [config.toml|config.ron]`

mod config;

use rigid_physics::config::{Config, ConfigError};
use rigid_physics::foundation::logging;
use rigid_physics::foundation::time::{FixedTimestep, FrameTimer};
use rigid_physics::physics::{PhysicsError, Scene};

use crate::config::SandboxConfig;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("physics: {0}")]
    Physics(#[from] PhysicsError),
}

fn load_config() -> Result<SandboxConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SandboxConfig::load_from_file(&path)?,
        None => SandboxConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn report(scene: &Scene) {
    let stats = scene.last_frame_stats();
    log::info!(
        "Frame {}: {} contacts ({} resolved)",
        stats.frame,
        stats.contacts,
        stats.resolved
    );
    for transform in scene.body_transforms() {
        let Some(body) = scene.body(transform.handle) else {
            continue;
        };
        if body.has_infinite_mass() {
            continue;
        }
        log::info!(
            "  body {:>2} r={:.2} pos=({:.3}, {:.3}, {:.3}) vel=({:.3}, {:.3}, {:.3})",
            transform.handle.0,
            transform.radius(),
            transform.position.x,
            transform.position.y,
            transform.position.z,
            body.linear_velocity.x,
            body.linear_velocity.y,
            body.linear_velocity.z
        );
    }
}

fn run(config: &SandboxConfig) -> Result<(), AppError> {
    let mut scene = Scene::new(config.physics.clone())?;
    scene.initialize()?;

    let mut timestep = FixedTimestep::new(config.physics_step, config.max_steps_per_frame);
    let mut timer = FrameTimer::default();

    for frame in 1..=config.frames {
        let elapsed = if config.realtime {
            timer.tick()
        } else {
            config.frame_time
        };

        for _ in 0..timestep.advance(elapsed) {
            scene.update(timestep.step());
        }

        if config.report_every > 0 && frame % config.report_every == 0 {
            report(&scene);
        }
        if config.reset_after == Some(frame) {
            scene.reset()?;
        }
    }

    log::info!(
        "Finished {} frames, {} bodies, {} physics steps since last reset",
        config.frames,
        scene.len(),
        scene.frame_count()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_filter(&config.log_filter);

    log::info!("Starting petanque sandbox");
    run(&config)?;
    Ok(())
}
