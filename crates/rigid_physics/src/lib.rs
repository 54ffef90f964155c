//! # Rigid Physics
//!
//! A small rigid-body simulation core for spheres.
//!
//! ## Features
//!
//! - **Continuous Collision**: contacts are found at their time of impact, so
//!   fast bodies do not tunnel
//! - **Chronological Resolution**: contacts are resolved in time order with the
//!   whole scene moved to each contact's instant
//! - **Impulse Response**: restitution, Coulomb friction and overlap correction
//! - **Configurable Layouts**: scenes described in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rigid_physics::prelude::*;
//!
//! fn main() -> Result<(), PhysicsError> {
//!     let mut scene = Scene::new(PhysicsSettings::default())?;
//!     scene.initialize()?;
//!
//!     for _ in 0..600 {
//!         scene.update(1.0 / 60.0);
//!     }
//!
//!     for transform in scene.body_transforms() {
//!         println!("{:?} at {}", transform.handle, transform.position);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss
)]

pub mod config;
pub mod foundation;
pub mod physics;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        foundation::{
            bounds::AABB,
            math::{Mat3, Mat4, Quat, Vec3},
            time::{FixedTimestep, FrameTimer},
        },
        physics::{
            Body, BodyHandle, BodyTransform, BroadphaseMethod, FrameStats, InitialVelocity,
            PhysicsError, PhysicsSettings, Scene, SceneLayout, Shape,
        },
    };
}
