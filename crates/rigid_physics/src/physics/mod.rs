//! Rigid-body physics for spheres
//!
//! Bodies move under gravity, collide continuously within each frame and
//! respond with impulses. [`Scene`] drives the per-frame pipeline; the other
//! modules are the stages it runs.

pub mod body;
pub mod broadphase;
pub mod contact;
pub mod error;
pub mod intersections;
pub mod scene;
pub mod settings;
pub mod shape;

#[cfg(test)]
mod tests;

pub use body::Body;
pub use broadphase::{Broadphase, BroadphaseMethod, CollisionPair};
pub use contact::{resolve_contact, Contact, Resolution};
pub use error::PhysicsError;
pub use intersections::intersect;
pub use scene::{BodyHandle, BodyTransform, FrameStats, Scene};
pub use settings::{BodyGroup, InitialVelocity, PhysicsSettings, SceneLayout};
pub use shape::{Shape, ShapeKind};
