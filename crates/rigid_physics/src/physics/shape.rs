//! Collision shapes
//!
//! Shapes are stored in body space (centered on the body origin) and carry no
//! mass. Mass lives on the [`Body`](super::Body); every mass-dependent quantity
//! here is expressed per unit mass and scaled by the body.
//!
//! New shape kinds are added as enum variants. Call sites only use the methods
//! below, so they do not change when a variant is added.

use serde::{Deserialize, Serialize};

use crate::foundation::bounds::AABB;
use crate::foundation::math::{Mat3, Quat, Vec3};
use crate::physics::error::PhysicsError;

/// Discriminant of a [`Shape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Solid sphere
    Sphere,
}

/// Collision shape types (stored in BODY SPACE)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// A solid sphere centered on the body origin
    Sphere {
        /// Sphere radius
        radius: f32,
    },
}

impl Shape {
    /// Creates a spherical shape with given radius
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Which kind of shape this is
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere { .. } => ShapeKind::Sphere,
        }
    }

    /// Reject degenerate dimensions
    pub fn validate(&self) -> Result<(), PhysicsError> {
        match *self {
            Self::Sphere { radius } if radius.is_finite() && radius > 0.0 => Ok(()),
            Self::Sphere { radius } => Err(PhysicsError::InvalidShape(format!(
                "sphere radius must be finite and > 0, got {radius}"
            ))),
        }
    }

    /// Center of mass in body space
    pub fn center_of_mass(&self) -> Vec3 {
        match self {
            Self::Sphere { .. } => Vec3::zeros(),
        }
    }

    /// Inertia tensor about the center of mass for a body of unit mass
    pub fn inertia_tensor(&self) -> Mat3 {
        match *self {
            // solid sphere: (2/5) r^2 on the diagonal
            Self::Sphere { radius } => Mat3::identity() * (0.4 * radius * radius),
        }
    }

    /// Sphere radius
    pub fn radius(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
        }
    }

    /// Bounds in body space
    pub fn local_bounds(&self) -> AABB {
        match *self {
            Self::Sphere { radius } => AABB::from_center_extents(Vec3::zeros(), Vec3::repeat(radius)),
        }
    }

    /// World-space bounds for the shape placed at `position` with an orientation
    ///
    /// Spheres ignore the orientation; other kinds will need it.
    pub fn bounds(&self, position: &Vec3, _orientation: &Quat) -> AABB {
        match *self {
            Self::Sphere { radius } => AABB::from_center_extents(*position, Vec3::repeat(radius)),
        }
    }
}
