//! Physics settings and scene layouts
//!
//! Everything here is plain serde data so it can be loaded through
//! [`Config`](crate::config::Config) from TOML or RON.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::{is_finite_vec, Vec3};
use crate::physics::body::Body;
use crate::physics::broadphase::BroadphaseMethod;
use crate::physics::error::PhysicsError;
use crate::physics::shape::Shape;

/// Tunables for a [`Scene`](super::Scene)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Acceleration applied to every finite-mass body
    pub gravity: Vec3,
    /// Pair-finding strategy
    pub broadphase: BroadphaseMethod,
    /// Padding added to swept bounds
    pub sweep_margin: f32,
    /// Push overlapping bodies apart after each impulse
    pub positional_correction: bool,
    /// Seed for randomized initial velocities; `None` seeds from the OS
    pub rng_seed: Option<u64>,
    /// Bodies created by `Scene::initialize`
    pub layout: SceneLayout,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, 0.0, -10.0),
            broadphase: BroadphaseMethod::default(),
            sweep_margin: 0.01,
            positional_correction: true,
            rng_seed: None,
            layout: SceneLayout::default(),
        }
    }
}

impl Config for PhysicsSettings {}

impl PhysicsSettings {
    /// Settings with an empty layout, for scenes populated by hand
    pub fn empty() -> Self {
        Self {
            layout: SceneLayout::empty(),
            ..Self::default()
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_finite_vec(&self.gravity) {
            return Err(ConfigError::Invalid(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        if !self.sweep_margin.is_finite() || self.sweep_margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sweep_margin must be finite and >= 0, got {}",
                self.sweep_margin
            )));
        }
        for group in &self.layout.groups {
            group
                .validate()
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        }
        Ok(())
    }
}

/// Groups of bodies making up a starting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    /// Groups in spawn order
    pub groups: Vec<BodyGroup>,
}

impl SceneLayout {
    /// A layout with no bodies
    pub fn empty() -> Self {
        Self { groups: Vec::new() }
    }

    /// Petanque: one small jack thrown in a random direction, three boules
    /// dropped from high up, and a floor of large static spheres
    pub fn petanque() -> Self {
        let jack_radius = 0.25;
        let boule_radius = jack_radius * 3.0;
        let boule_spacing = boule_radius * 1.5;
        let floor_radius = 80.0;
        let floor_spacing = floor_radius * 0.25;

        Self {
            groups: vec![
                BodyGroup {
                    name: "jack".to_string(),
                    radius: jack_radius,
                    columns: 1,
                    rows: 1,
                    spacing: 0.0,
                    origin: Vec3::new(0.0, 0.0, 10.0),
                    inverse_mass: 1.0,
                    elasticity: 0.3,
                    friction: 0.4,
                    velocity: InitialVelocity::RandomPlanar {
                        range: 7.5,
                        quantum: 0.1,
                    },
                },
                BodyGroup {
                    name: "boules".to_string(),
                    radius: boule_radius,
                    columns: 3,
                    rows: 1,
                    spacing: boule_spacing,
                    origin: Vec3::new(-boule_spacing, -boule_spacing, 100.0),
                    inverse_mass: 0.85,
                    elasticity: 0.2,
                    friction: 0.65,
                    velocity: InitialVelocity::Fixed(Vec3::new(5.0, 5.0, 0.0)),
                },
                BodyGroup {
                    name: "floor".to_string(),
                    radius: floor_radius,
                    columns: 5,
                    rows: 5,
                    spacing: floor_spacing,
                    origin: Vec3::new(-floor_spacing, -floor_spacing, -floor_radius),
                    inverse_mass: 0.0,
                    elasticity: 0.99,
                    friction: 0.5,
                    velocity: InitialVelocity::Fixed(Vec3::zeros()),
                },
            ],
        }
    }

    /// Total number of bodies the layout creates
    pub fn body_count(&self) -> usize {
        self.groups.iter().map(BodyGroup::count).sum()
    }

    /// Append every group's bodies to `out`, in group order
    pub fn spawn(&self, rng: &mut impl Rng, out: &mut Vec<Body>) -> Result<(), PhysicsError> {
        out.reserve(self.body_count());
        for group in &self.groups {
            group.spawn(rng, out)?;
        }
        Ok(())
    }
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self::petanque()
    }
}

/// Starting velocity of the bodies in a group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InitialVelocity {
    /// Same velocity for every body
    Fixed(Vec3),
    /// Horizontal velocity with X and Y drawn uniformly from `[-range, range)`
    /// and floored to a multiple of `quantum` (no rounding when `quantum` is 0)
    RandomPlanar {
        /// Largest magnitude per axis
        range: f32,
        /// Step the components are floored to
        quantum: f32,
    },
}

impl InitialVelocity {
    /// Produce a velocity, drawing from `rng` when randomized
    pub fn sample(&self, rng: &mut impl Rng) -> Vec3 {
        match *self {
            Self::Fixed(velocity) => velocity,
            Self::RandomPlanar { range, quantum } => {
                let mut component = || {
                    let value = if range > 0.0 {
                        rng.gen_range(-range..range)
                    } else {
                        0.0
                    };
                    if quantum > 0.0 {
                        (value / quantum).floor() * quantum
                    } else {
                        value
                    }
                };
                let x = component();
                let y = component();
                Vec3::new(x, y, 0.0)
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Fixed(velocity) if !is_finite_vec(&velocity) => {
                Err(format!("velocity must be finite, got {velocity:?}"))
            }
            Self::RandomPlanar { range, quantum }
                if !range.is_finite() || range < 0.0 || !quantum.is_finite() || quantum < 0.0 =>
            {
                Err(format!(
                    "random velocity needs finite range and quantum >= 0, got {range} / {quantum}"
                ))
            }
            _ => Ok(()),
        }
    }
}

/// A grid of identical spheres
///
/// Cell `(i, j)` sits at `origin + (i * spacing, j * spacing, 0)`. Bodies are
/// created column by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyGroup {
    /// Label used in logs and errors
    pub name: String,
    /// Sphere radius
    pub radius: f32,
    /// Cells along X
    pub columns: u32,
    /// Cells along Y
    pub rows: u32,
    /// Distance between neighbouring cells
    pub spacing: f32,
    /// Position of cell `(0, 0)`
    pub origin: Vec3,
    /// Inverse mass of each body; 0 for static
    pub inverse_mass: f32,
    /// Restitution of each body
    pub elasticity: f32,
    /// Friction of each body
    pub friction: f32,
    /// Starting velocity
    pub velocity: InitialVelocity,
}

impl BodyGroup {
    /// Number of bodies in the group
    pub fn count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Check the group without creating bodies
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let wrap = |source: PhysicsError| PhysicsError::InvalidGroup {
            group: self.name.clone(),
            source: Box::new(source),
        };

        if !self.spacing.is_finite() || !is_finite_vec(&self.origin) {
            return Err(wrap(PhysicsError::NonFiniteState("grid placement")));
        }
        self.velocity
            .validate()
            .map_err(|reason| wrap(PhysicsError::InvalidConfig(reason)))?;
        self.template(Vec3::zeros(), Vec3::zeros())
            .validate()
            .map_err(wrap)
    }

    /// Append the group's bodies to `out`
    pub fn spawn(&self, rng: &mut impl Rng, out: &mut Vec<Body>) -> Result<(), PhysicsError> {
        self.validate()?;

        for i in 0..self.columns {
            for j in 0..self.rows {
                let offset = Vec3::new(i as f32, j as f32, 0.0) * self.spacing;
                let velocity = self.velocity.sample(rng);
                out.push(self.template(self.origin + offset, velocity));
            }
        }

        log::debug!("Spawned {} bodies for group '{}'", self.count(), self.name);
        Ok(())
    }

    fn template(&self, position: Vec3, velocity: Vec3) -> Body {
        Body::new(Shape::sphere(self.radius))
            .with_position(position)
            .with_linear_velocity(velocity)
            .with_inverse_mass(self.inverse_mass)
            .with_elasticity(self.elasticity)
            .with_friction(self.friction)
    }
}
