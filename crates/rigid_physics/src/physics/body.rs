//! Rigid bodies
//!
//! A [`Body`] owns its [`Shape`] by value. Mass is stored as an inverse so that
//! `inverse_mass == 0.0` can stand for an immovable body (floors, walls).

use crate::foundation::bounds::AABB;
use crate::foundation::math::{
    integrate_orientation, is_finite_vec, rotate_tensor, rotation_delta, Mat3, Quat, Vec3,
};
use crate::physics::error::PhysicsError;
use crate::physics::shape::Shape;

/// A simulated rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// World-space position of the body origin
    pub position: Vec3,
    /// World-space orientation (unit quaternion)
    pub orientation: Quat,
    /// Linear velocity in units per second
    pub linear_velocity: Vec3,
    /// Angular velocity in radians per second, world space
    pub angular_velocity: Vec3,
    /// 1 / mass; 0 means infinite mass
    pub inverse_mass: f32,
    /// Restitution coefficient in `[0, 1]`
    pub elasticity: f32,
    /// Friction coefficient in `[0, 1]`
    pub friction: f32,
    /// Collision geometry in body space
    pub shape: Shape,
}

impl Body {
    /// Create a unit-mass body at the origin, at rest
    pub fn new(shape: Shape) -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            inverse_mass: 1.0,
            elasticity: 0.5,
            friction: 0.5,
            shape,
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set orientation
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set angular velocity
    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    /// Set inverse mass (0 for immovable)
    pub fn with_inverse_mass(mut self, inverse_mass: f32) -> Self {
        self.inverse_mass = inverse_mass;
        self
    }

    /// Set restitution
    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    /// Set friction
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Check the body's invariants
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.inverse_mass.is_finite() || self.inverse_mass < 0.0 {
            return Err(PhysicsError::InvalidInverseMass(self.inverse_mass));
        }
        for (name, value) in [("elasticity", self.elasticity), ("friction", self.friction)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PhysicsError::CoefficientOutOfRange { name, value });
            }
        }
        self.shape.validate()?;

        if !is_finite_vec(&self.position) {
            return Err(PhysicsError::NonFiniteState("position"));
        }
        if !self.orientation.coords.iter().all(|c| c.is_finite()) {
            return Err(PhysicsError::NonFiniteState("orientation"));
        }
        if !is_finite_vec(&self.linear_velocity) {
            return Err(PhysicsError::NonFiniteState("linear velocity"));
        }
        if !is_finite_vec(&self.angular_velocity) {
            return Err(PhysicsError::NonFiniteState("angular velocity"));
        }
        Ok(())
    }

    /// True for immovable bodies
    pub fn has_infinite_mass(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Mass, or `None` when infinite
    pub fn mass(&self) -> Option<f32> {
        (!self.has_infinite_mass()).then(|| self.inverse_mass.recip())
    }

    /// Center of mass in body space
    pub fn center_of_mass_local(&self) -> Vec3 {
        self.shape.center_of_mass()
    }

    /// Center of mass in world space
    pub fn center_of_mass_world(&self) -> Vec3 {
        self.position + self.orientation * self.center_of_mass_local()
    }

    /// Convert a world-space point into body space (relative to the center of mass)
    pub fn world_to_local(&self, world_point: &Vec3) -> Vec3 {
        self.orientation.inverse() * (world_point - self.center_of_mass_world())
    }

    /// Convert a body-space point (relative to the center of mass) into world space
    pub fn local_to_world(&self, body_point: &Vec3) -> Vec3 {
        self.center_of_mass_world() + self.orientation * body_point
    }

    /// Inverse inertia tensor in body space; zero for infinite mass
    pub fn inverse_inertia_tensor_local(&self) -> Mat3 {
        if self.has_infinite_mass() {
            return Mat3::zeros();
        }
        // (I * m)^-1 == I^-1 * (1/m)
        self.shape
            .inertia_tensor()
            .try_inverse()
            .map_or_else(Mat3::zeros, |inverse| inverse * self.inverse_mass)
    }

    /// Inverse inertia tensor rotated into world space
    pub fn inverse_inertia_tensor_world(&self) -> Mat3 {
        rotate_tensor(&self.orientation, &self.inverse_inertia_tensor_local())
    }

    /// Change linear velocity by `impulse * inverse_mass`
    pub fn apply_impulse_linear(&mut self, impulse: &Vec3) {
        if self.has_infinite_mass() {
            return;
        }
        self.linear_velocity += impulse * self.inverse_mass;
    }

    /// Change angular velocity by a world-space angular impulse
    pub fn apply_impulse_angular(&mut self, impulse: &Vec3) {
        if self.has_infinite_mass() {
            return;
        }
        self.angular_velocity += self.inverse_inertia_tensor_world() * impulse;
    }

    /// Apply `impulse` at world-space `point`, splitting it into linear and angular parts
    pub fn apply_impulse(&mut self, point: &Vec3, impulse: &Vec3) {
        if self.has_infinite_mass() {
            return;
        }
        self.apply_impulse_linear(impulse);

        let lever = point - self.center_of_mass_world();
        self.apply_impulse_angular(&lever.cross(impulse));
    }

    /// Velocity of the material point at world-space `point`
    pub fn point_velocity(&self, point: &Vec3) -> Vec3 {
        let lever = point - self.center_of_mass_world();
        self.linear_velocity + self.angular_velocity.cross(&lever)
    }

    /// Advance position and orientation by `dt` seconds of free motion
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() {
            return;
        }

        self.position += self.linear_velocity * dt;

        // rotate about the center of mass, not the body origin
        let center_of_mass = self.center_of_mass_world();
        let com_to_position = self.position - center_of_mass;

        if !self.has_infinite_mass() {
            // torque-free precession: I * dw/dt = -(w x I*w); zero for spheres
            let inertia = rotate_tensor(&self.orientation, &self.shape.inertia_tensor());
            if let Some(inverse) = inertia.try_inverse() {
                let alpha = -(inverse * self.angular_velocity.cross(&(inertia * self.angular_velocity)));
                self.angular_velocity += alpha * dt;
            }
        }

        let delta = rotation_delta(&self.angular_velocity, dt);
        self.orientation = integrate_orientation(&self.orientation, &self.angular_velocity, dt);
        self.position = center_of_mass + delta * com_to_position;
    }

    /// World-space bounds at the current pose
    pub fn bounds(&self) -> AABB {
        self.shape.bounds(&self.position, &self.orientation)
    }

    /// Bounds covering the body over the next `dt` seconds of linear motion,
    /// padded by `margin`
    pub fn swept_bounds(&self, dt: f32, margin: f32) -> AABB {
        let mut bounds = self.bounds();
        let end = self.position + self.linear_velocity * dt;
        bounds.expand_by_bounds(&self.shape.bounds(&end, &self.orientation));
        bounds.inflate(margin);
        bounds
    }
}
