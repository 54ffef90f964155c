//! Math utilities and types
//!
//! Provides the vector, matrix and quaternion types used by the simulation.
//! All of them are thin aliases over nalgebra so the physics code reads the
//! same as the rest of the engine.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations (always unit length)
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Squared lengths below this are treated as zero
    pub const EPSILON_SQ: f32 = 1.0e-12;

    /// General purpose comparison tolerance
    pub const EPSILON: f32 = 1.0e-6;
}

/// Rotation produced by angular velocity `omega` acting for `dt` seconds.
///
/// `omega * dt` is taken as a rotation vector: its direction is the axis and
/// its length the angle. Zero angular velocity gives the identity.
pub fn rotation_delta(omega: &Vec3, dt: f32) -> Quat {
    Quat::from_scaled_axis(omega * dt)
}

/// Rotate `orientation` by the angular velocity `omega` applied for `dt` seconds.
///
/// The update is exact for constant `omega`. The result is renormalized so
/// drift never accumulates across frames.
pub fn integrate_orientation(orientation: &Quat, omega: &Vec3, dt: f32) -> Quat {
    let delta = rotation_delta(omega, dt);
    Quat::new_normalize((delta * orientation).into_inner())
}

/// Rotate a body-space 3x3 tensor into world space for the given orientation
pub fn rotate_tensor(orientation: &Quat, tensor: &Mat3) -> Mat3 {
    let rotation = orientation.to_rotation_matrix().into_inner();
    rotation * tensor * rotation.transpose()
}

/// Build a model matrix from a translation and rotation
pub fn model_matrix(position: &Vec3, orientation: &Quat) -> Mat4 {
    Mat4::new_translation(position) * orientation.to_homogeneous()
}

/// Returns true when every component is finite
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_integrate_orientation_zero_velocity() {
        let q = Quat::from_axis_angle(&Vec3::y_axis(), 0.3);
        let out = integrate_orientation(&q, &Vec3::zeros(), 1.0);
        assert_relative_eq!(out, q, epsilon = 1e-6);
    }

    #[test]
    fn test_integrate_orientation_quarter_turn() {
        // pi/2 rad/s about Z for one second rotates X onto Y
        let omega = Vec3::new(0.0, 0.0, PI * 0.5);
        let out = integrate_orientation(&Quat::identity(), &omega, 1.0);
        let rotated = out * Vec3::x();
        assert_relative_eq!(rotated, Vec3::y(), epsilon = 1e-5);
    }

    #[test]
    fn test_integrate_orientation_stays_unit() {
        let mut q = Quat::identity();
        let omega = Vec3::new(3.0, -7.0, 11.0);
        for _ in 0..10_000 {
            q = integrate_orientation(&q, &omega, 0.016);
        }
        assert_relative_eq!(q.into_inner().norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_tensor_identity_is_invariant() {
        let tensor = Mat3::identity() * 0.4;
        let q = Quat::from_axis_angle(&Vec3::x_axis(), 1.2);
        assert_relative_eq!(rotate_tensor(&q, &tensor), tensor, epsilon = 1e-6);
    }

    #[test]
    fn test_model_matrix_translation_column() {
        let m = model_matrix(&Vec3::new(1.0, 2.0, 3.0), &Quat::identity());
        assert_relative_eq!(m[(0, 3)], 1.0);
        assert_relative_eq!(m[(1, 3)], 2.0);
        assert_relative_eq!(m[(2, 3)], 3.0);
    }
}
