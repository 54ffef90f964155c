//! Narrow-phase intersection tests
//!
//! Tests are continuous: bodies are treated as moving with their current
//! linear velocity for the whole frame, and the first instant they touch is
//! reported. A small fast ball therefore cannot tunnel through a thin target
//! between two frames.

use crate::foundation::math::constants::EPSILON_SQ;
use crate::foundation::math::Vec3;
use crate::physics::body::Body;
use crate::physics::contact::Contact;
use crate::physics::shape::Shape;

/// Normal used when two centers coincide and no direction can be derived
pub const FALLBACK_NORMAL: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Find the first time within `[0, dt]` at which two bodies touch
///
/// Returns `None` when they stay apart for the whole frame. Bodies that
/// already overlap at the start of the frame touch at time zero.
pub fn intersect(a: usize, body_a: &Body, b: usize, body_b: &Body, dt: f32) -> Option<Contact> {
    match (&body_a.shape, &body_b.shape) {
        (Shape::Sphere { radius: radius_a }, Shape::Sphere { radius: radius_b }) => {
            let time_of_impact = sphere_sphere_time_of_impact(
                &body_a.center_of_mass_world(),
                &body_a.linear_velocity,
                *radius_a,
                &body_b.center_of_mass_world(),
                &body_b.linear_velocity,
                *radius_b,
                dt,
            )?;
            Some(sphere_sphere_contact(a, body_a, *radius_a, b, body_b, *radius_b, time_of_impact))
        }
    }
}

/// Earliest `t` in `[0, dt]` with `|dp + dv * t| <= ra + rb`
///
/// `dp` and `dv` are B's position and velocity relative to A.
pub fn sphere_sphere_time_of_impact(
    position_a: &Vec3,
    velocity_a: &Vec3,
    radius_a: f32,
    position_b: &Vec3,
    velocity_b: &Vec3,
    radius_b: f32,
    dt: f32,
) -> Option<f32> {
    let relative_position = position_b - position_a;
    let relative_velocity = velocity_b - velocity_a;
    let radius_sum = radius_a + radius_b;

    // |dp + dv t|^2 - R^2 = a t^2 + 2 h t + c
    let c = relative_position.norm_squared() - radius_sum * radius_sum;
    if c <= 0.0 {
        return Some(0.0);
    }

    let a = relative_velocity.norm_squared();
    if a < EPSILON_SQ {
        return None;
    }

    let h = relative_position.dot(&relative_velocity);
    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    // c > 0 puts both roots on the same side of zero; the first is the entry
    let t0 = (-h - discriminant.sqrt()) / a;
    if !t0.is_finite() || t0 < 0.0 || t0 > dt {
        return None;
    }
    Some(t0)
}

fn sphere_sphere_contact(
    a: usize,
    body_a: &Body,
    radius_a: f32,
    b: usize,
    body_b: &Body,
    radius_b: f32,
    time_of_impact: f32,
) -> Contact {
    // move copies forward so the local points match the pose at impact
    let mut at_impact_a = body_a.clone();
    let mut at_impact_b = body_b.clone();
    at_impact_a.update(time_of_impact);
    at_impact_b.update(time_of_impact);

    let center_a = at_impact_a.center_of_mass_world();
    let center_b = at_impact_b.center_of_mass_world();
    let offset = center_b - center_a;
    let distance_sq = offset.norm_squared();

    let (normal, distance) = if distance_sq > EPSILON_SQ {
        let distance = distance_sq.sqrt();
        (offset / distance, distance)
    } else {
        (FALLBACK_NORMAL, 0.0)
    };

    let world_point_a = center_a + normal * radius_a;
    let world_point_b = center_b - normal * radius_b;

    Contact {
        a,
        b,
        world_point_a,
        world_point_b,
        local_point_a: at_impact_a.world_to_local(&world_point_a),
        local_point_b: at_impact_b.world_to_local(&world_point_b),
        normal,
        separation_distance: distance - (radius_a + radius_b),
        time_of_impact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sphere(position: Vec3, velocity: Vec3, radius: f32) -> Body {
        Body::new(Shape::sphere(radius))
            .with_position(position)
            .with_linear_velocity(velocity)
    }

    #[test]
    fn test_falling_ball_hits_floor_sphere() {
        let floor = sphere(Vec3::new(0.0, 0.0, -80.0), Vec3::zeros(), 80.0).with_inverse_mass(0.0);
        let ball = sphere(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -20.0), 1.0);

        let contact = intersect(0, &floor, 1, &ball, 1.0).expect("ball should reach the floor");

        // surfaces are 9 apart, closing at 20/s
        assert!(contact.time_of_impact < 1.0);
        assert_relative_eq!(contact.time_of_impact, 0.45, epsilon = 1e-4);
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
        assert_relative_eq!(contact.world_point_a, Vec3::zeros(), epsilon = 1e-3);
        assert_relative_eq!(contact.world_point_b, Vec3::zeros(), epsilon = 1e-3);
        assert_abs_diff_eq!(contact.separation_distance, 0.0, epsilon = 1e-3);
        assert_eq!((contact.a, contact.b), (0, 1));
    }

    #[test]
    fn test_normal_points_from_a_to_b() {
        let floor = sphere(Vec3::new(0.0, 0.0, -80.0), Vec3::zeros(), 80.0).with_inverse_mass(0.0);
        let ball = sphere(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -20.0), 1.0);

        let contact = intersect(0, &ball, 1, &floor, 1.0).unwrap();
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_fast_ball_does_not_tunnel() {
        // a thin target the ball would jump over with a discrete end-of-frame test
        let target = sphere(Vec3::zeros(), Vec3::zeros(), 0.05);
        let bullet = sphere(Vec3::new(-10.0, 0.0, 0.0), Vec3::new(1000.0, 0.0, 0.0), 0.05);

        let contact = intersect(0, &bullet, 1, &target, 1.0 / 60.0).expect("swept test must hit");
        assert_relative_eq!(contact.time_of_impact, 9.9 / 1000.0, epsilon = 1e-5);
    }

    #[test]
    fn test_miss_outside_frame() {
        let a = sphere(Vec3::zeros(), Vec3::zeros(), 1.0);
        let b = sphere(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), 1.0);
        // touches at t = 8
        assert!(intersect(0, &a, 1, &b, 1.0).is_none());
        assert!(intersect(0, &a, 1, &b, 8.5).is_some());
    }

    #[test]
    fn test_receding_and_parallel_motion_miss() {
        let a = sphere(Vec3::zeros(), Vec3::zeros(), 1.0);
        let receding = sphere(Vec3::new(3.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), 1.0);
        let passing = sphere(Vec3::new(-5.0, 3.0, 0.0), Vec3::new(10.0, 0.0, 0.0), 1.0);
        let resting = sphere(Vec3::new(2.5, 0.0, 0.0), Vec3::zeros(), 1.0);

        assert!(intersect(0, &a, 1, &receding, 1.0).is_none());
        assert!(intersect(0, &a, 1, &passing, 1.0).is_none());
        assert!(intersect(0, &a, 1, &resting, 1.0).is_none());
    }

    #[test]
    fn test_initial_overlap_reports_time_zero() {
        let a = sphere(Vec3::zeros(), Vec3::zeros(), 1.0);
        let b = sphere(Vec3::new(1.5, 0.0, 0.0), Vec3::zeros(), 1.0);

        let contact = intersect(0, &a, 1, &b, 1.0).unwrap();
        assert_eq!(contact.time_of_impact, 0.0);
        assert_relative_eq!(contact.normal, Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(contact.separation_distance, -0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_coincident_centers_use_fallback_normal() {
        let a = sphere(Vec3::new(1.0, 1.0, 1.0), Vec3::zeros(), 1.0);
        let b = sphere(Vec3::new(1.0, 1.0, 1.0), Vec3::zeros(), 0.5);

        let contact = intersect(0, &a, 1, &b, 1.0).unwrap();
        assert_eq!(contact.normal, FALLBACK_NORMAL);
        assert!(contact.normal.iter().all(|c| c.is_finite()));
        assert!(contact.world_point_a.iter().all(|c| c.is_finite()));
        assert_relative_eq!(contact.separation_distance, -1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_local_points_follow_rotation() {
        let spinning = sphere(Vec3::zeros(), Vec3::zeros(), 1.0)
            .with_orientation(Quat::from_axis_angle(&Vec3::z_axis(), 0.3))
            .with_angular_velocity(Vec3::new(0.0, 0.0, 2.0));
        let incoming = sphere(Vec3::new(4.0, 0.0, 0.0), Vec3::new(-4.0, 0.0, 0.0), 1.0);

        let contact = intersect(0, &spinning, 1, &incoming, 1.0).unwrap();
        assert_relative_eq!(contact.time_of_impact, 0.5, epsilon = 1e-5);

        // advance the body to the impact time and the local point lands on the world point
        let mut at_impact = spinning.clone();
        at_impact.update(contact.time_of_impact);
        assert_relative_eq!(
            at_impact.local_to_world(&contact.local_point_a),
            contact.world_point_a,
            epsilon = 1e-5
        );
    }
}
