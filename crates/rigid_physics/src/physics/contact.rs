//! Contacts and impulse-based collision response
//!
//! A [`Contact`] is produced by the narrow phase and consumed in the same
//! frame. [`resolve_contact`] turns it into velocity changes on the two
//! bodies: a normal impulse with restitution, a Coulomb-clamped friction
//! impulse, and a positional push that removes leftover overlap.
//!
//! Combined coefficients are the product of the two bodies' values, so a
//! perfectly elastic pair needs both elasticities at 1 and a frictionless
//! body makes every contact it takes part in frictionless.

use std::cmp::Ordering;

use crate::foundation::math::constants::EPSILON;
use crate::foundation::math::Vec3;
use crate::physics::body::Body;

/// Point of first touch between two bodies within a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the first body
    pub a: usize,
    /// Index of the second body
    pub b: usize,
    /// Contact point on A's surface, world space, at the time of impact
    pub world_point_a: Vec3,
    /// Contact point on B's surface, world space, at the time of impact
    pub world_point_b: Vec3,
    /// Contact point on A relative to A's center of mass, body space
    pub local_point_a: Vec3,
    /// Contact point on B relative to B's center of mass, body space
    pub local_point_b: Vec3,
    /// Unit normal pointing from A toward B
    pub normal: Vec3,
    /// Signed distance between the surfaces at the time of impact (negative when overlapping)
    pub separation_distance: f32,
    /// Seconds from the start of the frame until the bodies touch
    pub time_of_impact: f32,
}

impl Contact {
    /// Ordering used to resolve contacts: earliest time of impact first, then
    /// ascending `(a, b)` for contacts that happen at the same instant
    pub fn chronological(&self, other: &Self) -> Ordering {
        self.time_of_impact
            .total_cmp(&other.time_of_impact)
            .then(self.a.cmp(&other.a))
            .then(self.b.cmp(&other.b))
    }
}

/// What [`resolve_contact`] did with a contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Impulses were applied
    Resolved {
        /// Magnitude of the normal impulse
        normal_impulse: f32,
        /// Magnitude of the friction impulse
        friction_impulse: f32,
    },
    /// The bodies were already moving apart; only overlap was corrected
    Separating,
    /// Both bodies have infinite mass
    Immovable,
    /// Effective mass along the normal was zero
    Degenerate,
}

/// Restitution used for a pair of bodies
pub fn combined_elasticity(body_a: &Body, body_b: &Body) -> f32 {
    body_a.elasticity * body_b.elasticity
}

/// Friction used for a pair of bodies
pub fn combined_friction(body_a: &Body, body_b: &Body) -> f32 {
    body_a.friction * body_b.friction
}

/// `numerator / effective_mass`, or `None` when the effective mass is zero,
/// negative or not finite
///
/// Very heavy pairs give tiny but valid denominators.
fn impulse_magnitude(numerator: f32, effective_mass: f32) -> Option<f32> {
    if !(effective_mass > 0.0 && effective_mass.is_finite()) {
        return None;
    }
    let magnitude = numerator / effective_mass;
    magnitude.is_finite().then_some(magnitude)
}

/// Apply collision response for `contact` to its two bodies
///
/// The bodies must already be at the contact's time of impact. When
/// `positional_correction` is set, overlap along the normal is removed by
/// moving each body in proportion to its inverse mass.
pub fn resolve_contact(
    contact: &Contact,
    body_a: &mut Body,
    body_b: &mut Body,
    positional_correction: bool,
) -> Resolution {
    let total_inverse_mass = body_a.inverse_mass + body_b.inverse_mass;
    if total_inverse_mass <= 0.0 {
        return Resolution::Immovable;
    }

    let normal = contact.normal;
    let point_a = body_a.local_to_world(&contact.local_point_a);
    let point_b = body_b.local_to_world(&contact.local_point_b);

    let inverse_inertia_a = body_a.inverse_inertia_tensor_world();
    let inverse_inertia_b = body_b.inverse_inertia_tensor_world();
    let ra = point_a - body_a.center_of_mass_world();
    let rb = point_b - body_b.center_of_mass_world();

    let velocity_ab = body_a.point_velocity(&point_a) - body_b.point_velocity(&point_b);
    let closing_speed = velocity_ab.dot(&normal);

    let resolution = if closing_speed > 0.0 {
        let angular_a = (inverse_inertia_a * ra.cross(&normal)).cross(&ra);
        let angular_b = (inverse_inertia_b * rb.cross(&normal)).cross(&rb);
        let effective_mass = total_inverse_mass + (angular_a + angular_b).dot(&normal);

        let elasticity = combined_elasticity(body_a, body_b);
        if let Some(normal_impulse) =
            impulse_magnitude((1.0 + elasticity) * closing_speed, effective_mass)
        {
            let impulse = normal * normal_impulse;
            body_a.apply_impulse(&point_a, &-impulse);
            body_b.apply_impulse(&point_b, &impulse);

            // friction opposes the tangential part of the pre-impact velocity
            let friction = combined_friction(body_a, body_b);
            let velocity_tangent = velocity_ab - normal * closing_speed;
            let tangent_speed = velocity_tangent.norm();
            let mut friction_impulse = 0.0;

            if friction > 0.0 && tangent_speed > EPSILON {
                let tangent = velocity_tangent / tangent_speed;
                let inertia_a = (inverse_inertia_a * ra.cross(&tangent)).cross(&ra);
                let inertia_b = (inverse_inertia_b * rb.cross(&tangent)).cross(&rb);
                let effective_tangent_mass = total_inverse_mass + (inertia_a + inertia_b).dot(&tangent);

                if let Some(magnitude) = impulse_magnitude(friction * tangent_speed, effective_tangent_mass) {
                    // Coulomb: |J_t| <= mu * J_n
                    friction_impulse = magnitude.min(friction * normal_impulse);
                    let impulse_friction = tangent * friction_impulse;
                    body_a.apply_impulse(&point_a, &-impulse_friction);
                    body_b.apply_impulse(&point_b, &impulse_friction);
                }
            }

            Resolution::Resolved {
                normal_impulse,
                friction_impulse,
            }
        } else {
            log::warn!(
                "Skipping contact {}-{}: no usable effective mass along normal ({effective_mass})",
                contact.a,
                contact.b
            );
            Resolution::Degenerate
        }
    } else {
        Resolution::Separating
    };

    if positional_correction {
        // positive when A's surface point lies past B's along the normal
        let penetration = (point_a - point_b).dot(&normal);
        if penetration > 0.0 {
            let correction = normal * penetration;
            body_a.position -= correction * (body_a.inverse_mass / total_inverse_mass);
            body_b.position += correction * (body_b.inverse_mass / total_inverse_mass);
        }
    }

    resolution
}
