//! Simulation driver
//!
//! A [`Scene`] owns every body and advances them one frame at a time:
//! gravity, broad phase, narrow phase, contacts sorted by time of impact,
//! then each contact is resolved after moving the whole scene up to its
//! instant. Whatever time is left in the frame is free motion.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::foundation::math::{model_matrix, Mat4, Quat, Vec3};
use crate::physics::body::Body;
use crate::physics::broadphase::{Broadphase, CollisionPair};
use crate::physics::contact::{resolve_contact, Contact, Resolution};
use crate::physics::error::PhysicsError;
use crate::physics::intersections::intersect;
use crate::physics::settings::PhysicsSettings;
use crate::physics::shape::Shape;

/// Stable index of a body in its scene
///
/// Handles stay valid until the scene is cleared or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub usize);

/// Read-only pose of a body for presentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    /// Which body
    pub handle: BodyHandle,
    /// World position
    pub position: Vec3,
    /// World orientation
    pub orientation: Quat,
    /// Collision shape
    pub shape: Shape,
}

impl BodyTransform {
    /// Sphere radius
    pub fn radius(&self) -> f32 {
        self.shape.radius()
    }

    /// Model matrix for a unit sphere mesh: translation, rotation, uniform scale by radius
    pub fn to_matrix(&self) -> Mat4 {
        model_matrix(&self.position, &self.orientation) * Mat4::new_scaling(self.radius())
    }
}

/// Counters from the most recent [`Scene::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Pairs reported by the broad phase
    pub candidate_pairs: usize,
    /// Contacts found by the narrow phase
    pub contacts: usize,
    /// Contacts that received an impulse
    pub resolved: usize,
    /// Contacts whose bodies were already moving apart
    pub separating: usize,
    /// Contacts skipped as immovable or degenerate
    pub skipped: usize,
}

/// Owns the bodies and steps the simulation
#[derive(Debug)]
pub struct Scene {
    bodies: Vec<Body>,
    settings: PhysicsSettings,
    broadphase: Broadphase,
    rng: StdRng,
    // scratch reused across frames
    pairs: Vec<CollisionPair>,
    contacts: Vec<Contact>,
    stats: FrameStats,
    frame: u64,
}

impl Scene {
    /// Create an empty scene
    ///
    /// Call [`initialize`](Self::initialize) to spawn the configured layout.
    pub fn new(settings: PhysicsSettings) -> Result<Self, PhysicsError> {
        settings
            .validate()
            .map_err(|err| PhysicsError::InvalidConfig(err.to_string()))?;

        let broadphase = Broadphase::new(settings.broadphase, settings.sweep_margin);
        log::debug!(
            "Scene created: {:?} broadphase, gravity {:?}",
            broadphase.method(),
            settings.gravity
        );

        Ok(Self {
            bodies: Vec::new(),
            broadphase,
            rng: Self::make_rng(settings.rng_seed),
            settings,
            pairs: Vec::new(),
            contacts: Vec::new(),
            stats: FrameStats::default(),
            frame: 0,
        })
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Spawn the bodies of the configured layout, after any already present
    pub fn initialize(&mut self) -> Result<(), PhysicsError> {
        let layout = &self.settings.layout;
        let before = self.bodies.len();
        layout.spawn(&mut self.rng, &mut self.bodies)?;

        log::info!(
            "Scene initialized: {} bodies in {} groups",
            self.bodies.len() - before,
            layout.groups.len()
        );
        Ok(())
    }

    /// Drop every body and spawn the layout again
    ///
    /// With a fixed seed the new bodies match a freshly created scene.
    pub fn reset(&mut self) -> Result<(), PhysicsError> {
        log::info!("Scene reset after {} frames", self.frame);
        self.clear();
        if let Some(seed) = self.settings.rng_seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.initialize()
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.pairs.clear();
        self.contacts.clear();
        self.stats = FrameStats::default();
        self.frame = 0;
    }

    /// Insert a body after validating it
    pub fn add_body(&mut self, body: Body) -> Result<BodyHandle, PhysicsError> {
        body.validate()?;
        self.bodies.push(body);
        Ok(BodyHandle(self.bodies.len() - 1))
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// A non-finite or non-positive `dt` leaves the scene untouched.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("Ignoring scene update with dt = {dt}");
            return;
        }
        self.frame += 1;

        // gravity as an impulse: I = m * g * dt
        let gravity = self.settings.gravity;
        for body in &mut self.bodies {
            if let Some(mass) = body.mass() {
                body.apply_impulse_linear(&(gravity * mass * dt));
            }
        }

        self.broadphase.find_pairs(&self.bodies, dt, &mut self.pairs);

        self.contacts.clear();
        for pair in &self.pairs {
            let body_a = &self.bodies[pair.a];
            let body_b = &self.bodies[pair.b];
            if body_a.has_infinite_mass() && body_b.has_infinite_mass() {
                continue;
            }
            if let Some(contact) = intersect(pair.a, body_a, pair.b, body_b, dt) {
                self.contacts.push(contact);
            }
        }

        self.contacts.sort_by(Contact::chronological);

        let mut stats = FrameStats {
            frame: self.frame,
            candidate_pairs: self.pairs.len(),
            contacts: self.contacts.len(),
            ..FrameStats::default()
        };

        let mut accumulated_time = 0.0;
        for contact in &self.contacts {
            // bring every body to the instant of this contact
            let step = contact.time_of_impact - accumulated_time;
            for body in &mut self.bodies {
                body.update(step);
            }
            accumulated_time = contact.time_of_impact;

            let Some((body_a, body_b)) = body_pair_mut(&mut self.bodies, contact.a, contact.b) else {
                stats.skipped += 1;
                continue;
            };
            let resolution =
                resolve_contact(contact, body_a, body_b, self.settings.positional_correction);
            log::trace!(
                "Contact {}-{} at t={:.5}: {:?}",
                contact.a,
                contact.b,
                contact.time_of_impact,
                resolution
            );

            match resolution {
                Resolution::Resolved { .. } => stats.resolved += 1,
                Resolution::Separating => stats.separating += 1,
                Resolution::Immovable | Resolution::Degenerate => stats.skipped += 1,
            }
        }

        let time_remaining = dt - accumulated_time;
        if time_remaining > 0.0 {
            for body in &mut self.bodies {
                body.update(time_remaining);
            }
        }

        log::debug!(
            "Frame {}: {} pairs, {} contacts, {} resolved, {} separating, {} skipped",
            stats.frame,
            stats.candidate_pairs,
            stats.contacts,
            stats.resolved,
            stats.separating,
            stats.skipped
        );
        self.stats = stats;
    }

    /// All bodies in insertion order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Look up one body
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0)
    }

    /// Snapshot of every body's pose, in insertion order
    pub fn body_transforms(&self) -> impl Iterator<Item = BodyTransform> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .map(|(index, body)| BodyTransform {
                handle: BodyHandle(index),
                position: body.position,
                orientation: body.orientation,
                shape: body.shape,
            })
    }

    /// Contacts of the last frame, in the order they were resolved
    pub fn last_contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Counters from the last frame
    pub fn last_frame_stats(&self) -> FrameStats {
        self.stats
    }

    /// Frames stepped since creation or the last reset
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Settings the scene was built with
    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True when the scene has no bodies
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// Two distinct bodies borrowed mutably at once
fn body_pair_mut(bodies: &mut [Body], a: usize, b: usize) -> Option<(&mut Body, &mut Body)> {
    if a == b || a.max(b) >= bodies.len() {
        return None;
    }
    if a < b {
        let (head, tail) = bodies.split_at_mut(b);
        Some((&mut head[a], &mut tail[0]))
    } else {
        let (head, tail) = bodies.split_at_mut(a);
        Some((&mut tail[0], &mut head[b]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn empty_scene() -> Scene {
        Scene::new(PhysicsSettings::empty()).unwrap()
    }

    #[test]
    fn test_add_body_validates() {
        let mut scene = empty_scene();
        let handle = scene.add_body(Body::new(Shape::sphere(1.0))).unwrap();
        assert_eq!(handle, BodyHandle(0));

        let err = scene
            .add_body(Body::new(Shape::sphere(1.0)).with_inverse_mass(-1.0))
            .unwrap_err();
        assert_eq!(err, PhysicsError::InvalidInverseMass(-1.0));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = PhysicsSettings::empty();
        settings.sweep_margin = f32::NAN;
        assert!(matches!(Scene::new(settings), Err(PhysicsError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut scene = empty_scene();
        let handle = scene
            .add_body(Body::new(Shape::sphere(1.0)).with_linear_velocity(Vec3::x()))
            .unwrap();

        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            scene.update(dt);
        }
        assert_eq!(scene.frame_count(), 0);
        assert_eq!(scene.body(handle).unwrap().position, Vec3::zeros());
    }

    #[test]
    fn test_gravity_skips_static_bodies() {
        let mut scene = empty_scene();
        let falling = scene.add_body(Body::new(Shape::sphere(1.0)).with_inverse_mass(0.5)).unwrap();
        let fixed = scene
            .add_body(
                Body::new(Shape::sphere(1.0))
                    .with_position(Vec3::new(10.0, 0.0, 0.0))
                    .with_inverse_mass(0.0),
            )
            .unwrap();

        scene.update(0.5);

        // velocity change is independent of mass
        let body = scene.body(falling).unwrap();
        assert_relative_eq!(body.linear_velocity, Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
        assert_relative_eq!(body.position, Vec3::new(0.0, 0.0, -2.5), epsilon = 1e-5);
        assert_eq!(scene.body(fixed).unwrap().linear_velocity, Vec3::zeros());
        assert_eq!(scene.last_frame_stats().frame, 1);
    }

    #[test]
    fn test_transforms_expose_pose_and_radius() {
        let mut scene = empty_scene();
        let orientation = Quat::from_axis_angle(&Vec3::y_axis(), 0.4);
        scene
            .add_body(
                Body::new(Shape::sphere(2.0))
                    .with_position(Vec3::new(1.0, 2.0, 3.0))
                    .with_orientation(orientation),
            )
            .unwrap();

        let transforms: Vec<_> = scene.body_transforms().collect();
        assert_eq!(transforms.len(), 1);
        let transform = transforms[0];
        assert_eq!(transform.handle, BodyHandle(0));
        assert_relative_eq!(transform.radius(), 2.0);

        let matrix = transform.to_matrix();
        let top = matrix.transform_point(&nalgebra::Point3::new(0.0, 0.0, 1.0));
        let expected = Vec3::new(1.0, 2.0, 3.0) + orientation * Vec3::new(0.0, 0.0, 2.0);
        assert_relative_eq!(top.coords, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_body_pair_mut_either_order() {
        let mut bodies = vec![
            Body::new(Shape::sphere(1.0)),
            Body::new(Shape::sphere(2.0)),
            Body::new(Shape::sphere(3.0)),
        ];

        let (a, b) = body_pair_mut(&mut bodies, 2, 0).unwrap();
        assert_relative_eq!(a.shape.radius(), 3.0);
        assert_relative_eq!(b.shape.radius(), 1.0);

        assert!(body_pair_mut(&mut bodies, 1, 1).is_none());
        assert!(body_pair_mut(&mut bodies, 0, 3).is_none());
    }

    #[test]
    fn test_clear_and_reset() {
        let mut settings = PhysicsSettings::default();
        settings.rng_seed = Some(11);
        let mut scene = Scene::new(settings).unwrap();
        scene.initialize().unwrap();
        let fresh: Vec<Body> = scene.bodies().to_vec();

        scene.update(1.0 / 60.0);
        assert_eq!(scene.frame_count(), 1);

        scene.reset().unwrap();
        assert_eq!(scene.frame_count(), 0);
        assert_eq!(scene.bodies(), fresh.as_slice());

        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.last_frame_stats(), FrameStats::default());
    }
}
