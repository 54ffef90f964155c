//! Axis-aligned bounding boxes
//!
//! Used by the broadphase to describe the volume a body sweeps during a frame.

use crate::foundation::math::Vec3;

/// Axis-Aligned Bounding Box for spatial queries
///
/// A freshly created [`AABB::empty`] box contains nothing; expanding it by a
/// point makes it contain exactly that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Default for AABB {
    fn default() -> Self {
        Self::empty()
    }
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an inverted box that any expansion will overwrite
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::MAX),
            max: Vec3::repeat(-f32::MAX),
        }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// True when no point has been added yet
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow the box so it contains `point`
    pub fn expand_by_point(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Grow the box so it contains `other`
    pub fn expand_by_bounds(&mut self, other: &AABB) {
        if other.is_empty() {
            return;
        }
        self.expand_by_point(other.min);
        self.expand_by_point(other.max);
    }

    /// Pad every face outward by `margin`
    pub fn inflate(&mut self, margin: f32) {
        let pad = Vec3::repeat(margin);
        self.min -= pad;
        self.max += pad;
    }

    /// Check if this AABB intersects another AABB (touching counts)
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Project the box onto a unit axis, returning the `(min, max)` interval
    pub fn project(&self, axis: &Vec3) -> (f32, f32) {
        let center = self.center().dot(axis);
        let extents = self.extents();
        let radius = extents.x * axis.x.abs() + extents.y * axis.y.abs() + extents.z * axis.z.abs();
        (center - radius, center + radius)
    }
}
