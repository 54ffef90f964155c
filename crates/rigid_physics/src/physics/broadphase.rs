//! Broad-phase collision detection
//!
//! Produces every pair of bodies whose bounds, swept over the frame, overlap.
//! This is a conservative filter: it may report pairs that never touch, but a
//! pair that does touch during the frame is always reported.
//!
//! Two strategies are available and they return the same set, ordered by
//! ascending `(a, b)`:
//! - [`BroadphaseMethod::Pairwise`] tests every pair, O(N^2)
//! - [`BroadphaseMethod::SortAndSweep`] sorts the bounds projected onto one
//!   axis and only runs the full box test for overlapping intervals

use serde::{Deserialize, Serialize};

use crate::foundation::bounds::AABB;
use crate::foundation::math::Vec3;
use crate::physics::body::Body;

/// Padding on projected intervals so rounding never hides a touching pair
const PROJECTION_SLOP: f32 = 1.0e-4;

/// Two body indices flagged for a narrow-phase test, always `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Lower body index
    pub a: usize,
    /// Higher body index
    pub b: usize,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller index first)
    pub fn new(a: usize, b: usize) -> Self {
        if a < b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }
}

/// Strategy used to find candidate pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BroadphaseMethod {
    /// Test all pairs
    Pairwise,
    /// Sort-and-sweep along a fixed diagonal axis
    #[default]
    SortAndSweep,
}

#[derive(Debug, Clone, Copy)]
struct SweepEntry {
    index: usize,
    min: f32,
    max: f32,
}

/// Broad-phase pair finder with scratch buffers reused across frames
#[derive(Debug, Clone)]
pub struct Broadphase {
    method: BroadphaseMethod,
    margin: f32,
    axis: Vec3,
    bounds: Vec<AABB>,
    entries: Vec<SweepEntry>,
}

impl Broadphase {
    /// `margin` pads every swept box so bodies that end the frame just apart
    /// are still considered
    pub fn new(method: BroadphaseMethod, margin: f32) -> Self {
        Self {
            method,
            margin: margin.max(0.0),
            axis: Vec3::repeat(1.0).normalize(),
            bounds: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// The configured strategy
    pub fn method(&self) -> BroadphaseMethod {
        self.method
    }

    /// Fill `pairs` with every pair whose swept bounds overlap during `dt`
    ///
    /// `pairs` is cleared first. Output is sorted ascending by `(a, b)`.
    pub fn find_pairs(&mut self, bodies: &[Body], dt: f32, pairs: &mut Vec<CollisionPair>) {
        pairs.clear();
        if bodies.len() < 2 {
            return;
        }

        self.bounds.clear();
        self.bounds
            .extend(bodies.iter().map(|body| body.swept_bounds(dt, self.margin)));

        match self.method {
            BroadphaseMethod::Pairwise => self.pairwise(pairs),
            BroadphaseMethod::SortAndSweep => self.sort_and_sweep(pairs),
        }

        log::trace!(
            "Broadphase ({:?}): {} bodies -> {} pairs",
            self.method,
            bodies.len(),
            pairs.len()
        );
    }

    fn pairwise(&self, pairs: &mut Vec<CollisionPair>) {
        for (i, bounds_a) in self.bounds.iter().enumerate() {
            for (j, bounds_b) in self.bounds.iter().enumerate().skip(i + 1) {
                if bounds_a.intersects(bounds_b) {
                    pairs.push(CollisionPair { a: i, b: j });
                }
            }
        }
    }

    fn sort_and_sweep(&mut self, pairs: &mut Vec<CollisionPair>) {
        let axis = self.axis;
        self.entries.clear();
        self.entries.extend(self.bounds.iter().enumerate().map(|(index, bounds)| {
            let (min, max) = bounds.project(&axis);
            SweepEntry {
                index,
                min: min - PROJECTION_SLOP,
                max: max + PROJECTION_SLOP,
            }
        }));
        self.entries
            .sort_unstable_by(|x, y| x.min.total_cmp(&y.min).then(x.index.cmp(&y.index)));

        for (i, entry_a) in self.entries.iter().enumerate() {
            for entry_b in &self.entries[i + 1..] {
                if entry_b.min > entry_a.max {
                    break;
                }
                if self.bounds[entry_a.index].intersects(&self.bounds[entry_b.index]) {
                    pairs.push(CollisionPair::new(entry_a.index, entry_b.index));
                }
            }
        }

        pairs.sort_unstable();
    }
}

impl Default for Broadphase {
    fn default() -> Self {
        Self::new(BroadphaseMethod::default(), 0.01)
    }
}
