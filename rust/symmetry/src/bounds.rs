// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes.
//!
//! [`BoundingBox`] is a general min/max box. [`SymmetryBox`] is the box a
//! symmetry pass normalizes grid coordinates against: it is forced symmetric
//! around the mirror plane, and it only exists when the point set actually
//! straddles that plane.

use nalgebra::Vector3;

use crate::axis::SymmetryAxis;
use crate::point::{is_unused, Point};

/// An axis-aligned box. An empty box has `min > max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Creates a box from two corners, as given.
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates an empty box that any `expand` will overwrite.
    pub fn empty() -> Self {
        Self {
            min: Point::new(f32::MAX, f32::MAX, f32::MAX),
            max: Point::new(-f32::MAX, -f32::MAX, -f32::MAX),
        }
    }

    /// Builds the box around every used point, skipping sentinel slots.
    pub fn from_points(points: &[Point]) -> Self {
        let mut bounds = Self::empty();
        for p in points.iter().filter(|p| !is_unused(p)) {
            bounds.expand(p);
        }
        bounds
    }

    /// Returns `true` once the box contains at least one point.
    pub fn is_enabled(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Grows the box to contain `p`.
    pub fn expand(&mut self, p: &Point) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Grows this box to contain `other`. Empty boxes are ignored.
    pub fn combine(&mut self, other: &BoundingBox) {
        if other.is_enabled() {
            self.expand(&other.min);
            self.expand(&other.max);
        }
    }

    /// Pushes every face out by `d`. Has no effect on an empty box.
    pub fn inflate(&mut self, d: Vector3<f32>) {
        if !self.is_enabled() {
            return;
        }
        self.min -= d;
        self.max += d;
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: &Point) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }

    /// Strict overlap test: boxes that only touch do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        (0..3).all(|i| other.min[i] < self.max[i] && self.min[i] < other.max[i])
    }

    /// The shared region of two boxes, or an empty box if they are disjoint.
    pub fn intersection(&self, other: &BoundingBox) -> BoundingBox {
        let min = self.min.sup(&other.min);
        let max = self.max.inf(&other.max);
        let shared = BoundingBox::new(min, max);
        if shared.is_enabled() {
            shared
        } else {
            BoundingBox::empty()
        }
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Point {
        nalgebra::center(&self.min, &self.max)
    }

    /// Per-axis extent, `max - min`.
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Bounding box of a point set, made symmetric around the mirror plane.
///
/// Along the mirror axis the box spans `[-m, m]` with
/// `m = max(max, -min)`. Grid coordinates fold that axis to its absolute
/// value, so the extent used for cell sizing along it is `m`. The other two
/// axes keep their measured extent and are shifted to start at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryBox {
    bounds: BoundingBox,
    axis: SymmetryAxis,
    extent: Vector3<f32>,
}

impl SymmetryBox {
    /// Builds the symmetry box for `points`.
    ///
    /// Returns `None` when there is no used point, or when every point lies
    /// strictly on one side of the plane (nothing to mirror).
    pub fn from_points(points: &[Point], axis: SymmetryAxis) -> Option<Self> {
        let mut bounds = BoundingBox::from_points(points);
        let a = axis.index();
        if !bounds.is_enabled() || bounds.max[a] < 0.0 || bounds.min[a] > 0.0 {
            return None;
        }

        let half = bounds.max[a].max(-bounds.min[a]);
        bounds.min[a] = -half;
        bounds.max[a] = half;

        let mut extent = bounds.size();
        extent[a] = half;

        Some(Self {
            bounds,
            axis,
            extent,
        })
    }

    /// The symmetric box.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn axis(&self) -> SymmetryAxis {
        self.axis
    }

    /// Per-axis extent used to normalize grid coordinates.
    pub fn extent(&self) -> &Vector3<f32> {
        &self.extent
    }

    /// Maps `p` into grid space: the mirror axis folded to its absolute
    /// value, the other axes shifted so the box starts at zero.
    ///
    /// A point and its mirror image project to the same location.
    pub fn project(&self, p: &Point) -> Point {
        let mut q = Point::from(p.coords - self.bounds.min.coords);
        let a = self.axis.index();
        q[a] = p[a].abs();
        q
    }
}
