// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point type and the "unused slot" sentinel.
//!
//! Mesh vertices that no face references still occupy their index so that
//! point index and vertex index stay identical through every pass. Such
//! slots hold [`unused_point`] and are skipped by every computation.

use nalgebra::Point3;

/// A position in model space.
pub type Point = Point3<f32>;

/// Coordinate value reserved for unused slots.
pub const UNUSED_COORD: f32 = f32::MAX;

/// Returns the sentinel point marking an unused slot.
#[inline]
pub fn unused_point() -> Point {
    Point::new(UNUSED_COORD, UNUSED_COORD, UNUSED_COORD)
}

/// Returns `true` if `p` is the unused-slot sentinel.
///
/// Only the x component is inspected; no real vertex sits at `f32::MAX`.
#[inline]
pub fn is_unused(p: &Point) -> bool {
    p.x == UNUSED_COORD
}
