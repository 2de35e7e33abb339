// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MeshMirror Symmetry
//!
//! Mirror-symmetry detection for polygon meshes, the engine behind symmetric
//! editing: once each vertex knows its mirrored twin, moving one side of a
//! model can update the other.
//!
//! A pass runs in two stages:
//!
//! 1. [`VertexSymmetryResolver`] classifies every vertex against a mirror
//!    plane through one coordinate axis and pairs each off-plane vertex with
//!    the nearest vertex on the other side whose mirror image lies within a
//!    tolerance. A fixed grid of buckets per side keeps the search local.
//! 2. [`FaceSymmetryResolver`] uses that vertex pairing to pair faces whose
//!    loops mirror each other, recording how the twin's reversed winding
//!    lines up.
//!
//! Both stages are synchronous, allocate their own scratch state, and never
//! fail: input that has nothing to pair simply produces unpaired entries.
//!
//! ```
//! use meshmirror_symmetry::{Point, SymmetryAxis, SymmetrySide, VertexSymmetryResolver};
//!
//! let points = vec![
//!     Point::new(-2.0, 0.0, 0.0),
//!     Point::new(2.0, 0.0, 0.0),
//!     Point::new(0.0, 1.0, 0.0),
//! ];
//! let table = VertexSymmetryResolver::new(SymmetryAxis::X, 0.5).resolve(&points, None);
//!
//! assert_eq!(table.pair_count(), 1);
//! assert_eq!(table.pair_of(0), Some(1));
//! assert_eq!(table[2].side, SymmetrySide::Center);
//! ```

pub mod axis;
pub mod bounds;
pub mod config;
pub mod edit;
pub mod error;
pub mod face;
pub mod grid;
pub mod mesh;
pub mod point;
pub mod session;
pub mod validate;
pub mod vertex;

pub use axis::{SymmetryAxis, SymmetrySide};
pub use bounds::{BoundingBox, SymmetryBox};
pub use config::SymmetryConfig;
pub use error::{Error, Result};
pub use face::{FaceSymmetryEntry, FaceSymmetryResolver, FaceSymmetryTable};
pub use grid::{Bucket, BucketGrid, CellRange, GridResolution, MirrorGrid};
pub use mesh::{collect_points, IndexedMesh, MeshTopology};
pub use point::{is_unused, unused_point, Point};
pub use session::{MirrorSession, MirrorTables};
pub use vertex::{VertexSymmetryEntry, VertexSymmetryResolver, VertexSymmetryTable};
