// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex mirror pairing.
//!
//! [`VertexSymmetryResolver`] classifies every point against the mirror
//! plane and greedily pairs each off-plane point with the nearest point on
//! the opposite side whose mirror image lies within the tolerance.
//!
//! ## Modes
//!
//! - **Full rescan** (no selection): every used point is registered as a
//!   candidate up front, then every off-plane point seeks a partner in index
//!   order. A point that finds a partner retracts its own registration so it
//!   cannot be claimed a second time.
//! - **Selective** (with a selection mask): unselected points form a static
//!   reference set; only selected points seek partners. A selected point that
//!   finds nothing is registered afterwards so a later selected point in the
//!   same pass can still pair with it.
//!
//! Matching is first-come: points are processed in index order and each
//! takes its nearest available candidate. Among candidates at exactly equal
//! distance, the one scanned last in cell/slot order wins. A point left
//! without a partner stays unmatched for this pass; widening the tolerance
//! is up to the caller.

use std::ops::Index;
use std::time::Instant;

use crate::axis::{zero_band, SymmetryAxis, SymmetrySide};
use crate::bounds::SymmetryBox;
use crate::config::SymmetryConfig;
use crate::error::{Error, Result};
use crate::grid::{GridResolution, MirrorGrid};
use crate::mesh::{collect_points, MeshTopology};
use crate::point::{is_unused, Point};

/// Per-vertex result of a symmetry pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexSymmetryEntry {
    pub side: SymmetrySide,
    /// Index of the mirrored twin, if one was found.
    pub pair: Option<usize>,
}

impl VertexSymmetryEntry {
    pub const fn unpaired(side: SymmetrySide) -> Self {
        Self { side, pair: None }
    }
}

/// Vertex pairing table, indexed like the input points.
///
/// If `table[i].pair == Some(j)` then `table[j].pair == Some(i)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexSymmetryTable {
    entries: Vec<VertexSymmetryEntry>,
    pair_count: usize,
}

impl VertexSymmetryTable {
    /// Wraps entries produced elsewhere. The pair count is not recomputed;
    /// see [`crate::validate::check_vertex_table`].
    pub fn from_entries(entries: Vec<VertexSymmetryEntry>, pair_count: usize) -> Self {
        Self {
            entries,
            pair_count,
        }
    }

    pub fn entries(&self) -> &[VertexSymmetryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<VertexSymmetryEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, vertex: usize) -> Option<&VertexSymmetryEntry> {
        self.entries.get(vertex)
    }

    /// The twin of `vertex`, if it has one.
    pub fn pair_of(&self, vertex: usize) -> Option<usize> {
        self.entries.get(vertex).and_then(|e| e.pair)
    }

    /// Side of `vertex`; out-of-range indices report `None`.
    pub fn side_of(&self, vertex: usize) -> SymmetrySide {
        self.entries.get(vertex).map_or(SymmetrySide::None, |e| e.side)
    }

    /// Number of mutual pairs.
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Iterates each pair once as `(lower, higher)` index.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.pair.filter(|&j| i < j).map(|j| (i, j)))
    }
}

impl Index<usize> for VertexSymmetryTable {
    type Output = VertexSymmetryEntry;

    fn index(&self, vertex: usize) -> &Self::Output {
        &self.entries[vertex]
    }
}

/// Pairs points with their mirror images across an axis plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexSymmetryResolver {
    axis: SymmetryAxis,
    tolerance: f32,
    resolution: GridResolution,
}

impl VertexSymmetryResolver {
    /// Creates a resolver with the default grid resolution.
    pub fn new(axis: SymmetryAxis, tolerance: f32) -> Self {
        Self {
            axis,
            tolerance,
            resolution: GridResolution::default(),
        }
    }

    pub fn from_config(config: &SymmetryConfig) -> Self {
        Self::new(config.axis, config.tolerance).with_resolution(config.resolution)
    }

    pub fn with_resolution(mut self, resolution: GridResolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn axis(&self) -> SymmetryAxis {
        self.axis
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Resolves the pairing for `points`.
    ///
    /// `selection` switches to selective mode: `true` marks points seeking a
    /// partner, `false` marks the static reference set. Indices past the end
    /// of the mask count as unselected.
    pub fn resolve(&self, points: &[Point], selection: Option<&[bool]>) -> VertexSymmetryTable {
        #[cfg(not(target_arch = "wasm32"))]
        let start = Some(Instant::now());
        // No monotonic clock on wasm32-unknown-unknown
        #[cfg(target_arch = "wasm32")]
        let start: Option<Instant> = None;
        let band = zero_band(self.tolerance);
        let mut entries: Vec<VertexSymmetryEntry> = points
            .iter()
            .map(|p| VertexSymmetryEntry::unpaired(SymmetrySide::classify(p, self.axis, band)))
            .collect();

        let Some(frame) = SymmetryBox::from_points(points, self.axis) else {
            tracing::debug!(
                point_count = points.len(),
                axis = %self.axis,
                "Points do not straddle the mirror plane, nothing to pair"
            );
            return VertexSymmetryTable::from_entries(entries, 0);
        };

        let seeking = |i: usize| match selection {
            Some(mask) => mask.get(i).copied().unwrap_or(false),
            None => true,
        };

        // Register the reference set
        let mut grid = MirrorGrid::new(frame, self.resolution);
        for (i, p) in points.iter().enumerate() {
            if is_unused(p) || (selection.is_some() && seeking(i)) {
                continue;
            }
            grid.insert(entries[i].side, i, p);
        }
        tracing::trace!(
            plus = grid.grid(SymmetrySide::Plus).map_or(0, |g| g.len()),
            minus = grid.grid(SymmetrySide::Minus).map_or(0, |g| g.len()),
            "Registered mirror candidates"
        );

        let mut pair_count = 0;
        for (i, p) in points.iter().enumerate() {
            let side = entries[i].side;
            if side.is_none_or_center() || entries[i].pair.is_some() || !seeking(i) {
                continue;
            }

            let opposite = side.opposite();
            let query = self.axis.mirror(p);
            let range = grid.search_range(p, self.tolerance);

            match grid.find_nearest(opposite, points, &query, &range, self.tolerance) {
                Some(hit) => {
                    entries[i].pair = Some(hit.point);
                    entries[hit.point].pair = Some(i);
                    grid.remove_slot(opposite, hit.cell, hit.slot);
                    if selection.is_none() {
                        grid.remove_value(side, i, p);
                    }
                    pair_count += 1;
                }
                None => {
                    if selection.is_some() {
                        grid.insert(side, i, p);
                    }
                }
            }
        }

        tracing::debug!(
            points = points.len(),
            pairs = pair_count,
            selective = selection.is_some(),
            axis = %self.axis,
            elapsed_us = start.map_or(0, |t| t.elapsed().as_micros() as u64),
            "Vertex symmetry pass complete"
        );

        VertexSymmetryTable::from_entries(entries, pair_count)
    }

    /// Like [`resolve`](Self::resolve), but rejects a bad tolerance or a
    /// selection mask that does not cover every point.
    pub fn resolve_checked(
        &self,
        points: &[Point],
        selection: Option<&[bool]>,
    ) -> Result<VertexSymmetryTable> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            tracing::warn!(tolerance = self.tolerance, "Rejecting vertex symmetry pass");
            return Err(Error::InvalidTolerance(self.tolerance));
        }
        if let Some(mask) = selection {
            if mask.len() != points.len() {
                tracing::warn!(
                    expected = points.len(),
                    actual = mask.len(),
                    "Rejecting vertex symmetry pass"
                );
                return Err(Error::MaskLength {
                    expected: points.len(),
                    actual: mask.len(),
                });
            }
        }
        Ok(self.resolve(points, selection))
    }

    /// Resolves straight from a host mesh. Vertices no face references are
    /// treated as unused slots.
    pub fn resolve_mesh<M: MeshTopology + ?Sized>(
        &self,
        mesh: &M,
        selection: Option<&[bool]>,
    ) -> VertexSymmetryTable {
        self.resolve(&collect_points(mesh), selection)
    }
}
