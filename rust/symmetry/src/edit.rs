// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Symmetric editing: propagating vertex moves to mirrored twins.

use rustc_hash::FxHashSet;

use crate::axis::{SymmetryAxis, SymmetrySide};
use crate::point::Point;
use crate::vertex::VertexSymmetryTable;

/// Mirrors the new positions of `moved` vertices onto their twins.
///
/// For each moved vertex with a twin, the twin is set to the mirror image of
/// the moved vertex. Twins that are themselves in `moved` keep the position
/// the caller gave them. A moved vertex on the mirror plane is snapped back
/// onto the plane. Indices outside `positions` or `table` are skipped.
///
/// Returns the twins that were updated.
pub fn mirror_moves(
    table: &VertexSymmetryTable,
    axis: SymmetryAxis,
    positions: &mut [Point],
    moved: &[usize],
) -> Vec<usize> {
    let moved_set: FxHashSet<usize> = moved.iter().copied().collect();
    let mut updated = Vec::new();

    for &v in moved {
        let Some(entry) = table.get(v) else {
            continue;
        };
        if v >= positions.len() {
            continue;
        }
        match (entry.side, entry.pair) {
            (SymmetrySide::Center, _) => {
                positions[v][axis.index()] = 0.0;
            }
            (_, Some(twin)) if twin < positions.len() && !moved_set.contains(&twin) => {
                let mirrored = axis.mirror(&positions[v]);
                positions[twin] = mirrored;
                updated.push(twin);
            }
            _ => {}
        }
    }

    updated
}
