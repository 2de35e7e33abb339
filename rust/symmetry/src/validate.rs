// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Consistency checks for finished symmetry tables.
//!
//! Useful for hosts that patch tables by hand between passes, and for tests.

use crate::axis::SymmetrySide;
use crate::error::{Error, Result};
use crate::face::FaceSymmetryTable;
use crate::mesh::MeshTopology;
use crate::vertex::VertexSymmetryTable;

/// Checks that every vertex pairing is mutual, crosses the plane, and never
/// involves a center vertex, and that the recorded pair count matches.
pub fn check_vertex_table(table: &VertexSymmetryTable) -> Result<()> {
    let mut pairs = 0;
    for (index, entry) in table.entries().iter().enumerate() {
        let Some(pair) = entry.pair else {
            continue;
        };
        if pair == index {
            return Err(Error::SelfPair(index));
        }
        let Some(other) = table.get(pair) else {
            return Err(Error::PairOutOfRange { index, pair });
        };
        if other.pair != Some(index) {
            return Err(Error::AsymmetricPair { index, pair });
        }
        if entry.side == SymmetrySide::Center {
            return Err(Error::CenterPaired(index));
        }
        if entry.side.is_none_or_center() || other.side != entry.side.opposite() {
            return Err(Error::SameSidePair { index, pair });
        }
        if index < pair {
            pairs += 1;
        }
    }

    if pairs != table.pair_count() {
        return Err(Error::PairCountMismatch {
            recorded: table.pair_count(),
            actual: pairs,
        });
    }
    Ok(())
}

/// Checks that every face pairing is mutual and that each twin, read
/// backwards from its rotation offset, is the face's own loop mapped
/// through the vertex pairing.
pub fn check_face_table<M: MeshTopology + ?Sized>(
    faces: &FaceSymmetryTable,
    mesh: &M,
    vertices: &VertexSymmetryTable,
) -> Result<()> {
    let mut pairs = 0;
    for (face, entry) in faces.entries().iter().enumerate() {
        let Some(pair) = entry.pair else {
            continue;
        };
        if pair == face {
            return Err(Error::SelfPair(face));
        }
        let Some(other) = faces.get(pair) else {
            return Err(Error::PairOutOfRange { index: face, pair });
        };
        if other.pair != Some(face) {
            return Err(Error::AsymmetricPair { index: face, pair });
        }
        if other.side != entry.side.opposite() || entry.side.is_none_or_center() {
            return Err(Error::SameSidePair { index: face, pair });
        }

        let own = mesh.face_points(face);
        let aligned = faces.twin_loop(face, mesh).unwrap_or_default();
        let mirrored = own.iter().map(|&v| match vertices.side_of(v) {
            SymmetrySide::Center => Some(v),
            _ => vertices.pair_of(v),
        });
        if aligned.len() != own.len() || !mirrored.zip(&aligned).all(|(m, &a)| m == Some(a)) {
            return Err(Error::WindingMismatch { face, pair });
        }
        if face < pair {
            pairs += 1;
        }
    }

    if pairs != faces.pair_count() {
        return Err(Error::PairCountMismatch {
            recorded: faces.pair_count(),
            actual: pairs,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::SymmetryAxis;
    use crate::face::{FaceSymmetryEntry, FaceSymmetryResolver};
    use crate::mesh::IndexedMesh;
    use crate::point::Point;
    use crate::vertex::{VertexSymmetryEntry, VertexSymmetryResolver};

    fn entry(side: SymmetrySide, pair: Option<usize>) -> VertexSymmetryEntry {
        VertexSymmetryEntry { side, pair }
    }

    #[test]
    fn accepts_resolver_output() {
        let points = vec![
            Point::new(1.0, 0.0, 0.0),
            Point::new(-1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ];
        let table = VertexSymmetryResolver::new(SymmetryAxis::X, 0.01).resolve(&points, None);
        assert_eq!(check_vertex_table(&table), Ok(()));
    }

    #[test]
    fn rejects_broken_vertex_tables() {
        use SymmetrySide::{Center, Minus, Plus};

        let one_way = VertexSymmetryTable::from_entries(
            vec![entry(Plus, Some(1)), entry(Minus, None)],
            1,
        );
        assert_eq!(
            check_vertex_table(&one_way),
            Err(Error::AsymmetricPair { index: 0, pair: 1 })
        );

        let selfish = VertexSymmetryTable::from_entries(vec![entry(Plus, Some(0))], 1);
        assert_eq!(check_vertex_table(&selfish), Err(Error::SelfPair(0)));

        let center = VertexSymmetryTable::from_entries(
            vec![entry(Center, Some(1)), entry(Minus, Some(0))],
            1,
        );
        assert_eq!(check_vertex_table(&center), Err(Error::CenterPaired(0)));

        let same_side = VertexSymmetryTable::from_entries(
            vec![entry(Plus, Some(1)), entry(Plus, Some(0))],
            1,
        );
        assert_eq!(
            check_vertex_table(&same_side),
            Err(Error::SameSidePair { index: 0, pair: 1 })
        );

        let dangling = VertexSymmetryTable::from_entries(vec![entry(Plus, Some(9))], 1);
        assert_eq!(
            check_vertex_table(&dangling),
            Err(Error::PairOutOfRange { index: 0, pair: 9 })
        );

        let miscounted = VertexSymmetryTable::from_entries(
            vec![entry(Plus, Some(1)), entry(Minus, Some(0))],
            2,
        );
        assert_eq!(
            check_vertex_table(&miscounted),
            Err(Error::PairCountMismatch { recorded: 2, actual: 1 })
        );
    }

    #[test]
    fn detects_winding_mismatch() {
        let mesh = IndexedMesh::new(
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 1.0, 0.0),
                Point::new(1.0, 0.0, 1.0),
                Point::new(-1.0, 1.0, 0.0),
                Point::new(-1.0, 0.0, 1.0),
            ],
            vec![vec![0, 1, 2], vec![0, 4, 3]],
        )
        .unwrap();
        let vertices = VertexSymmetryResolver::new(SymmetryAxis::X, 0.01).resolve_mesh(&mesh, None);
        let faces = FaceSymmetryResolver::resolve(&mesh, &vertices, None);
        assert_eq!(faces.pair_count(), 1);
        assert_eq!(check_face_table(&faces, &mesh, &vertices), Ok(()));

        let mut entries = faces.entries().to_vec();
        entries[0].rotation_offset = (entries[0].rotation_offset + 1) % 3;
        let tampered = FaceSymmetryTable::from_entries(entries, 1);
        assert_eq!(
            check_face_table(&tampered, &mesh, &vertices),
            Err(Error::WindingMismatch { face: 0, pair: 1 })
        );

        let unpaired = FaceSymmetryTable::from_entries(vec![FaceSymmetryEntry::default(); 2], 1);
        assert_eq!(
            check_face_table(&unpaired, &mesh, &vertices),
            Err(Error::PairCountMismatch { recorded: 1, actual: 0 })
        );
    }
}
