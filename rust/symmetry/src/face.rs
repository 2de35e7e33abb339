// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face mirror pairing, derived from a vertex pairing.
//!
//! For each face, the expected mirror loop is built by mapping every vertex
//! through the [`VertexSymmetryTable`] (center vertices map to themselves).
//! Candidate twins are the faces touching the first expected vertex. A
//! mirrored face winds the opposite way, so a candidate matches when its
//! loop, read backwards from some start vertex, equals the expected loop.
//! That start vertex is recorded as the pair's rotation offset.
//!
//! Each face ends the pass in exactly one state: rejected (some vertex has
//! no usable mirror), unmatched (no candidate lines up), or paired with a
//! partner that records the same pairing back.

use std::ops::Index;

use smallvec::SmallVec;

use crate::axis::SymmetrySide;
use crate::error::{Error, Result};
use crate::mesh::MeshTopology;
use crate::vertex::VertexSymmetryTable;

/// Expected mirror loop of one face.
type MirrorLoop = SmallVec<[usize; 8]>;

/// Per-face result of a symmetry pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceSymmetryEntry {
    /// `Plus` or `Minus` for paired faces, `None` otherwise.
    pub side: SymmetrySide,
    /// Index of the mirrored twin face, if one was found.
    pub pair: Option<usize>,
    /// Start vertex in the twin's loop that lines up with this face's
    /// first vertex when the twin is read backwards.
    pub rotation_offset: usize,
}

/// Face pairing table, indexed like the mesh faces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceSymmetryTable {
    entries: Vec<FaceSymmetryEntry>,
    pair_count: usize,
}

impl FaceSymmetryTable {
    pub fn from_entries(entries: Vec<FaceSymmetryEntry>, pair_count: usize) -> Self {
        Self {
            entries,
            pair_count,
        }
    }

    pub fn entries(&self) -> &[FaceSymmetryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, face: usize) -> Option<&FaceSymmetryEntry> {
        self.entries.get(face)
    }

    pub fn pair_of(&self, face: usize) -> Option<usize> {
        self.entries.get(face).and_then(|e| e.pair)
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Iterates each face pair once as `(lower, higher)` index.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.pair.filter(|&j| i < j).map(|j| (i, j)))
    }

    /// The twin of `face`, re-read so that position `j` is the mirror of
    /// `face`'s own vertex `j`.
    ///
    /// Returns `None` for unpaired faces.
    pub fn twin_loop<M: MeshTopology + ?Sized>(&self, face: usize, mesh: &M) -> Option<Vec<usize>> {
        let entry = self.entries.get(face)?;
        let twin = mesh.face_points(entry.pair?);
        let n = twin.len();
        if n == 0 {
            return Some(Vec::new());
        }
        Some(
            (0..n)
                .map(|j| twin[(n + entry.rotation_offset % n - j) % n])
                .collect(),
        )
    }
}

impl Index<usize> for FaceSymmetryTable {
    type Output = FaceSymmetryEntry;

    fn index(&self, face: usize) -> &Self::Output {
        &self.entries[face]
    }
}

/// Pairs faces whose vertex loops mirror each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceSymmetryResolver;

impl FaceSymmetryResolver {
    /// Resolves the face pairing for `mesh` given its vertex pairing.
    ///
    /// With a `selection` mask, a candidate pair is considered only if at
    /// least one of the two faces is selected.
    pub fn resolve<M: MeshTopology + ?Sized>(
        mesh: &M,
        vertices: &VertexSymmetryTable,
        selection: Option<&[bool]>,
    ) -> FaceSymmetryTable {
        let face_count = mesh.face_count();
        let mut entries = vec![FaceSymmetryEntry::default(); face_count];
        let mut pair_count = 0;
        let selected = |f: usize| selection.map_or(true, |mask| mask.get(f).copied().unwrap_or(false));

        for f1 in 0..face_count {
            if entries[f1].pair.is_some() {
                continue;
            }
            let loop1 = mesh.face_points(f1);
            if loop1.is_empty() {
                continue;
            }
            let Some((side, expected)) = expected_mirror_loop(loop1, vertices) else {
                continue;
            };

            for &f2 in mesh.related_faces(expected[0]) {
                if f2 <= f1 || f2 >= face_count || entries[f2].pair.is_some() {
                    continue;
                }
                let loop2 = mesh.face_points(f2);
                if loop2.len() != loop1.len() {
                    continue;
                }
                if selection.is_some() && !selected(f1) && !selected(f2) {
                    continue;
                }
                if let Some(offset) = reversed_alignment(loop2, &expected) {
                    entries[f1] = FaceSymmetryEntry {
                        side,
                        pair: Some(f2),
                        rotation_offset: offset,
                    };
                    entries[f2] = FaceSymmetryEntry {
                        side: side.opposite(),
                        pair: Some(f1),
                        rotation_offset: offset,
                    };
                    pair_count += 1;
                    break;
                }
            }
        }

        tracing::debug!(faces = face_count, pairs = pair_count, "Face symmetry pass complete");

        FaceSymmetryTable::from_entries(entries, pair_count)
    }

    /// Like [`resolve`](Self::resolve), but rejects a selection mask that
    /// does not cover every face or a vertex table that does not cover every
    /// mesh vertex.
    pub fn resolve_checked<M: MeshTopology + ?Sized>(
        mesh: &M,
        vertices: &VertexSymmetryTable,
        selection: Option<&[bool]>,
    ) -> Result<FaceSymmetryTable> {
        if vertices.len() != mesh.vertex_count() {
            tracing::warn!(
                expected = mesh.vertex_count(),
                actual = vertices.len(),
                "Rejecting face symmetry pass: vertex table size"
            );
            return Err(Error::TableLength {
                expected: mesh.vertex_count(),
                actual: vertices.len(),
            });
        }
        if let Some(mask) = selection {
            if mask.len() != mesh.face_count() {
                tracing::warn!(
                    expected = mesh.face_count(),
                    actual = mask.len(),
                    "Rejecting face symmetry pass: selection size"
                );
                return Err(Error::MaskLength {
                    expected: mesh.face_count(),
                    actual: mask.len(),
                });
            }
        }
        Ok(Self::resolve(mesh, vertices, selection))
    }
}

/// Maps a face loop through the vertex pairing.
///
/// Fails if any vertex is unused or is off-plane without a twin, or if every
/// vertex is on the plane. The returned side is that of the first off-plane
/// vertex.
fn expected_mirror_loop(
    face: &[usize],
    vertices: &VertexSymmetryTable,
) -> Option<(SymmetrySide, MirrorLoop)> {
    let mut side = SymmetrySide::None;
    let mut expected = MirrorLoop::with_capacity(face.len());

    for &v in face {
        let entry = vertices.get(v)?;
        match entry.side {
            SymmetrySide::None => return None,
            SymmetrySide::Center => expected.push(v),
            SymmetrySide::Plus | SymmetrySide::Minus => {
                expected.push(entry.pair?);
                if side == SymmetrySide::None {
                    side = entry.side;
                }
            }
        }
    }

    (side != SymmetrySide::None).then_some((side, expected))
}

/// Finds the offset `i` at which `candidate[(n + i - j) % n] == expected[j]`
/// for every `j`.
fn reversed_alignment(candidate: &[usize], expected: &[usize]) -> Option<usize> {
    let n = expected.len();
    (0..n).find(|&i| (0..n).all(|j| candidate[(n + i - j) % n] == expected[j]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::SymmetryAxis;
    use crate::mesh::IndexedMesh;
    use crate::point::Point;
    use crate::vertex::VertexSymmetryResolver;

    /// Two quads meeting at the x = 0 seam, wound consistently.
    fn seam_quads() -> IndexedMesh {
        IndexedMesh::new(
            vec![
                Point::new(0.0, 0.0, 0.0),  // 0 center
                Point::new(0.0, 1.0, 0.0),  // 1 center
                Point::new(1.0, 0.0, 0.0),  // 2 plus
                Point::new(1.0, 1.0, 0.0),  // 3 plus
                Point::new(-1.0, 0.0, 0.0), // 4 minus
                Point::new(-1.0, 1.0, 0.0), // 5 minus
            ],
            vec![vec![0, 2, 3, 1], vec![1, 5, 4, 0]],
        )
        .unwrap()
    }

    fn resolve_all(mesh: &IndexedMesh) -> (VertexSymmetryTable, FaceSymmetryTable) {
        let vertices = VertexSymmetryResolver::new(SymmetryAxis::X, 0.01).resolve_mesh(mesh, None);
        let faces = FaceSymmetryResolver::resolve(mesh, &vertices, None);
        (vertices, faces)
    }

    #[test]
    fn pairs_quads_across_the_seam() {
        let mesh = seam_quads();
        let (vertices, faces) = resolve_all(&mesh);
        assert_eq!(vertices.pair_count(), 2);

        assert_eq!(faces.pair_count(), 1);
        assert_eq!(faces.pair_of(0), Some(1));
        assert_eq!(faces.pair_of(1), Some(0));
        assert_eq!(faces[0].side, SymmetrySide::Plus);
        assert_eq!(faces[1].side, SymmetrySide::Minus);
        assert_eq!(faces[0].rotation_offset, 3);
        assert_eq!(faces[1].rotation_offset, 3);
    }

    #[test]
    fn twin_loop_lines_up_vertex_for_vertex() {
        let mesh = seam_quads();
        let (vertices, faces) = resolve_all(&mesh);
        let twin = faces.twin_loop(0, &mesh).unwrap();
        let mapped: Vec<usize> = mesh
            .face_points(0)
            .iter()
            .map(|&v| vertices.pair_of(v).unwrap_or(v))
            .collect();
        assert_eq!(twin, mapped);
        assert!(faces.twin_loop(5, &mesh).is_none());
    }

    #[test]
    fn same_winding_is_not_a_mirror() {
        // The minus quad wound the same way as the plus quad does not mirror it.
        let mut mesh = seam_quads();
        mesh.set_face(1, &[0, 4, 5, 1]).unwrap();
        let (_, faces) = resolve_all(&mesh);
        assert_eq!(faces.pair_count(), 0);
        assert!(faces.entries().iter().all(|e| e.side == SymmetrySide::None));
    }

    #[test]
    fn alignment_offsets() {
        // expected = [a', b', c', d'] against the reversed loops
        let expected = [10, 11, 12, 13];
        assert_eq!(reversed_alignment(&[10, 13, 12, 11], &expected), Some(0));
        assert_eq!(reversed_alignment(&[11, 10, 13, 12], &expected), Some(1));
        assert_eq!(reversed_alignment(&[10, 11, 12, 13], &expected), None);
    }

    #[test]
    fn face_with_unpaired_vertex_is_rejected() {
        let mut mesh = seam_quads();
        // Pull vertex 5 off its mirror position.
        mesh.set_position(5, Point::new(-1.0, 1.5, 0.0));
        let (vertices, faces) = resolve_all(&mesh);
        assert_eq!(vertices.pair_of(3), None);
        assert_eq!(faces.pair_count(), 0);
    }

    #[test]
    fn all_center_face_is_rejected() {
        let mesh = IndexedMesh::new(
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
                Point::new(0.0, 0.0, 1.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(-1.0, 0.0, 0.0),
            ],
            vec![vec![0, 1, 2], vec![0, 2, 1], vec![3, 0, 4]],
        )
        .unwrap();
        let (_, faces) = resolve_all(&mesh);
        assert_eq!(faces.pair_count(), 0);
    }

    #[test]
    fn selection_requires_one_selected_face() {
        let mesh = seam_quads();
        let vertices = VertexSymmetryResolver::new(SymmetryAxis::X, 0.01).resolve_mesh(&mesh, None);

        let none = FaceSymmetryResolver::resolve(&mesh, &vertices, Some(&[false, false]));
        assert_eq!(none.pair_count(), 0);

        let one = FaceSymmetryResolver::resolve(&mesh, &vertices, Some(&[false, true]));
        assert_eq!(one.pair_count(), 1);
    }

    #[test]
    fn checked_resolve_rejects_short_mask() {
        let mesh = seam_quads();
        let vertices = VertexSymmetryResolver::new(SymmetryAxis::X, 0.01).resolve_mesh(&mesh, None);
        let err = FaceSymmetryResolver::resolve_checked(&mesh, &vertices, Some(&[true])).unwrap_err();
        assert_eq!(err, Error::MaskLength { expected: 2, actual: 1 });

        let short = VertexSymmetryTable::default();
        let err = FaceSymmetryResolver::resolve_checked(&mesh, &short, None).unwrap_err();
        assert_eq!(err, Error::TableLength { expected: 6, actual: 0 });
    }
}
