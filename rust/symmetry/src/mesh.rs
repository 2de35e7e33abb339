// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host mesh interface.
//!
//! The resolvers only read a mesh through [`MeshTopology`]: vertex
//! positions, whether a vertex is still referenced, face loops, and the
//! faces touching a vertex. [`IndexedMesh`] is a plain polygon mesh that
//! implements it, for hosts that do not have their own storage and for tests.

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::point::{unused_point, Point};

/// Read access to a polygon mesh.
pub trait MeshTopology {
    fn vertex_count(&self) -> usize;

    fn vertex_position(&self, vertex: usize) -> Point;

    /// Whether any face still uses `vertex`.
    fn vertex_is_referenced(&self, vertex: usize) -> bool;

    fn face_count(&self) -> usize;

    fn face_point_count(&self, face: usize) -> usize {
        self.face_points(face).len()
    }

    /// Vertex loop of `face`, in winding order.
    fn face_points(&self, face: usize) -> &[usize];

    /// Faces whose loop contains `vertex`.
    fn related_faces(&self, vertex: usize) -> &[usize];
}

/// Copies the mesh positions, replacing unreferenced vertices with the
/// unused-slot sentinel so indices stay aligned with the mesh.
pub fn collect_points<M: MeshTopology + ?Sized>(mesh: &M) -> Vec<Point> {
    (0..mesh.vertex_count())
        .map(|v| {
            if mesh.vertex_is_referenced(v) {
                mesh.vertex_position(v)
            } else {
                unused_point()
            }
        })
        .collect()
}

type FaceLoop = SmallVec<[usize; 4]>;
type FaceList = SmallVec<[usize; 6]>;

/// A polygon mesh with vertex-to-face adjacency.
#[derive(Debug, Clone, Default)]
pub struct IndexedMesh {
    positions: Vec<Point>,
    faces: Vec<FaceLoop>,
    vertex_faces: Vec<FaceList>,
}

impl IndexedMesh {
    /// Builds a mesh, checking every face index against `positions`.
    pub fn new(positions: Vec<Point>, faces: Vec<Vec<usize>>) -> Result<Self> {
        let mut mesh = Self {
            vertex_faces: vec![FaceList::new(); positions.len()],
            positions,
            faces: Vec::with_capacity(faces.len()),
        };
        for face in &faces {
            mesh.add_face(face)?;
        }
        Ok(mesh)
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self, p: Point) -> usize {
        self.positions.push(p);
        self.vertex_faces.push(FaceList::new());
        self.positions.len() - 1
    }

    /// Appends a face and returns its index.
    pub fn add_face(&mut self, points: &[usize]) -> Result<usize> {
        let face = self.faces.len();
        self.check_loop(face, points)?;
        self.faces.push(points.iter().copied().collect());
        self.link_face(face);
        Ok(face)
    }

    /// Replaces the loop of an existing face.
    pub fn set_face(&mut self, face: usize, points: &[usize]) -> Result<()> {
        if face >= self.faces.len() {
            return Err(Error::FaceOutOfRange(face));
        }
        self.check_loop(face, points)?;
        self.faces[face] = points.iter().copied().collect();
        self.rebuild_adjacency();
        Ok(())
    }

    pub fn set_position(&mut self, vertex: usize, p: Point) {
        if let Some(slot) = self.positions.get_mut(vertex) {
            *slot = p;
        }
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Point] {
        &mut self.positions
    }

    /// Number of faces using `vertex`.
    pub fn vertex_ref_count(&self, vertex: usize) -> usize {
        self.vertex_faces.get(vertex).map_or(0, |faces| faces.len())
    }

    fn check_loop(&self, face: usize, points: &[usize]) -> Result<()> {
        if points.is_empty() {
            return Err(Error::EmptyFace(face));
        }
        if let Some(&vertex) = points.iter().find(|&&v| v >= self.positions.len()) {
            return Err(Error::VertexOutOfRange {
                face,
                vertex,
                vertex_count: self.positions.len(),
            });
        }
        Ok(())
    }

    fn link_face(&mut self, face: usize) {
        for &v in &self.faces[face] {
            let list = &mut self.vertex_faces[v];
            // A loop may repeat a vertex; record the face once.
            if list.last() != Some(&face) {
                list.push(face);
            }
        }
    }

    fn rebuild_adjacency(&mut self) {
        for list in &mut self.vertex_faces {
            list.clear();
        }
        for face in 0..self.faces.len() {
            self.link_face(face);
        }
    }
}

impl MeshTopology for IndexedMesh {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn vertex_position(&self, vertex: usize) -> Point {
        self.positions[vertex]
    }

    fn vertex_is_referenced(&self, vertex: usize) -> bool {
        self.vertex_ref_count(vertex) > 0
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face_points(&self, face: usize) -> &[usize] {
        self.faces.get(face).map(|f| f.as_slice()).unwrap_or(&[])
    }

    fn related_faces(&self, vertex: usize) -> &[usize] {
        self.vertex_faces.get(vertex).map(|f| f.as_slice()).unwrap_or(&[])
    }
}
