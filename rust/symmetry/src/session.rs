// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Full vertex-then-face symmetry pipeline over a host mesh.

use crate::config::SymmetryConfig;
use crate::face::{FaceSymmetryResolver, FaceSymmetryTable};
use crate::mesh::MeshTopology;
use crate::vertex::{VertexSymmetryResolver, VertexSymmetryTable};

/// Vertex and face pairing produced by one session run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorTables {
    pub vertices: VertexSymmetryTable,
    pub faces: FaceSymmetryTable,
}

/// Runs symmetry passes with a fixed configuration.
///
/// Each [`run`](Self::run) builds its own grid; a session holds no state
/// between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorSession {
    config: SymmetryConfig,
}

impl MirrorSession {
    pub fn from_config(config: SymmetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SymmetryConfig {
        &self.config
    }

    /// Pairs the vertices of `mesh`, then its faces.
    ///
    /// `vertex_selection` switches the vertex pass to selective mode;
    /// `face_selection` restricts face pairs to those touching a selected
    /// face. With symmetry disabled both tables come back empty.
    pub fn run<M: MeshTopology + ?Sized>(
        &self,
        mesh: &M,
        vertex_selection: Option<&[bool]>,
        face_selection: Option<&[bool]>,
    ) -> MirrorTables {
        if !self.config.enabled {
            tracing::debug!("Symmetry disabled, skipping pass");
            return MirrorTables::default();
        }

        let vertices =
            VertexSymmetryResolver::from_config(&self.config).resolve_mesh(mesh, vertex_selection);
        let faces = FaceSymmetryResolver::resolve(mesh, &vertices, face_selection);
        MirrorTables { vertices, faces }
    }
}
