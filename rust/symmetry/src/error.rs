// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for mesh construction, input checking and table validation.
//!
//! The resolvers themselves are total and never fail; these errors come from
//! the edges of the crate where caller input is checked.

/// Result type alias for symmetry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur around a symmetry pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A face references a vertex the mesh does not have.
    #[error("face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        face: usize,
        vertex: usize,
        vertex_count: usize,
    },

    /// A face index past the end of the mesh.
    #[error("face {0} does not exist")]
    FaceOutOfRange(usize),

    /// A face was given without any vertices.
    #[error("face {0} has no vertices")]
    EmptyFace(usize),

    /// A selection mask does not cover every element.
    #[error("selection mask has {actual} entries, expected {expected}")]
    MaskLength { expected: usize, actual: usize },

    /// A vertex table does not cover every mesh vertex.
    #[error("vertex table has {actual} entries, mesh has {expected} vertices")]
    TableLength { expected: usize, actual: usize },

    /// Matching tolerance must be finite and non-negative.
    #[error("invalid matching tolerance: {0}")]
    InvalidTolerance(f32),

    /// Axis name is not one of `x`, `y`, `z`.
    #[error("unknown mirror axis: {0:?}")]
    UnknownAxis(String),

    /// Grid resolution is not of the form `NXxNYxNZ` with non-zero cells.
    #[error("invalid grid resolution: {0:?}")]
    InvalidResolution(String),

    /// A table entry points past the end of the table.
    #[error("entry {index} is paired with {pair}, which is out of range")]
    PairOutOfRange { index: usize, pair: usize },

    /// An entry is paired with itself.
    #[error("entry {0} is paired with itself")]
    SelfPair(usize),

    /// A pairing is recorded in one direction only.
    #[error("entry {index} is paired with {pair}, but {pair} does not point back")]
    AsymmetricPair { index: usize, pair: usize },

    /// A vertex on the mirror plane was paired with another vertex.
    #[error("center vertex {0} has a pair")]
    CenterPaired(usize),

    /// Paired entries are not on opposite sides of the mirror plane.
    #[error("entries {index} and {pair} are paired but not on opposite sides")]
    SameSidePair { index: usize, pair: usize },

    /// The recorded pair count disagrees with the entries.
    #[error("table records {recorded} pairs but holds {actual}")]
    PairCountMismatch { recorded: usize, actual: usize },

    /// A paired face does not line up with its partner under the recorded rotation.
    #[error("face {face} does not align with its pair {pair} at the recorded rotation")]
    WindingMismatch { face: usize, pair: usize },
}
