//! Error types for quadrille.
//!
//! Invalid input and precondition violations are reported before an operator
//! touches the mesh. Structural errors mean a walk found links that a valid
//! mesh never has.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The input contains no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face uses the same vertex twice.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// Imported index data is not made of quads.
    #[error("expected quad topology, got {indices} indices (not a multiple of 4)")]
    UnsupportedArity {
        /// Number of indices supplied.
        indices: usize,
    },

    /// The same directed edge is used by two faces.
    #[error("edge ({v0}, {v1}) is used twice in the same direction")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// An edge lookup was asked for a vertex and itself.
    #[error("edge endpoints are the same vertex {0}")]
    SameVertex(usize),

    /// Dissolve was asked to remove an edge on the mesh boundary.
    #[error("cannot dissolve a boundary edge (half-edge {0})")]
    BoundaryEdge(usize),

    /// Dissolve was asked to remove an edge with the same face on both sides.
    #[error("half-edge {halfedge} has face {face} on both sides")]
    SameFaceEdge {
        /// The half-edge passed to dissolve.
        halfedge: usize,
        /// The face on both sides.
        face: usize,
    },

    /// Face split was given half-edges from different faces.
    #[error("half-edges {a} and {b} do not share a face")]
    NoCommonFace {
        /// First outgoing half-edge.
        a: usize,
        /// Second outgoing half-edge.
        b: usize,
    },

    /// Face split was given half-edges whose origins are already connected.
    #[error("cannot split neighboring vertices (half-edges {a} and {b})")]
    AdjacentVertices {
        /// First outgoing half-edge.
        a: usize,
        /// Second outgoing half-edge.
        b: usize,
    },

    /// A triangle-only operator met a face that is not a triangle.
    #[error("face {face} has {sides} sides, expected a triangle")]
    NotTriangle {
        /// The offending face.
        face: usize,
        /// Its side count.
        sides: usize,
    },

    /// Subdivision did not find one midpoint per original side.
    #[error("face {face} has {found} midpoints, expected {expected}")]
    MidpointCount {
        /// The face being subdivided.
        face: usize,
        /// Midpoints found on the face.
        found: usize,
        /// Original side count of the face.
        expected: usize,
    },

    /// A walk reached a half-edge with a missing link.
    #[error("half-edge {0} has a missing link")]
    UnlinkedHalfEdge(usize),

    /// A walk did not close within the traversal bound.
    #[error("walk from half-edge {start} did not close after {limit} steps")]
    TraversalLimit {
        /// Where the walk started.
        start: usize,
        /// The bound that was exceeded.
        limit: usize,
    },

    /// An operator would need more slots than the index type can address.
    #[error("{kind} slots would grow to {required}, the index type holds {limit}")]
    CapacityExceeded {
        /// Which arena overflows: "vertex", "half-edge" or "face".
        kind: &'static str,
        /// Slot count the operator needs.
        required: usize,
        /// Largest slot count the index type supports.
        limit: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
