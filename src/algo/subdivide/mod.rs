//! Topological subdivision.
//!
//! Both schemes are interpolating and purely topological: every new vertex is
//! placed at an edge midpoint or a face centre, and existing vertices do not
//! move. Smoothing, if wanted, is a separate pass (see [`crate::algo::smooth`]).
//!
//! # Quad Subdivision
//!
//! Works on any polygon mesh. Each iteration:
//!
//! 1. Splits every edge at its midpoint
//! 2. Adds a vertex at the centre of each face
//! 3. Connects the centre to each of the face's edge midpoints
//!
//! An n-sided face becomes n quads, so the result is always an all-quad mesh.
//!
//! # Triangle Subdivision
//!
//! Works on triangle meshes only. Each iteration splits every edge at its
//! midpoint and cuts each triangle into four: three corner triangles plus the
//! central triangle joining the midpoints. The central triangle keeps the
//! original face id.
//!
//! # Example
//!
//! ```
//! use quadrille::prelude::*;
//! use quadrille::algo::subdivide::{quad_subdivide, triangle_subdivide, SubdivideOptions};
//!
//! let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_polygon(6, 1.0).unwrap();
//!
//! triangle_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();
//! assert_eq!(mesh.num_faces(), 24);
//!
//! quad_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();
//! assert_eq!(mesh.num_faces(), 72);
//! assert!(mesh.all_faces_have_sides(4));
//! ```

mod quad;
mod triangle;

pub use quad::quad_subdivide;
pub use triangle::triangle_subdivide;

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Options for subdivision algorithms.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Half-edges of `face` that leave a midpoint, in cycle order.
///
/// Vertices with an index at or above `first_midpoint` were added by
/// [`HalfEdgeMesh::split_all_edges`]. The face must have exactly `expected`
/// of them, one per original side.
fn midpoint_halfedges<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    face: FaceId<I>,
    first_midpoint: usize,
    expected: usize,
) -> Result<Vec<HalfEdgeId<I>>> {
    let is_midpoint = |v: VertexId<I>| v.index() >= first_midpoint;
    let midpoints: Vec<HalfEdgeId<I>> = mesh
        .try_face_loop(face)?
        .into_iter()
        .filter(|&he| is_midpoint(mesh.origin(he)))
        .collect();

    if midpoints.len() != expected {
        return Err(MeshError::MidpointCount {
            face: face.index(),
            found: midpoints.len(),
            expected,
        });
    }
    Ok(midpoints)
}
