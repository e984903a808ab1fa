//! # Quadrille
//!
//! Half-edge polygon meshes and the operators needed to grow irregular quad
//! grids: edge splits, face splits, edge dissolves, quad and triangle
//! subdivision, randomized triangle pairing and vertex relaxation.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Stable ids**: removed elements leave tombstones, so ids never move
//! - **Checked edits**: preconditions are verified before a mesh is touched
//! - **Quad import**: rebuild topology, including boundary loops, from flat quad indices
//!
//! ## Quick Start
//!
//! ```
//! use quadrille::prelude::*;
//! use quadrille::algo::grid::{irregular_grid, GridOptions};
//!
//! let options = GridOptions::default().with_subdivisions(2).with_seed(17);
//! let mesh: HalfEdgeMesh = irregular_grid(&options).unwrap();
//!
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Quads: {}", mesh.num_faces());
//!
//! for f in mesh.face_ids() {
//!     for (from, to) in mesh.face_segments(f) {
//!         assert_ne!(from, to);
//!     }
//! }
//! ```
//!
//! ## Editing Meshes
//!
//! ```
//! use quadrille::prelude::*;
//! use nalgebra::Point3;
//!
//! let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_quad(Point3::origin(), 2.0, 2.0);
//! let f = FaceId::new(0);
//!
//! // Split the quad along its diagonal
//! let he = mesh.face(f).halfedge;
//! let opposite = mesh.next(mesh.next(he));
//! let (new_side, _) = mesh.split_face(he, opposite).unwrap();
//! assert_eq!(mesh.num_faces(), 2);
//!
//! // And merge the two triangles again
//! mesh.dissolve_edge(new_side).unwrap();
//! assert_eq!(mesh.num_faces(), 1);
//! assert!(mesh.is_valid());
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use quadrille::prelude::*;
//!
//! let mesh: HalfEdgeMesh = HalfEdgeMesh::create_polygon(5, 1.0).unwrap();
//!
//! // Iterate over neighbors of the centre vertex
//! let center = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(center) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//! assert!(!mesh.is_outer_vertex(center));
//!
//! // Get vertices of a face
//! let corners: Vec<VertexId> = mesh.face_vertices(FaceId::new(0)).collect();
//! assert_eq!(corners.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use quadrille::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_quads, to_face_vertex, BoundaryCursor, Face, FaceId, HalfEdge, HalfEdgeId,
        HalfEdgeMesh, MeshIndex, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
