//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation and the local
//! editing operators the algorithms in [`crate::algo`] are built from.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], a polygon mesh stored as a half-edge
//! (doubly-connected edge list) structure. Faces may have any number of sides.
//! Each face is bounded by a cycle of half-edges, and each open boundary is a
//! cycle of faceless half-edges, so every half-edge always has a `next` and a
//! `prev`.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size. Ids stay
//! stable while the mesh is edited: removed half-edges and faces leave a
//! tombstone and their slots are never reused.
//!
//! # Construction
//!
//! Meshes come from the shape factories or from imported quad data:
//!
//! ```
//! use quadrille::mesh::{HalfEdgeMesh, build_from_quads};
//! use nalgebra::Point3;
//!
//! let hexagon: HalfEdgeMesh = HalfEdgeMesh::create_polygon(6, 1.0).unwrap();
//! assert_eq!(hexagon.num_faces(), 6);
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let quad: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//! assert_eq!(quad.boundary_loops().len(), 1);
//! ```

mod builder;
mod edit;
mod halfedge;
mod index;
mod traverse;
mod validate;

pub use builder::{build_from_quads, to_face_vertex};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use traverse::{BoundaryCursor, LoopHalfEdgeIter, VertexHalfEdgeIter, STRAIGHT_TOLERANCE};
pub use validate::{TopologyIssue, ValidationReport};
