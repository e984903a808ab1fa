//! Mesh processing algorithms.
//!
//! This module contains the whole-mesh operators built on the local edits in
//! [`crate::mesh`]:
//!
//! - **Subdivision**: quad subdivision of any polygon mesh, midpoint
//!   subdivision of triangle meshes
//! - **Quadrangulation**: randomized pairing of triangles into quads
//! - **Smoothing**: relaxation of interior vertices towards face centres
//! - **Grids**: the irregular quad grid pipeline combining all of the above

pub mod grid;
pub mod quadrangulate;
pub mod smooth;
pub mod subdivide;
