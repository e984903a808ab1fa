//! Vertex relaxation.
//!
//! Relaxation evens out an irregular grid by moving each interior vertex to the
//! average of the centres of the faces around it. Boundary vertices never move,
//! so the outline of the mesh is preserved exactly.
//!
//! A sequential pass moves vertices in place in id order, so later vertices
//! already see the new positions of earlier ones. A parallel pass computes
//! every new position from the positions at the start of the pass and writes
//! them back together. Both passes share the same fixed point.
//!
//! # Example
//!
//! ```
//! use quadrille::prelude::*;
//! use quadrille::algo::smooth::{relax_vertices, RelaxOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(1.3, 1.2, 0.0), // off centre
//!     Point3::new(2.0, 1.0, 0.0),
//!     Point3::new(0.0, 2.0, 0.0),
//!     Point3::new(1.0, 2.0, 0.0),
//!     Point3::new(2.0, 2.0, 0.0),
//! ];
//! let faces = [[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]];
//! let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &faces).unwrap();
//!
//! relax_vertices(&mut mesh, &RelaxOptions::default().with_iterations(20));
//! assert!((mesh.position(VertexId::new(4)) - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-6);
//! ```

use log::debug;
use nalgebra::Point3;
use rayon::prelude::*;

use crate::mesh::{HalfEdgeMesh, MeshIndex, VertexId};

/// Options for vertex relaxation.
#[derive(Debug, Clone)]
pub struct RelaxOptions {
    /// Number of relaxation passes.
    pub iterations: usize,

    /// Whether to compute new positions in parallel from the start-of-pass
    /// positions (default: false, update in place).
    pub parallel: bool,
}

impl Default for RelaxOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            parallel: false,
        }
    }
}

impl RelaxOptions {
    /// Create options with the specified number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Move every interior vertex to the mean of its incident face centres.
///
/// Outer vertices, and vertices that touch no face, keep their position.
/// Returns the number of vertices moved in the last pass.
pub fn relax_vertices<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, options: &RelaxOptions) -> usize {
    let mut moved = 0;
    for _ in 0..options.iterations {
        moved = relax_pass(mesh, options.parallel);
    }
    debug!(
        "relaxed {} vertices over {} passes",
        moved, options.iterations
    );
    moved
}

fn relax_pass<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, parallel: bool) -> usize {
    if parallel {
        relax_pass_parallel(mesh)
    } else {
        relax_pass_in_place(mesh)
    }
}

/// Move inner vertices one after another, in id order.
fn relax_pass_in_place<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> usize {
    let mut moved = 0;
    for i in 0..mesh.num_vertices() {
        let v = VertexId::new(i);
        if !mesh.is_outer_vertex(v) && mesh.relax_vertex(v) {
            moved += 1;
        }
    }
    moved
}

/// Compute all targets from the current positions, then write them back.
fn relax_pass_parallel<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> usize {
    let num_vertices = mesh.num_vertices();

    let targets: Vec<(VertexId<I>, Point3<f64>)> = {
        let mesh = &*mesh;
        (0..num_vertices)
            .into_par_iter()
            .filter_map(|i| relax_target(mesh, VertexId::new(i)))
            .collect()
    };

    let moved = targets.len();
    for (v, p) in targets {
        mesh.set_position(v, p);
    }
    moved
}

fn relax_target<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> Option<(VertexId<I>, Point3<f64>)> {
    if mesh.is_outer_vertex(v) {
        return None;
    }
    mesh.relaxed_position(v).map(|p| (v, p))
}
