//! Irregular quad grid generation.
//!
//! The pipeline chains the other algorithms:
//!
//! 1. A hexagon split into a fan of six triangles
//! 2. `subdivisions` rounds of [`triangle_subdivide`]
//! 3. [`dissolve_to_quads`] to pair random neighbouring triangles
//! 4. One round of [`quad_subdivide`], which turns quads and leftover
//!    triangles alike into quads
//! 5. `relax_iterations` passes of [`relax_vertices`]
//!
//! The result is an all-quad mesh whose outline is the subdivided hexagon and
//! whose interior vertices have mixed valence.

use log::debug;

use super::quadrangulate::dissolve_to_quads;
use super::smooth::{relax_vertices, RelaxOptions};
use super::subdivide::{quad_subdivide, triangle_subdivide, SubdivideOptions};
use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Options for [`irregular_grid`].
#[derive(Debug, Clone)]
pub struct GridOptions {
    /// Distance from the centre to each hexagon corner.
    pub radius: f64,

    /// Rounds of triangle subdivision before pairing.
    pub subdivisions: usize,

    /// Relaxation passes on the final quad mesh.
    pub relax_iterations: usize,

    /// Seed for the random triangle pairing.
    pub seed: u64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            subdivisions: 2,
            relax_iterations: 5,
            seed: 0,
        }
    }
}

impl GridOptions {
    /// Set the hexagon radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the number of triangle subdivision rounds.
    pub fn with_subdivisions(mut self, subdivisions: usize) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    /// Set the number of relaxation passes.
    pub fn with_relax_iterations(mut self, iterations: usize) -> Self {
        self.relax_iterations = iterations;
        self
    }

    /// Set the pairing seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Build an irregular all-quad grid on a hexagon.
///
/// # Errors
/// [`MeshError::InvalidParameter`] if the radius is not a positive finite
/// number. Other errors mean a broken invariant in one of the stages.
///
/// [`MeshError::InvalidParameter`]: crate::error::MeshError::InvalidParameter
///
/// # Example
///
/// ```
/// use quadrille::prelude::*;
/// use quadrille::algo::grid::{irregular_grid, GridOptions};
///
/// let mesh: HalfEdgeMesh = irregular_grid(&GridOptions::default().with_seed(7)).unwrap();
/// assert!(mesh.all_faces_have_sides(4));
/// assert!(mesh.is_valid());
/// ```
pub fn irregular_grid<I: MeshIndex>(options: &GridOptions) -> Result<HalfEdgeMesh<I>> {
    let mut mesh = HalfEdgeMesh::create_polygon(6, options.radius)?;

    triangle_subdivide(&mut mesh, &SubdivideOptions::new(options.subdivisions))?;
    let dissolved = dissolve_to_quads(&mut mesh, options.seed)?;
    quad_subdivide(&mut mesh, &SubdivideOptions::new(1))?;
    relax_vertices(
        &mut mesh,
        &RelaxOptions::default().with_iterations(options.relax_iterations),
    );

    debug!(
        "irregular grid (seed {}): {} pairs merged, {} quads, {} vertices",
        options.seed,
        dissolved.len(),
        mesh.num_faces(),
        mesh.num_vertices()
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_grid() {
        let mesh: HalfEdgeMesh = irregular_grid(&GridOptions::default()).unwrap();

        assert!(mesh.all_faces_have_sides(4));
        assert!(mesh.is_valid());

        let loops = mesh.boundary_loops();
        assert_eq!(loops.len(), 1);
        // 24 sides after two triangle rounds, doubled by the quad round
        assert_eq!(loops[0].len(), 48);
    }

    #[test]
    fn test_grid_without_subdivision() {
        let options = GridOptions::default().with_subdivisions(0).with_relax_iterations(0);
        let mesh: HalfEdgeMesh = irregular_grid(&options).unwrap();

        // k merged quads become 4 quads each, the 6 - 2k leftover triangles 3 each.
        // A maximal pairing on the hexagon fan has k = 2 or k = 3.
        let faces = mesh.num_faces();
        assert!(faces == 12 || faces == 14, "{} faces", faces);
        assert!(mesh.all_faces_have_sides(4));
    }

    #[test]
    fn test_outline_is_kept() {
        let mesh: HalfEdgeMesh = irregular_grid(&GridOptions::default().with_radius(2.5)).unwrap();

        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(max.x, 2.5, epsilon = 1e-12);
        assert_relative_eq!(min.x, -2.5, epsilon = 1e-12);
        assert_relative_eq!(min.y, 0.0);
        assert_relative_eq!(max.y, 0.0);
    }

    #[test]
    fn test_seed_is_deterministic() {
        let options = GridOptions::default().with_seed(99);
        let a: HalfEdgeMesh = irregular_grid(&options).unwrap();
        let b: HalfEdgeMesh = irregular_grid(&options).unwrap();

        assert_eq!(a.num_faces(), b.num_faces());
        for v in a.vertex_ids() {
            assert_eq!(a.position(v), b.position(v));
        }
    }

    #[test]
    fn test_invalid_radius() {
        let result: Result<HalfEdgeMesh> = irregular_grid(&GridOptions::default().with_radius(-1.0));
        assert!(matches!(
            result,
            Err(MeshError::InvalidParameter { name: "radius", .. })
        ));
    }
}
