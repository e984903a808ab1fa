//! Quad subdivision for arbitrary polygon meshes.

use log::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex};

use super::{midpoint_halfedges, SubdivideOptions};

/// Subdivide every face into quads.
///
/// Each face with n sides is replaced by n quads meeting at a new vertex at the
/// face centre. One iteration adds E + F vertices (one per edge and one per
/// face) and leaves the positions of existing vertices unchanged.
///
/// # Errors
/// - [`MeshError::DegenerateFace`] if a face has fewer than 3 sides (checked
///   before the mesh is modified)
/// - [`MeshError::CapacityExceeded`] if the result would not fit the index
///   type (also checked up front)
/// - [`MeshError::MidpointCount`], [`MeshError::UnlinkedHalfEdge`] or
///   [`MeshError::TraversalLimit`] if the topology is corrupt
pub fn quad_subdivide<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, options: &SubdivideOptions) -> Result<()> {
    for _ in 0..options.iterations {
        quad_subdivide_once(mesh)?;
    }
    Ok(())
}

/// Perform one iteration of quad subdivision.
fn quad_subdivide_once<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<()> {
    let mut faces: Vec<(FaceId<I>, usize)> = Vec::with_capacity(mesh.num_faces());
    for f in mesh.face_ids() {
        let sides = mesh.try_face_loop(f)?.len();
        if sides < 3 {
            return Err(MeshError::DegenerateFace { face: f.index() });
        }
        faces.push((f, sides));
    }

    // An n-gon gains a centre vertex, n spokes and n - 1 faces
    let edges = mesh.num_edges();
    let sides: usize = faces.iter().map(|&(_, n)| n).sum();
    mesh.check_capacity(edges + faces.len(), 2 * edges + 2 * sides, sides - faces.len())?;

    let faces_before = mesh.num_faces();
    let first_midpoint = mesh.num_vertices();
    mesh.split_all_edges();

    for (face, sides) in faces {
        let mids = midpoint_halfedges(mesh, face, first_midpoint, sides)?;

        let center = mesh.add_vertex(mesh.face_center(face));
        let m0 = mesh.origin(mids[0]);
        let m1 = mesh.origin(mids[1]);

        // The quad (centre, m0, corner, m1) is wired by hand
        let m0_prev = mesh.prev(mids[0]);
        let corner_out = mesh.next(mids[0]);
        let (e1, e2) = mesh.add_edge(center, m0);
        let (e3, e4) = mesh.add_edge(m1, center);

        let quad = mesh.add_face(e1);
        for he in [mids[0], corner_out, e3] {
            mesh.halfedge_mut(he).face = quad;
        }
        mesh.halfedge_mut(e2).face = face;
        mesh.halfedge_mut(e4).face = face;
        mesh.face_mut(face).halfedge = e4;

        mesh.set_next(e1, mids[0]);
        mesh.set_next(corner_out, e3);
        mesh.set_next(e3, e1);
        mesh.set_next(m0_prev, e2);
        mesh.set_next(e2, e4);
        mesh.set_next(e4, mids[1]);

        // The rest of the face is a fan around the centre; carve one quad per midpoint
        let mut spoke = e4;
        for &mid in &mids[2..] {
            let (_, old_side) = mesh.split_face(spoke, mid)?;
            spoke = old_side;
        }
    }

    debug!(
        "quad subdivision: {} faces -> {} faces, {} vertices",
        faces_before,
        mesh.num_faces(),
        mesh.num_vertices()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_quads, VertexId};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn create_two_quads() -> HalfEdgeMesh {
        // Two quads sharing an edge
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2, 3], [1, 4, 5, 2]];
        build_from_quads(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_quad_subdivide_single_quad() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_quad(Point3::origin(), 2.0, 2.0);

        quad_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        // 1 quad -> 4 quads
        assert_eq!(mesh.num_faces(), 4);
        // 4 original + 4 edge points + 1 face point = 9
        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.num_edges(), 12);
        assert!(mesh.all_faces_have_sides(4));
        assert!(mesh.is_valid());

        let center = VertexId::new(8);
        assert_relative_eq!(*mesh.position(center), Point3::origin());
        assert_eq!(mesh.valence(center), 4);
        assert!(!mesh.is_outer_vertex(center));
    }

    #[test]
    fn test_quad_subdivide_two_quads() {
        let mut mesh = create_two_quads();

        quad_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        // 2 quads -> 8 quads
        assert_eq!(mesh.num_faces(), 8);
        // 6 original + 7 edge points + 2 face points = 15
        assert_eq!(mesh.num_vertices(), 15);
        assert!(mesh.all_faces_have_sides(4));
        assert!(mesh.is_valid());
        assert_eq!(mesh.boundary_loops()[0].len(), 12);
    }

    #[test]
    fn test_quad_subdivide_triangle() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();

        quad_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.num_vertices(), 3 + 3 + 1);
        assert!(mesh.all_faces_have_sides(4));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_quad_subdivide_fan_counts() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_polygon(6, 1.0).unwrap();
        let (v, e, f) = (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces());

        quad_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        assert_eq!(mesh.num_vertices(), v + e + f);
        assert_eq!(mesh.num_faces(), 18);
        assert!(mesh.all_faces_have_sides(4));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_quad_subdivide_two_iterations() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_quad(Point3::origin(), 1.0, 1.0);

        quad_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();

        assert_eq!(mesh.num_faces(), 16);
        assert_eq!(mesh.num_vertices(), 25);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_quad_subdivide_keeps_corners() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_quad(Point3::new(1.0, 0.0, 1.0), 2.0, 4.0);
        let before: Vec<Point3<f64>> = mesh.vertices().map(|(_, v)| v.position).collect();

        quad_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        for (i, p) in before.iter().enumerate() {
            assert_relative_eq!(*mesh.position(VertexId::new(i)), *p);
        }
        // Edge points are created in edge order
        for i in 0..4 {
            let expected = before[i] + (before[(i + 1) % 4] - before[i]) * 0.5;
            assert_relative_eq!(*mesh.position(VertexId::new(4 + i)), expected);
        }
    }

    #[test]
    fn test_quad_subdivide_zero_iterations() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();

        quad_subdivide(&mut mesh, &SubdivideOptions::new(0)).unwrap();

        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_vertices(), 3);
    }

    #[test]
    fn test_quad_subdivide_rejects_overflowing_index() {
        let n = 100;
        let vertices: Vec<Point3<f64>> = (0..=n)
            .flat_map(|j| (0..=n).map(move |i| Point3::new(i as f64, j as f64, 0.0)))
            .collect();
        let faces: Vec<[usize; 4]> = (0..n)
            .flat_map(|j| {
                (0..n).map(move |i| {
                    let v00 = j * (n + 1) + i;
                    [v00, v00 + 1, v00 + n + 2, v00 + n + 1]
                })
            })
            .collect();
        let mut mesh: HalfEdgeMesh<u16> = build_from_quads(&vertices, &faces).unwrap();
        let slots = mesh.halfedge_slots();

        let result = quad_subdivide(&mut mesh, &SubdivideOptions::new(1));

        assert!(matches!(
            result,
            Err(MeshError::CapacityExceeded { kind: "half-edge", limit: 65535, .. })
        ));
        assert_eq!(mesh.num_faces(), n * n);
        assert_eq!(mesh.halfedge_slots(), slots);
    }
}
