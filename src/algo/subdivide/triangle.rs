//! Midpoint subdivision for triangle meshes.

use log::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex, VertexId};

use super::{midpoint_halfedges, SubdivideOptions};

/// Split every triangle into four.
///
/// Edges are split at their midpoints and each triangle is cut into three
/// corner triangles around a central triangle, which keeps the original face
/// id. Existing vertices do not move.
///
/// # Errors
/// - [`MeshError::NotTriangle`] if any face is not a triangle (checked before
///   the mesh is modified)
/// - [`MeshError::CapacityExceeded`] if the result would not fit the index
///   type (also checked up front)
/// - [`MeshError::MidpointCount`], [`MeshError::UnlinkedHalfEdge`] or
///   [`MeshError::TraversalLimit`] if the topology is corrupt
pub fn triangle_subdivide<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SubdivideOptions,
) -> Result<()> {
    for _ in 0..options.iterations {
        triangle_subdivide_once(mesh)?;
    }
    Ok(())
}

/// Perform one iteration of triangle subdivision.
fn triangle_subdivide_once<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<()> {
    let mut faces: Vec<FaceId<I>> = Vec::with_capacity(mesh.num_faces());
    for f in mesh.face_ids() {
        let sides = mesh.try_face_loop(f)?.len();
        if sides != 3 {
            return Err(MeshError::NotTriangle {
                face: f.index(),
                sides,
            });
        }
        faces.push(f);
    }

    // One midpoint per edge, three new edges and three corner faces per triangle
    let edges = mesh.num_edges();
    mesh.check_capacity(edges, 2 * edges + 6 * faces.len(), 3 * faces.len())?;

    let first_midpoint = mesh.num_vertices();
    mesh.split_all_edges();

    for &face in &faces {
        let mids = midpoint_halfedges(mesh, face, first_midpoint, 3)?;
        let mid_vertices: Vec<VertexId<I>> = mids.iter().map(|&he| mesh.origin(he)).collect();

        for j in 0..3 {
            let current = mids[j];
            let into_mid = mesh.prev(current);
            let corner_out = mesh.next(current);
            let next_mid = mesh.next(corner_out);

            // e1 closes the corner triangle, e2 takes its place on the remaining face
            let (e1, e2) = mesh.add_edge(mid_vertices[(j + 1) % 3], mid_vertices[j]);
            let corner = mesh.add_face(e1);
            mesh.halfedge_mut(current).face = corner;
            mesh.halfedge_mut(corner_out).face = corner;
            mesh.halfedge_mut(e2).face = face;
            mesh.face_mut(face).halfedge = e2;

            mesh.set_next(e2, next_mid);
            mesh.set_next(into_mid, e2);
            mesh.set_next(corner_out, e1);
            mesh.set_next(e1, current);
        }
    }

    debug!(
        "triangle subdivision: {} faces -> {} faces, {} vertices",
        faces.len(),
        mesh.num_faces(),
        mesh.num_vertices()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_triangle_subdivide_single() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();

        triangle_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        // 1 triangle -> 4 triangles
        assert_eq!(mesh.num_faces(), 4);
        // 3 original + 3 edge points
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_edges(), 9);
        assert!(mesh.all_faces_have_sides(3));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_central_triangle_keeps_face_id() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();

        triangle_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        let central = FaceId::new(0);
        let mut corners: Vec<usize> = mesh.face_vertices(central).map(|v| v.index()).collect();
        corners.sort_unstable();
        assert_eq!(corners, vec![3, 4, 5]);
        assert_eq!(mesh.face_neighbors(central).len(), 3);
    }

    #[test]
    fn test_triangle_subdivide_fan() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_polygon(6, 1.0).unwrap();

        triangle_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();

        assert_eq!(mesh.num_faces(), 96);
        assert!(mesh.all_faces_have_sides(3));
        assert!(mesh.is_valid());

        let loops = mesh.boundary_loops();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 24);
        // The outline does not move
        for he in &loops[0] {
            let p = mesh.position(mesh.origin(*he));
            assert!(p.coords.norm() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_triangle_subdivide_keeps_area() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();
        let area = |m: &HalfEdgeMesh| -> f64 {
            m.face_ids()
                .map(|f| {
                    let p: Vec<Point3<f64>> = m.face_vertices(f).map(|v| *m.position(v)).collect();
                    (p[1] - p[0]).cross(&(p[2] - p[0])).norm() * 0.5
                })
                .sum()
        };
        let before = area(&mesh);

        triangle_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        assert_relative_eq!(area(&mesh), before, epsilon = 1e-12);
        for f in mesh.face_ids() {
            let p: Vec<Point3<f64>> = mesh.face_vertices(f).map(|v| *mesh.position(v)).collect();
            assert_relative_eq!(
                (p[1] - p[0]).cross(&(p[2] - p[0])).norm() * 0.5,
                before / 4.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_triangle_subdivide_rejects_quads() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_quad(Point3::origin(), 1.0, 1.0);

        let result = triangle_subdivide(&mut mesh, &SubdivideOptions::new(1));

        assert_eq!(result, Err(MeshError::NotTriangle { face: 0, sides: 4 }));
        // Nothing was modified
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_halfedges(), 8);
    }

    #[test]
    fn test_triangle_subdivide_stops_before_index_overflow() {
        let mut mesh: HalfEdgeMesh<u16> = HalfEdgeMesh::create_polygon(6, 1.0).unwrap();

        // The sixth round would need 74112 half-edge slots
        let result = triangle_subdivide(&mut mesh, &SubdivideOptions::new(6));

        assert!(matches!(
            result,
            Err(MeshError::CapacityExceeded { kind: "half-edge", required: 74112, .. })
        ));
        assert_eq!(mesh.num_faces(), 6 * 4usize.pow(5));
        assert!(mesh.is_valid());
    }
}
