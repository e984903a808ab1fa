//! Mesh construction.
//!
//! Primitive shapes are built edge by edge with the mesh's own factory
//! primitives. Imported quad data arrives as a flat index array plus a position
//! array, the way engines hand out quad topology.

use std::collections::HashMap;
use std::f64::consts::TAU;

use log::{debug, warn};
use nalgebra::{Point3, Rotation3, Vector3};

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// A single triangle with corners on the unit circle in the XZ plane.
    ///
    /// The corners sit at 0°, 120° and 240° around the +Y axis, starting on +X.
    pub fn create_triangle() -> Self {
        let corners: Vec<Point3<f64>> = (0..3)
            .map(|i| Point3::from(circle_point(i as f64 * TAU / 3.0, 1.0)))
            .collect();
        Self::single_polygon(&corners)
    }

    /// A single quad in the XZ plane centred on `origin`.
    ///
    /// `width` runs along X and `height` along Z.
    pub fn create_quad(origin: Point3<f64>, width: f64, height: f64) -> Self {
        let hw = width * 0.5;
        let hh = height * 0.5;
        Self::create_quad_from_corners(
            origin + Vector3::new(-hw, 0.0, hh),
            origin + Vector3::new(hw, 0.0, hh),
            origin + Vector3::new(hw, 0.0, -hh),
            origin + Vector3::new(-hw, 0.0, -hh),
        )
    }

    /// A single quad with the given corners in boundary order.
    pub fn create_quad_from_corners(
        p0: Point3<f64>,
        p1: Point3<f64>,
        p2: Point3<f64>,
        p3: Point3<f64>,
    ) -> Self {
        Self::single_polygon(&[p0, p1, p2, p3])
    }

    /// A regular polygon in the XZ plane split into a fan of triangles.
    ///
    /// Vertex 0 is the centre; the rim vertices follow in order, the first on +X.
    /// The rim forms one boundary loop of `sides` half-edges.
    ///
    /// # Errors
    /// [`MeshError::InvalidParameter`] if `sides < 3` or `radius` is not a
    /// positive finite number.
    pub fn create_polygon(sides: usize, radius: f64) -> Result<Self> {
        if sides < 3 {
            return Err(MeshError::invalid_param("sides", sides, "must be at least 3"));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(MeshError::invalid_param("radius", radius, "must be positive"));
        }

        let mut mesh = Self::with_capacity(sides + 1, sides * 4, sides);
        let center = mesh.add_vertex(Point3::origin());

        let mut spokes = Vec::with_capacity(sides);
        for i in 0..sides {
            let angle = i as f64 * TAU / sides as f64;
            let v = mesh.add_vertex(Point3::from(circle_point(angle, radius)));
            spokes.push(mesh.add_edge(center, v));
        }

        let mut outer = Vec::with_capacity(sides);
        for i in 0..sides {
            let j = (i + 1) % sides;
            let (out_i, _) = spokes[i];
            let (_, in_j) = spokes[j];
            let (rim_inner, rim_outer) = mesh.add_edge(VertexId::new(i + 1), VertexId::new(j + 1));

            // centre -> rim i -> rim j -> centre
            mesh.set_next(out_i, rim_inner);
            mesh.set_next(rim_inner, in_j);
            mesh.set_next(in_j, out_i);

            let f = mesh.add_face(out_i);
            mesh.halfedge_mut(rim_inner).face = f;
            mesh.halfedge_mut(in_j).face = f;

            outer.push(rim_outer);
        }

        // The rim runs the other way round on the boundary
        for i in 0..sides {
            mesh.set_next(outer[(i + 1) % sides], outer[i]);
        }

        Ok(mesh)
    }

    /// Rebuild half-edge topology from flat quad indices.
    ///
    /// `indices` holds four corner indices per quad, in boundary order, into
    /// `positions`. Edges shared by two quads become one twin pair. Unpaired
    /// half-edges are linked into one boundary loop per boundary component, and
    /// every boundary vertex is pointed at its outgoing boundary half-edge.
    ///
    /// # Errors
    /// - [`MeshError::UnsupportedArity`] if the index count is not a multiple of 4
    /// - [`MeshError::EmptyMesh`] if there are no quads
    /// - [`MeshError::InvalidVertexIndex`] / [`MeshError::DegenerateFace`] for bad quads
    /// - [`MeshError::NonManifoldEdge`] if two quads use the same directed edge
    /// - [`MeshError::CapacityExceeded`] if the mesh does not fit the index type
    pub fn from_imported_quad_mesh(indices: &[usize], positions: &[Point3<f64>]) -> Result<Self> {
        if indices.len() % 4 != 0 {
            warn!(
                "rejecting import: {} indices do not describe quads",
                indices.len()
            );
            return Err(MeshError::UnsupportedArity {
                indices: indices.len(),
            });
        }
        if indices.is_empty() {
            return Err(MeshError::EmptyMesh);
        }

        for (fi, quad) in indices.chunks_exact(4).enumerate() {
            if let Some(&vi) = quad.iter().find(|&&vi| vi >= positions.len()) {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            for i in 0..4 {
                if quad[i + 1..].contains(&quad[i]) {
                    return Err(MeshError::DegenerateFace { face: fi });
                }
            }
        }

        let num_quads = indices.len() / 4;
        let mut mesh = Self::with_capacity(positions.len(), num_quads * 5, num_quads);
        mesh.check_capacity(positions.len(), 0, num_quads)?;
        let vertex_ids: Vec<VertexId<I>> = positions.iter().map(|&p| mesh.add_vertex(p)).collect();

        // Directed edge (v0, v1) to half-edge
        let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::new();

        for quad in indices.chunks_exact(4) {
            let mut sides = [HalfEdgeId::invalid(); 4];
            for i in 0..4 {
                let (a, b) = (quad[i], quad[(i + 1) % 4]);
                let he = match edge_map.get(&(a, b)) {
                    Some(&he) => he,
                    None => {
                        mesh.check_capacity(0, 2, 0)?;
                        let (e1, e2) = mesh.add_edge(vertex_ids[a], vertex_ids[b]);
                        edge_map.insert((a, b), e1);
                        edge_map.insert((b, a), e2);
                        e1
                    }
                };
                if !mesh.is_boundary_halfedge(he) {
                    return Err(MeshError::NonManifoldEdge { v0: a, v1: b });
                }
                sides[i] = he;
            }

            for i in 0..4 {
                mesh.set_next(sides[i], sides[(i + 1) % 4]);
            }
            let f = mesh.add_face(sides[0]);
            for &he in &sides[1..] {
                mesh.halfedge_mut(he).face = f;
            }
        }

        link_boundary_loops(&mut mesh)?;
        fix_boundary_vertex_halfedges(&mut mesh);

        debug!(
            "imported {} quads: {} vertices, {} edges",
            mesh.num_faces(),
            mesh.num_vertices(),
            mesh.num_edges()
        );
        Ok(mesh)
    }

    /// One polygon face and its boundary loop.
    fn single_polygon(corners: &[Point3<f64>]) -> Self {
        let n = corners.len();
        let mut mesh = Self::with_capacity(n, n * 2, 1);
        let verts: Vec<VertexId<I>> = corners.iter().map(|&p| mesh.add_vertex(p)).collect();
        let pairs: Vec<_> = (0..n)
            .map(|i| mesh.add_edge(verts[i], verts[(i + 1) % n]))
            .collect();

        for i in 0..n {
            let (inner, outer) = pairs[i];
            let (next_inner, next_outer) = pairs[(i + 1) % n];
            mesh.set_next(inner, next_inner);
            mesh.set_next(next_outer, outer);
        }

        let f = mesh.add_face(pairs[0].0);
        for &(inner, _) in &pairs[1..] {
            mesh.halfedge_mut(inner).face = f;
        }
        mesh
    }
}

/// Point at `angle` radians around +Y on a circle of `radius` in the XZ plane.
fn circle_point(angle: f64, radius: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), angle) * (Vector3::x() * radius)
}

/// Link boundary half-edges into loops.
///
/// The successor of a boundary half-edge `a -> b` is the boundary half-edge
/// leaving `b` in the same fan of faces. It is found by rotating around `b`
/// from `b -> a` across faces only, so the walk never follows a boundary link
/// that has not been set yet.
fn link_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<()> {
    let boundary: Vec<HalfEdgeId<I>> = mesh
        .halfedges()
        .filter(|(_, he)| he.is_boundary())
        .map(|(id, _)| id)
        .collect();

    let mut successors = Vec::with_capacity(boundary.len());
    let limit = mesh.halfedge_slots();
    for &he in &boundary {
        let mut current = mesh.twin(he);
        let mut found = None;
        for _ in 0..limit {
            let candidate = mesh.twin(mesh.prev(current));
            if mesh.is_boundary_halfedge(candidate) {
                found = Some(candidate);
                break;
            }
            current = candidate;
        }
        match found {
            Some(next) => successors.push((he, next)),
            None => {
                return Err(MeshError::TraversalLimit {
                    start: he.index(),
                    limit,
                })
            }
        }
    }

    for (he, next) in successors {
        mesh.set_next(he, next);
    }
    Ok(())
}

/// Point boundary vertices at a boundary half-edge leaving them.
fn fix_boundary_vertex_halfedges<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    let boundary: Vec<(VertexId<I>, HalfEdgeId<I>)> = mesh
        .halfedges()
        .filter(|(_, he)| he.is_boundary())
        .map(|(id, he)| (he.origin, id))
        .collect();

    for (v, he) in boundary {
        mesh.vertex_mut(v).halfedge = he;
    }
}

/// Build a half-edge mesh from vertices and quad faces.
///
/// # Example
/// ```
/// use quadrille::mesh::{build_from_quads, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.num_halfedges(), 8);
/// ```
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<HalfEdgeMesh<I>> {
    let indices: Vec<usize> = faces.iter().flatten().copied().collect();
    HalfEdgeMesh::from_imported_quad_mesh(&indices, vertices)
}

/// Convert a mesh to positions plus one index list per live face.
///
/// Indices refer to vertex slots, so vertices that no face uses are kept.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertices().map(|(_, v)| v.position).collect();
    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();
    (vertices, faces)
}
