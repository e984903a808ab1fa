//! Local topology edits.
//!
//! Every operator here maps a valid mesh to a valid mesh: twin, `next`/`prev`,
//! origin and face links stay consistent, and every vertex and face keeps a
//! representative half-edge that is still part of the mesh. Preconditions are
//! checked before anything is modified, so a failed call leaves the mesh as it
//! was.

use log::debug;

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Find the half-edge from `a` to `b` by walking `a`'s one-ring.
    ///
    /// Returns `Ok(None)` if the vertices are not connected.
    ///
    /// # Errors
    /// - [`MeshError::SameVertex`] if `a == b`
    /// - [`MeshError::UnlinkedHalfEdge`] / [`MeshError::TraversalLimit`] if the ring is broken
    pub fn find_edge(&self, a: VertexId<I>, b: VertexId<I>) -> Result<Option<HalfEdgeId<I>>> {
        if a == b {
            return Err(MeshError::SameVertex(a.index()));
        }
        let ring = self.try_vertex_ring(a)?;
        Ok(ring.into_iter().find(|&he| self.dest(he) == b))
    }

    /// Find the half-edge from `a` to `b` by scanning every half-edge.
    ///
    /// This works before any `next`/`prev` links exist, at O(n) cost.
    pub fn get_edge(&self, a: VertexId<I>, b: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.halfedges()
            .find(|(_, he)| he.origin == a && self.origin(he.twin) == b)
            .map(|(id, _)| id)
    }

    /// Return the twin pair `(a -> b, b -> a)`, creating it if it does not exist.
    pub fn get_or_add_edge(
        &mut self,
        a: VertexId<I>,
        b: VertexId<I>,
    ) -> (HalfEdgeId<I>, HalfEdgeId<I>) {
        match self.get_edge(a, b) {
            Some(he) => (he, self.twin(he)),
            None => self.add_edge(a, b),
        }
    }

    /// Remove edge `e` and merge the faces on its two sides.
    ///
    /// The face of `e` survives and is returned. The face of `twin(e)` and both
    /// half-edges are removed. The endpoints of `e` and the surviving face are
    /// re-pointed at half-edges that remain.
    ///
    /// # Errors
    /// - [`MeshError::BoundaryEdge`] if either side of `e` has no face
    /// - [`MeshError::SameFaceEdge`] if both sides belong to the same face
    pub fn dissolve_edge(&mut self, e: HalfEdgeId<I>) -> Result<FaceId<I>> {
        let t = self.twin(e);
        let keep = self.face_of(e);
        let drop = self.face_of(t);

        if !keep.is_valid() || !drop.is_valid() {
            return Err(MeshError::BoundaryEdge(e.index()));
        }
        if keep == drop {
            return Err(MeshError::SameFaceEdge {
                halfedge: e.index(),
                face: keep.index(),
            });
        }

        let e_prev = self.prev(e);
        let e_next = self.next(e);
        let t_prev = self.prev(t);
        let t_next = self.next(t);

        self.set_next(e_prev, t_next);
        self.set_next(t_prev, e_next);

        let a = self.origin(e);
        let b = self.origin(t);
        self.vertex_mut(a).halfedge = self.twin(e_prev);
        self.vertex_mut(b).halfedge = e_next;
        self.face_mut(keep).halfedge = e_next;

        for he in self.try_loop(e_next)? {
            self.halfedge_mut(he).face = keep;
        }

        self.remove_face(drop);
        self.remove_edge(e);

        Ok(keep)
    }

    /// Insert a vertex at the midpoint of edge `e`.
    ///
    /// `e` keeps its origin and now ends at the new vertex; a new twin pair runs
    /// from the new vertex to the old destination. Each new half-edge takes the
    /// face of the side it lies on, so both sides gain one side. Works on
    /// boundary edges too.
    pub fn split_edge(&mut self, e: HalfEdgeId<I>) -> VertexId<I> {
        let t = self.twin(e);
        let b = self.origin(t);

        let v = self.add_vertex(self.edge_midpoint(e));
        let (e1, e2) = self.add_edge(v, b);
        self.halfedge_mut(e1).face = self.face_of(e);
        self.halfedge_mut(e2).face = self.face_of(t);

        self.halfedge_mut(t).origin = v;

        let e_next = self.next(e);
        let t_prev = self.prev(t);

        // a -e-> v -e1-> b on one side, b -e2-> v -t-> a on the other
        self.set_next(e1, e_next);
        self.set_next(e, e1);
        self.set_next(t_prev, e2);
        self.set_next(e2, t);

        v
    }

    /// Split every edge once at its midpoint.
    ///
    /// Only edges that exist when the call starts are split. Returns the new
    /// midpoint vertices in the order of the edges they split.
    pub fn split_all_edges(&mut self) -> Vec<VertexId<I>> {
        let slots = self.halfedge_slots();
        let mut midpoints = Vec::with_capacity(slots / 2);

        for i in (0..slots).step_by(2) {
            let he = HalfEdgeId::new(i);
            if self.contains_halfedge(he) {
                midpoints.push(self.split_edge(he));
            }
        }

        debug!("split {} edges", midpoints.len());
        midpoints
    }

    /// Split a face along a new diagonal between the origins of `a_out` and `b_out`.
    ///
    /// Returns `(new_side, old_side)`: `new_side` runs from `b_out`'s origin to
    /// `a_out`'s origin and bounds a newly created face, `old_side` runs the
    /// other way and becomes the representative of the original face.
    ///
    /// # Errors
    /// - [`MeshError::NoCommonFace`] if the half-edges do not bound the same face
    /// - [`MeshError::AdjacentVertices`] if their origins are already connected
    ///   along the face (or are the same corner)
    pub fn split_face(
        &mut self,
        a_out: HalfEdgeId<I>,
        b_out: HalfEdgeId<I>,
    ) -> Result<(HalfEdgeId<I>, HalfEdgeId<I>)> {
        let face = self.face_of(a_out);
        if !face.is_valid() || face != self.face_of(b_out) {
            return Err(MeshError::NoCommonFace {
                a: a_out.index(),
                b: b_out.index(),
            });
        }
        if a_out == b_out || self.next(a_out) == b_out || self.prev(a_out) == b_out {
            return Err(MeshError::AdjacentVertices {
                a: a_out.index(),
                b: b_out.index(),
            });
        }

        let a = self.origin(a_out);
        let b = self.origin(b_out);
        let a_prev = self.prev(a_out);
        let b_prev = self.prev(b_out);

        let (new_side, old_side) = self.add_edge(b, a);
        let new_face = self.add_face(new_side);
        self.face_mut(face).halfedge = old_side;
        self.halfedge_mut(old_side).face = face;

        self.set_next(a_prev, old_side);
        self.set_next(b_prev, new_side);
        self.set_next(new_side, a_out);
        self.set_next(old_side, b_out);

        for he in self.try_loop(new_side)? {
            self.halfedge_mut(he).face = new_face;
        }

        Ok((new_side, old_side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    /// Two triangles sharing the edge 0-1.
    fn two_triangles() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let mut mesh = HalfEdgeMesh::new();
        let v: Vec<_> = vertices.into_iter().map(|p| mesh.add_vertex(p)).collect();

        let (e01, e10) = mesh.add_edge(v[0], v[1]);
        let (e12, e21) = mesh.add_edge(v[1], v[2]);
        let (e20, e02) = mesh.add_edge(v[2], v[0]);
        let (e03, e30) = mesh.add_edge(v[0], v[3]);
        let (e31, e13) = mesh.add_edge(v[3], v[1]);

        mesh.set_next(e01, e12);
        mesh.set_next(e12, e20);
        mesh.set_next(e20, e01);
        let f0 = mesh.add_face(e01);
        mesh.halfedge_mut(e12).face = f0;
        mesh.halfedge_mut(e20).face = f0;

        mesh.set_next(e10, e03);
        mesh.set_next(e03, e31);
        mesh.set_next(e31, e10);
        let f1 = mesh.add_face(e10);
        mesh.halfedge_mut(e03).face = f1;
        mesh.halfedge_mut(e31).face = f1;

        // Outer loop 0 -> 2 -> 1 -> 3 -> 0
        mesh.set_next(e02, e21);
        mesh.set_next(e21, e13);
        mesh.set_next(e13, e30);
        mesh.set_next(e30, e02);

        mesh.vertex_mut(v[0]).halfedge = e02;
        mesh.vertex_mut(v[1]).halfedge = e13;
        mesh.vertex_mut(v[2]).halfedge = e21;
        mesh.vertex_mut(v[3]).halfedge = e30;

        assert!(mesh.is_valid());
        mesh
    }

    #[test]
    fn test_find_edge() {
        let mesh = two_triangles();
        let a = VertexId::new(0);
        let b = VertexId::new(1);

        let he = mesh.find_edge(a, b).unwrap().unwrap();
        assert_eq!(mesh.origin(he), a);
        assert_eq!(mesh.dest(he), b);
        assert_eq!(Some(he), mesh.get_edge(a, b));

        // 2 and 3 are not connected
        assert_eq!(mesh.find_edge(VertexId::new(2), VertexId::new(3)).unwrap(), None);
        assert!(mesh.get_edge(VertexId::new(2), VertexId::new(3)).is_none());
    }

    #[test]
    fn test_find_edge_same_vertex() {
        let mesh = two_triangles();
        let v = VertexId::new(2);
        assert_eq!(mesh.find_edge(v, v), Err(MeshError::SameVertex(2)));
    }

    #[test]
    fn test_get_or_add_edge() {
        let mut mesh = two_triangles();
        let (he, twin) = mesh.get_or_add_edge(VertexId::new(1), VertexId::new(0));
        assert_eq!(mesh.twin(he), twin);
        assert_eq!(mesh.num_halfedges(), 10);

        let (he, twin) = mesh.get_or_add_edge(VertexId::new(2), VertexId::new(3));
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.origin(he), VertexId::new(2));
        assert_eq!(mesh.origin(twin), VertexId::new(3));
    }

    #[test]
    fn test_dissolve_edge() {
        let mut mesh = two_triangles();
        let shared = mesh.get_edge(VertexId::new(0), VertexId::new(1)).unwrap();
        let f = mesh.dissolve_edge(shared).unwrap();

        assert_eq!(f, FaceId::new(0));
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_halfedges(), 8);
        assert_eq!(mesh.face_side_count(f), 4);
        assert!(!mesh.contains_face(FaceId::new(1)));
        assert!(mesh.face_halfedges(f).all(|he| mesh.face_of(he) == f));
        assert!(mesh.is_valid());

        // Vertices 0 and 1 are now corners of a quad with no diagonal
        assert_eq!(mesh.find_edge(VertexId::new(0), VertexId::new(1)).unwrap(), None);
        assert_eq!(mesh.valence(VertexId::new(0)), 2);
    }

    #[test]
    fn test_dissolve_boundary_edge_fails() {
        let mut mesh = two_triangles();
        let outer = mesh.get_edge(VertexId::new(1), VertexId::new(2)).unwrap();
        let before = format!("{:?}", mesh);

        assert_eq!(
            mesh.dissolve_edge(outer),
            Err(MeshError::BoundaryEdge(outer.index()))
        );
        let twin = mesh.twin(outer);
        assert!(mesh.dissolve_edge(twin).is_err());
        assert_eq!(format!("{:?}", mesh), before);
    }

    #[test]
    fn test_split_interior_edge() {
        let mut mesh = two_triangles();
        let shared = mesh.get_edge(VertexId::new(0), VertexId::new(1)).unwrap();
        let (f0, f1) = (FaceId::new(0), FaceId::new(1));

        let v = mesh.split_edge(shared);

        assert_eq!(mesh.num_vertices(), 5);
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.face_side_count(f0), 4);
        assert_eq!(mesh.face_side_count(f1), 4);
        assert_eq!(*mesh.position(v), Point3::new(0.5, 0.0, 0.0));
        assert_eq!(mesh.dest(shared), v);
        assert!(mesh.is_straight(v));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_split_boundary_edge() {
        let mut mesh = two_triangles();
        let outer = mesh.get_edge(VertexId::new(1), VertexId::new(2)).unwrap();
        mesh.split_edge(outer);

        assert_eq!(mesh.face_side_count(FaceId::new(0)), 4);
        assert_eq!(mesh.face_side_count(FaceId::new(1)), 3);
        let loops = mesh.boundary_loops();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 5);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_split_all_edges() {
        let mut mesh = two_triangles();
        let midpoints = mesh.split_all_edges();

        assert_eq!(midpoints.len(), 5);
        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.num_halfedges(), 20);
        assert!(mesh.all_faces_have_sides(6));
        assert!(midpoints.iter().all(|&v| mesh.is_straight(v)));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_split_face() {
        let mut mesh = two_triangles();
        let shared = mesh.get_edge(VertexId::new(0), VertexId::new(1)).unwrap();
        let f = mesh.dissolve_edge(shared).unwrap();

        let a_out = mesh.find_edge(VertexId::new(2), VertexId::new(0)).unwrap().unwrap();
        let b_out = mesh.find_edge(VertexId::new(3), VertexId::new(1)).unwrap().unwrap();
        let (new_side, old_side) = mesh.split_face(a_out, b_out).unwrap();

        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.face_of(old_side), f);
        assert_eq!(mesh.face(f).halfedge, old_side);
        assert_eq!(mesh.origin(new_side), VertexId::new(3));
        assert_eq!(mesh.dest(new_side), VertexId::new(2));
        assert_eq!(mesh.face_side_count(f), 3);
        assert_eq!(mesh.face_side_count(mesh.face_of(new_side)), 3);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_split_face_preconditions() {
        let mut mesh = two_triangles();
        let f0_edge = mesh.face(FaceId::new(0)).halfedge;
        let f1_edge = mesh.face(FaceId::new(1)).halfedge;

        assert!(matches!(
            mesh.split_face(f0_edge, f1_edge),
            Err(MeshError::NoCommonFace { .. })
        ));
        // Every pair of corners in a triangle is adjacent
        let next = mesh.next(f0_edge);
        assert!(matches!(
            mesh.split_face(f0_edge, next),
            Err(MeshError::AdjacentVertices { .. })
        ));
        assert!(matches!(
            mesh.split_face(f0_edge, f0_edge),
            Err(MeshError::AdjacentVertices { .. })
        ));
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_halfedges(), 10);
    }
}
