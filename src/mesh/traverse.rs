//! Traversal and read-only queries.
//!
//! Two flavours of walk are provided:
//!
//! - Circulators ([`LoopHalfEdgeIter`], [`VertexHalfEdgeIter`]) are best effort.
//!   If they meet a missing link, or a cycle that does not close within
//!   [`HalfEdgeMesh::halfedge_slots`] steps, they log a warning and stop.
//! - `try_*` walks return [`MeshError::UnlinkedHalfEdge`] or
//!   [`MeshError::TraversalLimit`] instead. Structural operators use these.
//!
//! One-ring walks step from an outgoing half-edge `h` to `twin(prev(h))`.

use std::collections::HashSet;

use log::warn;
use nalgebra::{Point3, Vector3};

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Tolerance on `dot + 1` for two directions to count as opposite.
pub const STRAIGHT_TOLERANCE: f64 = 0.001;

impl<I: MeshIndex> HalfEdgeMesh<I> {
    // ==================== Circulators ====================

    /// Iterate over the cycle of half-edges reached by `next` from `start`.
    ///
    /// Works for face cycles and boundary loops alike.
    pub fn loop_halfedges(&self, start: HalfEdgeId<I>) -> LoopHalfEdgeIter<'_, I> {
        LoopHalfEdgeIter::new(self, start)
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> LoopHalfEdgeIter<'_, I> {
        LoopHalfEdgeIter::new(self, self.face(f).halfedge)
    }

    /// Iterate over outgoing half-edges around a vertex.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Collect the cycle through `start`, failing on broken or unclosed links.
    pub fn try_loop(&self, start: HalfEdgeId<I>) -> Result<Vec<HalfEdgeId<I>>> {
        let limit = self.halfedge_slots();
        let mut cycle = Vec::new();
        let mut he = start;
        loop {
            cycle.push(he);
            if cycle.len() > limit {
                return Err(MeshError::TraversalLimit {
                    start: start.index(),
                    limit,
                });
            }
            let next = self.next(he);
            if !self.contains_halfedge(next) {
                return Err(MeshError::UnlinkedHalfEdge(he.index()));
            }
            he = next;
            if he == start {
                return Ok(cycle);
            }
        }
    }

    /// Collect a face's boundary cycle, failing on broken or unclosed links.
    pub fn try_face_loop(&self, f: FaceId<I>) -> Result<Vec<HalfEdgeId<I>>> {
        self.try_loop(self.face(f).halfedge)
    }

    /// Collect the outgoing half-edges of a vertex, failing on broken or unclosed links.
    ///
    /// A vertex without an outgoing half-edge has an empty ring.
    pub fn try_vertex_ring(&self, v: VertexId<I>) -> Result<Vec<HalfEdgeId<I>>> {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return Ok(Vec::new());
        }

        let limit = self.halfedge_slots();
        let mut ring = Vec::new();
        let mut he = start;
        loop {
            ring.push(he);
            if ring.len() > limit {
                return Err(MeshError::TraversalLimit {
                    start: start.index(),
                    limit,
                });
            }
            let prev = self.prev(he);
            if !self.contains_halfedge(prev) {
                return Err(MeshError::UnlinkedHalfEdge(he.index()));
            }
            he = self.twin(prev);
            if he == start {
                return Ok(ring);
            }
        }
    }

    // ==================== Vertex Queries ====================

    /// Iterate over vertices adjacent to a vertex, in one-ring order.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Distinct faces around a vertex, in one-ring order.
    pub fn vertex_faces(&self, v: VertexId<I>) -> Vec<FaceId<I>> {
        let mut faces: Vec<FaceId<I>> = Vec::new();
        for he in self.vertex_halfedges(v) {
            let f = self.face_of(he);
            if f.is_valid() && !faces.contains(&f) {
                faces.push(f);
            }
        }
        faces
    }

    /// Number of edges leaving a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Check if a vertex touches the mesh boundary.
    ///
    /// A vertex with no edges counts as outer.
    pub fn is_outer_vertex(&self, v: VertexId<I>) -> bool {
        if !self.vertex(v).halfedge.is_valid() {
            return true;
        }
        self.vertex_halfedges(v).any(|he| self.is_boundary_edge(he))
    }

    /// Check if a vertex has exactly two neighbours lying in opposite directions.
    ///
    /// Edge midpoints inserted by [`split_edge`](Self::split_edge) are straight;
    /// polygon corners are not.
    pub fn is_straight(&self, v: VertexId<I>) -> bool {
        let mut neighbors = self.vertex_neighbors(v);
        let (Some(a), Some(b), None) = (neighbors.next(), neighbors.next(), neighbors.next())
        else {
            return false;
        };

        let p = self.position(v);
        let d1 = (self.position(a) - p).try_normalize(f64::EPSILON);
        let d2 = (self.position(b) - p).try_normalize(f64::EPSILON);
        match (d1, d2) {
            (Some(d1), Some(d2)) => (d1.dot(&d2) + 1.0).abs() < STRAIGHT_TOLERANCE,
            _ => false,
        }
    }

    /// Find the boundary half-edge pointing into a vertex.
    ///
    /// Walks the ring through `next(twin(h))`. Returns `None` if the vertex has
    /// no edges, no boundary half-edge arrives at it, or a link is missing.
    pub fn incoming_outer_edge(&self, v: VertexId<I>) -> Option<HalfEdgeId<I>> {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return None;
        }

        let limit = self.halfedge_slots();
        let mut he = start;
        for _ in 0..limit {
            let twin = self.twin(he);
            if self.is_boundary_halfedge(twin) {
                return Some(twin);
            }
            let next = self.next(twin);
            if !self.contains_halfedge(next) {
                return None;
            }
            he = next;
            if he == start {
                return None;
            }
        }
        None
    }

    /// Find the boundary half-edge leaving a vertex.
    ///
    /// Walks the ring through `twin(prev(h))`. Returns `None` if the vertex has
    /// no edges, no boundary half-edge leaves it, or a link is missing.
    pub fn outgoing_outer_edge(&self, v: VertexId<I>) -> Option<HalfEdgeId<I>> {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return None;
        }

        let limit = self.halfedge_slots();
        let mut he = start;
        for _ in 0..limit {
            if self.is_boundary_halfedge(he) {
                return Some(he);
            }
            let prev = self.prev(he);
            if !self.contains_halfedge(prev) {
                return None;
            }
            he = self.twin(prev);
            if he == start {
                return None;
            }
        }
        None
    }

    /// Mean of the centres of the faces around a vertex.
    ///
    /// `None` if the vertex touches no face.
    pub fn relaxed_position(&self, v: VertexId<I>) -> Option<Point3<f64>> {
        let faces = self.vertex_faces(v);
        if faces.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = faces.iter().map(|&f| self.face_center(f).coords).sum();
        Some(Point3::from(sum / faces.len() as f64))
    }

    /// Move a vertex to its [`relaxed_position`](Self::relaxed_position).
    ///
    /// Returns `false` and leaves the vertex alone if it touches no face.
    pub fn relax_vertex(&mut self, v: VertexId<I>) -> bool {
        match self.relaxed_position(v) {
            Some(p) => {
                self.set_position(v, p);
                true
            }
            None => false,
        }
    }

    // ==================== Face Queries ====================

    /// Number of sides of a face.
    pub fn face_side_count(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// Iterate over the corners of a face in boundary order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Arithmetic mean of a face's corner positions.
    pub fn face_center(&self, f: FaceId<I>) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        let mut count = 0usize;
        for v in self.face_vertices(f) {
            sum += self.position(v).coords;
            count += 1;
        }
        Point3::from(sum / count.max(1) as f64)
    }

    /// Faces across each side of a face. Boundary sides are skipped.
    pub fn face_neighbors(&self, f: FaceId<I>) -> Vec<FaceId<I>> {
        self.face_halfedges(f)
            .map(|he| self.face_of(self.twin(he)))
            .filter(|n| n.is_valid())
            .collect()
    }

    /// Check whether every face has `sides` sides.
    pub fn all_faces_have_sides(&self, sides: usize) -> bool {
        self.face_ids().all(|f| self.face_side_count(f) == sides)
    }

    /// All boundary loops, each as the list of its half-edges.
    pub fn boundary_loops(&self) -> Vec<Vec<HalfEdgeId<I>>> {
        let mut seen: HashSet<HalfEdgeId<I>> = HashSet::new();
        let mut loops = Vec::new();
        for (id, he) in self.halfedges() {
            if !he.is_boundary() || seen.contains(&id) {
                continue;
            }
            let boundary: Vec<_> = self.loop_halfedges(id).collect();
            seen.extend(boundary.iter().copied());
            loops.push(boundary);
        }
        loops
    }

    // ==================== Edge Geometry ====================

    /// Compute the midpoint of an edge.
    pub fn edge_midpoint(&self, he: HalfEdgeId<I>) -> Point3<f64> {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.dest(he));
        p0 + (p1 - p0) * 0.5
    }

    /// Compute the length of an edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.dest(he));
        (p1 - p0).norm()
    }

    /// Origin and destination positions of a half-edge.
    pub fn segment(&self, he: HalfEdgeId<I>) -> (Point3<f64>, Point3<f64>) {
        (*self.position(self.origin(he)), *self.position(self.dest(he)))
    }

    /// Iterate over the boundary segments of a face, for drawing.
    pub fn face_segments(
        &self,
        f: FaceId<I>,
    ) -> impl Iterator<Item = (Point3<f64>, Point3<f64>)> + '_ {
        self.face_halfedges(f).map(|he| self.segment(he))
    }

    /// Start stepping around a face one side at a time.
    pub fn boundary_cursor(&self, f: FaceId<I>) -> BoundaryCursor<I> {
        let start = self.face(f).halfedge;
        BoundaryCursor {
            start,
            current: start,
        }
    }
}

/// A position on a face boundary that a viewer can step around.
///
/// The cursor holds ids only; it borrows the mesh per call so a viewer can
/// keep it between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryCursor<I: MeshIndex = u32> {
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
}

impl<I: MeshIndex> BoundaryCursor<I> {
    /// The half-edge the cursor started on.
    pub fn start(&self) -> HalfEdgeId<I> {
        self.start
    }

    /// The half-edge under the cursor.
    pub fn current(&self) -> HalfEdgeId<I> {
        self.current
    }

    /// Step to the next half-edge. Returns `true` once back at the start.
    pub fn advance(&mut self, mesh: &HalfEdgeMesh<I>) -> bool {
        self.current = mesh.next(self.current);
        self.current == self.start
    }

    /// The segment under the cursor.
    pub fn segment(&self, mesh: &HalfEdgeMesh<I>) -> (Point3<f64>, Point3<f64>) {
        mesh.segment(self.current)
    }
}

/// Iterator over a `next` cycle.
pub struct LoopHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    steps: usize,
    done: bool,
}

impl<'a, I: MeshIndex> LoopHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, start: HalfEdgeId<I>) -> Self {
        Self {
            mesh,
            start,
            current: start,
            steps: 0,
            done: !mesh.contains_halfedge(start),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for LoopHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.steps += 1;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        } else if !self.mesh.contains_halfedge(self.current) {
            warn!("loop from {:?} is broken after {:?}", self.start, result);
            self.done = true;
        } else if self.steps >= self.mesh.halfedge_slots() {
            warn!("loop from {:?} did not close, abandoning walk", self.start);
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    steps: usize,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            steps: 0,
            done: !mesh.contains_halfedge(start),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.steps += 1;

        // If he goes v -> w, prev(he) arrives at v and its twin leaves v.
        let prev = self.mesh.prev(self.current);
        if !self.mesh.contains_halfedge(prev) {
            warn!("ring walk stopped at {:?}: missing prev", result);
            self.done = true;
            return Some(result);
        }
        self.current = self.mesh.twin(prev);

        if self.current == self.start {
            self.done = true;
        } else if self.steps >= self.mesh.halfedge_slots() {
            warn!("ring walk from {:?} did not close, abandoning walk", self.start);
            self.done = true;
        }

        Some(result)
    }
}
