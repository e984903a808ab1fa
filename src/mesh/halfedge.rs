//! Half-edge mesh storage.
//!
//! This module owns the arenas behind a polygon mesh in half-edge
//! (doubly-connected edge list) form:
//!
//! - Each undirected edge is two **half-edges** created together as a twin pair
//! - Each half-edge knows its **twin**, **next** and **prev** half-edge around
//!   its face, its **origin vertex** and its **face**
//! - Each vertex stores one outgoing half-edge
//! - Each face stores one half-edge on its boundary
//!
//! Faces may have any number of sides.
//!
//! # Boundary Handling
//!
//! Half-edges on the mesh boundary have an invalid face id. They are linked
//! into boundary loops through `next`/`prev` exactly like face cycles, so a
//! one-ring walk around a boundary vertex closes.
//!
//! # Removal
//!
//! Removing a face or a twin pair leaves an empty slot behind. Slots are never
//! reused, so ids stay stable for the lifetime of the mesh.

use nalgebra::Point3;

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge, used as the entry point for one-ring walks.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge of the same undirected edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face or boundary loop.
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face or boundary loop.
    pub prev: HalfEdgeId<I>,

    /// The face this half-edge bounds. Invalid for boundary half-edges.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create an unlinked half-edge leaving `origin`.
    pub fn new(origin: VertexId<I>) -> Self {
        Self {
            origin,
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// A polygon mesh in half-edge form.
///
/// The mesh is the only owner of its vertices, half-edges and faces, and the
/// only place they are created or removed. Everything else refers to them by id.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    /// All vertices. Vertices are never removed.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// Half-edge slots; `None` marks a removed twin pair.
    pub(crate) halfedges: Vec<Option<HalfEdge<I>>>,

    /// Face slots; `None` marks a removed face.
    pub(crate) faces: Vec<Option<Face<I>>>,

    live_halfedges: usize,
    live_faces: usize,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
            live_halfedges: 0,
            live_faces: 0,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_halfedges: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
            live_halfedges: 0,
            live_faces: 0,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of live half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.live_halfedges
    }

    /// Get the number of live undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.live_halfedges / 2
    }

    /// Get the number of live faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.live_faces
    }

    /// Number of half-edge slots ever allocated, including removed ones.
    ///
    /// No valid cycle can be longer than this, so walks use it as their bound.
    #[inline]
    pub fn halfedge_slots(&self) -> usize {
        self.halfedges.len()
    }

    /// Check whether a half-edge id refers to a live half-edge.
    #[inline]
    pub fn contains_halfedge(&self, id: HalfEdgeId<I>) -> bool {
        id.is_valid() && matches!(self.halfedges.get(id.index()), Some(Some(_)))
    }

    /// Check whether a face id refers to a live face.
    #[inline]
    pub fn contains_face(&self, id: FaceId<I>) -> bool {
        id.is_valid() && matches!(self.faces.get(id.index()), Some(Some(_)))
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    ///
    /// # Panics
    /// Panics if the half-edge has been removed.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        match &self.halfedges[id.index()] {
            Some(he) => he,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get a mutable half-edge by ID.
    ///
    /// # Panics
    /// Panics if the half-edge has been removed.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        match &mut self.halfedges[id.index()] {
            Some(he) => he,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get a face by ID.
    ///
    /// # Panics
    /// Panics if the face has been removed.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        match &self.faces[id.index()] {
            Some(f) => f,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get a mutable face by ID.
    ///
    /// # Panics
    /// Panics if the face has been removed.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        match &mut self.faces[id.index()] {
            Some(f) => f,
            None => panic!("{:?} has been removed", id),
        }
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Links ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if either side of an edge is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, he: HalfEdgeId<I>) -> bool {
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    /// Link `a -> b`: sets `a.next = b` and `b.prev = a`.
    ///
    /// Operators only ever change `next`/`prev` through this and [`set_prev`](Self::set_prev).
    #[inline]
    pub fn set_next(&mut self, a: HalfEdgeId<I>, b: HalfEdgeId<I>) {
        self.halfedge_mut(a).next = b;
        self.halfedge_mut(b).prev = a;
    }

    /// Link `b -> a`: sets `a.prev = b` and `b.next = a`.
    #[inline]
    pub fn set_prev(&mut self, a: HalfEdgeId<I>, b: HalfEdgeId<I>) {
        self.set_next(b, a);
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over live half-edge IDs in slot order.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges().map(|(id, _)| id)
    }

    /// Iterate over live half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter_map(|(i, he)| he.as_ref().map(|he| (HalfEdgeId::new(i), he)))
    }

    /// Iterate over live face IDs in slot order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.faces().map(|(id, _)| id)
    }

    /// Iterate over live faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FaceId::new(i), f)))
    }

    // ==================== Construction ====================

    /// Check that `vertices`, `halfedges` and `faces` more slots still fit the
    /// index type.
    ///
    /// # Errors
    /// [`MeshError::CapacityExceeded`] naming the first arena that would overflow.
    pub fn check_capacity(&self, vertices: usize, halfedges: usize, faces: usize) -> Result<()> {
        let limit = I::max_slots();
        for (kind, current, extra) in [
            ("vertex", self.vertices.len(), vertices),
            ("half-edge", self.halfedges.len(), halfedges),
            ("face", self.faces.len(), faces),
        ] {
            let required = current.saturating_add(extra);
            if required > limit {
                return Err(MeshError::CapacityExceeded {
                    kind,
                    required,
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Add a new vertex and return its ID.
    ///
    /// The vertex has no outgoing half-edge until an edge is attached to it.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Add a twin pair between `a` and `b`.
    ///
    /// The first half-edge leaves `a`, the second leaves `b`. Both are unlinked
    /// and faceless. Each vertex's outgoing half-edge is overwritten with the
    /// new half-edge leaving it.
    pub fn add_edge(&mut self, a: VertexId<I>, b: VertexId<I>) -> (HalfEdgeId<I>, HalfEdgeId<I>) {
        let e1 = HalfEdgeId::new(self.halfedges.len());
        let e2 = HalfEdgeId::new(self.halfedges.len() + 1);
        debug_assert_eq!(e1.pair_slot(), e2);

        let mut h1 = HalfEdge::new(a);
        h1.twin = e2;
        let mut h2 = HalfEdge::new(b);
        h2.twin = e1;

        self.halfedges.push(Some(h1));
        self.halfedges.push(Some(h2));
        self.live_halfedges += 2;

        self.vertex_mut(a).halfedge = e1;
        self.vertex_mut(b).halfedge = e2;

        (e1, e2)
    }

    /// Add a face bounded by the cycle through `he` and set `he`'s face.
    ///
    /// The other half-edges of the cycle are left for the caller to assign.
    pub fn add_face(&mut self, he: HalfEdgeId<I>) -> FaceId<I> {
        let id = FaceId::new(self.faces.len());
        self.faces.push(Some(Face::new(he)));
        self.live_faces += 1;
        self.halfedge_mut(he).face = id;
        id
    }

    /// Remove a face. The half-edges that referenced it are not touched.
    pub(crate) fn remove_face(&mut self, id: FaceId<I>) {
        if self.faces[id.index()].take().is_some() {
            self.live_faces -= 1;
        }
    }

    /// Remove a half-edge and its twin.
    pub(crate) fn remove_edge(&mut self, he: HalfEdgeId<I>) {
        let twin = self.twin(he);
        for id in [he, twin] {
            if self.halfedges[id.index()].take().is_some() {
                self.live_halfedges -= 1;
            }
        }
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }
}
