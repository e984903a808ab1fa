//! Structural validation.
//!
//! [`HalfEdgeMesh::validate`] checks every link invariant and reports what is
//! wrong instead of failing. It is meant for tests and debugging.

use std::fmt;

use log::warn;

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A single violated invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyIssue<I: MeshIndex = u32> {
    /// The half-edge has no live twin.
    MissingTwin(HalfEdgeId<I>),
    /// The half-edge has no live `next`.
    MissingNext(HalfEdgeId<I>),
    /// The half-edge has no live `prev`.
    MissingPrev(HalfEdgeId<I>),
    /// The half-edge is its own twin.
    SelfTwin(HalfEdgeId<I>),
    /// `twin(twin(h)) != h`.
    AsymmetricTwin(HalfEdgeId<I>),
    /// `prev(next(h)) != h`.
    AsymmetricNext(HalfEdgeId<I>),
    /// `next(prev(h)) != h`.
    AsymmetricPrev(HalfEdgeId<I>),
    /// `origin(twin(prev(h))) != origin(h)`.
    OriginMismatch(HalfEdgeId<I>),
    /// `face(next(h)) != face(h)`.
    FaceMismatch(HalfEdgeId<I>),
    /// The half-edge refers to a removed face.
    DanglingFace(HalfEdgeId<I>),
    /// The face's representative half-edge is missing or bounds another face.
    FaceRepresentative(FaceId<I>),
    /// The vertex has no outgoing half-edge.
    VertexWithoutEdge(VertexId<I>),
    /// A vertex's outgoing half-edge is missing or leaves another vertex.
    VertexRepresentative(VertexId<I>),
}

impl<I: MeshIndex> fmt::Display for TopologyIssue<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTwin(he) => write!(f, "{:?} is missing a twin", he),
            Self::MissingNext(he) => write!(f, "{:?} is missing next", he),
            Self::MissingPrev(he) => write!(f, "{:?} is missing prev", he),
            Self::SelfTwin(he) => write!(f, "{:?} is its own twin", he),
            Self::AsymmetricTwin(he) => write!(f, "{:?} has an incorrect twin link", he),
            Self::AsymmetricNext(he) => write!(f, "{:?} is not prev of its next", he),
            Self::AsymmetricPrev(he) => write!(f, "{:?} is not next of its prev", he),
            Self::OriginMismatch(he) => write!(f, "{:?} does not start where prev ends", he),
            Self::FaceMismatch(he) => write!(f, "{:?} and its next bound different faces", he),
            Self::DanglingFace(he) => write!(f, "{:?} refers to a removed face", he),
            Self::FaceRepresentative(face) => write!(f, "{:?} has an invalid half-edge", face),
            Self::VertexWithoutEdge(v) => write!(f, "{:?} doesn't have an outgoing half-edge", v),
            Self::VertexRepresentative(v) => {
                write!(f, "{:?} has an outgoing half-edge that starts elsewhere", v)
            }
        }
    }
}

/// All issues found by one validation pass.
#[derive(Debug, Clone)]
pub struct ValidationReport<I: MeshIndex = u32> {
    /// Issues in the order they were found.
    pub issues: Vec<TopologyIssue<I>>,
}

impl<I: MeshIndex> Default for ValidationReport<I> {
    fn default() -> Self {
        Self { issues: Vec::new() }
    }
}

impl<I: MeshIndex> ValidationReport<I> {
    /// True when no issue was found.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues found.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    fn push(&mut self, issue: TopologyIssue<I>) {
        warn!("{}", issue);
        self.issues.push(issue);
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Check every link invariant and report the violations.
    ///
    /// Each issue is also logged as a warning. A half-edge with a missing link
    /// is not checked further.
    pub fn validate(&self) -> ValidationReport<I> {
        let mut report = ValidationReport::default();

        for (id, he) in self.halfedges() {
            let mut linked = true;
            if !self.contains_halfedge(he.twin) {
                report.push(TopologyIssue::MissingTwin(id));
                linked = false;
            }
            if !self.contains_halfedge(he.next) {
                report.push(TopologyIssue::MissingNext(id));
                linked = false;
            }
            if !self.contains_halfedge(he.prev) {
                report.push(TopologyIssue::MissingPrev(id));
                linked = false;
            }
            if !linked {
                continue;
            }

            if he.twin == id {
                report.push(TopologyIssue::SelfTwin(id));
            }
            if self.twin(he.twin) != id {
                report.push(TopologyIssue::AsymmetricTwin(id));
            }
            if self.prev(he.next) != id {
                report.push(TopologyIssue::AsymmetricNext(id));
            }
            if self.next(he.prev) != id {
                report.push(TopologyIssue::AsymmetricPrev(id));
            }
            if self.dest(he.prev) != he.origin {
                report.push(TopologyIssue::OriginMismatch(id));
            }
            if self.face_of(he.next) != he.face {
                report.push(TopologyIssue::FaceMismatch(id));
            }
            if he.face.is_valid() && !self.contains_face(he.face) {
                report.push(TopologyIssue::DanglingFace(id));
            }
        }

        for (id, face) in self.faces() {
            if !self.contains_halfedge(face.halfedge) || self.face_of(face.halfedge) != id {
                report.push(TopologyIssue::FaceRepresentative(id));
            }
        }

        for (id, v) in self.vertices() {
            if !v.halfedge.is_valid() {
                report.push(TopologyIssue::VertexWithoutEdge(id));
            } else if !self.contains_halfedge(v.halfedge) || self.origin(v.halfedge) != id {
                report.push(TopologyIssue::VertexRepresentative(id));
            }
        }

        report
    }

    /// Check if the mesh passes [`validate`](Self::validate).
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Vertices that no half-edge leaves.
    pub fn isolated_vertices(&self) -> Vec<VertexId<I>> {
        self.vertex_ids()
            .filter(|&v| !self.vertex(v).halfedge.is_valid())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_valid_quad() {
        let mesh: HalfEdgeMesh = HalfEdgeMesh::create_quad(Point3::origin(), 1.0, 1.0);
        let report = mesh.validate();
        assert!(report.is_empty(), "{:?}", report.issues);
    }

    #[test]
    fn test_unlinked_pair_is_reported() {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        let a = mesh.add_vertex(Point3::origin());
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let (e1, _) = mesh.add_edge(a, b);

        let report = mesh.validate();
        assert_eq!(report.len(), 4);
        assert!(report.issues.contains(&TopologyIssue::MissingNext(e1)));
        assert!(report.issues.contains(&TopologyIssue::MissingPrev(e1)));
    }

    #[test]
    fn test_broken_face_link_is_reported() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();
        let f = FaceId::new(0);
        let he = mesh.face(f).halfedge;
        let next = mesh.next(he);
        mesh.halfedge_mut(next).face = FaceId::invalid();

        let report = mesh.validate();
        assert!(report.issues.contains(&TopologyIssue::FaceMismatch(he)));
    }

    #[test]
    fn test_bad_vertex_representative() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();
        let v0 = VertexId::new(0);
        let wrong = mesh.vertex(VertexId::new(1)).halfedge;
        mesh.vertex_mut(v0).halfedge = wrong;

        assert_eq!(
            mesh.validate().issues,
            vec![TopologyIssue::VertexRepresentative(v0)]
        );
    }

    #[test]
    fn test_isolated_vertex_is_reported() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();
        let v = mesh.add_vertex(Point3::new(3.0, 0.0, 0.0));
        assert_eq!(mesh.validate().issues, vec![TopologyIssue::VertexWithoutEdge(v)]);
        assert_eq!(mesh.isolated_vertices(), vec![v]);
    }

    #[test]
    fn test_default_report_for_small_index() {
        let report = ValidationReport::<u16>::default();
        assert!(report.is_empty());

        let mesh: HalfEdgeMesh<u16> = HalfEdgeMesh::create_quad(Point3::origin(), 1.0, 1.0);
        assert_eq!(mesh.validate().len(), 0);
    }
}
