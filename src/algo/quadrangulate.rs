//! Randomized pairing of triangles into quads.
//!
//! [`dissolve_to_quads`] removes randomly chosen interior edges, each merging
//! the two faces on its sides. A face takes part in at most one merge, so on a
//! triangle mesh every merge produces a quad. The pairing is greedy and maximal:
//! when it finishes, no two remaining triangles share an edge, but some
//! triangles may be left over.
//!
//! The random choices come from an [`IndexSource`], so a fixed seed (or a
//! scripted source in tests) reproduces the same sequence of dissolved edges.
//!
//! # Example
//!
//! ```
//! use quadrille::prelude::*;
//! use quadrille::algo::quadrangulate::dissolve_to_quads;
//!
//! let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_polygon(6, 1.0).unwrap();
//! let dissolved = dissolve_to_quads(&mut mesh, 42).unwrap();
//!
//! assert_eq!(mesh.num_faces(), 6 - dissolved.len());
//! assert!(mesh.is_valid());
//! ```

use std::collections::HashMap;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeId, HalfEdgeMesh, MeshIndex};

/// A source of uniformly distributed indices.
pub trait IndexSource {
    /// Return an index in `0..len`. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;
}

/// An [`IndexSource`] backed by a seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededIndexSource {
    rng: StdRng,
}

impl SeededIndexSource {
    /// Create a source that always produces the same sequence for `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IndexSource for SeededIndexSource {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Dissolve random interior edges until no two unmerged faces share an edge.
///
/// Uses a [`SeededIndexSource`] for `seed`. See [`dissolve_to_quads_with`].
pub fn dissolve_to_quads<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    seed: u64,
) -> Result<Vec<HalfEdgeId<I>>> {
    dissolve_to_quads_with(mesh, &mut SeededIndexSource::new(seed))
}

/// Dissolve random interior edges, drawing choices from `source`.
///
/// Every live half-edge starts in a working set, in slot order. Each step draws
/// an index into the set and removes that half-edge and its twin. Boundary
/// edges are skipped; any other edge is dissolved and every half-edge of the
/// merged face, with its twin, leaves the set. Returns the dissolved half-edges
/// in the order they were removed.
///
/// # Errors
/// Only structural corruption ([`MeshError::UnlinkedHalfEdge`],
/// [`MeshError::TraversalLimit`]) is reported.
pub fn dissolve_to_quads_with<I: MeshIndex, S: IndexSource + ?Sized>(
    mesh: &mut HalfEdgeMesh<I>,
    source: &mut S,
) -> Result<Vec<HalfEdgeId<I>>> {
    let faces_before = mesh.num_faces();
    let mut pool = HalfEdgePool::new(mesh.halfedge_ids().collect());
    let mut dissolved = Vec::new();

    while !pool.is_empty() {
        // Out-of-range draws wrap around
        let index = source.next_index(pool.len()) % pool.len();
        let he = pool.take(index);
        pool.remove(mesh.twin(he));

        if mesh.is_boundary_edge(he) {
            continue;
        }

        let merged = match mesh.dissolve_edge(he) {
            Ok(face) => face,
            Err(MeshError::SameFaceEdge { .. }) => continue,
            Err(err) => return Err(err),
        };
        dissolved.push(he);

        for side in mesh.try_face_loop(merged)? {
            pool.remove(side);
            pool.remove(mesh.twin(side));
        }
    }

    debug!(
        "dissolved {} edges: {} faces -> {} faces",
        dissolved.len(),
        faces_before,
        mesh.num_faces()
    );
    Ok(dissolved)
}

/// Half-edge working set with O(1) draw and removal.
///
/// Removal swaps the last element into the hole, so the order of the remaining
/// ids is deterministic but not sorted.
struct HalfEdgePool<I: MeshIndex> {
    items: Vec<HalfEdgeId<I>>,
    positions: HashMap<HalfEdgeId<I>, usize>,
}

impl<I: MeshIndex> HalfEdgePool<I> {
    fn new(items: Vec<HalfEdgeId<I>>) -> Self {
        let positions = items.iter().enumerate().map(|(i, &he)| (he, i)).collect();
        Self { items, positions }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove and return the id at `index`.
    fn take(&mut self, index: usize) -> HalfEdgeId<I> {
        let he = self.items[index];
        self.remove(he);
        he
    }

    /// Remove `he` if present.
    fn remove(&mut self, he: HalfEdgeId<I>) {
        let Some(pos) = self.positions.remove(&he) else {
            return;
        };
        self.items.swap_remove(pos);
        if let Some(&moved) = self.items.get(pos) {
            self.positions.insert(moved, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::subdivide::{triangle_subdivide, SubdivideOptions};

    /// Replays a fixed list of draws, then keeps returning 0.
    struct Scripted {
        draws: Vec<usize>,
        calls: usize,
    }

    impl Scripted {
        fn new(draws: Vec<usize>) -> Self {
            Self { draws, calls: 0 }
        }
    }

    impl IndexSource for Scripted {
        fn next_index(&mut self, _len: usize) -> usize {
            let index = self.draws.get(self.calls).copied().unwrap_or(0);
            self.calls += 1;
            index
        }
    }

    fn count_sides(mesh: &HalfEdgeMesh, sides: usize) -> usize {
        mesh.face_ids()
            .filter(|&f| mesh.face_side_count(f) == sides)
            .count()
    }

    #[test]
    fn test_pool_swap_remove() {
        let ids: Vec<HalfEdgeId> = (0..5).map(HalfEdgeId::new).collect();
        let mut pool = HalfEdgePool::new(ids);

        assert_eq!(pool.take(1), HalfEdgeId::new(1));
        // 4 moved into slot 1
        assert_eq!(pool.items[1], HalfEdgeId::new(4));
        pool.remove(HalfEdgeId::new(4));
        pool.remove(HalfEdgeId::new(4));
        assert_eq!(pool.items, vec![HalfEdgeId::new(0), HalfEdgeId::new(3), HalfEdgeId::new(2)]);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_single_triangle_has_nothing_to_dissolve() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();

        let dissolved = dissolve_to_quads(&mut mesh, 7).unwrap();

        assert!(dissolved.is_empty());
        assert_eq!(mesh.num_faces(), 1);
    }

    #[test]
    fn test_first_draw_is_dissolved() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_polygon(6, 1.0).unwrap();

        let dissolved = dissolve_to_quads_with(&mut mesh, &mut Scripted::new(vec![0])).unwrap();

        // Slot 0 is the first spoke, an interior edge
        assert_eq!(dissolved[0], HalfEdgeId::new(0));
        assert!(!mesh.contains_halfedge(HalfEdgeId::new(0)));
        assert!(!mesh.contains_halfedge(HalfEdgeId::new(1)));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_boundary_draw_is_skipped() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_polygon(4, 1.0).unwrap();
        // Slot 8 is the first rim edge
        let rim = HalfEdgeId::new(8);
        assert!(mesh.is_boundary_edge(rim));

        let dissolved = dissolve_to_quads_with(&mut mesh, &mut Scripted::new(vec![8])).unwrap();

        assert!(!dissolved.contains(&rim));
        assert!(mesh.contains_halfedge(rim));
        assert!(!dissolved.is_empty());
    }

    #[test]
    fn test_subdivided_triangle_gives_one_quad() {
        let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_triangle();
        triangle_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        // The central triangle touches all three corners; only one merge fits
        let dissolved = dissolve_to_quads(&mut mesh, 3).unwrap();

        assert_eq!(dissolved.len(), 1);
        assert_eq!(count_sides(&mesh, 4), 1);
        assert_eq!(count_sides(&mesh, 3), 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_leftover_triangles_are_not_adjacent() {
        for seed in 0..8 {
            let mut mesh: HalfEdgeMesh = HalfEdgeMesh::create_polygon(6, 1.0).unwrap();
            triangle_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();
            let faces_before = mesh.num_faces();

            let dissolved = dissolve_to_quads(&mut mesh, seed).unwrap();

            assert_eq!(mesh.num_faces(), faces_before - dissolved.len());
            assert_eq!(count_sides(&mesh, 4), dissolved.len());
            assert_eq!(count_sides(&mesh, 3), faces_before - 2 * dissolved.len());
            assert!(mesh.is_valid());

            for f in mesh.face_ids().filter(|&f| mesh.face_side_count(f) == 3) {
                for n in mesh.face_neighbors(f) {
                    assert_ne!(mesh.face_side_count(n), 3, "seed {}: {:?} and {:?}", seed, f, n);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let mut a: HalfEdgeMesh = HalfEdgeMesh::create_polygon(6, 1.0).unwrap();
        triangle_subdivide(&mut a, &SubdivideOptions::new(2)).unwrap();
        let mut b = a.clone();

        let first = dissolve_to_quads(&mut a, 1234).unwrap();
        let second = dissolve_to_quads(&mut b, 1234).unwrap();

        assert_eq!(first, second);
    }
}
