//! Arena ids for mesh elements.
//!
//! Every cross reference in a [`HalfEdgeMesh`](super::HalfEdgeMesh) is one of
//! these ids rather than a pointer. An id is the slot of its element in the
//! owning arena, so ids are handed out in creation order and are never reused,
//! even after a half-edge or face has been removed.
//!
//! The ids are generic over the integer type ([`MeshIndex`]) so that small
//! grids can use `u16` slots while large imports use `u64`.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer types usable as arena slots.
///
/// An arena holds at most [`max_slots`](Self::max_slots) elements of each
/// kind, counting removed slots. Operators that grow a mesh check this bound
/// with [`HalfEdgeMesh::check_capacity`](super::HalfEdgeMesh::check_capacity)
/// before they touch it.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// Sentinel for "no element" (an unset link, or no face on a boundary half-edge).
    const INVALID: Self;

    /// Convert a slot number to this index type.
    ///
    /// Slot numbers of [`max_slots`](Self::max_slots) and above do not fit and
    /// wrap in release builds.
    fn from_usize(v: usize) -> Self;

    /// Convert to a slot number.
    fn to_usize(self) -> usize;

    /// Check that this is not the sentinel.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// Number of slots this type can address; the sentinel is excluded.
    fn max_slots() -> usize {
        Self::INVALID.to_usize()
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const INVALID: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v < <$ty>::MAX as usize,
                    "slot {} does not fit in {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// Id of a vertex.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// Id of a half-edge. Twin pairs occupy slots `2k` and `2k + 1`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// Id of a face.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_id_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create an id from a slot number.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// The "no element" id.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Slot number of this id.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Check that this id refers to an element.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(-)", $display)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_id_type!(VertexId, "V");
impl_id_type!(HalfEdgeId, "HE");
impl_id_type!(FaceId, "F");

impl<I: MeshIndex> HalfEdgeId<I> {
    /// The other half-edge of this id's twin pair, by slot arithmetic.
    #[inline]
    pub fn pair_slot(self) -> Self {
        Self::new(self.index() ^ 1)
    }
}
