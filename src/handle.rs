//! Typed handles referring to the elements of a [`HalfedgeMesh`].
//!
//! Handles are plain indices. They do not borrow the mesh and stay valid as
//! long as the element they refer to is not removed. After removing an
//! element, its index is put into a free list and might be handed out again
//! by a later `add_*` call.
//!
//! [`HalfedgeMesh`]: crate::core::HalfedgeMesh

use std::fmt;

use static_assertions::assert_eq_size;


/// The integer type used as index in all handles.
///
/// By default this is `u32`. With the feature `large-handle` it is `u64`.
#[cfg(not(feature = "large-handle"))]
#[allow(non_camel_case_types)]
pub type hsize = u32;

/// The integer type used as index in all handles.
///
/// By default this is `u32`. With the feature `large-handle` it is `u64`.
#[cfg(feature = "large-handle")]
#[allow(non_camel_case_types)]
pub type hsize = u64;


/// Common functionality of all handle types.
pub trait Handle: 'static + Copy + fmt::Debug + Eq + Ord + std::hash::Hash {
    /// Creates a handle from the given index. Does not check anything.
    fn new(idx: hsize) -> Self;

    /// Returns the index of this handle.
    fn idx(&self) -> hsize;

    /// Helper to create a handle directly from a `usize`.
    ///
    /// Panics if the value doesn't fit into `hsize`.
    #[inline(always)]
    fn from_usize(raw: usize) -> Self {
        assert!(raw <= hsize::max_value() as usize, "handle index overflow: {}", raw);
        Self::new(raw as hsize)
    }

    /// Helper to get the index as `usize`.
    #[inline(always)]
    fn to_usize(&self) -> usize {
        self.idx() as usize
    }
}

macro_rules! make_handle_type {
    ($(#[$attr:meta])* $name:ident = $short:expr;) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(hsize);

        impl Handle for $name {
            #[inline(always)]
            fn new(idx: hsize) -> Self {
                $name(idx)
            }

            #[inline(always)]
            fn idx(&self) -> hsize {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}{}", $short, self.0)
            }
        }

        impl optional::Noned for $name {
            #[inline(always)]
            fn is_none(&self) -> bool {
                self.0 == hsize::max_value()
            }

            #[inline(always)]
            fn get_none() -> Self {
                $name(hsize::max_value())
            }
        }

        impl optional::OptEq for $name {
            fn opt_eq(&self, other: &Self) -> bool {
                self == other
            }
        }

        assert_eq_size!($name, hsize);
    };
}

make_handle_type! {
    /// Refers to a vertex.
    VertexHandle = "V";
}
make_handle_type! {
    /// Refers to a full edge, i.e. a pair of halfedges.
    EdgeHandle = "E";
}
make_handle_type! {
    /// Refers to one directed side of an edge.
    HalfedgeHandle = "H";
}
make_handle_type! {
    /// Refers to a face.
    FaceHandle = "F";
}

impl HalfedgeHandle {
    /// Returns the halfedge pointing in the opposite direction.
    ///
    /// Both halfedges of an edge are always stored next to each other,
    /// starting at an even index. Thus, flipping the lowest bit yields the
    /// opposite halfedge.
    #[inline(always)]
    pub fn opposite(self) -> Self {
        HalfedgeHandle(self.0 ^ 1)
    }

    /// Returns the full edge this halfedge belongs to.
    #[inline(always)]
    pub fn edge(self) -> EdgeHandle {
        EdgeHandle(self.0 >> 1)
    }

    /// Returns `true` if this is the even (primary) halfedge of its edge.
    #[inline(always)]
    pub fn is_primary(self) -> bool {
        self.0 & 1 == 0
    }
}

impl EdgeHandle {
    /// Returns the `i`-th halfedge of this edge. `i` has to be 0 or 1;
    /// halfedge 0 is the primary one.
    #[inline(always)]
    pub fn halfedge(self, i: u8) -> HalfedgeHandle {
        debug_assert!(i < 2, "edge only has two halfedges, but index {} was requested", i);
        HalfedgeHandle(self.0 * 2 + i as hsize)
    }
}
