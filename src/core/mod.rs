//! The mesh data structure and the handle iterators.
//!
//! [`HalfedgeMesh`] is the only mesh type. It stores vertices, edges,
//! halfedges and faces in separate arenas. Removed elements leave holes that
//! are refilled by later insertions; all iterators in this module skip those
//! holes.

use crate::handle::{hsize, Handle, VertexHandle, EdgeHandle, HalfedgeHandle, FaceHandle};

mod arena;
pub mod half_edge;

pub use self::half_edge::{HalfedgeMesh, MeshElement};


/// An iterator over the handles of all live elements of one type in a
/// [`HalfedgeMesh`]. Yields handles with increasing index value.
#[derive(Debug, Clone)]
pub struct HandleIter<'a, H: Handle> {
    current: H,
    mesh: &'a HalfedgeMesh,
    count: hsize,
}

macro_rules! impl_handle_iter {
    ($handle:ident, $method:ident, $num_fn:ident) => {
        impl<'a> HandleIter<'a, $handle> {
            pub(crate) fn new(mesh: &'a HalfedgeMesh) -> Self {
                Self {
                    current: $handle::new(0),
                    mesh,
                    count: mesh.$num_fn(),
                }
            }
        }

        impl Iterator for HandleIter<'_, $handle> {
            type Item = $handle;

            fn next(&mut self) -> Option<Self::Item> {
                if self.count == 0 {
                    return None;
                }

                let out = self.mesh.$method(self.current);
                if let Some(out) = out {
                    self.current = $handle::new(out.idx() + 1);
                    self.count -= 1;
                }

                out
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                (self.count as usize, Some(self.count as usize))
            }
        }

        impl ExactSizeIterator for HandleIter<'_, $handle> {}
    }
}

impl_handle_iter!(VertexHandle, next_vertex_handle_from, num_vertices);
impl_handle_iter!(EdgeHandle, next_edge_handle_from, num_edges);
impl_handle_iter!(HalfedgeHandle, next_halfedge_handle_from, num_halfedges);
impl_handle_iter!(FaceHandle, next_face_handle_from, num_faces);
