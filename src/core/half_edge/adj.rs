//! Adjacency queries of the halfedge mesh.

use smallvec::SmallVec;

use crate::handle::{VertexHandle, EdgeHandle, HalfedgeHandle, FaceHandle};
use super::HalfedgeMesh;


impl HalfedgeMesh {
    /// The halfedges of `f` in the cyclic order of the face.
    pub fn halfedges_around_face(&self, f: FaceHandle) -> &[HalfedgeHandle] {
        &self.check_face(f).halfedges
    }

    /// The vertices of `f` in the cyclic order of the face. The first vertex
    /// is the target of the first halfedge.
    pub fn vertices_around_face(
        &self,
        f: FaceHandle,
    ) -> impl ExactSizeIterator<Item = VertexHandle> + '_ {
        self.halfedges_around_face(f).iter().map(move |&h| self.halfedges[h].target)
    }

    /// Like `vertices_around_face`, but writes into `out` (after clearing it)
    /// to reuse an existing allocation.
    pub fn vertices_around_face_into(&self, out: &mut Vec<VertexHandle>, f: FaceHandle) {
        out.clear();
        out.extend(self.vertices_around_face(f));
    }

    pub fn num_vertices_around_face(&self, f: FaceHandle) -> usize {
        self.check_face(f).halfedges.len()
    }

    /// The edges of `f` in the cyclic order of the face.
    pub fn edges_around_face(
        &self,
        f: FaceHandle,
    ) -> impl ExactSizeIterator<Item = EdgeHandle> + '_ {
        self.halfedges_around_face(f).iter().map(|h| h.edge())
    }

    /// All faces sharing an edge with `f`. Each neighbour is listed once, in
    /// the order its first shared halfedge appears in `f`.
    pub fn faces_around_face(&self, f: FaceHandle) -> SmallVec<[FaceHandle; 8]> {
        let mut out = SmallVec::<[FaceHandle; 8]>::new();
        for &h in self.halfedges_around_face(f) {
            let opp = match self.halfedges.get(h.opposite()) {
                Some(opp) => opp,
                None => continue,
            };

            if let Some(neighbor) = opp.face.into_option() {
                if !out.contains(&neighbor) {
                    out.push(neighbor);
                }
            }
        }

        out
    }

    /// All halfedges pointing to `v`, in insertion order.
    pub fn halfedges_around_vertex(&self, v: VertexHandle) -> &[HalfedgeHandle] {
        &self.check_vertex(v).incoming
    }

    pub fn num_halfedges_around_vertex(&self, v: VertexHandle) -> usize {
        self.check_vertex(v).incoming.len()
    }

    /// All vertices connected to `v` by an edge.
    pub fn vertices_around_vertex(
        &self,
        v: VertexHandle,
    ) -> impl ExactSizeIterator<Item = VertexHandle> + '_ {
        self.halfedges_around_vertex(v).iter().map(move |&h| self.source(h))
    }

    /// Finds the halfedge going from `s` to `t`.
    ///
    /// Looks for an edge that appears in the incoming lists of both vertices
    /// and picks the half of it pointing from `s` to `t`. With `strict`, that
    /// halfedge is returned whether or not it belongs to a face. Without
    /// `strict`, it is only returned if it belongs to a face; border
    /// halfedges yield `None`.
    pub fn halfedge_between(
        &self,
        s: VertexHandle,
        t: VertexHandle,
        strict: bool,
    ) -> Option<HalfedgeHandle> {
        let s_incoming = &self.check_vertex(s).incoming;
        let t_incoming = &self.check_vertex(t).incoming;

        let shared = s_incoming
            .iter()
            .find(|hs| t_incoming.iter().any(|ht| ht.edge() == hs.edge()))?;

        // `shared` points to `s`, so we usually want its opposite. Only for a
        // self loop both halves point to `s`.
        let h = if self.source(*shared) == s && self.target(*shared) == t {
            *shared
        } else {
            debug_assert_eq!(self.source(*shared), t);
            shared.opposite()
        };

        if strict || self.halfedges[h].face.is_some() {
            Some(h)
        } else {
            None
        }
    }

    /// The edge between `s` and `t`, with the same `strict` semantics as
    /// `halfedge_between`.
    pub fn edge_between(
        &self,
        s: VertexHandle,
        t: VertexHandle,
        strict: bool,
    ) -> Option<EdgeHandle> {
        self.halfedge_between(s, t, strict).map(|h| h.edge())
    }
}
