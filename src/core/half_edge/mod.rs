//! Everything related to the [`HalfedgeMesh`].

// # Some notes for developers about this implementation
//
// - The opposite halfedges are stored implicitly: both halves of an edge are
//   always stored next to one another and thus have handle indices only one
//   apart. Since we start with the handle index 0, the indices are always 2k
//   and 2k + 1. The edge handle of such a pair is k. This means edge slots
//   and halfedge pair slots are always allocated and reused together.
// - Each vertex stores the list of halfedges *pointing to* it, not the
//   outgoing ones. Outgoing halfedges are reached via `opposite`.
// - Removing an element never moves other elements. The slot is put into a
//   per-type FIFO free list and refilled by the next `add_*` call.
// - Removing is done bottom up by the caller: face, then edge, then halfedge,
//   then vertex. Each `remove_*` panics if the element still has dependents.

use std::fmt;

use cgmath::Point3;
use optional::Optioned as Opt;
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    handle::{hsize, Handle, VertexHandle, EdgeHandle, HalfedgeHandle, FaceHandle},
};
use super::{arena::Arena, HandleIter};


mod adj;
#[cfg(test)]
mod tests;


const DANGLING_DEPENDENTS_ERR: &str = "cannot remove element that still has dependents";



// ===============================================================================================
// ===== Definition of types stored inside the data structure
// ===============================================================================================

/// Data stored per vertex.
#[derive(Clone)]
pub(crate) struct Vertex {
    position: Point3<f64>,

    /// All halfedges whose target is this vertex, in insertion order.
    incoming: SmallVec<[HalfedgeHandle; 6]>,
}

/// Data stored per edge.
#[derive(Clone, Copy)]
pub(crate) struct Edge {
    /// The even halfedge of this edge. Always `2 * edge`.
    primary: HalfedgeHandle,
}

/// Data stored per halfedge.
#[derive(Clone, Copy)]
pub(crate) struct Halfedge {
    /// The vertex this halfedge points to.
    target: VertexHandle,

    /// The face this halfedge belongs to. `None` for border halfedges.
    face: Opt<FaceHandle>,

    /// Next and previous halfedge in the face cycle. Only set while the
    /// halfedge belongs to a face (or was linked manually via `set_next`).
    next: Opt<HalfedgeHandle>,
    prev: Opt<HalfedgeHandle>,

    /// The owning edge. Cleared by `remove_edge`, which is required before
    /// the halfedge itself can be removed.
    edge: Opt<EdgeHandle>,
}

/// Data stored per face.
#[derive(Clone)]
pub(crate) struct Face {
    /// The halfedges of this face in cyclic order.
    halfedges: SmallVec<[HalfedgeHandle; 4]>,
}

impl fmt::Debug for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Vertex {{ position: [{}, {}, {}], incoming: {:?} }}",
            self.position.x,
            self.position.y,
            self.position.z,
            self.incoming,
        )
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Edge {{ primary: {:?} }}", self.primary)
    }
}

impl fmt::Debug for Halfedge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Halfedge {{ target: {:5} next: {:6} prev: {:6} face: {:?} }}",
            format!("{:?},", self.target),
            format!("{:?},", self.next.into_option()),
            format!("{:?},", self.prev.into_option()),
            self.face.into_option(),
        )
    }
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Face {{ halfedges: {:?} }}", self.halfedges)
    }
}


/// An indexed halfedge mesh with soft deletion.
///
/// Supports polygon faces of arbitrary degree. Each halfedge belongs to at
/// most one face, so an edge can be shared by at most two faces. Attempts to
/// add a face that would need a third one are rejected by [`add_face`].
///
/// All handles stay valid until the element they refer to is removed. Slots
/// of removed elements are reused oldest first by later insertions.
///
/// Passing a handle of an element that does not exist (anymore) to any
/// method is a programmer error and results in a panic.
///
/// [`add_face`]: HalfedgeMesh::add_face
#[derive(Clone, Debug)]
pub struct HalfedgeMesh {
    vertices: Arena<VertexHandle, Vertex>,
    edges: Arena<EdgeHandle, Edge>,
    halfedges: Arena<HalfedgeHandle, Halfedge>,
    faces: Arena<FaceHandle, Face>,
}

impl Default for HalfedgeMesh {
    fn default() -> Self {
        Self::new()
    }
}


// ===============================================================================================
// ===== Internal helper methods
// ===============================================================================================

impl HalfedgeMesh {
    fn check_vertex(&self, vh: VertexHandle) -> &Vertex {
        match self.vertices.get(vh) {
            Some(v) => v,
            None => panic!(
                "{:?} was passed to a halfedge mesh, but this vertex does not exist in this mesh",
                vh,
            ),
        }
    }

    fn check_edge(&self, eh: EdgeHandle) -> &Edge {
        match self.edges.get(eh) {
            Some(e) => e,
            None => panic!(
                "{:?} was passed to a halfedge mesh, but this edge does not exist in this mesh",
                eh,
            ),
        }
    }

    fn check_halfedge(&self, he: HalfedgeHandle) -> &Halfedge {
        match self.halfedges.get(he) {
            Some(h) => h,
            None => panic!(
                "{:?} was passed to a halfedge mesh, but this halfedge does not exist in this mesh",
                he,
            ),
        }
    }

    fn check_face(&self, fh: FaceHandle) -> &Face {
        match self.faces.get(fh) {
            Some(f) => f,
            None => panic!(
                "{:?} was passed to a halfedge mesh, but this face does not exist in this mesh",
                fh,
            ),
        }
    }

    /// Allocates an edge together with its two halfedges. The halfedge pair
    /// always lives at `2e` and `2e + 1`.
    ///
    /// A removed edge is reused (oldest first) only if both of its halfedge
    /// slots are free as well. Otherwise a fresh pair is appended.
    fn alloc_edge(&mut self, target0: VertexHandle, target1: VertexHandle) -> EdgeHandle {
        let halfedges = &self.halfedges;
        let reusable = self.edges.free_slots().find(|e| {
            !halfedges.contains(e.halfedge(0)) && !halfedges.contains(e.halfedge(1))
        });

        let half = |target, edge| Halfedge {
            target,
            face: Opt::none(),
            next: Opt::none(),
            prev: Opt::none(),
            edge: Opt::some(edge),
        };

        match reusable {
            Some(e) => {
                self.edges.refill(e, Edge { primary: e.halfedge(0) });
                self.halfedges.refill(e.halfedge(0), half(target0, e));
                self.halfedges.refill(e.halfedge(1), half(target1, e));
                e
            }
            None => {
                let e = EdgeHandle::new(self.edges.num_internal());
                debug_assert_eq!(self.halfedges.num_internal(), e.halfedge(0).idx());

                let pushed_e = self.edges.push_fresh(Edge { primary: e.halfedge(0) });
                let h0 = self.halfedges.push_fresh(half(target0, e));
                let h1 = self.halfedges.push_fresh(half(target1, e));
                debug_assert_eq!(pushed_e, e);
                debug_assert_eq!(h0, e.halfedge(0));
                debug_assert_eq!(h1, e.halfedge(1));
                e
            }
        }
    }

    pub(crate) fn next_vertex_handle_from(&self, start: VertexHandle) -> Option<VertexHandle> {
        self.vertices.next_handle_from(start)
    }

    pub(crate) fn next_edge_handle_from(&self, start: EdgeHandle) -> Option<EdgeHandle> {
        self.edges.next_handle_from(start)
    }

    pub(crate) fn next_halfedge_handle_from(&self, start: HalfedgeHandle) -> Option<HalfedgeHandle> {
        self.halfedges.next_handle_from(start)
    }

    pub(crate) fn next_face_handle_from(&self, start: FaceHandle) -> Option<FaceHandle> {
        self.faces.next_handle_from(start)
    }
}


// ===============================================================================================
// ===== Element access, counts and iteration
// ===============================================================================================

impl HalfedgeMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Arena::new(),
            edges: Arena::new(),
            halfedges: Arena::new(),
            faces: Arena::new(),
        }
    }

    pub fn num_vertices(&self) -> hsize {
        self.vertices.num_elements()
    }

    pub fn num_edges(&self) -> hsize {
        self.edges.num_elements()
    }

    pub fn num_halfedges(&self) -> hsize {
        self.halfedges.num_elements()
    }

    pub fn num_faces(&self) -> hsize {
        self.faces.num_elements()
    }

    /// Number of vertex slots ever allocated, including removed ones.
    pub fn num_internal_vertices(&self) -> hsize {
        self.vertices.num_internal()
    }

    pub fn num_internal_edges(&self) -> hsize {
        self.edges.num_internal()
    }

    pub fn num_internal_halfedges(&self) -> hsize {
        self.halfedges.num_internal()
    }

    pub fn num_internal_faces(&self) -> hsize {
        self.faces.num_internal()
    }

    /// Number of vertex slots currently in the free list.
    pub fn num_vertices_removed(&self) -> hsize {
        self.vertices.num_removed()
    }

    pub fn num_edges_removed(&self) -> hsize {
        self.edges.num_removed()
    }

    pub fn num_halfedges_removed(&self) -> hsize {
        self.halfedges.num_removed()
    }

    pub fn num_faces_removed(&self) -> hsize {
        self.faces.num_removed()
    }

    /// Returns `true` if the element behind `handle` was removed (or never
    /// existed).
    pub fn is_removed<H: MeshElement>(&self, handle: H) -> bool {
        !handle.is_live_in(self)
    }

    /// Returns `true` if the element behind `handle` currently exists.
    pub fn contains<H: MeshElement>(&self, handle: H) -> bool {
        handle.is_live_in(self)
    }

    /// Iterates over all live vertices with increasing index.
    pub fn vertices(&self) -> HandleIter<'_, VertexHandle> {
        HandleIter::<VertexHandle>::new(self)
    }

    pub fn edges(&self) -> HandleIter<'_, EdgeHandle> {
        HandleIter::<EdgeHandle>::new(self)
    }

    pub fn halfedges(&self) -> HandleIter<'_, HalfedgeHandle> {
        HandleIter::<HalfedgeHandle>::new(self)
    }

    pub fn faces(&self) -> HandleIter<'_, FaceHandle> {
        HandleIter::<FaceHandle>::new(self)
    }

    pub fn position(&self, v: VertexHandle) -> Point3<f64> {
        self.check_vertex(v).position
    }

    pub fn set_position(&mut self, v: VertexHandle, position: Point3<f64>) {
        self.check_vertex(v);
        self.vertices[v].position = position;
    }

    pub fn target(&self, h: HalfedgeHandle) -> VertexHandle {
        self.check_halfedge(h).target
    }

    /// The vertex the halfedge starts at (the target of its opposite).
    pub fn source(&self, h: HalfedgeHandle) -> VertexHandle {
        self.check_halfedge(h.opposite()).target
    }

    pub fn opposite(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        self.check_halfedge(h.opposite());
        h.opposite()
    }

    pub fn next(&self, h: HalfedgeHandle) -> Option<HalfedgeHandle> {
        self.check_halfedge(h).next.into_option()
    }

    pub fn prev(&self, h: HalfedgeHandle) -> Option<HalfedgeHandle> {
        self.check_halfedge(h).prev.into_option()
    }

    /// Sets `h.next = next` and `next.prev = h`.
    pub fn set_next(&mut self, h: HalfedgeHandle, next: HalfedgeHandle) {
        self.check_halfedge(h);
        self.check_halfedge(next);
        self.halfedges[h].next = Opt::some(next);
        self.halfedges[next].prev = Opt::some(h);
    }

    /// Sets `h.prev = prev` only. Use `set_next` to link both directions.
    pub fn set_previous(&mut self, h: HalfedgeHandle, prev: HalfedgeHandle) {
        self.check_halfedge(h);
        self.check_halfedge(prev);
        self.halfedges[h].prev = Opt::some(prev);
    }

    /// The edge of the halfedge. Returns `None` if the edge was already
    /// removed while the halfedge was kept.
    pub fn edge(&self, h: HalfedgeHandle) -> Option<EdgeHandle> {
        self.check_halfedge(h).edge.into_option()
    }

    pub fn face(&self, h: HalfedgeHandle) -> Option<FaceHandle> {
        self.check_halfedge(h).face.into_option()
    }

    /// Returns the `i`-th halfedge of edge `e` (`i` is 0 or 1).
    pub fn halfedge_of_edge(&self, e: EdgeHandle, i: u8) -> HalfedgeHandle {
        assert!(i < 2, "edge only has two halfedges, but index {} was requested", i);
        self.check_edge(e).primary.edge().halfedge(i)
    }

    /// Returns the target of the `i`-th halfedge of edge `e`.
    pub fn vertex_of_edge(&self, e: EdgeHandle, i: u8) -> VertexHandle {
        self.target(self.halfedge_of_edge(e, i))
    }

    /// A halfedge is a border halfedge if it doesn't belong to any face.
    pub fn is_border(&self, h: HalfedgeHandle) -> bool {
        self.check_halfedge(h).face.is_none()
    }

    /// An edge is a border edge if at least one of its halfedges is.
    pub fn is_border_edge(&self, e: EdgeHandle) -> bool {
        self.check_edge(e);
        self.is_border(e.halfedge(0)) || self.is_border(e.halfedge(1))
    }

    pub fn reserve_for_additional_vertices(&mut self, n: hsize) {
        self.vertices.reserve(n);
    }

    pub fn reserve_for_additional_edges(&mut self, n: hsize) {
        self.edges.reserve(n);
    }

    pub fn reserve_for_additional_halfedges(&mut self, n: hsize) {
        self.halfedges.reserve(n);
    }

    pub fn reserve_for_additional_faces(&mut self, n: hsize) {
        self.faces.reserve(n);
    }

    /// Reserves memory for `num_vertices` additional vertices and the
    /// number of faces, edges and halfedges a closed triangle mesh with that
    /// many vertices has (approximately).
    pub fn reserve_for_additional_elements(&mut self, num_vertices: hsize) {
        let num_faces = num_vertices * 2;
        let num_edges = num_faces / 2 * 3;
        self.reserve_for_additional_vertices(num_vertices);
        self.reserve_for_additional_faces(num_faces);
        self.reserve_for_additional_edges(num_edges);
        self.reserve_for_additional_halfedges(num_edges * 2);
    }
}


// ===============================================================================================
// ===== Adding and removing elements
// ===============================================================================================

impl HalfedgeMesh {
    /// Adds an isolated vertex. Reuses the oldest free vertex slot if there
    /// is one.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexHandle {
        self.vertices.push(Vertex {
            position,
            incoming: SmallVec::new(),
        })
    }

    /// Adds an edge between `v0` and `v1` and returns the halfedge pointing
    /// to `v1`.
    ///
    /// This does not check whether the two vertices are already connected.
    pub fn add_edge(&mut self, v0: VertexHandle, v1: VertexHandle) -> HalfedgeHandle {
        self.check_vertex(v0);
        self.check_vertex(v1);

        let e = self.alloc_edge(v1, v0);
        let h0 = e.halfedge(0);
        let h1 = e.halfedge(1);

        let incoming_v1 = &mut self.vertices[v1].incoming;
        if !incoming_v1.contains(&h0) {
            incoming_v1.push(h0);
        }
        let incoming_v0 = &mut self.vertices[v0].incoming;
        if !incoming_v0.contains(&h1) {
            incoming_v0.push(h1);
        }

        h0
    }

    /// Adds a face with the given vertices in the given cyclic order.
    ///
    /// For each pair of consecutive vertices, the connecting halfedge is
    /// reused if it already exists and created otherwise. If any of those
    /// halfedges already belongs to a face, the face is not added and `None`
    /// is returned. Nothing of the face is bound in that case, but edges
    /// created before the conflict was found stay in the mesh.
    ///
    /// Panics if fewer than three vertices are passed.
    pub fn add_face(&mut self, vertices: &[VertexHandle]) -> Option<FaceHandle> {
        assert!(
            vertices.len() >= 3,
            "a face needs at least three vertices, but {} were given",
            vertices.len(),
        );

        let mut halfedges = SmallVec::<[HalfedgeHandle; 4]>::with_capacity(vertices.len());
        for (i, &v0) in vertices.iter().enumerate() {
            let v1 = vertices[(i + 1) % vertices.len()];
            let h = match self.halfedge_between(v0, v1, true) {
                Some(h) => h,
                None => self.add_edge(v0, v1),
            };

            debug_assert_eq!(self.source(h), v0);
            debug_assert_eq!(self.target(h), v1);

            if self.halfedges[h].face.is_some() || halfedges.contains(&h) {
                trace!(?h, ?v0, ?v1, "rejecting face: halfedge already used by a face");
                return None;
            }
            halfedges.push(h);
        }

        let len = halfedges.len();
        let fh = self.faces.push(Face { halfedges: halfedges.clone() });
        for (i, &h) in halfedges.iter().enumerate() {
            self.halfedges[h].face = Opt::some(fh);
            self.set_next(h, halfedges[(i + 1) % len]);
        }

        Some(fh)
    }

    /// Returns `true` if a face with the given vertices could be added to
    /// the mesh without reusing a halfedge that already belongs to a face.
    ///
    /// This is the check `add_face` performs, without modifying the mesh.
    pub fn is_insertable(&self, vertices: &[VertexHandle]) -> bool {
        assert!(
            vertices.len() >= 3,
            "a face needs at least three vertices, but {} were given",
            vertices.len(),
        );

        vertices.iter().enumerate().all(|(i, &v0)| {
            let v1 = vertices[(i + 1) % vertices.len()];
            self.halfedge_between(v0, v1, false).is_none()
        })
    }

    /// Removes the face and disassociates all its halfedges (their face and
    /// next/prev links are cleared). Edges and vertices are not touched.
    pub fn remove_face(&mut self, f: FaceHandle) {
        self.check_face(f);
        let face = self.faces.remove(f);

        for &h in &face.halfedges {
            assert_eq!(
                self.halfedges[h].face.into_option(),
                Some(f),
                "bug: {:?} is listed in {:?}, but does not point to it",
                h,
                f,
            );
            self.halfedges[h].face = Opt::none();

            if let Some(next) = self.halfedges[h].next.into_option() {
                self.halfedges[next].prev = Opt::none();
                self.halfedges[h].next = Opt::none();
            }
            if let Some(prev) = self.halfedges[h].prev.into_option() {
                self.halfedges[prev].next = Opt::none();
                self.halfedges[h].prev = Opt::none();
            }
        }
    }

    /// Removes the edge. Its halfedges are disassociated from it and, if
    /// `remove_halfedges` is `true`, removed as well.
    ///
    /// Panics if `remove_halfedges` is `true` and one of the halfedges still
    /// belongs to a face.
    pub fn remove_edge(&mut self, e: EdgeHandle, remove_halfedges: bool) {
        self.check_edge(e);
        self.edges.remove(e);

        for &h in &[e.halfedge(0), e.halfedge(1)] {
            assert_eq!(
                self.halfedges[h].edge.into_option(),
                Some(e),
                "bug: {:?} does not point to its edge {:?}",
                h,
                e,
            );
            self.halfedges[h].edge = Opt::none();
            if remove_halfedges {
                self.remove_halfedge(h);
            }
        }
    }

    /// Removes the halfedge and unlinks it from its next/prev neighbours and
    /// its target vertex.
    ///
    /// Panics if the halfedge still has an edge or a face.
    pub fn remove_halfedge(&mut self, h: HalfedgeHandle) {
        let data = *self.check_halfedge(h);
        assert!(data.edge.is_none(), "{}: {:?} still has an edge", DANGLING_DEPENDENTS_ERR, h);
        assert!(data.face.is_none(), "{}: {:?} still has a face", DANGLING_DEPENDENTS_ERR, h);

        if let Some(next) = data.next.into_option() {
            if self.halfedges[next].prev.into_option() == Some(h) {
                self.halfedges[next].prev = Opt::none();
            }
        }
        if let Some(prev) = data.prev.into_option() {
            if self.halfedges[prev].next.into_option() == Some(h) {
                self.halfedges[prev].next = Opt::none();
            }
        }

        let incoming = &mut self.vertices[data.target].incoming;
        match incoming.iter().position(|&x| x == h) {
            Some(pos) => {
                incoming.remove(pos);
            }
            None => panic!("bug: {:?} is not listed at its target {:?}", h, data.target),
        }

        self.halfedges.remove(h);
    }

    /// Removes an isolated vertex.
    ///
    /// Panics if any halfedge still points to the vertex.
    pub fn remove_vertex(&mut self, v: VertexHandle) {
        let data = self.check_vertex(v);
        assert!(
            data.incoming.is_empty(),
            "{}: {:?} still has incident halfedges {:?}",
            DANGLING_DEPENDENTS_ERR,
            v,
            data.incoming,
        );
        self.vertices.remove(v);
    }

    /// Removes all elements in dependency order. All slots end up in the
    /// free lists, so no memory is released.
    pub fn remove_elements(&mut self) {
        let faces = self.faces().collect::<Vec<_>>();
        for f in faces {
            self.remove_face(f);
        }
        let edges = self.edges().collect::<Vec<_>>();
        for e in edges {
            self.remove_edge(e, true);
        }
        let halfedges = self.halfedges().collect::<Vec<_>>();
        for h in halfedges {
            self.remove_halfedge(h);
        }
        let vertices = self.vertices().collect::<Vec<_>>();
        for v in vertices {
            self.remove_vertex(v);
        }
    }

    /// Drops all elements, free lists and allocated memory.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}


// ===============================================================================================
// ===== Integrity check
// ===============================================================================================

impl HalfedgeMesh {
    /// Checks all internal invariants and panics with a `bug: ...` message if
    /// one is violated. Only meant for tests and debugging.
    pub fn check_integrity(&self) {
        for (vh, v) in self.vertices.iter() {
            for &h in &v.incoming {
                match self.halfedges.get(h) {
                    None => panic!(
                        "bug (broken reference): [{:?}].incoming contains {:?}, but that \
                            halfedge does not exist!",
                        vh,
                        h,
                    ),
                    Some(he) if he.target != vh => panic!(
                        "bug: [{:?}].incoming contains {:?}, but [{:?}].target = {:?}",
                        vh,
                        h,
                        h,
                        he.target,
                    ),
                    _ => {}
                }
            }
        }

        for (eh, e) in self.edges.iter() {
            if e.primary != eh.halfedge(0) {
                panic!("bug: [{:?}].primary = {:?} (should be {:?})", eh, e.primary, eh.halfedge(0));
            }
            for &h in &[eh.halfedge(0), eh.halfedge(1)] {
                match self.halfedges.get(h) {
                    None => panic!(
                        "bug (broken reference): {:?} exists, but its halfedge {:?} does not",
                        eh,
                        h,
                    ),
                    Some(he) if he.edge.into_option() != Some(eh) => panic!(
                        "bug: [{:?}].edge = {:?} (should be {:?})",
                        h,
                        he.edge.into_option(),
                        eh,
                    ),
                    _ => {}
                }
            }
        }

        for (hh, he) in self.halfedges.iter() {
            if !self.vertices.contains(he.target) {
                panic!(
                    "bug (broken reference): [{:?}].target = {:?}, but that vertex does not exist!",
                    hh,
                    he.target,
                );
            }
            if !self.vertices[he.target].incoming.contains(&hh) {
                panic!("bug: {:?} is not listed in the incoming list of its target", hh);
            }
            if let Some(fh) = he.face.into_option() {
                match self.faces.get(fh) {
                    None => panic!(
                        "bug (broken reference): [{:?}].face = {:?}, but that face does not exist!",
                        hh,
                        fh,
                    ),
                    Some(f) if !f.halfedges.contains(&hh) => panic!(
                        "bug: [{:?}].face = {:?}, but the face does not list it",
                        hh,
                        fh,
                    ),
                    _ => {}
                }
            }
            if let Some(next) = he.next.into_option() {
                if self.halfedges.get(next).and_then(|n| n.prev.into_option()) != Some(hh) {
                    panic!("bug: [{:?}].next = {:?}, but [{:?}].prev does not match", hh, next, next);
                }
            }
        }

        for (fh, f) in self.faces.iter() {
            let len = f.halfedges.len();
            if len < 3 {
                panic!("bug: {:?} has only {} halfedges", fh, len);
            }
            for (i, &h) in f.halfedges.iter().enumerate() {
                let expected = f.halfedges[(i + 1) % len];
                let he = &self.halfedges[h];
                if he.next.into_option() != Some(expected) {
                    panic!(
                        "bug: [{:?}].next = {:?}, but next halfedge in {:?} is {:?}",
                        h,
                        he.next.into_option(),
                        fh,
                        expected,
                    );
                }
                if self.target(h) != self.source(expected) {
                    panic!("bug: halfedges {:?} -> {:?} of {:?} are not connected", h, expected, fh);
                }
            }
        }
    }
}


// ===============================================================================================
// ===== Element trait
// ===============================================================================================

/// Handle types of elements stored in a [`HalfedgeMesh`].
pub trait MeshElement: Handle {
    /// Returns `true` if the element exists in `mesh`.
    fn is_live_in(self, mesh: &HalfedgeMesh) -> bool;
}

impl MeshElement for VertexHandle {
    fn is_live_in(self, mesh: &HalfedgeMesh) -> bool {
        mesh.vertices.contains(self)
    }
}

impl MeshElement for EdgeHandle {
    fn is_live_in(self, mesh: &HalfedgeMesh) -> bool {
        mesh.edges.contains(self)
    }
}

impl MeshElement for HalfedgeHandle {
    fn is_live_in(self, mesh: &HalfedgeMesh) -> bool {
        mesh.halfedges.contains(self)
    }
}

impl MeshElement for FaceHandle {
    fn is_live_in(self, mesh: &HalfedgeMesh) -> bool {
        mesh.faces.contains(self)
    }
}
