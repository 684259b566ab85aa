//! The winding order tracker.
//!
//! A small private [`HalfedgeMesh`] holding the neighbours of the face being
//! triangulated plus all of that face's vertices. Every emitted triangle is
//! inserted into it, so `is_insertable` tells whether a new candidate
//! triangle winds consistently with everything emitted or known so far.

use fxhash::FxHashMap;
use tracing::debug;

use crate::{
    core::HalfedgeMesh,
    handle::{FaceHandle, VertexHandle},
};


#[derive(Debug)]
pub(crate) struct WindingTracker {
    mesh: HalfedgeMesh,

    /// WOT vertex of each face local vertex index.
    face_to_wot: Vec<VertexHandle>,

    /// Face local indices `(source, target)` of the first halfedge of the
    /// face that is shared with a neighbour.
    seed: Option<(usize, usize)>,

    num_neighbors: usize,
}

impl WindingTracker {
    /// Builds the tracker for `face` of `mesh`. `face_vertices` are the
    /// vertices of `face` in face order.
    pub(crate) fn new(mesh: &HalfedgeMesh, face: FaceHandle, face_vertices: &[VertexHandle]) -> Self {
        let mut wot = HalfedgeMesh::new();
        let mut to_wot = FxHashMap::default();
        let mut map = |wot: &mut HalfedgeMesh, v: VertexHandle| {
            *to_wot.entry(v).or_insert_with(|| wot.add_vertex(mesh.position(v)))
        };

        let seed = mesh.halfedges_around_face(face)
            .iter()
            .find(|h| mesh.contains(h.opposite()) && mesh.face(h.opposite()).is_some())
            .map(|&h| (mesh.source(h), mesh.target(h)));

        let neighbors = mesh.faces_around_face(face);
        let mut remapped = Vec::new();
        for &neighbor in &neighbors {
            remapped.clear();
            for v in mesh.vertices_around_face(neighbor) {
                remapped.push(map(&mut wot, v));
            }

            if wot.add_face(&remapped).is_none() {
                debug!(?face, ?neighbor, "neighbour conflicts with other neighbours, ignoring it");
            }
        }

        let face_to_wot = face_vertices.iter().map(|&v| map(&mut wot, v)).collect::<Vec<_>>();

        let position = |v: VertexHandle| face_vertices.iter().position(|&x| x == v);
        let seed = seed.and_then(|(s, t)| Some((position(s)?, position(t)?)));

        Self {
            mesh: wot,
            face_to_wot,
            seed,
            num_neighbors: neighbors.len(),
        }
    }

    /// A tracker that only knows the given vertices and no faces.
    #[cfg(test)]
    pub(crate) fn isolated(positions: &[cgmath::Point3<f64>]) -> Self {
        let mut mesh = HalfedgeMesh::new();
        let face_to_wot = positions.iter().map(|&p| mesh.add_vertex(p)).collect();
        Self {
            mesh,
            face_to_wot,
            seed: None,
            num_neighbors: 0,
        }
    }

    pub(crate) fn seed(&self) -> Option<(usize, usize)> {
        self.seed
    }

    pub(crate) fn num_neighbors(&self) -> usize {
        self.num_neighbors
    }

    fn remap(&self, triangle: [usize; 3]) -> [VertexHandle; 3] {
        [
            self.face_to_wot[triangle[0]],
            self.face_to_wot[triangle[1]],
            self.face_to_wot[triangle[2]],
        ]
    }

    /// Can the triangle (face local indices) be inserted with this winding?
    pub(crate) fn is_insertable(&self, triangle: [usize; 3]) -> bool {
        self.mesh.is_insertable(&self.remap(triangle))
    }

    /// Inserts the triangle. Returns `false` if the tracker rejects it.
    pub(crate) fn insert(&mut self, triangle: [usize; 3]) -> bool {
        let remapped = self.remap(triangle);
        self.mesh.add_face(&remapped).is_some()
    }

    #[cfg(test)]
    pub(crate) fn mesh(&self) -> &HalfedgeMesh {
        &self.mesh
    }
}
