use cgmath::Point3;

use crate::{
    handle::{Handle, VertexHandle, EdgeHandle, HalfedgeHandle, FaceHandle},
    test_utils::add_planar_vertices,
};
use super::HalfedgeMesh;


fn vertices_of(m: &HalfedgeMesh, f: FaceHandle) -> Vec<VertexHandle> {
    m.vertices_around_face(f).collect()
}

/// Two triangles sharing the edge `B -- C`.
///
/// ```text
///         (C) ----- (D)
///        /   \  Y  /
///       /  X  \   /
///      /       \ /
///    (A) ----- (B)
/// ```
fn two_triangles() -> (HalfedgeMesh, [VertexHandle; 4], FaceHandle, FaceHandle) {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (2.0, 0.0), (1.0, 1.0), (3.0, 1.0)]);
    let (va, vb, vc, vd) = (v[0], v[1], v[2], v[3]);
    let fx = m.add_face(&[va, vb, vc]).unwrap();
    let fy = m.add_face(&[vb, vd, vc]).unwrap();
    (m, [va, vb, vc, vd], fx, fy)
}

#[test]
fn empty() {
    let m = HalfedgeMesh::new();
    assert_eq!(m.num_vertices(), 0);
    assert_eq!(m.num_edges(), 0);
    assert_eq!(m.num_halfedges(), 0);
    assert_eq!(m.num_faces(), 0);
    assert_eq!(m.vertices().count(), 0);
    assert_eq!(m.faces().len(), 0);
    m.check_integrity();
}

#[test]
fn single_triangle() {
    //
    //         (C)
    //        /   \
    //       /     \
    //      /       \
    //    (A) ----- (B)
    //
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let (va, vb, vc) = (v[0], v[1], v[2]);
    let f = m.add_face(&[va, vb, vc]).unwrap();
    m.check_integrity();

    assert_eq!(m.num_vertices(), 3);
    assert_eq!(m.num_edges(), 3);
    assert_eq!(m.num_halfedges(), 6);
    assert_eq!(m.num_faces(), 1);

    assert_rotated_eq!(vertices_of(&m, f), vec![va, vb, vc]);
    assert_eq!(m.num_vertices_around_face(f), 3);
    assert!(m.faces_around_face(f).is_empty());

    // Each face halfedge is linked into the cycle and its opposite is border.
    for &h in m.halfedges_around_face(f) {
        assert_eq!(m.face(h), Some(f));
        let next = m.next(h).unwrap();
        assert_eq!(m.prev(next), Some(h));
        assert_eq!(m.source(next), m.target(h));
        assert!(m.is_border(m.opposite(h)));
        assert!(m.is_border_edge(h.edge()));
    }

    for &v in &[va, vb, vc] {
        assert_eq!(m.num_halfedges_around_vertex(v), 2);
        assert_eq!(m.vertices_around_vertex(v).len(), 2);
    }
}

#[test]
fn two_triangles_share_an_edge() {
    let (m, [va, vb, vc, vd], fx, fy) = two_triangles();
    m.check_integrity();

    assert_eq!(m.num_edges(), 5);
    assert_eq!(m.num_halfedges(), 10);
    assert_eq!(&m.faces_around_face(fx)[..], &[fy]);
    assert_eq!(&m.faces_around_face(fy)[..], &[fx]);
    assert_rotated_eq!(vertices_of(&m, fy), vec![vb, vd, vc]);

    let inner = m.halfedge_between(vb, vc, true).unwrap();
    assert_eq!(m.face(inner), Some(fx));
    assert_eq!(m.face(m.opposite(inner)), Some(fy));
    assert!(!m.is_border_edge(inner.edge()));
    assert_eq!(m.edge_between(vc, vb, true), Some(inner.edge()));

    // `A` and `D` are not connected.
    assert_eq!(m.halfedge_between(va, vd, true), None);
    assert_eq!(m.halfedge_between(va, vd, false), None);
}

#[test]
fn halfedge_between_strict_and_non_strict() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let (va, vb, vc) = (v[0], v[1], v[2]);

    let h = m.add_edge(va, vb);
    assert_eq!(m.source(h), va);
    assert_eq!(m.target(h), vb);
    assert_eq!(m.halfedge_between(va, vb, true), Some(h));
    assert_eq!(m.halfedge_between(vb, va, true), Some(h.opposite()));

    // Without a face, the non-strict lookup finds nothing.
    assert_eq!(m.halfedge_between(va, vb, false), None);

    m.add_face(&[va, vb, vc]).unwrap();
    assert_eq!(m.halfedge_between(va, vb, false), Some(h));
    assert_eq!(m.halfedge_between(vb, va, false), None);
}

#[test]
fn add_face_reuses_existing_edge() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let h = m.add_edge(v[0], v[1]);
    let f = m.add_face(&[v[0], v[1], v[2]]).unwrap();

    assert_eq!(m.num_edges(), 3);
    assert!(m.halfedges_around_face(f).contains(&h));
    m.check_integrity();
}

#[test]
fn reject_face_with_used_halfedge() {
    let (mut m, [va, vb, vc, vd], _, _) = two_triangles();

    // `B -> C` is already used by X. Inserting a second face with the same
    // winding there would make the edge non-manifold.
    assert!(!m.is_insertable(&[vb, vc, vd]));

    let edges_before = m.num_edges();
    let faces_before = m.num_faces();
    assert_eq!(m.add_face(&[vb, vc, vd]), None);
    assert_eq!(m.num_faces(), faces_before);
    assert_eq!(m.num_edges(), edges_before);

    // The opposite winding is fine.
    let ve = m.add_vertex(Point3::new(2.0, 2.0, 0.0));
    assert!(m.is_insertable(&[vc, vd, ve]));
    assert!(!m.is_insertable(&[va, vb, vc]));
    m.check_integrity();
}

#[test]
fn rejected_face_keeps_created_edges() {
    let (mut m, [_, vb, vc, _], _, _) = two_triangles();
    let ve = m.add_vertex(Point3::new(5.0, 5.0, 0.0));

    // `E -> B` is new, `B -> C` is taken.
    let edges_before = m.num_edges();
    assert_eq!(m.add_face(&[ve, vb, vc]), None);
    assert_eq!(m.num_edges(), edges_before + 1);
    assert!(m.halfedge_between(ve, vb, true).is_some());

    // No halfedge was bound to a face.
    for h in m.halfedges() {
        if let Some(f) = m.face(h) {
            assert!(m.halfedges_around_face(f).contains(&h));
        }
    }
    m.check_integrity();
}

#[test]
fn reject_face_repeating_a_halfedge() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    assert_eq!(m.add_face(&[v[0], v[1], v[2], v[0], v[1], v[2]]), None);
    assert_eq!(m.num_faces(), 0);
}

#[test]
fn quad_face() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let f = m.add_face(&v).unwrap();

    assert_rotated_eq!(vertices_of(&m, f), v.clone());
    assert_eq!(m.edges_around_face(f).len(), 4);

    let mut buf = vec![VertexHandle::new(99)];
    m.vertices_around_face_into(&mut buf, f);
    assert_rotated_eq!(buf, v);
}

#[test]
fn iteration_skips_removed() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
    m.remove_vertex(v[1]);

    assert_eq!(m.vertices().collect::<Vec<_>>(), vec![v[0], v[2], v[3]]);
    assert_eq!(m.vertices().len(), 3);
    assert!(m.is_removed(v[1]));
    assert!(!m.is_removed(v[2]));
    assert_eq!(m.num_internal_vertices(), 4);
    assert_eq!(m.num_vertices_removed(), 1);
}

#[test]
fn vertex_free_list_is_fifo() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);

    m.remove_vertex(v[2]);
    m.remove_vertex(v[0]);
    let count = m.num_vertices();

    let a = m.add_vertex(Point3::new(7.0, 7.0, 7.0));
    assert_eq!(a, v[2]);
    assert_eq!(m.num_vertices(), count + 1);
    assert_eq!(m.position(a), Point3::new(7.0, 7.0, 7.0));

    let b = m.add_vertex(Point3::new(8.0, 8.0, 8.0));
    assert_eq!(b, v[0]);

    let c = m.add_vertex(Point3::new(9.0, 9.0, 9.0));
    assert_eq!(c, VertexHandle::new(4));
}

#[test]
fn remove_and_add_vertex_keeps_count() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    let count = m.num_vertices();

    m.remove_vertex(v[1]);
    let new = m.add_vertex(Point3::new(1.0, 0.0, 0.0));
    assert_eq!(new, v[1]);
    assert_eq!(m.num_vertices(), count);
}

#[test]
fn edge_reuse_keeps_halfedge_pairs() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);

    let h0 = m.add_edge(v[0], v[1]);
    let h1 = m.add_edge(v[1], v[2]);
    assert_eq!(h0, HalfedgeHandle::new(0));
    assert_eq!(h1, HalfedgeHandle::new(2));

    m.remove_edge(h0.edge(), true);
    assert!(m.is_removed(h0.edge()));
    assert!(m.is_removed(h0));
    assert!(m.is_removed(h0.opposite()));

    let again = m.add_edge(v[2], v[0]);
    assert_eq!(again.edge(), EdgeHandle::new(0));
    assert_eq!(again, HalfedgeHandle::new(0));
    assert_eq!(m.source(again), v[2]);
    assert_eq!(m.target(again), v[0]);
    assert_eq!(m.vertex_of_edge(again.edge(), 1), v[2]);
    m.check_integrity();
}

#[test]
fn edge_without_free_halfedges_is_not_reused() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0)]);
    let h = m.add_edge(v[0], v[1]);

    // Remove only the edge, the halfedges stay.
    m.remove_edge(h.edge(), false);
    assert_eq!(m.edge(h), None);
    assert!(m.contains(h));

    let fresh = m.add_edge(v[0], v[1]);
    assert_eq!(fresh.edge(), EdgeHandle::new(1));
    assert_eq!(fresh, HalfedgeHandle::new(2));
}

#[test]
fn remove_face() {
    let (mut m, [va, vb, vc, _], fx, fy) = two_triangles();
    m.remove_face(fx);
    m.check_integrity();

    assert!(m.is_removed(fx));
    assert_eq!(m.num_faces(), 1);
    assert!(m.faces_around_face(fy).is_empty());

    // The edges stay, but are border now.
    let h = m.halfedge_between(va, vb, true).unwrap();
    assert!(m.is_border(h));
    assert_eq!(m.next(h), None);
    assert_eq!(m.prev(h), None);
    assert!(m.is_insertable(&[va, vb, vc]));
}

#[test]
fn remove_everything_bottom_up() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let f = m.add_face(&v).unwrap();

    m.remove_face(f);
    let edges = m.edges().collect::<Vec<_>>();
    for e in edges {
        m.remove_edge(e, true);
    }
    assert_eq!(m.num_halfedges(), 0);
    for &v in &v {
        assert_eq!(m.num_halfedges_around_vertex(v), 0);
        m.remove_vertex(v);
    }

    assert_eq!(m.num_vertices(), 0);
    assert_eq!(m.num_vertices_removed(), 3);
    m.check_integrity();
}

#[test]
fn remove_elements_and_reset() {
    let (mut m, _, _, _) = two_triangles();
    m.remove_elements();
    m.check_integrity();
    assert_eq!(m.num_vertices(), 0);
    assert_eq!(m.num_edges(), 0);
    assert_eq!(m.num_halfedges(), 0);
    assert_eq!(m.num_faces(), 0);
    assert_eq!(m.num_internal_vertices(), 4);

    // The next vertex reuses the oldest slot.
    assert_eq!(m.add_vertex(Point3::new(0.0, 0.0, 0.0)), VertexHandle::new(0));

    m.reset();
    assert_eq!(m.num_internal_vertices(), 0);
    assert_eq!(m.num_vertices_removed(), 0);
}

#[test]
fn readd_face_is_isomorphic() {
    let (mut m, [va, vb, vc, _], fx, fy) = two_triangles();
    let before_vertices = vertices_of(&m, fx);
    let before_neighbors = m.faces_around_face(fy).to_vec();

    m.remove_face(fx);
    let fx2 = m.add_face(&[va, vb, vc]).unwrap();
    m.check_integrity();

    assert_eq!(fx2, fx);
    assert_rotated_eq!(vertices_of(&m, fx2), before_vertices);
    assert_eq!(m.faces_around_face(fy).to_vec(), before_neighbors);
    assert_eq!(m.num_edges(), 5);
}

#[test]
fn readd_edge_and_vertex_is_isomorphic() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let h = m.add_edge(v[0], v[2]);

    m.remove_edge(h.edge(), true);
    m.remove_vertex(v[2]);
    let v2 = m.add_vertex(Point3::new(0.0, 1.0, 0.0));
    let h2 = m.add_edge(v[0], v2);

    assert_eq!(v2, v[2]);
    assert_eq!(h2, h);
    assert_eq!(m.vertices_around_vertex(v[0]).collect::<Vec<_>>(), vec![v2]);
    assert_eq!(m.halfedges_around_vertex(v2), &[h2][..]);
    m.check_integrity();
}

#[test]
fn manual_next_prev_links() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let a = m.add_edge(v[0], v[1]);
    let b = m.add_edge(v[1], v[2]);

    m.set_next(a, b);
    assert_eq!(m.next(a), Some(b));
    assert_eq!(m.prev(b), Some(a));

    m.set_previous(a, b);
    assert_eq!(m.prev(a), Some(b));
    assert_eq!(m.next(b), None);
}

#[test]
fn halfedge_of_edge() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0)]);
    let h = m.add_edge(v[0], v[1]);
    let e = m.edge(h).unwrap();

    assert_eq!(m.halfedge_of_edge(e, 0), h);
    assert_eq!(m.halfedge_of_edge(e, 1), h.opposite());
    assert_eq!(m.vertex_of_edge(e, 0), v[1]);
    assert_eq!(m.vertex_of_edge(e, 1), v[0]);
    assert_panic!(m.halfedge_of_edge(e, 2));
}

#[test]
fn set_position() {
    let mut m = HalfedgeMesh::new();
    let v = m.add_vertex(Point3::new(1.0, 2.0, 3.0));
    m.set_position(v, Point3::new(3.0, 2.0, 1.0));
    assert_eq!(m.position(v), Point3::new(3.0, 2.0, 1.0));
}

#[test]
fn reserve() {
    let mut m = HalfedgeMesh::new();
    m.reserve_for_additional_elements(100);
    m.reserve_for_additional_vertices(10);
    assert_eq!(m.num_vertices(), 0);
    assert_eq!(m.num_internal_edges(), 0);
}

#[test]
fn panic_on_invalid_vertex() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    let invalid = VertexHandle::new(v.iter().map(|h| h.idx()).max().unwrap() + 1);

    let mut clone = m.clone();
    assert_panic!(clone.add_face(&[v[0], v[1], invalid]));

    let mut clone = m.clone();
    assert_panic!(clone.add_edge(invalid, v[0]));

    assert_panic!(m.position(invalid));
    assert_panic!(m.halfedges_around_vertex(invalid));
}

#[test]
fn panic_on_too_small_face() {
    let mut m = HalfedgeMesh::new();
    let v = add_planar_vertices(&mut m, &[(0.0, 0.0), (1.0, 0.0)]);

    let mut clone = m.clone();
    assert_panic!(clone.add_face(&[]));

    let mut clone = m.clone();
    assert_panic!(clone.add_face(&[v[0]]));

    let mut clone = m.clone();
    assert_panic!(clone.add_face(&[v[0], v[1]]));
}

#[test]
fn panic_on_removal_with_dependents() {
    let (m, [va, vb, _, _], fx, _) = two_triangles();
    let h = m.halfedge_between(va, vb, true).unwrap();

    // The vertex still has incident halfedges.
    let mut clone = m.clone();
    assert_panic!(clone.remove_vertex(va));

    // The halfedge still has its edge.
    let mut clone = m.clone();
    assert_panic!(clone.remove_halfedge(h));

    // The halfedge still has its face.
    let mut clone = m.clone();
    assert_panic!(clone.remove_edge(h.edge(), true));

    // Removing twice.
    let mut clone = m.clone();
    clone.remove_face(fx);
    assert_panic!(clone.remove_face(fx));
}

#[test]
fn panic_on_removed_face() {
    let (mut m, _, fx, _) = two_triangles();
    m.remove_face(fx);
    assert_panic!(m.halfedges_around_face(fx));
    assert_panic!(m.faces_around_face(fx));
}

#[test]
fn mesh_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HalfedgeMesh>();
}
