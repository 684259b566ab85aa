//! Triangulation of polygonal mesh faces with winding orders that agree
//! with the neighbouring faces.
//!
//! The faces of a [`HalfedgeMesh`] are arbitrary simple polygons, typically
//! produced by cutting or intersecting meshes. [`triangulate_face`] turns
//! one of them into triangles:
//!
//! ```
//! use cgmath::Point3;
//! use cutmesh::{HalfedgeMesh, triangulate_face};
//!
//! let mut mesh = HalfedgeMesh::new();
//! let v = [
//!     mesh.add_vertex(Point3::new(0.0, 0.0, 0.0)),
//!     mesh.add_vertex(Point3::new(1.0, 0.0, 0.0)),
//!     mesh.add_vertex(Point3::new(1.0, 1.0, 0.0)),
//!     mesh.add_vertex(Point3::new(0.0, 1.0, 0.0)),
//! ];
//! let face = mesh.add_face(&v).unwrap();
//!
//! let mut indices = Vec::new();
//! let count = triangulate_face(&mut indices, 4, &v, &mesh, face).unwrap();
//! assert_eq!(count, 2);
//! assert_eq!(indices.len(), 6);
//! ```
//!
//! The modules, bottom up:
//!
//! - [`handle`]: typed indices for vertices, edges, halfedges and faces.
//! - [`core`]: the [`HalfedgeMesh`] itself.
//! - [`math`]: planar projection and 2D predicates.
//! - [`cdt`]: constrained Delaunay triangulation of simple polygons.
//! - [`triangulate`]: the per face pipeline.
//! - [`diag`]: diagnostics reported while triangulating.

#[cfg(test)]
#[macro_use]
mod test_utils;

pub mod cdt;
pub mod core;
pub mod diag;
pub mod handle;
pub mod math;
pub mod prelude;
pub mod triangulate;

pub use self::{
    core::{HalfedgeMesh, MeshElement},
    diag::{Diagnostic, DiagnosticSink, Kind, NullSink, Severity, Source, TracingSink},
    handle::{hsize, Handle, EdgeHandle, FaceHandle, HalfedgeHandle, VertexHandle},
    triangulate::{
        triangulate_face, triangulate_mesh, FaceReport, FaceTriangulator, Index,
        OutputWinding, TriangulationConfig, TriangulationError,
    },
};
