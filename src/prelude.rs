//! Reexports of the types and traits needed all the time.
//!
//! As with every prelude, the main usage is to glob import everything from
//! this module:
//!
//! ```
//! use cutmesh::prelude::*;
//! ```

pub use crate::{
    Handle,
    core::{HalfedgeMesh, MeshElement},
    diag::DiagnosticSink,
    handle::{EdgeHandle, FaceHandle, HalfedgeHandle, VertexHandle},
};
