//! Structured diagnostics about faces that could not be triangulated cleanly.
//!
//! Triangulating a face never aborts the processing of a whole mesh. Instead,
//! problems are reported as [`Diagnostic`]s to a [`DiagnosticSink`] chosen by
//! the caller. Use [`TracingSink`] to forward them to `tracing`, a
//! `Vec<Diagnostic>` to collect them or any closure.

use std::fmt;

use tracing::{debug, error, warn};

use crate::handle::FaceHandle;


/// The component that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Projection and duplicate vertex resolution.
    Projection,
    /// The constrained Delaunay triangulator.
    Triangulator,
    /// Winding order reconciliation of the emitted triangles.
    Winding,
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The face has (almost) no area or non-finite coordinates.
    DegenerateFace,
    /// Duplicate vertices were still present after perturbation.
    UnresolvedDuplicates,
    /// The triangulator produced an inconsistent triangulation.
    InvalidTopology,
    /// The triangulator produced no triangles.
    EmptyTriangulation,
    /// A triangle could be inserted with neither winding. It was dropped.
    WindingConflict,
    /// Some triangles were not reached by the walk over the triangulation.
    UnvisitedTriangles,
    /// Some face vertices are not used by any emitted triangle.
    UnusedVertices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub source: Source,
    pub kind: Kind,
    pub severity: Severity,
    /// The face that was being triangulated.
    pub face: FaceHandle,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{:?}/{:?}/{:?}] {:?}: {}",
            self.source,
            self.kind,
            self.severity,
            self.face,
            self.message,
        )
    }
}

/// Receives diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Forwards diagnostics to `tracing`. `High` severity is logged as error,
/// `Medium` as warning and `Low` as debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, d: Diagnostic) {
        match d.severity {
            Severity::High => error!(
                source = ?d.source, kind = ?d.kind, face = ?d.face, "{}", d.message
            ),
            Severity::Medium => warn!(
                source = ?d.source, kind = ?d.kind, face = ?d.face, "{}", d.message
            ),
            Severity::Low => debug!(
                source = ?d.source, kind = ?d.kind, face = ?d.face, "{}", d.message
            ),
        }
    }
}

/// Discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _: Diagnostic) {}
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;

    fn diagnostic(severity: Severity) -> Diagnostic {
        Diagnostic {
            source: Source::Triangulator,
            kind: Kind::EmptyTriangulation,
            severity,
            face: FaceHandle::new(4),
            message: "no triangles".into(),
        }
    }

    #[test]
    fn closure_and_vec_sinks() {
        let mut count = 0;
        {
            let mut sink = |_: Diagnostic| count += 1;
            sink.report(diagnostic(Severity::Low));
            sink.report(diagnostic(Severity::High));
        }
        assert_eq!(count, 2);

        let mut collected = Vec::<Diagnostic>::new();
        collected.report(diagnostic(Severity::Medium));
        assert_eq!(collected, vec![diagnostic(Severity::Medium)]);
    }

    #[test]
    fn display() {
        assert_eq!(
            diagnostic(Severity::High).to_string(),
            "[Triangulator/EmptyTriangulation/High] F4: no triangles",
        );
    }
}
