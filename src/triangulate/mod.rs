//! Triangulating single faces of a [`HalfedgeMesh`] with a winding order
//! that agrees with the neighbouring faces.
//!
//! For each face, the following happens:
//!
//! - The face is projected into its dominant plane and oriented counter
//!   clockwise. Points coinciding after projection are moved apart
//!   ([`project`]).
//! - The resulting simple polygon is triangulated with its edges as
//!   constraints ([`crate::cdt`]).
//! - The triangles are emitted by walking the triangulation from a seed
//!   triangle at an edge shared with a neighbour face. Each triangle is
//!   checked against the winding order tracker ([`wot`]) and flipped if
//!   its winding disagrees.
//!
//! A face that cannot be triangulated leaves the output as it was and is
//! reported to the [`DiagnosticSink`].

use std::collections::VecDeque;

use failure::Fail;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    cdt::{self, CdtError, Triangulation},
    core::HalfedgeMesh,
    diag::{Diagnostic, DiagnosticSink, Kind, Severity, Source, TracingSink},
    handle::{FaceHandle, VertexHandle},
};
use self::{project::Projection, wot::WindingTracker};


mod project;
mod wot;


/// Face local vertex index as written to the output buffer.
pub type Index = u32;


// ===============================================================================================
// ===== Configuration and errors
// ===============================================================================================

/// Winding of the emitted triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputWinding {
    /// The winding that agrees with the neighbours (or with the face itself
    /// if it has none).
    AsComputed,
    /// The opposite of `AsComputed`.
    Reversed,
}

/// Tuning constants of the face triangulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangulationConfig {
    /// A non-adjacent duplicate point is moved by this fraction of the
    /// distance to the nearest polygon edge in its perturbation direction.
    pub perturbation_fraction: f64,

    /// If `|orient2d(p, next, prev)|` is at most this, the two edges
    /// incident to a duplicate point are treated as parallel.
    pub parallel_tolerance: f64,

    /// An adjacent duplicate point is moved by this fraction along the edge
    /// to its other neighbour.
    pub adjacent_shift: f64,

    pub output_winding: OutputWinding,

    /// If `true`, a triangle that the winding order tracker rejects in both
    /// windings fails the whole face. Otherwise, the triangle is dropped and
    /// reported.
    pub strict_winding: bool,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            perturbation_fraction: 1e-2,
            parallel_tolerance: 1e-2,
            adjacent_shift: 0.5,
            output_winding: OutputWinding::AsComputed,
            strict_winding: false,
        }
    }
}

impl TriangulationConfig {
    pub fn with_perturbation_fraction(self, perturbation_fraction: f64) -> Self {
        Self { perturbation_fraction, ..self }
    }

    pub fn with_parallel_tolerance(self, parallel_tolerance: f64) -> Self {
        Self { parallel_tolerance, ..self }
    }

    pub fn with_adjacent_shift(self, adjacent_shift: f64) -> Self {
        Self { adjacent_shift, ..self }
    }

    pub fn with_output_winding(self, output_winding: OutputWinding) -> Self {
        Self { output_winding, ..self }
    }

    pub fn with_strict_winding(self, strict_winding: bool) -> Self {
        Self { strict_winding, ..self }
    }
}

/// Reasons why a face could not be triangulated.
#[derive(Debug, Fail)]
pub enum TriangulationError {
    #[fail(display = "degenerate face: {}", _0)]
    DegenerateFace(String),

    #[fail(display = "{} duplicate points could not be resolved", _0)]
    UnresolvedDuplicates(usize),

    #[fail(display = "triangulation has invalid topology: {}", _0)]
    InvalidTopology(CdtError),

    #[fail(display = "triangulation produced no triangles")]
    EmptyTriangulation,

    #[fail(display = "triangle {:?} could not be inserted with either winding", _0)]
    WindingConflict([Index; 3]),

    #[fail(display = "could not allocate memory for the output")]
    OutOfMemory,
}

impl From<CdtError> for TriangulationError {
    fn from(src: CdtError) -> Self {
        TriangulationError::InvalidTopology(src)
    }
}

impl TriangulationError {
    /// The diagnostic reported for this error, if any. Resource errors are
    /// only returned.
    pub fn to_diagnostic(&self, face: FaceHandle) -> Option<Diagnostic> {
        let (source, kind, severity) = match self {
            TriangulationError::DegenerateFace(_)
                => (Source::Projection, Kind::DegenerateFace, Severity::Medium),
            TriangulationError::UnresolvedDuplicates(_)
                => (Source::Projection, Kind::UnresolvedDuplicates, Severity::High),
            TriangulationError::InvalidTopology(_)
                => (Source::Triangulator, Kind::InvalidTopology, Severity::Low),
            TriangulationError::EmptyTriangulation
                => (Source::Triangulator, Kind::EmptyTriangulation, Severity::Low),
            TriangulationError::WindingConflict(_)
                => (Source::Winding, Kind::WindingConflict, Severity::High),
            TriangulationError::OutOfMemory => return None,
        };

        Some(Diagnostic {
            source,
            kind,
            severity,
            face,
            message: self.to_string(),
        })
    }
}


// ===============================================================================================
// ===== Triangulator
// ===============================================================================================

/// Triangulates faces with a fixed configuration and reports problems to
/// `sink`.
#[derive(Debug, Clone)]
pub struct FaceTriangulator<S: DiagnosticSink = TracingSink> {
    pub config: TriangulationConfig,
    pub sink: S,
}

impl Default for FaceTriangulator<TracingSink> {
    fn default() -> Self {
        Self::new(TriangulationConfig::default(), TracingSink)
    }
}

impl<S: DiagnosticSink> FaceTriangulator<S> {
    pub fn new(config: TriangulationConfig, sink: S) -> Self {
        Self { config, sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Triangulates `face` of `mesh` and appends three face local indices
    /// (into `face_vertices`) per triangle to `output`. Returns the number of
    /// appended triangles.
    ///
    /// On error, `output` is left unchanged and the error is reported to the
    /// sink before it is returned.
    ///
    /// Panics if `face_vertex_count` does not match `face_vertices` or is
    /// smaller than three.
    pub fn triangulate_face(
        &mut self,
        output: &mut Vec<Index>,
        face_vertex_count: usize,
        face_vertices: &[VertexHandle],
        mesh: &HalfedgeMesh,
        face: FaceHandle,
    ) -> Result<usize, TriangulationError> {
        assert_eq!(
            face_vertex_count,
            face_vertices.len(),
            "face vertex count does not match the number of passed vertices",
        );
        assert!(
            face_vertex_count >= 3,
            "a face needs at least three vertices, but {} were given",
            face_vertex_count,
        );

        let result = self.triangulate_into_scratch(face_vertices, mesh, face)
            .and_then(|scratch| {
                output.try_reserve(scratch.len()).map_err(|_| TriangulationError::OutOfMemory)?;
                output.extend_from_slice(&scratch);
                Ok(scratch.len() / 3)
            });

        if let Err(e) = &result {
            if let Some(d) = e.to_diagnostic(face) {
                self.sink.report(d);
            }
        }

        result
    }

    fn triangulate_into_scratch(
        &mut self,
        face_vertices: &[VertexHandle],
        mesh: &HalfedgeMesh,
        face: FaceHandle,
    ) -> Result<Vec<Index>, TriangulationError> {
        let n = face_vertices.len();

        // A triangle is its own triangulation.
        if n == 3 {
            let mut out = vec![0, 1, 2];
            self.apply_output_winding(&mut out);
            return Ok(out);
        }

        let positions = face_vertices.iter().map(|&v| mesh.position(v)).collect::<Vec<_>>();
        let projection = project::project_face(&positions, &self.config)?;
        if projection.num_perturbed > 0 {
            debug!(?face, count = projection.num_perturbed, "perturbed duplicate points");
        }

        let constraints = (0..n as Index).map(|i| (i, (i + 1) % n as Index)).collect::<Vec<_>>();
        let triangulation = cdt::triangulate(&projection.points, &constraints)?;
        if triangulation.triangles.is_empty() {
            return Err(TriangulationError::EmptyTriangulation);
        }

        let mut wot = WindingTracker::new(mesh, face, face_vertices);
        let mut out = self.walk(&triangulation, &projection, &mut wot, face)?;
        if out.is_empty() {
            return Err(TriangulationError::EmptyTriangulation);
        }

        self.apply_output_winding(&mut out);
        Ok(out)
    }

    fn apply_output_winding(&self, out: &mut [Index]) {
        if self.config.output_winding == OutputWinding::Reversed {
            for tri in out.chunks_mut(3) {
                tri.swap(0, 2);
            }
        }
    }

    /// Emits all triangles of `triangulation` (as face local indices) in
    /// walking order with reconciled winding.
    ///
    /// Every triangle is first oriented to the face's own vertex order and
    /// only then checked against the tracker. So for a face without
    /// neighbours the output follows the face order, not the winding the
    /// triangulator produced, which matches the three vertex fast path.
    fn walk(
        &mut self,
        triangulation: &Triangulation,
        projection: &Projection,
        wot: &mut WindingTracker,
        face: FaceHandle,
    ) -> Result<Vec<Index>, TriangulationError> {
        let num_triangles = triangulation.triangles.len();
        let n = projection.points.len();

        let mut vertex_to_triangles = vec![SmallVec::<[u32; 8]>::new(); n];
        for (t, tri) in triangulation.triangles.iter().enumerate() {
            for &v in tri {
                vertex_to_triangles[v as usize].push(t as u32);
            }
        }
        let shared_triangle = |a: usize, b: usize| {
            vertex_to_triangles[a].iter()
                .find(|t| vertex_to_triangles[b].contains(*t))
                .cloned()
        };

        // The seed triangle is the one at the edge shared with the first
        // neighbour. Without neighbours, the first face edge is used.
        let (s, t) = wot.seed()
            .map(|(s, t)| (projection.cdt_index(s), projection.cdt_index(t)))
            .unwrap_or((0, 1));
        let seed = shared_triangle(s, t).unwrap_or_else(|| {
            debug!(?face, s, t, "seed edge was split by the triangulator");
            vertex_to_triangles[s].first().cloned().unwrap_or(0)
        });
        trace!(?face, seed, neighbors = wot.num_neighbors(), "walking triangulation");

        let mut out = Vec::with_capacity(num_triangles * 3);
        let mut used = vec![false; n];
        let mut visited = vec![false; num_triangles];
        let mut queue = VecDeque::new();
        let mut num_unvisited_rounds = 0;

        let mut next_seed = Some(seed);
        while let Some(seed) = next_seed {
            visited[seed as usize] = true;
            queue.push_back(seed);

            while let Some(t) = queue.pop_front() {
                self.emit(triangulation, projection, wot, face, t, &mut used, &mut out)?;

                for i in 0..3 {
                    let (a, b) = triangulation.opposite_edge(t, i);
                    if triangulation.is_fixed(a, b) {
                        continue;
                    }
                    if let Some(neighbor) = triangulation.neighbors[t as usize][i] {
                        if !visited[neighbor as usize] {
                            visited[neighbor as usize] = true;
                            queue.push_back(neighbor);
                        }
                    }
                }
            }

            // The triangulation region is not connected across non-fixed
            // edges. Continue with the remaining part.
            next_seed = visited.iter().position(|&v| !v).map(|t| t as u32);
            if next_seed.is_some() {
                num_unvisited_rounds += 1;
            }
        }

        if num_unvisited_rounds > 0 {
            self.sink.report(Diagnostic {
                source: Source::Triangulator,
                kind: Kind::UnvisitedTriangles,
                severity: Severity::Medium,
                face,
                message: format!(
                    "walk from the seed triangle did not reach all {} triangles, \
                        restarted {} times",
                    num_triangles,
                    num_unvisited_rounds,
                ),
            });
        }

        let unused = (0..n).filter(|&i| !used[i]).collect::<Vec<_>>();
        if !unused.is_empty() {
            self.sink.report(Diagnostic {
                source: Source::Triangulator,
                kind: Kind::UnusedVertices,
                severity: Severity::High,
                face,
                message: format!("triangulation did not use the face vertices {:?}", unused),
            });
        }

        Ok(out)
    }

    /// Appends the triangle `t` to `out` with a winding the tracker accepts.
    fn emit(
        &mut self,
        triangulation: &Triangulation,
        projection: &Projection,
        wot: &mut WindingTracker,
        face: FaceHandle,
        t: u32,
        used: &mut [bool],
        out: &mut Vec<Index>,
    ) -> Result<(), TriangulationError> {
        let tri = triangulation.triangles[t as usize];
        let mut local = [0; 3];
        for i in 0..3 {
            local[i] = projection.face_index(tri[i] as usize);
            used[local[i]] = true;
            out.push(local[i] as Index);
        }

        // Triangulator triangles are counter clockwise in the projected
        // plane. If the projection reversed the face, that is the wrong way
        // around with respect to the face order.
        if projection.reversed {
            local.swap(0, 2);
            let len = out.len();
            out.swap(len - 1, len - 3);
        }

        if !wot.is_insertable(local) {
            local.swap(0, 2);
            let len = out.len();
            out.swap(len - 1, len - 3);
        }

        if !wot.insert(local) {
            let rejected = [local[0] as Index, local[1] as Index, local[2] as Index];
            out.truncate(out.len() - 3);

            let err = TriangulationError::WindingConflict(rejected);
            if self.config.strict_winding {
                return Err(err);
            }
            self.sink.report(Diagnostic {
                source: Source::Winding,
                kind: Kind::WindingConflict,
                severity: Severity::High,
                face,
                message: format!("triangle dropped: {}", err),
            });
        }

        Ok(())
    }
}

/// Triangulates `face` with the default configuration, reporting problems
/// via `tracing`. See [`FaceTriangulator::triangulate_face`].
pub fn triangulate_face(
    output: &mut Vec<Index>,
    face_vertex_count: usize,
    face_vertices: &[VertexHandle],
    mesh: &HalfedgeMesh,
    face: FaceHandle,
) -> Result<usize, TriangulationError> {
    FaceTriangulator::default().triangulate_face(output, face_vertex_count, face_vertices, mesh, face)
}

/// Outcome of triangulating one face in [`triangulate_mesh`].
#[derive(Debug)]
pub struct FaceReport {
    pub face: FaceHandle,
    pub result: Result<usize, TriangulationError>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Triangulates all faces of `mesh` one after another and returns all
/// triangles (as mesh vertices) plus one report per face.
pub fn triangulate_mesh(mesh: &HalfedgeMesh) -> (Vec<[VertexHandle; 3]>, Vec<FaceReport>) {
    let mut triangulator = FaceTriangulator::new(TriangulationConfig::default(), Vec::new());
    let mut triangles = Vec::new();
    let mut reports = Vec::with_capacity(mesh.num_faces() as usize);

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for face in mesh.faces() {
        mesh.vertices_around_face_into(&mut vertices, face);
        indices.clear();

        let result = triangulator.triangulate_face(&mut indices, vertices.len(), &vertices, mesh, face);
        triangles.extend(indices.chunks(3).map(|tri| {
            [vertices[tri[0] as usize], vertices[tri[1] as usize], vertices[tri[2] as usize]]
        }));

        reports.push(FaceReport {
            face,
            result,
            diagnostics: triangulator.sink.drain(..).collect(),
        });
    }

    (triangles, reports)
}
