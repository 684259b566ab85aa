//! Projecting a face into the plane and making its 2D points unique.

use cgmath::{prelude::*, Point2, Point3, Vector2};
use tracing::{debug, trace};

use crate::math::{
    diameter, find_duplicates, newell_normal, orient2d, project_to_2d, rotate_ccw,
    segment_intersection, signed_area, squared_distance, SegmentIntersection,
};
use super::{TriangulationConfig, TriangulationError};


/// A face projected into 2D with counter clockwise point order.
#[derive(Debug, Clone)]
pub(crate) struct Projection {
    /// The 2D points in triangulator order. If `reversed` is set, point `i`
    /// belongs to face vertex `n - 1 - i`.
    pub(crate) points: Vec<Point2<f64>>,
    pub(crate) reversed: bool,

    /// Number of points that were moved to resolve duplicates.
    pub(crate) num_perturbed: usize,
}

impl Projection {
    /// Maps a triangulator index to the face local index. The mapping is
    /// its own inverse.
    pub(crate) fn face_index(&self, i: usize) -> usize {
        if self.reversed {
            self.points.len() - 1 - i
        } else {
            i
        }
    }

    pub(crate) fn cdt_index(&self, face_index: usize) -> usize {
        self.face_index(face_index)
    }
}

/// Projects the face with the given 3D positions (in face order) to 2D,
/// orients it counter clockwise and resolves coincident points.
pub(crate) fn project_face(
    positions: &[Point3<f64>],
    config: &TriangulationConfig,
) -> Result<Projection, TriangulationError> {
    if positions.iter().any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite())) {
        return Err(TriangulationError::DegenerateFace("face has non-finite coordinates".into()));
    }

    let normal = newell_normal(positions);
    let mut points = project_to_2d(positions, normal)
        .ok_or_else(|| TriangulationError::DegenerateFace("face has no well defined normal".into()))?;

    let area = signed_area(&points);
    if !(area.abs() > 0.0) {
        return Err(TriangulationError::DegenerateFace(format!(
            "projected face has zero area ({})",
            area,
        )));
    }

    let reversed = area < 0.0;
    if reversed {
        points.reverse();
    }

    let num_perturbed = resolve_duplicates(&mut points, config)?;

    Ok(Projection { points, reversed, num_perturbed })
}

/// Moves points that coincide with an earlier point so that all points are
/// unique and the polygon stays simple. Returns the number of moved points.
///
/// `points` must be in counter clockwise order.
pub(crate) fn resolve_duplicates(
    points: &mut [Point2<f64>],
    config: &TriangulationConfig,
) -> Result<usize, TriangulationError> {
    let dups = find_duplicates(points);
    if dups.is_empty() {
        return Ok(0);
    }

    let n = points.len();
    for &dup in &dups.duplicates {
        let other = dups.mapping[dup];
        let prev = (dup + n - 1) % n;
        let next = (dup + 1) % n;

        let p = points[dup];
        let to_prev = points[prev] - p;
        let to_next = points[next] - p;

        if other == prev || other == next {
            let shift = if other == prev { to_next } else { to_prev };
            points[dup] = p + shift * config.adjacent_shift;
            trace!(dup, other, "shifted adjacent duplicate along its edge");
        } else {
            let dir = slit_direction(p, points[prev], points[next], config);
            let hit = nearest_boundary_hit(points, dup, other, dir);
            let dist = (hit - p).magnitude();
            points[dup] = p + dir * (config.perturbation_fraction * dist);
            trace!(dup, other, dist, "perturbed duplicate into the polygon");
        }
    }

    let remaining = find_duplicates(points);
    if !remaining.is_empty() {
        return Err(TriangulationError::UnresolvedDuplicates(remaining.duplicates.len()));
    }

    debug!(count = dups.duplicates.len(), "resolved duplicate points");
    Ok(dups.duplicates.len())
}

/// Unit direction (pointing into the polygon) in which a non-adjacent
/// duplicate at `p` is moved.
fn slit_direction(
    p: Point2<f64>,
    prev: Point2<f64>,
    next: Point2<f64>,
    config: &TriangulationConfig,
) -> Vector2<f64> {
    let to_prev = prev - p;
    let to_next = next - p;
    let orientation = orient2d(p, next, prev);

    let dir = if orientation.abs() <= config.parallel_tolerance {
        // Rotate the shorter incident edge, both taken in polygon direction.
        let edge = if to_prev.magnitude2() > to_next.magnitude2() {
            to_next
        } else {
            -to_prev
        };
        rotate_ccw(edge)
    } else {
        let flip = if orientation < 0.0 { -1.0 } else { 1.0 };
        (to_prev + to_next) * (0.5 * flip)
    };

    dir.normalize()
}

/// Casts a ray from the duplicate `dup` along `dir` with the length of the
/// polygon's diameter and returns the nearest point where it hits an edge
/// not incident to `dup` or `other`. Without any hit, the end of the ray is
/// returned.
fn nearest_boundary_hit(
    points: &[Point2<f64>],
    dup: usize,
    other: usize,
    dir: Vector2<f64>,
) -> Point2<f64> {
    let n = points.len();
    let start = points[dup];
    let len = diameter(points);
    let end = start + dir * len;

    let mut min_t = 1.0;
    let mut hit = end;
    for i in 0..n {
        let j = (i + 1) % n;
        if i == dup || j == dup || i == other || j == other {
            continue;
        }

        let (a, b) = (points[i], points[j]);
        match segment_intersection(start, end, a, b) {
            SegmentIntersection::Disjoint => {}
            SegmentIntersection::Proper { point, s, .. } => {
                if s < min_t {
                    min_t = s;
                    hit = point;
                }
            }
            SegmentIntersection::Vertex { .. } | SegmentIntersection::Collinear { .. } => {
                let (da, db) = (squared_distance(start, a), squared_distance(start, b));
                let (closest, dist2) = if da > db { (b, db) } else { (a, da) };
                let t = dist2.sqrt() / len;
                if t < min_t {
                    min_t = t;
                    hit = closest;
                }
            }
        }
    }

    hit
}
