//! Geometric primitives on `f64` points.
//!
//! These are plain floating point predicates. They are good enough to
//! triangulate faces that come out of an (exact) intersection kernel, but they
//! are not robust in the sense of Shewchuk's adaptive predicates.

use cgmath::{
    prelude::*,
    Point2, Point3, Quaternion, Vector2, Vector3,
};
use fxhash::FxHashMap;


/// Computes the normal of a (possibly non-planar, non-convex) polygon with
/// Newell's method. The result is not normalized; its length is twice the
/// area of the polygon. The direction follows the right hand rule with
/// respect to the vertex order.
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut normal = Vector3::zero();
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        normal.x += (p.y - q.y) * (p.z + q.z);
        normal.y += (p.z - q.z) * (p.x + q.x);
        normal.z += (p.x - q.x) * (p.y + q.y);
    }

    normal
}

/// Returns the index (0, 1 or 2) of the component of `v` with the largest
/// absolute value. Ties go to the lower index.
pub fn dominant_axis(v: Vector3<f64>) -> usize {
    let abs = [v.x.abs(), v.y.abs(), v.z.abs()];
    let mut axis = 0;
    for i in 1..3 {
        if abs[i] > abs[axis] {
            axis = i;
        }
    }
    axis
}

/// Projects the points of a polygon with the given `normal` onto a plane.
///
/// The points are rotated so that `normal` points along its dominant axis
/// (keeping the sign of that component). Then that axis is dropped and the
/// remaining two are kept in cyclic order. Thus, a polygon that winds counter
/// clockwise around its normal has a positive signed area after projection
/// iff the dominant component of its normal is positive.
///
/// Returns `None` if the normal is zero (or not finite), i.e. the polygon is
/// degenerate.
pub fn project_to_2d(points: &[Point3<f64>], normal: Vector3<f64>) -> Option<Vec<Point2<f64>>> {
    let len = normal.magnitude();
    if !(len > 0.0) || !len.is_finite() {
        return None;
    }

    let axis = dominant_axis(normal);
    let mut target = Vector3::zero();
    target[axis] = normal[axis].signum();

    let rotation = Quaternion::from_arc(normal / len, target, None);
    let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);

    let out = points.iter()
        .map(|p| {
            let r = rotation.rotate_vector(p.to_vec());
            Point2::new(r[a], r[b])
        })
        .collect();

    Some(out)
}

/// Signed area of a simple 2D polygon (shoelace formula). Positive for
/// counter clockwise vertex order.
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let mut sum = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        sum += p.x * q.y - q.x * p.y;
    }
    sum * 0.5
}

/// Twice the signed area of the triangle `a b c`. Positive if the three
/// points are in counter clockwise order, negative if clockwise and zero if
/// collinear.
#[inline]
pub fn orient2d(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Positive if `d` lies inside the circumcircle of the counter clockwise
/// triangle `a b c`, negative if outside and zero if on the circle.
pub fn incircle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, d: Point2<f64>) -> f64 {
    let (adx, ady) = (a.x - d.x, a.y - d.y);
    let (bdx, bdy) = (b.x - d.x, b.y - d.y);
    let (cdx, cdy) = (c.x - d.x, c.y - d.y);

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    alift * (bdx * cdy - cdx * bdy)
        + blift * (cdx * ady - adx * cdy)
        + clift * (adx * bdy - bdx * ady)
}

/// Rotates `v` by 90° counter clockwise.
#[inline]
pub fn rotate_ccw(v: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// How two segments `ab` and `cd` relate to each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The segments don't touch.
    Disjoint,

    /// The segments cross in a single point that is strictly inside both.
    /// `s` is the parameter along `ab`, `t` the one along `cd`.
    Proper { point: Point2<f64>, s: f64, t: f64 },

    /// An endpoint of one segment lies on the other segment.
    Vertex { point: Point2<f64>, s: f64, t: f64 },

    /// The segments are collinear and overlap. `point` is one point of the
    /// overlap.
    Collinear { point: Point2<f64> },
}

/// Intersects the segments `ab` and `cd`.
pub fn segment_intersection(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> SegmentIntersection {
    let denom = a.x * (d.y - c.y) + b.x * (c.y - d.y) + d.x * (b.y - a.y) + c.x * (a.y - b.y);

    if denom == 0.0 {
        return parallel_intersection(a, b, c, d);
    }

    let s = (a.x * (d.y - c.y) + c.x * (a.y - d.y) + d.x * (c.y - a.y)) / denom;
    let t = -(a.x * (c.y - b.y) + b.x * (a.y - c.y) + c.x * (b.y - a.y)) / denom;
    let point = a + (b - a) * s;

    if 0.0 < s && s < 1.0 && 0.0 < t && t < 1.0 {
        SegmentIntersection::Proper { point, s, t }
    } else if s < 0.0 || s > 1.0 || t < 0.0 || t > 1.0 {
        SegmentIntersection::Disjoint
    } else {
        SegmentIntersection::Vertex { point, s, t }
    }
}

fn parallel_intersection(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> SegmentIntersection {
    if orient2d(a, b, c) != 0.0 {
        return SegmentIntersection::Disjoint;
    }

    // Collinear, check for overlap.
    let candidates = [(c, a, b), (d, a, b), (a, c, d), (b, c, d)];
    candidates.iter()
        .find(|(p, s, e)| between(*s, *e, *p))
        .map(|(p, _, _)| SegmentIntersection::Collinear { point: *p })
        .unwrap_or(SegmentIntersection::Disjoint)
}

/// Assuming `a`, `b` and `c` are collinear: is `c` on the closed segment
/// `ab`?
fn between(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> bool {
    if a.x != b.x {
        (a.x <= c.x && c.x <= b.x) || (a.x >= c.x && c.x >= b.x)
    } else {
        (a.y <= c.y && c.y <= b.y) || (a.y >= c.y && c.y >= b.y)
    }
}

/// Result of [`find_duplicates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicates {
    /// For each point, the index of the first point with the same
    /// coordinates (which is the point itself if it is unique).
    pub mapping: Vec<usize>,

    /// Indices of all points that are duplicates of an earlier point, in
    /// increasing order.
    pub duplicates: Vec<usize>,
}

impl Duplicates {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }
}

/// Finds points with bitwise identical coordinates. `-0.0` and `0.0` are
/// treated as equal.
pub fn find_duplicates(points: &[Point2<f64>]) -> Duplicates {
    fn key(v: f64) -> u64 {
        // Maps `-0.0` to `0.0`.
        (v + 0.0).to_bits()
    }

    let mut first = FxHashMap::default();
    let mut mapping = Vec::with_capacity(points.len());
    let mut duplicates = Vec::new();

    for (i, p) in points.iter().enumerate() {
        let original = *first.entry((key(p.x), key(p.y))).or_insert(i);
        if original != i {
            duplicates.push(i);
        }
        mapping.push(original);
    }

    Duplicates { mapping, duplicates }
}

pub fn squared_distance(a: Point2<f64>, b: Point2<f64>) -> f64 {
    (b - a).magnitude2()
}

/// Largest distance between any two of the given points.
pub fn diameter(points: &[Point2<f64>]) -> f64 {
    let mut max = 0.0f64;
    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            max = max.max(squared_distance(a, b));
        }
    }
    max.sqrt()
}
