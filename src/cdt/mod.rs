//! Constrained Delaunay triangulation of 2D point sets.
//!
//! The triangulator works in three phases:
//!
//! 1. All points are inserted incrementally (Bowyer-Watson) into a
//!    triangulation of a large super triangle.
//! 2. Each constraint edge that is not already part of the triangulation is
//!    recovered: all triangles crossed by the segment are removed and the two
//!    pseudo polygons on either side are re-triangulated (Anglada's
//!    algorithm). Constraint edges become *fixed*.
//! 3. The super triangle and everything outside the region enclosed by
//!    fixed edges is removed by flood filling from the super triangle across
//!    non-fixed edges.
//!
//! The result contains counter clockwise triangles referring to the input
//! point indices, the neighbour of each triangle across each of its edges
//! and the set of fixed edges.

use std::fmt;

use cgmath::{prelude::*, Point2, Vector2};
use failure::Fail;
use fxhash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

use crate::math::{incircle, orient2d};




/// Index of a point in the triangulation input.
pub type VertexIndex = u32;

/// Index of a triangle in [`Triangulation::triangles`].
pub type TriangleIndex = u32;

/// Undirected edge between two vertices. The smaller index is always stored
/// first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(VertexIndex, VertexIndex);

impl Edge {
    pub fn new(a: VertexIndex, b: VertexIndex) -> Self {
        if a < b { Edge(a, b) } else { Edge(b, a) }
    }

    pub fn lo(&self) -> VertexIndex {
        self.0
    }

    pub fn hi(&self) -> VertexIndex {
        self.1
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// Errors the triangulator can report.
#[derive(Debug, Fail, PartialEq)]
pub enum CdtError {
    #[fail(display = "point {} is a duplicate of point {}", index, original)]
    DuplicatePoint { index: VertexIndex, original: VertexIndex },

    #[fail(display = "could not locate point {} in the triangulation", _0)]
    PointLocation(VertexIndex),

    #[fail(display = "constraint {:?} intersects another constraint", _0)]
    ConstraintIntersection(Edge),

    #[fail(display = "constraint refers to point {}, but only {} points exist", _0, _1)]
    InvalidConstraint(VertexIndex, usize),

    #[fail(display = "invalid topology: {}", _0)]
    InvalidTopology(String),
}

/// Output of [`triangulate`].
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Counter clockwise triangles.
    pub triangles: Vec<[VertexIndex; 3]>,

    /// `neighbors[t][i]` is the triangle sharing the edge opposite of
    /// `triangles[t][i]`, i.e. the edge `(t[i + 1], t[i + 2])`.
    pub neighbors: Vec<[Option<TriangleIndex>; 3]>,

    /// All constraint edges (also those that were split at collinear
    /// points, in their split form).
    pub fixed_edges: FxHashSet<Edge>,

    pub num_vertices: usize,
}

/// Index of the vertex after `i` in counter clockwise order.
#[inline]
pub fn ccw(i: usize) -> usize {
    (i + 1) % 3
}

/// Index of the vertex after `i` in clockwise order.
#[inline]
pub fn cw(i: usize) -> usize {
    (i + 2) % 3
}

impl Triangulation {
    pub fn is_fixed(&self, a: VertexIndex, b: VertexIndex) -> bool {
        self.fixed_edges.contains(&Edge::new(a, b))
    }

    /// The two vertices of the edge of triangle `t` opposite of its vertex
    /// `i`.
    pub fn opposite_edge(&self, t: TriangleIndex, i: usize) -> (VertexIndex, VertexIndex) {
        let tri = self.triangles[t as usize];
        (tri[ccw(i)], tri[cw(i)])
    }

    /// Checks that the neighbour relation is symmetric and consistent with
    /// the triangle vertices.
    pub fn check_topology(&self) -> Result<(), CdtError> {
        if self.neighbors.len() != self.triangles.len() {
            return Err(CdtError::InvalidTopology(
                "number of neighbor entries does not match number of triangles".into(),
            ));
        }

        for (t, tri) in self.triangles.iter().enumerate() {
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(CdtError::InvalidTopology(format!("triangle {} is degenerate", t)));
            }
            if tri.iter().any(|&v| v as usize >= self.num_vertices) {
                return Err(CdtError::InvalidTopology(format!(
                    "triangle {} refers to a vertex that does not exist",
                    t,
                )));
            }

            for i in 0..3 {
                let n = match self.neighbors[t][i] {
                    Some(n) => n as usize,
                    None => continue,
                };
                let (a, b) = self.opposite_edge(t as TriangleIndex, i);
                let back = self.triangles.get(n).and_then(|other| {
                    (0..3).find(|&j| other[ccw(j)] == b && other[cw(j)] == a)
                });

                match back {
                    Some(j) if self.neighbors[n][j] == Some(t as TriangleIndex) => {}
                    _ => return Err(CdtError::InvalidTopology(format!(
                        "triangles {} and {} are not mutual neighbors",
                        t,
                        n,
                    ))),
                }
            }
        }

        Ok(())
    }
}

/// Triangulates `points` such that every edge in `constraints` is an edge
/// of the result, then removes all triangles outside of the region enclosed
/// by the constraints.
pub fn triangulate(
    points: &[Point2<f64>],
    constraints: &[(VertexIndex, VertexIndex)],
) -> Result<Triangulation, CdtError> {
    let mut builder = Builder::new(points);
    for i in 0..points.len() {
        builder.insert_point(i as VertexIndex)?;
    }

    for &(a, b) in constraints {
        for &v in &[a, b] {
            if v as usize >= points.len() {
                return Err(CdtError::InvalidConstraint(v, points.len()));
            }
        }
        if a != b {
            builder.insert_constraint(a, b, 0)?;
        }
    }

    builder.erase_outer_triangles();
    builder.finish()
}


// ===============================================================================================
// ===== Builder
// ===============================================================================================

struct Builder {
    /// Input points followed by the three super triangle vertices.
    points: Vec<Point2<f64>>,
    num_input: usize,

    /// Slot vector of triangles. Removed triangles are `None`.
    triangles: Vec<Option<[VertexIndex; 3]>>,

    /// Maps each directed (counter clockwise) triangle edge to its triangle.
    directed: FxHashMap<(VertexIndex, VertexIndex), usize>,

    fixed: FxHashSet<Edge>,
}

impl Builder {
    fn new(input: &[Point2<f64>]) -> Self {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in input {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        if input.is_empty() {
            min = Point2::origin();
            max = Point2::origin();
        }

        let center = min.midpoint(max);
        let size = (max.x - min.x).max(max.y - min.y).max(1.0);

        let mut points = input.to_vec();
        points.push(center + Vector2::new(-20.0 * size, -10.0 * size));
        points.push(center + Vector2::new(20.0 * size, -10.0 * size));
        points.push(center + Vector2::new(0.0, 20.0 * size));

        let n = input.len() as VertexIndex;
        let mut out = Self {
            points,
            num_input: input.len(),
            triangles: Vec::new(),
            directed: FxHashMap::default(),
            fixed: FxHashSet::default(),
        };
        out.add_triangle([n, n + 1, n + 2]);
        out
    }

    fn point(&self, v: VertexIndex) -> Point2<f64> {
        self.points[v as usize]
    }

    fn is_super_vertex(&self, v: VertexIndex) -> bool {
        v as usize >= self.num_input
    }

    fn add_triangle(&mut self, tri: [VertexIndex; 3]) -> usize {
        let t = self.triangles.len();
        self.triangles.push(Some(tri));
        for i in 0..3 {
            self.directed.insert((tri[i], tri[ccw(i)]), t);
        }
        t
    }

    fn remove_triangle(&mut self, t: usize) {
        if let Some(tri) = self.triangles[t].take() {
            for i in 0..3 {
                let key = (tri[i], tri[ccw(i)]);
                if self.directed.get(&key) == Some(&t) {
                    self.directed.remove(&key);
                }
            }
        }
    }

    /// The triangle on the other side of the directed edge `(a, b)`.
    fn across(&self, a: VertexIndex, b: VertexIndex) -> Option<usize> {
        self.directed.get(&(b, a)).cloned()
    }

    fn alive(&self) -> impl Iterator<Item = (usize, [VertexIndex; 3])> + '_ {
        self.triangles.iter().enumerate().filter_map(|(t, tri)| tri.map(|tri| (t, tri)))
    }

    fn in_circumcircle(&self, t: usize, p: Point2<f64>) -> bool {
        match self.triangles[t] {
            Some([a, b, c]) => incircle(self.point(a), self.point(b), self.point(c), p) > 0.0,
            None => false,
        }
    }

    fn insert_point(&mut self, v: VertexIndex) -> Result<(), CdtError> {
        let p = self.point(v);

        // Locate a triangle containing `p` (possibly on its boundary).
        let mut start = None;
        for (t, tri) in self.alive() {
            if let Some(&same) = tri.iter().find(|&&u| self.point(u) == p) {
                return Err(CdtError::DuplicatePoint { index: v, original: same });
            }
            let inside = (0..3).all(|i| orient2d(self.point(tri[i]), self.point(tri[ccw(i)]), p) >= 0.0);
            if inside {
                start = Some(t);
                break;
            }
        }
        let start = start.ok_or(CdtError::PointLocation(v))?;

        // Grow the cavity of triangles whose circumcircle contains `p`.
        let mut cavity = FxHashSet::default();
        cavity.insert(start);
        let mut stack = vec![start];
        while let Some(t) = stack.pop() {
            let tri = self.triangles[t].ok_or_else(|| {
                CdtError::InvalidTopology("cavity contains a removed triangle".into())
            })?;
            for i in 0..3 {
                if let Some(n) = self.across(tri[i], tri[ccw(i)]) {
                    if !cavity.contains(&n) && self.in_circumcircle(n, p) {
                        cavity.insert(n);
                        stack.push(n);
                    }
                }
            }
        }

        // Make sure `p` sees every boundary edge strictly from the inside.
        // Floating point errors in `incircle` can violate that.
        let boundary = loop {
            let boundary = self.cavity_boundary(&cavity);
            let mut grown = false;
            for &(a, b) in &boundary {
                if orient2d(self.point(a), self.point(b), p) <= 0.0 {
                    match self.across(a, b) {
                        Some(n) => {
                            cavity.insert(n);
                            grown = true;
                        }
                        None => return Err(CdtError::PointLocation(v)),
                    }
                }
            }

            if !grown {
                break boundary;
            }
        };

        // No existing vertex may disappear with the cavity.
        let on_boundary = boundary.iter().map(|&(a, _)| a).collect::<FxHashSet<_>>();
        for &t in &cavity {
            if let Some(tri) = self.triangles[t] {
                if tri.iter().any(|u| !on_boundary.contains(u)) {
                    return Err(CdtError::PointLocation(v));
                }
            }
        }

        for &t in &cavity {
            self.remove_triangle(t);
        }
        for (a, b) in boundary {
            self.add_triangle([a, b, v]);
        }

        Ok(())
    }

    /// Directed edges of cavity triangles whose other side is not part of
    /// the cavity.
    fn cavity_boundary(&self, cavity: &FxHashSet<usize>) -> Vec<(VertexIndex, VertexIndex)> {
        let mut out = Vec::new();
        for &t in cavity {
            if let Some(tri) = self.triangles[t] {
                for i in 0..3 {
                    let (a, b) = (tri[i], tri[ccw(i)]);
                    match self.across(a, b) {
                        Some(n) if cavity.contains(&n) => {}
                        _ => out.push((a, b)),
                    }
                }
            }
        }
        out
    }

    fn has_edge(&self, a: VertexIndex, b: VertexIndex) -> bool {
        self.directed.contains_key(&(a, b)) || self.directed.contains_key(&(b, a))
    }

    fn insert_constraint(&mut self, a: VertexIndex, b: VertexIndex, depth: usize) -> Result<(), CdtError> {
        if depth > self.num_input {
            return Err(CdtError::InvalidTopology(format!(
                "recovering constraint {:?} does not terminate",
                Edge::new(a, b),
            )));
        }

        if self.has_edge(a, b) {
            self.fixed.insert(Edge::new(a, b));
            return Ok(());
        }

        let pa = self.point(a);
        let pb = self.point(b);
        let dir = pb - pa;
        let lies_on_segment = |q: Point2<f64>| orient2d(pa, pb, q) == 0.0 && (q - pa).dot(dir) > 0.0;

        // Find the triangle around `a` through which the segment leaves `a`,
        // or a neighbour of `a` lying on the segment.
        let mut first = None;
        let mut collinear = None;
        for (t, tri) in self.alive() {
            let i = match tri.iter().position(|&x| x == a) {
                Some(i) => i,
                None => continue,
            };
            let (u, v) = (tri[ccw(i)], tri[cw(i)]);
            let (pu, pv) = (self.point(u), self.point(v));

            if lies_on_segment(pu) {
                collinear = Some(u);
                break;
            }
            if lies_on_segment(pv) {
                collinear = Some(v);
                break;
            }
            if orient2d(pa, pu, pb) > 0.0 && orient2d(pa, pb, pv) > 0.0 {
                first = Some((t, u, v));
                break;
            }
        }
        if let Some(mid) = collinear {
            return self.split_constraint(a, mid, b, depth);
        }
        let (t, mut u, mut v) = first.ok_or_else(|| CdtError::InvalidTopology(format!(
            "no triangle around {} is crossed by constraint {:?}",
            a,
            Edge::new(a, b),
        )))?;

        // Walk along the segment. `u` is always right of it, `v` left.
        let mut crossed = vec![t];
        let mut right = vec![u];
        let mut left = vec![v];
        loop {
            if self.fixed.contains(&Edge::new(u, v)) {
                return Err(CdtError::ConstraintIntersection(Edge::new(a, b)));
            }

            let next = self.across(u, v).ok_or_else(|| CdtError::InvalidTopology(format!(
                "constraint {:?} leaves the triangulation",
                Edge::new(a, b),
            )))?;
            let tri = self.triangles[next].ok_or_else(|| {
                CdtError::InvalidTopology("walked into a removed triangle".into())
            })?;
            let w = tri.iter()
                .cloned()
                .find(|&x| x != u && x != v)
                .ok_or_else(|| CdtError::InvalidTopology(format!("triangle {} is degenerate", next)))?;
            crossed.push(next);

            if w == b {
                break;
            }

            let o = orient2d(pa, pb, self.point(w));
            if o > 0.0 {
                left.push(w);
                v = w;
            } else if o < 0.0 {
                right.push(w);
                u = w;
            } else {
                return self.split_constraint(a, w, b, depth);
            }
        }

        trace!(a, b, crossed = crossed.len(), "recovering constraint");

        for t in crossed {
            self.remove_triangle(t);
        }

        left.reverse();
        self.triangulate_pseudo_polygon(a, b, &left);
        self.triangulate_pseudo_polygon(b, a, &right);
        self.fixed.insert(Edge::new(a, b));

        Ok(())
    }

    fn split_constraint(
        &mut self,
        a: VertexIndex,
        mid: VertexIndex,
        b: VertexIndex,
        depth: usize,
    ) -> Result<(), CdtError> {
        trace!(a, mid, b, "splitting constraint at collinear point");
        self.insert_constraint(a, mid, depth + 1)?;
        self.insert_constraint(mid, b, depth + 1)
    }

    /// Triangulates the polygon `p, q, chain[0], ..., chain[n - 1]` (counter
    /// clockwise) such that the result is constrained Delaunay.
    fn triangulate_pseudo_polygon(&mut self, p: VertexIndex, q: VertexIndex, chain: &[VertexIndex]) {
        if chain.is_empty() {
            return;
        }

        let (pp, pq) = (self.point(p), self.point(q));
        let mut best = 0;
        for i in 1..chain.len() {
            if incircle(pp, pq, self.point(chain[best]), self.point(chain[i])) > 0.0 {
                best = i;
            }
        }

        let c = chain[best];
        self.add_triangle([p, q, c]);

        let (before, after) = (&chain[..best], &chain[best + 1..]);
        let before = SmallVec::<[VertexIndex; 16]>::from_slice(before);
        let after = SmallVec::<[VertexIndex; 16]>::from_slice(after);
        self.triangulate_pseudo_polygon(c, q, &before);
        self.triangulate_pseudo_polygon(p, c, &after);
    }

    /// Removes all triangles reachable from the super triangle without
    /// crossing a fixed edge.
    fn erase_outer_triangles(&mut self) {
        let mut stack = self.alive()
            .filter(|(_, tri)| tri.iter().any(|&v| self.is_super_vertex(v)))
            .map(|(t, _)| t)
            .collect::<Vec<_>>();
        let mut outer = stack.iter().cloned().collect::<FxHashSet<_>>();

        while let Some(t) = stack.pop() {
            let tri = match self.triangles[t] {
                Some(tri) => tri,
                None => continue,
            };
            for i in 0..3 {
                let (a, b) = (tri[i], tri[ccw(i)]);
                if self.fixed.contains(&Edge::new(a, b)) {
                    continue;
                }
                if let Some(n) = self.across(a, b) {
                    if outer.insert(n) {
                        stack.push(n);
                    }
                }
            }
        }

        for t in outer {
            self.remove_triangle(t);
        }
    }

    fn finish(self) -> Result<Triangulation, CdtError> {
        let triangles = self.alive().map(|(_, tri)| tri).collect::<Vec<_>>();

        let mut directed = FxHashMap::default();
        for (t, tri) in triangles.iter().enumerate() {
            for i in 0..3 {
                if directed.insert((tri[i], tri[ccw(i)]), t as TriangleIndex).is_some() {
                    return Err(CdtError::InvalidTopology(format!(
                        "directed edge {}->{} is used by two triangles",
                        tri[i],
                        tri[ccw(i)],
                    )));
                }
            }
        }

        let neighbors = triangles.iter()
            .map(|tri| {
                let mut out = [None; 3];
                for i in 0..3 {
                    out[i] = directed.get(&(tri[cw(i)], tri[ccw(i)])).cloned();
                }
                out
            })
            .collect();

        let out = Triangulation {
            triangles,
            neighbors,
            fixed_edges: self.fixed,
            num_vertices: self.num_input,
        };
        out.check_topology()?;
        Ok(out)
    }
}
