use crate::foundation::{
    core::{BezPath, Point, Rect},
    error::{RevealError, RevealResult},
    math::wrap01,
};

/// Closed polygon with a precomputed arc-length table.
///
/// The last vertex connects back to the first. `cumulative[i]` is the perimeter distance from
/// vertex 0 to vertex `i`; `cumulative[n]` equals the total perimeter.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    cumulative: Vec<f64>,
    perimeter: f64,
    bounds: Rect,
}

impl Polygon {
    /// Validate `vertices` and build the arc-length table.
    ///
    /// Fails with [`RevealError::DegeneratePolygon`] for fewer than two vertices or a zero
    /// perimeter, and with [`RevealError::Validation`] for non-finite coordinates.
    #[tracing::instrument(skip(vertices), fields(vertices = vertices.len()))]
    pub fn new(vertices: Vec<Point>) -> RevealResult<Self> {
        if vertices.len() < 2 {
            return Err(RevealError::degenerate(format!(
                "need at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err(RevealError::validation("polygon vertices must have finite coordinates"));
        }

        let n = vertices.len();
        let mut cumulative = Vec::with_capacity(n + 1);
        let mut acc = 0.0;
        cumulative.push(acc);
        for i in 0..n {
            acc += vertices[i].distance(vertices[(i + 1) % n]);
            cumulative.push(acc);
        }

        if !acc.is_finite() || acc <= 0.0 {
            return Err(RevealError::degenerate("polygon perimeter is zero"));
        }

        let first = Rect::from_points(vertices[0], vertices[0]);
        let bounds = vertices
            .iter()
            .skip(1)
            .fold(first, |r, &v| r.union_pt(v));

        Ok(Self {
            vertices,
            cumulative,
            perimeter: acc,
            bounds,
        })
    }

    /// Convenience constructor from `(x, y)` pairs.
    pub fn from_xy(pairs: &[(f64, f64)]) -> RevealResult<Self> {
        Self::new(pairs.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    /// Ordered vertex list.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Cumulative arc length per vertex, ending with the total perimeter.
    pub fn cumulative_lengths(&self) -> &[f64] {
        &self.cumulative
    }

    /// Total perimeter length.
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Point at perimeter distance `distance` from vertex 0, wrapping around the loop.
    pub fn point_at_distance(&self, distance: f64) -> Point {
        let target = if (0.0..self.perimeter).contains(&distance) {
            distance
        } else {
            wrap01(distance / self.perimeter) * self.perimeter
        };
        let n = self.vertices.len();
        for i in 0..n {
            let seg_start = self.cumulative[i];
            let seg_end = self.cumulative[i + 1];
            if seg_end >= target && seg_end > seg_start {
                let t = (target - seg_start) / (seg_end - seg_start);
                return self.vertices[i].lerp(self.vertices[(i + 1) % n], t);
            }
        }
        self.vertices[0]
    }

    /// Point at normalized progress `p` along the perimeter. `p` is reduced into `[0, 1)`.
    pub fn point_at_progress(&self, p: f64) -> Point {
        self.point_at_distance(wrap01(p) * self.perimeter)
    }

    /// Shortest distance from `pt` to any edge of the polygon.
    pub fn distance_to_boundary(&self, pt: Point) -> f64 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| segment_distance(pt, self.vertices[i], self.vertices[(i + 1) % n]))
            .fold(f64::INFINITY, f64::min)
    }

    /// Closed vector path through all vertices.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.vertices[0]);
        for &v in &self.vertices[1..] {
            path.line_to(v);
        }
        path.close_path();
        path
    }
}

pub(crate) fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq <= 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/polygon.rs"]
mod tests;
