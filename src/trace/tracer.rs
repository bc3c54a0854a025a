use crate::{
    foundation::{core::Point, error::RevealResult, math::wrap01},
    geometry::polygon::Polygon,
};

/// Sampling options for trails.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TraceOpts {
    /// Trail length as a fraction of the full loop.
    pub trail_fraction: f64,
    /// Number of backward steps sampled for a trail (the trail holds one more point).
    pub trail_samples: u32,
}

impl Default for TraceOpts {
    fn default() -> Self {
        Self {
            trail_fraction: 0.05,
            trail_samples: 32,
        }
    }
}

/// One point of a fading trail.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TrailPoint {
    /// Position on the boundary.
    pub point: Point,
    /// Opacity, `1` at the head down to `0` at the tail.
    pub alpha: f64,
}

/// Arc-length tracer over a closed polygon.
///
/// All queries are pure: the same progress always maps to the same geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathTracer {
    opts: TraceOpts,
    polygon: Option<Polygon>,
}

impl PathTracer {
    /// Tracer with no polygon loaded yet.
    pub fn new(opts: TraceOpts) -> Self {
        Self {
            opts,
            polygon: None,
        }
    }

    /// Tracer with `vertices` loaded.
    pub fn with_polygon(opts: TraceOpts, vertices: Vec<Point>) -> RevealResult<Self> {
        let mut t = Self::new(opts);
        t.load_polygon(vertices)?;
        Ok(t)
    }

    /// Tracer over an already validated polygon.
    pub fn from_polygon(opts: TraceOpts, polygon: Polygon) -> Self {
        Self {
            opts,
            polygon: Some(polygon),
        }
    }

    /// Replace the traced polygon. On error the previously loaded polygon stays in place.
    pub fn load_polygon(&mut self, vertices: Vec<Point>) -> RevealResult<()> {
        self.polygon = Some(Polygon::new(vertices)?);
        Ok(())
    }

    /// The loaded polygon.
    pub fn polygon(&self) -> Option<&Polygon> {
        self.polygon.as_ref()
    }

    /// Sampling options.
    pub fn opts(&self) -> TraceOpts {
        self.opts
    }

    /// Position at progress `p`; `None` until a polygon is loaded.
    pub fn point_at_progress(&self, p: f64) -> Option<Point> {
        self.polygon.as_ref().map(|poly| poly.point_at_progress(p))
    }

    /// Points sampled backward from `p` over `trail_fraction` of the loop, head first.
    pub fn trail_segment(&self, p: f64, trail_fraction: f64) -> Vec<Point> {
        let Some(poly) = &self.polygon else {
            return Vec::new();
        };
        let n = self.opts.trail_samples.max(1);
        let frac = if trail_fraction.is_finite() {
            trail_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        (0..=n)
            .map(|i| poly.point_at_progress(p - frac * f64::from(i) / f64::from(n)))
            .collect()
    }

    /// [`Self::trail_segment`] with the configured fraction, each point carrying a linear
    /// head-to-tail fade.
    pub fn gradient_trail(&self, p: f64) -> Vec<TrailPoint> {
        let pts = self.trail_segment(p, self.opts.trail_fraction);
        let last = pts.len().saturating_sub(1).max(1) as f64;
        pts.into_iter()
            .enumerate()
            .map(|(i, point)| TrailPoint {
                point,
                alpha: 1.0 - i as f64 / last,
            })
            .collect()
    }

    /// Exact polyline covering the `length_px` of boundary behind `p`, head first, with every
    /// corner it passes. The length is capped at the perimeter.
    pub fn trailing_line(&self, p: f64, length_px: f64) -> Vec<Point> {
        let Some(poly) = &self.polygon else {
            return Vec::new();
        };
        let per = poly.perimeter();
        let cum = poly.cumulative_lengths();
        let verts = poly.vertices();
        let n = verts.len();

        let head = wrap01(p) * per;
        let mut remaining = if length_px.is_finite() {
            length_px.clamp(0.0, per)
        } else {
            0.0
        };
        let mut out = vec![poly.point_at_distance(head)];
        let mut cur = head;
        for _ in 0..=n + 1 {
            if remaining <= 0.0 {
                break;
            }
            if cur <= 0.0 {
                cur += per;
            }
            // Last vertex strictly behind `cur`.
            let i = (0..n).rev().find(|&i| cum[i] < cur).unwrap_or(0);
            let to_vertex = cur - cum[i];
            if to_vertex >= remaining {
                out.push(poly.point_at_distance(cur - remaining));
                break;
            }
            out.push(verts[i]);
            remaining -= to_vertex;
            cur = cum[i];
        }
        out
    }
}

/// Fade a polyline by distance from its first point.
pub(crate) fn fade_by_distance(points: &[Point]) -> Vec<TrailPoint> {
    let total: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    let mut acc = 0.0;
    let mut prev = points.first().copied();
    points
        .iter()
        .map(|&point| {
            if let Some(q) = prev {
                acc += q.distance(point);
            }
            prev = Some(point);
            TrailPoint {
                point,
                alpha: if total > 0.0 { 1.0 - acc / total } else { 1.0 },
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/trace/tracer.rs"]
mod tests;
