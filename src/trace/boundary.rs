use crate::{
    animation::clock::AnimationClock,
    foundation::{
        core::{BezPath, Point, Rect, Rgba8Premul},
        error::RevealResult,
        math::smoothstep,
    },
    geometry::polygon::{Polygon, segment_distance},
    surface::raster::Surface,
    trace::tracer::{PathTracer, TraceOpts, TrailPoint, fade_by_distance},
};

/// Default loop duration of a boundary trace: ten minutes.
pub const DEFAULT_TRACE_CYCLE_MS: f64 = 600_000.0;

/// Marker and trail geometry for one tick.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TraceFrame {
    /// Cycle progress in `[0, 1)`.
    pub progress: f64,
    /// Head position.
    pub marker: Point,
    /// Trail points, head first.
    pub trail: Vec<TrailPoint>,
}

impl TraceFrame {
    /// Open vector path through the trail, head first.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut pts = self.trail.iter().map(|tp| tp.point);
        if let Some(first) = pts.next() {
            path.move_to(first);
            for p in pts {
                path.line_to(p);
            }
        }
        path
    }

    /// SVG path data (`d` attribute) of the trail.
    pub fn to_svg_path(&self) -> String {
        self.to_bez_path().to_svg()
    }

    /// Rasterize the trail as an antialiased stroke of `width_px`, faded along its length, plus
    /// a round marker at the head.
    pub fn stroke_onto(&self, surface: &mut Surface, color: Rgba8Premul, width_px: f64) {
        if surface.is_empty() || !width_px.is_finite() || width_px <= 0.0 {
            return;
        }
        let half = width_px / 2.0;
        let mut segs: Vec<(Point, Point, f64)> = self
            .trail
            .windows(2)
            .map(|w| (w[0].point, w[1].point, (w[0].alpha + w[1].alpha) / 2.0))
            .collect();
        segs.push((self.marker, self.marker, 1.0));

        let pad = width_px + 1.0;
        let Some(bbox) = segs
            .iter()
            .map(|&(a, b, _)| Rect::from_points(a, b))
            .reduce(|r, s| r.union(s))
        else {
            return;
        };
        let (w, h) = (surface.width(), surface.height());
        let x0 = (bbox.x0 - pad).floor().max(0.0) as u32;
        let y0 = (bbox.y0 - pad).floor().max(0.0) as u32;
        let x1 = ((bbox.x1 + pad).ceil().max(0.0) as u32).min(w);
        let y1 = ((bbox.y1 + pad).ceil().max(0.0) as u32).min(h);

        for y in y0..y1 {
            for x in x0..x1 {
                let c = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let mut best = 0.0f32;
                for &(a, b, alpha) in &segs {
                    // The marker is drawn twice as wide as the trail.
                    let r = if a == b { width_px } else { half };
                    let d = segment_distance(c, a, b);
                    let cov = 1.0 - smoothstep((r - 0.5) as f32, (r + 0.5) as f32, d as f32);
                    best = best.max(cov * alpha as f32);
                }
                if best > 0.0 {
                    surface.blend_pixel(x, y, color, best);
                }
            }
        }
    }
}

/// A clock-driven marker circling a polygon boundary with a fading trail.
#[derive(Clone, Debug)]
pub struct BoundaryTrace {
    polygon: Polygon,
    tracer: PathTracer,
    clock: AnimationClock,
    trail_length_px: Option<f64>,
}

impl BoundaryTrace {
    /// Build a stopped trace over `vertices`.
    ///
    /// With `trail_length_px` the trail is a fixed pixel length; otherwise it spans
    /// `opts.trail_fraction` of the loop.
    pub fn new(
        vertices: Vec<Point>,
        cycle_ms: f64,
        opts: TraceOpts,
        trail_length_px: Option<f64>,
    ) -> RevealResult<Self> {
        let clock = AnimationClock::new(cycle_ms)?;
        let polygon = Polygon::new(vertices)?;
        let tracer = PathTracer::from_polygon(opts, polygon.clone());
        Ok(Self {
            polygon,
            tracer,
            clock,
            trail_length_px,
        })
    }

    /// The traced polygon.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Start (or restart) from progress 0 at host time `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.clock.start(now_ms);
    }

    /// Stop the trace.
    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// Whether the trace is running.
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Geometry for host time `now_ms`, or `None` while stopped.
    pub fn tick(&self, now_ms: f64) -> Option<TraceFrame> {
        self.clock.elapsed(now_ms).map(|e| self.frame_at(e))
    }

    /// Geometry `elapsed_ms` after start.
    pub fn frame_at(&self, elapsed_ms: f64) -> TraceFrame {
        let progress = self.clock.progress_at(elapsed_ms);
        let marker = self.polygon.point_at_progress(progress);
        let trail = match self.trail_length_px {
            Some(len) => fade_by_distance(&self.tracer.trailing_line(progress, len)),
            None => self.tracer.gradient_trail(progress),
        };
        TraceFrame {
            progress,
            marker,
            trail,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trace/boundary.rs"]
mod tests;
