use rayon::prelude::*;
use smallvec::SmallVec;

use crate::{
    animation::rng::Rng64,
    effects::{
        clip_reveal::{ClipReveal, fragment_size},
        config::{ClipRevealParams, ExclusionMode, MatrixParams},
        pattern::{FrameCtx, RevealPattern, reveal_inside},
    },
    foundation::{
        core::Point,
        math::{triangle, wrap01},
    },
    geometry::zone::ZoneSet,
    surface::{
        raster::{PixelRect, Surface},
        source::FrameView,
    },
};

/// Fraction of each column's cell budget in use at progress `p`: `min` at the cycle boundary,
/// rising linearly to `max` at mid-cycle and mirrored afterwards.
pub fn matrix_density(p: f64, min: f64, max: f64) -> f64 {
    (min + (max - min) * triangle(wrap01(p))).clamp(min, max)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Particle {
    y: f64,
    speed: f64,
    live: bool,
}

#[derive(Clone, Debug)]
struct Column {
    x: u32,
    activation_ms: f64,
    rng: Rng64,
    particles: SmallVec<[Particle; 16]>,
}

struct StepParams {
    dt_ms: f64,
    cap: usize,
    max_cells: usize,
    spawn_mean: f64,
    speed_lo: f64,
    speed_hi: f64,
    top: f64,
    bottom: f64,
}

impl Column {
    fn live(&self) -> usize {
        self.particles.iter().filter(|p| p.live).count()
    }

    fn step(&mut self, sp: &StepParams) {
        let mut live = self.live();
        for i in 0..self.particles.len() {
            if !self.particles[i].live {
                continue;
            }
            let p = &mut self.particles[i];
            p.y += p.speed * sp.dt_ms / 1000.0;
            if p.y > sp.bottom {
                if live > sp.cap {
                    p.live = false;
                    live -= 1;
                } else {
                    p.y = sp.top;
                    p.speed = self.rng.range_f64(sp.speed_lo, sp.speed_hi);
                }
            }
        }

        let room = sp.cap.saturating_sub(live);
        let spawns = self.rng.poisson(sp.spawn_mean, room);
        for _ in 0..spawns {
            let fresh = Particle {
                y: sp.top,
                speed: self.rng.range_f64(sp.speed_lo, sp.speed_hi),
                live: true,
            };
            if let Some(slot) = self.particles.iter_mut().find(|p| !p.live) {
                *slot = fresh;
            } else if self.particles.len() < sp.max_cells {
                self.particles.push(fresh);
            } else {
                break;
            }
        }
    }
}

/// Columns of falling cells that reveal the frame, with density following the cycle.
#[derive(Clone, Debug)]
pub(crate) struct MatrixDissolve {
    params: MatrixParams,
    width: u32,
    height: u32,
    columns: Vec<Column>,
    clip: Option<ClipReveal>,
}

impl MatrixDissolve {
    pub(crate) fn new(params: MatrixParams) -> Self {
        let clip = params.clip_reveal.clone().map(ClipReveal::new);
        Self {
            params,
            width: 0,
            height: 0,
            columns: Vec::new(),
            clip,
        }
    }

    fn rebuild_columns(&mut self) {
        let cell = self.params.cell_px.max(1);
        let count = self.width.div_ceil(cell);
        self.columns = (0..count)
            .map(|i| Column {
                x: i * cell,
                activation_ms: f64::from(i) * self.params.column_delay_ms,
                rng: Rng64::fork(self.params.seed, u64::from(i)),
                particles: SmallVec::new(),
            })
            .collect();
    }

    #[cfg(test)]
    fn live_counts(&self) -> Vec<usize> {
        self.columns.iter().map(Column::live).collect()
    }
}

impl RevealPattern for MatrixDissolve {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.rebuild_columns();
    }

    fn reset(&mut self) {
        self.rebuild_columns();
    }

    fn set_clip_polygon(&mut self, vertices: Vec<Point>) -> bool {
        match &mut self.clip {
            Some(clip) => clip.set_polygon(vertices),
            None => {
                self.clip = Some(ClipReveal::new(ClipRevealParams {
                    polygon: vertices,
                    ..ClipRevealParams::default()
                }))
            }
        }
        true
    }

    fn render(
        &mut self,
        ctx: &FrameCtx,
        frame: &FrameView<'_>,
        surface: &mut Surface,
        zones: &ZoneSet,
    ) {
        if ctx.restarted {
            self.reset();
        }
        surface.clear_black();
        if surface.is_empty() {
            return;
        }

        let p = &self.params;
        let cell = p.cell_px.max(1);
        let density = matrix_density(ctx.progress, p.density_min, p.density_max);
        let trail_px = f64::from(p.trail_cells.saturating_add(1)) * f64::from(cell);
        let sp = StepParams {
            dt_ms: ctx.dt_ms.max(0.0),
            cap: (density * f64::from(p.max_cells_per_column)).ceil() as usize,
            max_cells: p.max_cells_per_column as usize,
            spawn_mean: p.spawn_rate_per_s * density * ctx.dt_ms.max(0.0) / 1000.0,
            speed_lo: p.fall_speed_min_px_per_s,
            speed_hi: p.fall_speed_max_px_per_s,
            top: -f64::from(cell),
            bottom: f64::from(self.height) + trail_px,
        };
        let elapsed = ctx.elapsed_ms;
        self.columns
            .par_iter_mut()
            .filter(|c| elapsed >= c.activation_ms)
            .for_each(|c| c.step(&sp));

        if let Some(clip) = &self.clip {
            clip.render(ctx.progress, frame, surface);
        }

        let (w, h) = (surface.width(), surface.height());
        let trail = p.trail_cells;
        let cell_i = i64::from(cell);
        for col in self.columns.iter().filter(|c| elapsed >= c.activation_ms) {
            for particle in col.particles.iter().filter(|q| q.live) {
                let head = (particle.y / f64::from(cell)).floor() as i64;
                // Tail first so the head wins where cells overlap.
                for k in (0..=trail).rev() {
                    let row = head - i64::from(k);
                    let x0 = i64::from(col.x);
                    let Some(rect) =
                        PixelRect::clipped(x0, row * cell_i, x0 + cell_i, (row + 1) * cell_i, w, h)
                    else {
                        continue;
                    };
                    let (cx, cy) = rect.center();
                    if zones.contains_point(cx, cy) {
                        continue;
                    }
                    let opacity = 1.0 - k as f32 / (trail as f32 + 1.0);
                    surface.reveal_rect(frame, rect, opacity);
                }
            }
        }

        match p.exclusion {
            ExclusionMode::Black => {}
            ExclusionMode::RevealFull => reveal_inside(surface, frame, zones, 1, 1.0),
            ExclusionMode::RevealFragmented => {
                let frag = fragment_size(ctx.progress, cell);
                reveal_inside(surface, frame, zones, frag, 1.0);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/matrix.rs"]
mod tests;
