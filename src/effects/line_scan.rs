use rayon::prelude::*;

use crate::{
    effects::{
        config::{LineScanParams, ScanLayout},
        pattern::{FrameCtx, RevealPattern},
    },
    foundation::{core::Rect, math::half_phase},
    geometry::zone::ZoneSet,
    surface::{raster::Surface, source::FrameView},
};

const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Whether scanline `y` falls in a visible band.
///
/// Lines are `thickness` pixels tall; `lines_per_band` visible lines alternate with as many black
/// ones, and the whole pattern is shifted by `scroll_offset` pixels.
pub fn band_visible(y: i64, scroll_offset: i64, thickness: u32, lines_per_band: u32) -> bool {
    let t = i64::from(thickness.max(1));
    let n = i64::from(lines_per_band.max(1));
    (y + scroll_offset).div_euclid(t).rem_euclid(2 * n) < n
}

/// Vertical scroll of the band pattern at cycle progress `p`.
///
/// The offset grows over the first half of the cycle and shrinks back over the second, so the
/// bands travel one way and then the other, returning to rest at the cycle boundary.
pub fn scroll_offset(p: f64, params: &LineScanParams) -> i64 {
    let (second_half, t) = half_phase(p);
    let travel = f64::from(params.period_px()) * f64::from(params.scroll_periods);
    let off = if second_half { (1.0 - t) * travel } else { t * travel };
    off.round() as i64
}

/// Columns `[x0, x1)` that reveal the frame at progress `p`; the rest of the row is black.
pub fn active_columns(p: f64, width: u32, layout: ScanLayout) -> (u32, u32) {
    match layout {
        ScanLayout::Full => (0, width),
        ScanLayout::SplitAlternating => {
            let mid = width / 2;
            if half_phase(p).0 {
                (mid, width)
            } else {
                (0, mid)
            }
        }
    }
}

/// Alternating visible/black scanline bands.
#[derive(Clone, Debug)]
pub(crate) struct LineScan {
    params: LineScanParams,
}

impl LineScan {
    pub(crate) fn new(params: LineScanParams) -> Self {
        Self { params }
    }
}

impl RevealPattern for LineScan {
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn render(
        &mut self,
        ctx: &FrameCtx,
        frame: &FrameView<'_>,
        surface: &mut Surface,
        zones: &ZoneSet,
    ) {
        if surface.is_empty() {
            return;
        }
        let (w, h) = (surface.width(), surface.height());
        let row_bytes = surface.row_bytes();
        let offset = scroll_offset(ctx.progress, &self.params);
        let (x0, x1) = active_columns(ctx.progress, w, self.params.layout);
        let thickness = self.params.line_thickness_px;
        let lines = self.params.lines_per_band;
        let frame = *frame;

        surface
            .data_mut()
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as u32;
                let visible = band_visible(i64::from(y), offset, thickness, lines);
                let check_zones = visible
                    && zones.may_intersect(Rect::new(
                        0.0,
                        f64::from(y),
                        f64::from(w),
                        f64::from(y) + 1.0,
                    ));
                for (x, d) in (0u32..).zip(row.chunks_exact_mut(4)) {
                    let lit = visible
                        && x >= x0
                        && x < x1
                        && !(check_zones
                            && zones.contains_point(f64::from(x) + 0.5, f64::from(y) + 0.5));
                    let px = if lit { frame.sample(x, y, w, h) } else { BLACK };
                    d.copy_from_slice(&px);
                }
            });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/line_scan.rs"]
mod tests;
