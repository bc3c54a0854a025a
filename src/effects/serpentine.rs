use rayon::prelude::*;

use crate::{
    effects::{
        config::SerpentineParams,
        pattern::{FrameCtx, RevealPattern},
    },
    foundation::{core::Rect, math::wrap01},
    geometry::zone::ZoneSet,
    surface::{composite::darken, raster::Surface, source::FrameView},
};

/// Normalized vertical position of the wave at progress `p`: sweeps from the bottom edge to the
/// top over the first half of the cycle, then back down.
pub fn wave_center(p: f64) -> f64 {
    let p = wrap01(p);
    if p < 0.5 {
        1.0 - 2.0 * p
    } else {
        2.0 * (p - 0.5)
    }
}

/// Centers of all stripes at progress `p`, each in `[0, 1)`.
pub fn band_centers(p: f64, bands: u32, stagger: f64) -> Vec<f64> {
    let c = wave_center(p);
    (0..bands)
        .map(|k| wrap01(c + f64::from(k) * stagger))
        .collect()
}

/// Whether normalized row `y` lies inside any stripe. Stripes wrap across the top and bottom
/// edges.
pub fn in_band(y: f64, centers: &[f64], band_height: f64) -> bool {
    let half = band_height / 2.0;
    centers.iter().any(|&c| {
        let d = (y - c).abs();
        d.min(1.0 - d) <= half
    })
}

/// Staggered stripes revealing the frame; everything else sits under a dark overlay.
#[derive(Clone, Debug)]
pub(crate) struct Serpentine {
    params: SerpentineParams,
}

impl Serpentine {
    pub(crate) fn new(params: SerpentineParams) -> Self {
        Self { params }
    }
}

impl RevealPattern for Serpentine {
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
        let centers = band_centers(ctx.progress, self.params.bands, self.params.stagger());
        let band_height = self.params.band_height();
        let overlay = self.params.overlay_alpha;
        let frame = *frame;

        surface
            .data_mut()
            .par_chunks_exact_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as u32;
                let yn = (f64::from(y) + 0.5) / f64::from(h);
                let revealed = in_band(yn, &centers, band_height);
                let check_zones = revealed
                    && zones.may_intersect(Rect::new(
                        0.0,
                        f64::from(y),
                        f64::from(w),
                        f64::from(y) + 1.0,
                    ));
                for (x, d) in (0u32..).zip(row.chunks_exact_mut(4)) {
                    let src = frame.sample(x, y, w, h);
                    let lit = revealed
                        && !(check_zones
                            && zones.contains_point(f64::from(x) + 0.5, f64::from(y) + 0.5));
                    let px = if lit { src } else { darken(src, overlay) };
                    d.copy_from_slice(&px);
                }
            });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/serpentine.rs"]
mod tests;
