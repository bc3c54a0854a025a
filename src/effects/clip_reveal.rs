use crate::{
    animation::ease::Ease,
    effects::{config::ClipRevealParams, pattern::reveal_inside},
    foundation::{core::Point, math::half_phase},
    geometry::zone::{ExclusionZone, ZoneSet},
    surface::{raster::Surface, source::FrameView},
};

/// Opacity of the clipped reveal at progress `p`: eases in over the first half of the cycle and
/// back out over the second.
pub fn clip_reveal_alpha(p: f64) -> f64 {
    let (second_half, t) = half_phase(p);
    let e = Ease::Smooth.apply(t);
    if second_half { 1.0 - e } else { e }
}

/// Fragment edge at progress `p`: coarsest (`max_fragment_px`) at the cycle boundary, full
/// resolution (`1`) at mid-cycle.
pub fn fragment_size(p: f64, max_fragment_px: u32) -> u32 {
    let max_px = max_fragment_px.max(1);
    let span = f64::from(max_px - 1);
    let (second_half, t) = half_phase(p);
    let e = Ease::Smooth.apply(t);
    let f = if second_half {
        1.0 + span * e
    } else {
        f64::from(max_px) - span * e
    };
    (f.round() as u32).clamp(1, max_px)
}

/// Faded, pixelated reveal of the whole frame inside a polygon.
#[derive(Clone, Debug)]
pub(crate) struct ClipReveal {
    params: ClipRevealParams,
    region: ZoneSet,
}

impl ClipReveal {
    pub(crate) fn new(params: ClipRevealParams) -> Self {
        let region = region_for(&params.polygon);
        Self { params, region }
    }

    pub(crate) fn set_polygon(&mut self, vertices: Vec<Point>) {
        self.region = region_for(&vertices);
        self.params.polygon = vertices;
    }

    pub(crate) fn render(&self, progress: f64, frame: &FrameView<'_>, surface: &mut Surface) {
        let alpha = clip_reveal_alpha(progress) as f32 * self.params.alpha_max;
        let frag = fragment_size(progress, self.params.max_fragment_px);
        reveal_inside(surface, frame, &self.region, frag, alpha);
    }
}

fn region_for(vertices: &[Point]) -> ZoneSet {
    if vertices.len() < 3 {
        return ZoneSet::default();
    }
    ZoneSet::new(vec![ExclusionZone::Polygon {
        vertices: vertices.to_vec(),
    }])
}

#[cfg(test)]
#[path = "../../tests/unit/effects/clip_reveal.rs"]
mod tests;
