use crate::{
    foundation::core::Point,
    geometry::zone::ZoneSet,
    surface::{
        raster::{PixelRect, Surface},
        source::FrameView,
    },
};

/// Per-frame timing handed to a pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameCtx {
    /// Milliseconds since the engine was started.
    pub elapsed_ms: f64,
    /// Cycle progress in `[0, 1)`.
    pub progress: f64,
    /// Milliseconds since the previous rendered frame, clamped to a small maximum.
    pub dt_ms: f64,
    /// Set when elapsed time went backwards or the engine restarted; stateful patterns drop
    /// what they carried over.
    pub restarted: bool,
}

/// One reveal strategy.
///
/// A pattern owns nothing but its own animation state. It is told when the surface changes size
/// and is asked to paint the whole surface every frame.
pub trait RevealPattern: Send {
    /// Surface dimensions changed; rebuild size-dependent state.
    fn resize(&mut self, width: u32, height: u32);

    /// Paint every pixel of `surface` for this frame.
    fn render(
        &mut self,
        ctx: &FrameCtx,
        frame: &FrameView<'_>,
        surface: &mut Surface,
        zones: &ZoneSet,
    );

    /// Drop carried-over animation state.
    fn reset(&mut self) {}

    /// Replace the clip region, for patterns that have one. Returns whether it was accepted.
    fn set_clip_polygon(&mut self, _vertices: Vec<Point>) -> bool {
        false
    }
}

/// Reveal the frame inside `zones`, either pixel-exact (`fragment_px == 1`) or as square
/// fragments sampled at their centers. Fragments are aligned to a global grid so neighbouring
/// zones tile seamlessly.
pub(crate) fn reveal_inside(
    surface: &mut Surface,
    frame: &FrameView<'_>,
    zones: &ZoneSet,
    fragment_px: u32,
    opacity: f32,
) {
    if opacity <= 0.0 || surface.is_empty() {
        return;
    }
    let Some(b) = zones.union_bounds() else {
        return;
    };
    let (w, h) = (surface.width(), surface.height());
    let f = i64::from(fragment_px.max(1));
    let x_start = (b.x0.floor() as i64).max(0);
    let y_start = (b.y0.floor() as i64).max(0);
    let x_end = (b.x1.ceil() as i64).min(i64::from(w));
    let y_end = (b.y1.ceil() as i64).min(i64::from(h));

    let mut y = y_start - y_start.rem_euclid(f);
    while y < y_end {
        let mut x = x_start - x_start.rem_euclid(f);
        while x < x_end {
            if let Some(rect) = PixelRect::clipped(x, y, x + f, y + f, w, h) {
                let (cx, cy) = if f == 1 {
                    (x as f64 + 0.5, y as f64 + 0.5)
                } else {
                    rect.center()
                };
                if zones.contains_point(cx, cy) {
                    surface.reveal_fragment(frame, rect, opacity);
                }
            }
            x += f;
        }
        y += f;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pattern.rs"]
mod tests;
