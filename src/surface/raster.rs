use crate::{
    foundation::core::{Canvas, Rgba8Premul},
    surface::{
        composite::{PremulRgba8, darken, over, unpremultiply},
        source::FrameView,
    },
};

/// Half-open integer pixel rectangle `[x0, x1) × [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x0: u32,
    /// Top edge (inclusive).
    pub y0: u32,
    /// Right edge (exclusive).
    pub x1: u32,
    /// Bottom edge (exclusive).
    pub y1: u32,
}

impl PixelRect {
    /// Clip signed bounds against a `width × height` surface. `None` when nothing remains.
    pub fn clipped(x0: i64, y0: i64, x1: i64, y1: i64, width: u32, height: u32) -> Option<Self> {
        let cx0 = x0.clamp(0, i64::from(width));
        let cy0 = y0.clamp(0, i64::from(height));
        let cx1 = x1.clamp(0, i64::from(width));
        let cy1 = y1.clamp(0, i64::from(height));
        if cx0 >= cx1 || cy0 >= cy1 {
            return None;
        }
        Some(Self {
            x0: cx0 as u32,
            y0: cy0 as u32,
            x1: cx1 as u32,
            y1: cy1 as u32,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// Center in pixel space (pixel centers sit at `+0.5`).
    pub fn center(&self) -> (f64, f64) {
        (
            (f64::from(self.x0) + f64::from(self.x1)) / 2.0,
            (f64::from(self.y0) + f64::from(self.y1)) / 2.0,
        )
    }
}

/// Mutable premultiplied RGBA8 raster target.
///
/// A surface is owned by exactly one effect instance. Its size follows the intrinsic size of the
/// frame source it reveals and is re-derived between frames, never mid-frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Surface {
    /// Allocate an opaque black surface. Zero dimensions produce an empty surface.
    pub fn new(width: u32, height: u32) -> Self {
        let mut s = Self {
            width,
            height,
            data: Vec::new(),
        };
        s.data.resize(s.byte_len(), 0);
        s.clear_black();
        s
    }

    fn byte_len(&self) -> usize {
        Canvas {
            width: self.width,
            height: self.height,
        }
        .rgba8_len()
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the surface has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * 4
    }

    /// Resize and clear to black. Returns whether the dimensions changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(self.byte_len(), 0);
        self.clear_black();
        true
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Fill every pixel with opaque black.
    pub fn clear_black(&mut self) {
        self.clear(Rgba8Premul::BLACK);
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    fn row_span(&self, rect: PixelRect, y: u32) -> std::ops::Range<usize> {
        let x1 = rect.x1.min(self.width);
        let x0 = rect.x0.min(x1);
        self.index(x0, y)..self.index(x1, y)
    }

    /// Raw premultiplied RGBA8 bytes, row-major.
    pub fn as_rgba8(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Overwrite the pixels of `rect` with `color`.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba8Premul) {
        let px = color.to_array();
        for y in rect.y0..rect.y1.min(self.height) {
            let span = self.row_span(rect, y);
            for d in self.data[span].chunks_exact_mut(4) {
                d.copy_from_slice(&px);
            }
        }
    }

    /// Composite a black layer of opacity `alpha` over `rect`.
    pub fn darken_rect(&mut self, rect: PixelRect, alpha: f32) {
        for y in rect.y0..rect.y1.min(self.height) {
            let span = self.row_span(rect, y);
            for d in self.data[span].chunks_exact_mut(4) {
                let out = darken([d[0], d[1], d[2], d[3]], alpha);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Composite `color` over a single pixel with the given coverage.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba8Premul, coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        let d = &mut self.data[i..i + 4];
        let out = over([d[0], d[1], d[2], d[3]], color.to_array(), coverage);
        d.copy_from_slice(&out);
    }

    /// Copy the frame's pixels under `rect` onto the surface, composited with `opacity`.
    ///
    /// The frame is sampled nearest-neighbour in surface space, so a frame of a different size
    /// is stretched to cover the surface.
    pub fn reveal_rect(&mut self, frame: &FrameView<'_>, rect: PixelRect, opacity: f32) {
        let (w, h) = (self.width, self.height);
        for y in rect.y0..rect.y1.min(h) {
            for x in rect.x0..rect.x1.min(w) {
                let src = frame.sample(x, y, w, h);
                let i = self.index(x, y);
                let d = &mut self.data[i..i + 4];
                let out = if opacity >= 1.0 {
                    src
                } else {
                    over([d[0], d[1], d[2], d[3]], src, opacity)
                };
                d.copy_from_slice(&out);
            }
        }
    }

    /// Fill `rect` with the single frame pixel sampled at the rect's center (one pixelated
    /// fragment), composited with `opacity`.
    pub fn reveal_fragment(&mut self, frame: &FrameView<'_>, rect: PixelRect, opacity: f32) {
        let (cx, cy) = rect.center();
        let sx = (cx.floor() as u32).min(self.width.saturating_sub(1));
        let sy = (cy.floor() as u32).min(self.height.saturating_sub(1));
        let src = frame.sample(sx, sy, self.width, self.height);
        for y in rect.y0..rect.y1.min(self.height) {
            let span = self.row_span(rect, y);
            for d in self.data[span].chunks_exact_mut(4) {
                let out = over([d[0], d[1], d[2], d[3]], src, opacity);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Straight-alpha RGBA8 copy, suitable for PNG export.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        out
    }

    /// Fraction of pixels that are not opaque black.
    pub fn revealed_fraction(&self) -> f64 {
        let total = self.data.len() / 4;
        if total == 0 {
            return 0.0;
        }
        let lit = self
            .data
            .chunks_exact(4)
            .filter(|px| px[0] != 0 || px[1] != 0 || px[2] != 0)
            .count();
        lit as f64 / total as f64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/raster.rs"]
mod tests;
