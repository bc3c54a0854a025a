use std::sync::Arc;

use crate::foundation::error::{RevealError, RevealResult};
use crate::surface::composite::PremulRgba8;

/// Decoded image, premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap raw premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> RevealResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| RevealError::validation("image size overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(RevealError::validation(format!(
                "image buffer is {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Solid-color image, handy for tests and placeholders.
    pub fn solid(width: u32, height: u32, px: PremulRgba8) -> Self {
        Self {
            width,
            height,
            rgba8_premul: Arc::new(px.repeat(width as usize * height as usize)),
        }
    }

    /// Borrow as a frame view.
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            width: self.width,
            height: self.height,
            data: self.rgba8_premul.as_slice(),
        }
    }
}

/// Borrowed raster frame that is ready to be sampled.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    /// Intrinsic width.
    pub width: u32,
    /// Intrinsic height.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: &'a [u8],
}

impl FrameView<'_> {
    /// Sample the frame at surface pixel `(x, y)` of a `surf_w × surf_h` target,
    /// nearest-neighbour. Out-of-range or malformed frames sample as opaque black.
    pub fn sample(&self, x: u32, y: u32, surf_w: u32, surf_h: u32) -> PremulRgba8 {
        if self.width == 0 || self.height == 0 || surf_w == 0 || surf_h == 0 {
            return [0, 0, 0, 255];
        }
        let sx = if surf_w == self.width {
            x
        } else {
            ((u64::from(x) * u64::from(self.width)) / u64::from(surf_w)) as u32
        };
        let sy = if surf_h == self.height {
            y
        } else {
            ((u64::from(y) * u64::from(self.height)) / u64::from(surf_h)) as u32
        };
        let i = ((sy as usize) * (self.width as usize) + (sx as usize)) * 4;
        match self.data.get(i..i + 4) {
            Some(px) => [px[0], px[1], px[2], px[3]],
            None => [0, 0, 0, 255],
        }
    }
}

/// What a frame source offers for the current tick.
#[derive(Clone, Copy, Debug)]
pub enum SourceFrame<'a> {
    /// Nothing decodable yet; the caller renders black and retries next tick.
    NotReady,
    /// A frame ready to sample.
    Ready(FrameView<'a>),
}

impl<'a> SourceFrame<'a> {
    /// The ready frame, if any.
    pub fn ready(self) -> Option<FrameView<'a>> {
        match self {
            Self::NotReady => None,
            Self::Ready(v) => Some(v),
        }
    }
}

/// Anything that can produce the current raster content on demand.
///
/// Effects only poll; they never own, await, or subscribe to a source.
pub trait FrameSource {
    /// Current frame, or [`SourceFrame::NotReady`].
    fn frame(&self) -> SourceFrame<'_>;
}

/// Placeholder source that is never ready.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotReadySource;

impl FrameSource for NotReadySource {
    fn frame(&self) -> SourceFrame<'_> {
        SourceFrame::NotReady
    }
}

/// A static image.
#[derive(Clone, Debug)]
pub struct StaticImage {
    image: PreparedImage,
}

impl StaticImage {
    /// Wrap a decoded image.
    pub fn new(image: PreparedImage) -> Self {
        Self { image }
    }
}

impl FrameSource for StaticImage {
    fn frame(&self) -> SourceFrame<'_> {
        if self.image.width == 0 || self.image.height == 0 {
            return SourceFrame::NotReady;
        }
        SourceFrame::Ready(self.image.view())
    }
}

/// A playing clip, modelled as decoded frames at a fixed rate.
///
/// The host seeks it to its playback time; until the first frame has been delivered the source
/// reports [`SourceFrame::NotReady`].
#[derive(Clone, Debug)]
pub struct VideoFrames {
    frames: Vec<PreparedImage>,
    fps: f64,
    current: Option<usize>,
    looping: bool,
}

impl VideoFrames {
    /// Build a clip from frames. `fps` must be finite and > 0.
    pub fn new(frames: Vec<PreparedImage>, fps: f64, looping: bool) -> RevealResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(RevealError::validation("video fps must be finite and > 0"));
        }
        Ok(Self {
            frames,
            fps,
            current: None,
            looping,
        })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the clip has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the frame currently presented.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Present the frame for playback time `ms`. Past the end the clip loops or holds the last
    /// frame.
    pub fn seek_ms(&mut self, ms: f64) {
        if self.frames.is_empty() {
            self.current = None;
            return;
        }
        let ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
        let idx = (ms / 1000.0 * self.fps).floor() as usize;
        let n = self.frames.len();
        self.current = Some(if self.looping { idx % n } else { idx.min(n - 1) });
    }
}

impl FrameSource for VideoFrames {
    fn frame(&self) -> SourceFrame<'_> {
        match self.current.and_then(|i| self.frames.get(i)) {
            Some(img) if img.width > 0 && img.height > 0 => SourceFrame::Ready(img.view()),
            _ => SourceFrame::NotReady,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/source.rs"]
mod tests;
