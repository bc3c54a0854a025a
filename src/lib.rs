//! revealfx is a CPU engine for time-driven reveal effects and polygon boundary traces.
//!
//! A host owns the repaint schedule and calls in once per displayed frame:
//!
//! - Build a [`RevealEffectEngine`] from an [`EffectConfig`] and [`RevealEffectEngine::tick`] it
//!   against a [`FrameSource`] and a [`Surface`]
//! - Drive a [`BoundaryTrace`] (or query a [`PathTracer`] directly) for marker and trail geometry
//! - Or describe several instances in a [`StageConfig`] and tick them together through a [`Stage`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod animation;
pub(crate) mod effects;
pub(crate) mod foundation;
pub(crate) mod geometry;
pub(crate) mod stage;
pub(crate) mod surface;
pub(crate) mod trace;

pub use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{RevealError, RevealResult};
pub use crate::foundation::math::{cycle_progress, half_phase, triangle, wrap01};

pub use crate::animation::{clock::AnimationClock, ease::Ease, rng::Rng64};

pub use crate::geometry::polygon::Polygon;
pub use crate::geometry::zone::{ExclusionZone, ZoneSet};

pub use crate::surface::composite::{PremulRgba8, darken, over, unpremultiply};
pub use crate::surface::decode::{decode_image, load_image};
pub use crate::surface::raster::{PixelRect, Surface};
pub use crate::surface::source::{
    FrameSource, FrameView, NotReadySource, PreparedImage, SourceFrame, StaticImage, VideoFrames,
};

pub use crate::effects::clip_reveal::{clip_reveal_alpha, fragment_size};
pub use crate::effects::config::{
    ClipRevealParams, EffectConfig, ExclusionMode, LineScanParams, MatrixParams, RevealStrategy,
    ScanLayout, SerpentineParams,
};
pub use crate::effects::engine::{FrameOutcome, MAX_FRAME_STEP_MS, RevealEffectEngine};
pub use crate::effects::line_scan::{active_columns, band_visible, scroll_offset};
pub use crate::effects::matrix::matrix_density;
pub use crate::effects::serpentine::{band_centers, in_band, wave_center};

pub use crate::trace::boundary::{BoundaryTrace, DEFAULT_TRACE_CYCLE_MS, TraceFrame};
pub use crate::trace::tracer::{PathTracer, TraceOpts, TrailPoint};

pub use crate::stage::config::{EffectInstanceConfig, StageConfig, TraceInstanceConfig};
pub use crate::stage::runtime::{
    EffectInstance, SkippedInstance, SourceTable, Stage, StageFrame,
};
