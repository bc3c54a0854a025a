use crate::{
    animation::clock::AnimationClock,
    effects::{
        config::{EffectConfig, RevealStrategy},
        line_scan::LineScan,
        matrix::MatrixDissolve,
        pattern::{FrameCtx, RevealPattern},
        serpentine::Serpentine,
    },
    foundation::{
        core::Point,
        error::{RevealError, RevealResult},
    },
    geometry::zone::ZoneSet,
    surface::{raster::Surface, source::FrameSource},
};

/// Largest simulation step between two frames. Longer gaps (a stalled host, a hidden tab) are
/// treated as this long.
pub const MAX_FRAME_STEP_MS: f64 = 250.0;

/// Result of one frame request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The surface was painted at this cycle progress.
    Rendered {
        /// Cycle progress in `[0, 1)`.
        progress: f64,
    },
    /// The source had nothing to show; the surface was cleared to black.
    NotReady,
    /// The engine is stopped; the surface was left untouched.
    Stopped,
}

/// Drives one reveal effect instance: owns its clock, pattern state and exclusion zones, and
/// paints a surface the caller owns.
pub struct RevealEffectEngine {
    config: EffectConfig,
    clock: AnimationClock,
    pattern: Box<dyn RevealPattern>,
    zones: ZoneSet,
    sized: Option<(u32, u32)>,
    last_elapsed: Option<f64>,
}

impl std::fmt::Debug for RevealEffectEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealEffectEngine")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("zones", &self.zones.len())
            .field("sized", &self.sized)
            .finish_non_exhaustive()
    }
}

impl RevealEffectEngine {
    /// Validate `config` and build a stopped engine.
    pub fn configure(config: EffectConfig) -> RevealResult<Self> {
        config.validate()?;
        let clock = AnimationClock::new(config.cycle_ms)?;
        let pattern: Box<dyn RevealPattern> = match &config.strategy {
            RevealStrategy::LineScan(p) => Box::new(LineScan::new(p.clone())),
            RevealStrategy::Serpentine(p) => Box::new(Serpentine::new(p.clone())),
            RevealStrategy::Matrix(p) => Box::new(MatrixDissolve::new(p.clone())),
        };
        Ok(Self {
            config,
            clock,
            pattern,
            zones: ZoneSet::default(),
            sized: None,
            last_elapsed: None,
        })
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Replace the exclusion zones. Takes effect on the next frame.
    pub fn set_exclusion_zones(&mut self, zones: ZoneSet) {
        tracing::debug!(zones = zones.len(), "exclusion zones updated");
        self.zones = zones;
    }

    /// Current exclusion zones.
    pub fn exclusion_zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Replace the clip polygon of a matrix effect's clipped reveal layer.
    pub fn set_clip_polygon(&mut self, vertices: Vec<Point>) -> RevealResult<()> {
        if self.pattern.set_clip_polygon(vertices) {
            Ok(())
        } else {
            Err(RevealError::validation("only the matrix strategy has a clip region"))
        }
    }

    /// Start (or restart) the animation with `now_ms` as the baseline. A restart begins from
    /// progress 0 with fresh pattern state.
    pub fn start(&mut self, now_ms: f64) {
        self.clock.start(now_ms);
        self.last_elapsed = None;
        self.pattern.reset();
    }

    /// Stop the animation. [`Self::tick`] becomes a no-op until the next start.
    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// Whether the animation is running.
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Render the frame for host time `now_ms` if running.
    pub fn tick(
        &mut self,
        now_ms: f64,
        source: &dyn FrameSource,
        surface: &mut Surface,
    ) -> FrameOutcome {
        match self.clock.elapsed(now_ms) {
            Some(elapsed) => self.render_frame(elapsed, source, surface),
            None => FrameOutcome::Stopped,
        }
    }

    /// Render the frame `elapsed_ms` after start, regardless of the running state.
    ///
    /// The surface is resized to the source's intrinsic size first. A source that is not ready
    /// yields a black surface.
    #[tracing::instrument(level = "trace", skip(self, source, surface))]
    pub fn render_frame(
        &mut self,
        elapsed_ms: f64,
        source: &dyn FrameSource,
        surface: &mut Surface,
    ) -> FrameOutcome {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        let Some(frame) = source.frame().ready() else {
            surface.clear_black();
            return FrameOutcome::NotReady;
        };

        let resized = surface.resize(frame.width, frame.height);
        if resized || self.sized != Some((frame.width, frame.height)) {
            tracing::debug!(
                width = frame.width,
                height = frame.height,
                "surface resized to source"
            );
            self.pattern.resize(frame.width, frame.height);
            self.sized = Some((frame.width, frame.height));
        }

        let (dt_ms, restarted) = match self.last_elapsed {
            Some(prev) if elapsed >= prev => ((elapsed - prev).min(MAX_FRAME_STEP_MS), false),
            Some(_) => (0.0, true),
            None => (0.0, false),
        };
        self.last_elapsed = Some(elapsed);

        let progress = self.clock.progress_at(elapsed);
        let ctx = FrameCtx {
            elapsed_ms: elapsed,
            progress,
            dt_ms,
            restarted,
        };
        self.pattern.render(&ctx, &frame, surface, &self.zones);
        tracing::trace!(progress, dt_ms, "frame rendered");
        FrameOutcome::Rendered { progress }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/engine.rs"]
mod tests;
