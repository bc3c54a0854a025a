use std::collections::BTreeMap;

use crate::{
    effects::engine::{FrameOutcome, RevealEffectEngine},
    foundation::error::{RevealError, RevealResult},
    geometry::zone::ZoneSet,
    stage::config::{EffectInstanceConfig, StageConfig},
    surface::{
        raster::Surface,
        source::{FrameSource, NotReadySource},
    },
    trace::boundary::{BoundaryTrace, TraceFrame},
};

/// Named frame sources polled by a [`Stage`].
#[derive(Default)]
pub struct SourceTable {
    sources: BTreeMap<String, Box<dyn FrameSource>>,
}

impl std::fmt::Debug for SourceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.sources.keys()).finish()
    }
}

impl SourceTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a source under `name`.
    pub fn insert(&mut self, name: impl Into<String>, source: Box<dyn FrameSource>) {
        self.sources.insert(name.into(), source);
    }

    /// Look up a source.
    pub fn get(&self, name: &str) -> Option<&dyn FrameSource> {
        self.sources.get(name).map(|s| s.as_ref())
    }
}

/// An instance that could not be built, and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedInstance {
    /// Instance name.
    pub name: String,
    /// Error message.
    pub reason: String,
}

/// One effect instance with its own surface.
#[derive(Debug)]
pub struct EffectInstance {
    name: String,
    source: String,
    engine: RevealEffectEngine,
    surface: Surface,
}

impl EffectInstance {
    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source key.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The surface this instance paints.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The driving engine.
    pub fn engine(&self) -> &RevealEffectEngine {
        &self.engine
    }
}

/// Output of one [`Stage::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageFrame {
    /// Outcome per effect instance, in stage order.
    pub effects: Vec<(String, FrameOutcome)>,
    /// Geometry per running trace, in stage order.
    pub traces: Vec<(String, TraceFrame)>,
}

/// A set of independent effect instances and boundary traces driven by one host clock.
///
/// Instances never share state; one failing to build does not affect the others.
#[derive(Debug)]
pub struct Stage {
    effects: Vec<EffectInstance>,
    traces: Vec<(String, BoundaryTrace)>,
    skipped: Vec<SkippedInstance>,
}

impl Stage {
    /// Build every instance in `config`, skipping (and recording) the ones that fail.
    #[tracing::instrument(
        skip(config),
        fields(effects = config.effects.len(), traces = config.traces.len())
    )]
    pub fn from_config(config: &StageConfig) -> Self {
        let mut skipped = Vec::new();

        let mut traces = Vec::with_capacity(config.traces.len());
        for t in &config.traces {
            match BoundaryTrace::new(t.vertices.clone(), t.cycle_ms, t.opts, t.trail_length_px) {
                Ok(trace) => traces.push((t.name.clone(), trace)),
                Err(err) => {
                    tracing::warn!(name = %t.name, error = %err, "skipping trace");
                    skipped.push(SkippedInstance {
                        name: t.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let mut effects = Vec::with_capacity(config.effects.len());
        for e in &config.effects {
            match build_effect(e, &traces) {
                Ok(inst) => effects.push(inst),
                Err(err) => {
                    tracing::warn!(name = %e.name, error = %err, "skipping effect");
                    skipped.push(SkippedInstance {
                        name: e.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Self {
            effects,
            traces,
            skipped,
        }
    }

    /// Instances that failed to build.
    pub fn skipped(&self) -> &[SkippedInstance] {
        &self.skipped
    }

    /// Effect instances in stage order.
    pub fn effects(&self) -> &[EffectInstance] {
        &self.effects
    }

    /// Surface of the named effect.
    pub fn surface(&self, name: &str) -> Option<&Surface> {
        self.effects
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.surface)
    }

    /// Trace by name.
    pub fn trace(&self, name: &str) -> Option<&BoundaryTrace> {
        self.traces.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    /// Replace the exclusion zones of the named effect. Returns whether it exists.
    pub fn set_exclusion_zones(&mut self, name: &str, zones: ZoneSet) -> bool {
        match self.effects.iter_mut().find(|e| e.name == name) {
            Some(e) => {
                e.engine.set_exclusion_zones(zones);
                true
            }
            None => false,
        }
    }

    /// Start every instance with the same baseline.
    pub fn start(&mut self, now_ms: f64) {
        for e in &mut self.effects {
            e.engine.start(now_ms);
        }
        for (_, t) in &mut self.traces {
            t.start(now_ms);
        }
    }

    /// Stop every instance.
    pub fn stop(&mut self) {
        for e in &mut self.effects {
            e.engine.stop();
        }
        for (_, t) in &mut self.traces {
            t.stop();
        }
    }

    /// Render every effect and sample every trace for host time `now_ms`. A source key missing
    /// from `sources` counts as not ready.
    pub fn tick(&mut self, now_ms: f64, sources: &SourceTable) -> StageFrame {
        let mut frame = StageFrame::default();
        for e in &mut self.effects {
            let source = sources.get(&e.source).unwrap_or(&NotReadySource);
            let outcome = e.engine.tick(now_ms, source, &mut e.surface);
            frame.effects.push((e.name.clone(), outcome));
        }
        for (name, t) in &self.traces {
            if let Some(tf) = t.tick(now_ms) {
                frame.traces.push((name.clone(), tf));
            }
        }
        frame
    }
}

fn build_effect(
    cfg: &EffectInstanceConfig,
    traces: &[(String, BoundaryTrace)],
) -> RevealResult<EffectInstance> {
    let mut engine = RevealEffectEngine::configure(cfg.effect.clone())?;
    engine.set_exclusion_zones(ZoneSet::new(cfg.zones.clone()));
    if let Some(trace_name) = &cfg.clip_from_trace {
        let (_, trace) = traces
            .iter()
            .find(|(n, _)| n == trace_name)
            .ok_or_else(|| RevealError::validation(format!("unknown trace '{trace_name}'")))?;
        engine.set_clip_polygon(trace.polygon().vertices().to_vec())?;
    }
    Ok(EffectInstance {
        name: cfg.name.clone(),
        source: cfg.source.clone(),
        engine,
        surface: Surface::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/stage/runtime.rs"]
mod tests;
