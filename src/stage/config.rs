use std::{collections::BTreeSet, path::Path};

use anyhow::Context as _;

use crate::{
    effects::config::EffectConfig,
    foundation::{
        core::Point,
        error::{RevealError, RevealResult},
    },
    geometry::zone::ExclusionZone,
    trace::{boundary::DEFAULT_TRACE_CYCLE_MS, tracer::TraceOpts},
};

/// A JSON stage description: named effect instances and boundary traces.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageConfig {
    /// Reveal effect instances, rendered in order.
    #[serde(default)]
    pub effects: Vec<EffectInstanceConfig>,
    /// Boundary traces.
    #[serde(default)]
    pub traces: Vec<TraceInstanceConfig>,
}

/// One reveal effect instance.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectInstanceConfig {
    /// Unique instance name.
    pub name: String,
    /// Key of the frame source this instance reveals.
    pub source: String,
    /// Effect configuration.
    pub effect: EffectConfig,
    /// Regions where effect pixels are suppressed.
    #[serde(default)]
    pub zones: Vec<ExclusionZone>,
    /// Name of a trace whose polygon becomes this matrix effect's clip region.
    #[serde(default)]
    pub clip_from_trace: Option<String>,
}

/// One boundary trace.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceInstanceConfig {
    /// Unique trace name.
    pub name: String,
    /// Loop duration.
    #[serde(default = "default_trace_cycle_ms")]
    pub cycle_ms: f64,
    /// Boundary vertices in surface pixels.
    pub vertices: Vec<Point>,
    /// Trail sampling.
    #[serde(flatten)]
    pub opts: TraceOpts,
    /// Fixed trail length in pixels; overrides `trail_fraction` when set.
    #[serde(default)]
    pub trail_length_px: Option<f64>,
}

fn default_trace_cycle_ms() -> f64 {
    DEFAULT_TRACE_CYCLE_MS
}

impl StageConfig {
    /// Parse a stage from JSON text.
    pub fn from_json_str(s: &str) -> RevealResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a stage file.
    pub fn from_path(path: &Path) -> RevealResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read stage config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Reject duplicate or empty names. Per-instance problems are left to
    /// [`crate::Stage::from_config`], which skips the failing instance only.
    pub fn validate(&self) -> RevealResult<()> {
        let mut seen = BTreeSet::new();
        for name in self.effects.iter().map(|e| &e.name) {
            check_name(&mut seen, name, "effect")?;
        }
        let mut seen = BTreeSet::new();
        for name in self.traces.iter().map(|t| &t.name) {
            check_name(&mut seen, name, "trace")?;
        }
        Ok(())
    }
}

fn check_name<'a>(seen: &mut BTreeSet<&'a str>, name: &'a str, what: &str) -> RevealResult<()> {
    if name.trim().is_empty() {
        return Err(RevealError::validation(format!("{what} name must not be empty")));
    }
    if !seen.insert(name) {
        return Err(RevealError::validation(format!("duplicate {what} name '{name}'")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/stage/config.rs"]
mod tests;
