use crate::foundation::{
    core::Point,
    error::{RevealError, RevealResult},
};

/// Per-instance effect configuration. Fixed at construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectConfig {
    /// Length of one animation cycle in milliseconds.
    #[serde(default = "default_cycle_ms")]
    pub cycle_ms: f64,
    /// Reveal pattern and its parameters.
    pub strategy: RevealStrategy,
}

fn default_cycle_ms() -> f64 {
    30_000.0
}

impl EffectConfig {
    /// Config with the default 30 s cycle.
    pub fn new(strategy: RevealStrategy) -> Self {
        Self {
            cycle_ms: default_cycle_ms(),
            strategy,
        }
    }

    /// Override the cycle length.
    pub fn with_cycle_ms(mut self, cycle_ms: f64) -> Self {
        self.cycle_ms = cycle_ms;
        self
    }

    /// Reject configurations that cannot render.
    pub fn validate(&self) -> RevealResult<()> {
        if !self.cycle_ms.is_finite() || self.cycle_ms <= 0.0 {
            return Err(RevealError::validation("cycle_ms must be finite and > 0"));
        }
        match &self.strategy {
            RevealStrategy::LineScan(p) => p.validate(),
            RevealStrategy::Serpentine(p) => p.validate(),
            RevealStrategy::Matrix(p) => p.validate(),
        }
    }
}

/// The interchangeable reveal strategies.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealStrategy {
    /// Alternating visible/black horizontal bands that scroll.
    LineScan(LineScanParams),
    /// Staggered reveal stripes following a traveling wave.
    Serpentine(SerpentineParams),
    /// Falling pixel blocks per column with density modulated over the cycle.
    Matrix(MatrixParams),
}

/// Which part of the width a line scan reveals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanLayout {
    /// The whole width is active for the whole cycle.
    Full,
    /// Left half active in the first half of the cycle, right half in the second; the
    /// inactive half is solid black.
    #[default]
    SplitAlternating,
}

/// Line-band scan parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LineScanParams {
    /// Visible lines per band; each band is followed by as many black lines.
    pub lines_per_band: u32,
    /// Thickness of one line in pixels.
    pub line_thickness_px: u32,
    /// Whole band periods scrolled per half cycle.
    pub scroll_periods: u32,
    /// Active region layout.
    pub layout: ScanLayout,
}

impl Default for LineScanParams {
    fn default() -> Self {
        Self {
            lines_per_band: 7,
            line_thickness_px: 2,
            scroll_periods: 4,
            layout: ScanLayout::default(),
        }
    }
}

impl LineScanParams {
    /// Pixel height of one visible+black band pair.
    pub fn period_px(&self) -> u32 {
        self.lines_per_band
            .saturating_mul(2)
            .saturating_mul(self.line_thickness_px)
    }

    fn validate(&self) -> RevealResult<()> {
        if self.lines_per_band == 0 {
            return Err(RevealError::validation("line_scan.lines_per_band must be > 0"));
        }
        if self.line_thickness_px == 0 {
            return Err(RevealError::validation("line_scan.line_thickness_px must be > 0"));
        }
        Ok(())
    }
}

/// Serpentine wave parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SerpentineParams {
    /// Number of stripes.
    pub bands: u32,
    /// Offset between consecutive stripe centers as a fraction of height; defaults to
    /// `1 / bands`.
    pub stagger: Option<f64>,
    /// Stripe height as a fraction of height; defaults to `0.5 / bands`.
    pub band_height: Option<f64>,
    /// Opacity of the black overlay outside the stripes.
    pub overlay_alpha: f32,
}

impl Default for SerpentineParams {
    fn default() -> Self {
        Self {
            bands: 7,
            stagger: None,
            band_height: None,
            overlay_alpha: 0.85,
        }
    }
}

impl SerpentineParams {
    /// Effective stagger fraction.
    pub fn stagger(&self) -> f64 {
        self.stagger
            .unwrap_or_else(|| 1.0 / f64::from(self.bands.max(1)))
    }

    /// Effective stripe height fraction.
    pub fn band_height(&self) -> f64 {
        self.band_height
            .unwrap_or_else(|| 0.5 / f64::from(self.bands.max(1)))
    }

    fn validate(&self) -> RevealResult<()> {
        if self.bands == 0 {
            return Err(RevealError::validation("serpentine.bands must be > 0"));
        }
        if !self.stagger().is_finite() {
            return Err(RevealError::validation("serpentine.stagger must be finite"));
        }
        let h = self.band_height();
        if !h.is_finite() || h <= 0.0 || h > 1.0 {
            return Err(RevealError::validation("serpentine.band_height must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.overlay_alpha) {
            return Err(RevealError::validation("serpentine.overlay_alpha must be in [0, 1]"));
        }
        Ok(())
    }
}

/// What the matrix effect draws for cells that fall inside an exclusion zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionMode {
    /// Leave the zone black.
    #[default]
    Black,
    /// Show the full-resolution source inside the zone.
    RevealFull,
    /// Show a pixelated source inside the zone, fragment size following the cycle.
    RevealFragmented,
}

/// Faded, optionally pixelated reveal confined to a polygon, drawn beneath the falling cells.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClipRevealParams {
    /// Clip polygon in surface pixels. May be empty and supplied later through
    /// [`crate::RevealEffectEngine::set_clip_polygon`].
    pub polygon: Vec<Point>,
    /// Peak opacity reached at mid-cycle.
    pub alpha_max: f32,
    /// Fragment edge at the sparse ends of the cycle; `1` disables pixelation.
    pub max_fragment_px: u32,
}

impl Default for ClipRevealParams {
    fn default() -> Self {
        Self {
            polygon: Vec::new(),
            alpha_max: 1.0,
            max_fragment_px: 16,
        }
    }
}

/// Matrix dissolve parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MatrixParams {
    /// Edge length of one square cell in pixels.
    pub cell_px: u32,
    /// Slowest fall speed.
    pub fall_speed_min_px_per_s: f64,
    /// Fastest fall speed.
    pub fall_speed_max_px_per_s: f64,
    /// Activation delay between neighbouring columns (left to right sweep).
    pub column_delay_ms: f64,
    /// Density at the sparse ends of the cycle.
    pub density_min: f64,
    /// Density at mid-cycle.
    pub density_max: f64,
    /// Upper bound on simultaneously falling cells per column.
    pub max_cells_per_column: u32,
    /// Mean spawns per second per column at full density, independent of the tick rate.
    pub spawn_rate_per_s: f64,
    /// Fading cells drawn above each falling head.
    pub trail_cells: u32,
    /// Seed for the per-column generators.
    pub seed: u64,
    /// Behaviour inside exclusion zones.
    pub exclusion: ExclusionMode,
    /// Optional clipped full-frame reveal layer.
    pub clip_reveal: Option<ClipRevealParams>,
}

impl Default for MatrixParams {
    fn default() -> Self {
        Self {
            cell_px: 8,
            fall_speed_min_px_per_s: 90.0,
            fall_speed_max_px_per_s: 260.0,
            column_delay_ms: 40.0,
            density_min: 0.2,
            density_max: 1.0,
            max_cells_per_column: 12,
            spawn_rate_per_s: 6.0,
            trail_cells: 3,
            seed: 0,
            exclusion: ExclusionMode::default(),
            clip_reveal: None,
        }
    }
}

const MAX_TRAIL_CELLS: u32 = 64;
const MAX_CELLS_PER_COLUMN: u32 = 1024;

impl MatrixParams {
    fn validate(&self) -> RevealResult<()> {
        if self.cell_px == 0 {
            return Err(RevealError::validation("matrix.cell_px must be > 0"));
        }
        if self.trail_cells > MAX_TRAIL_CELLS {
            return Err(RevealError::validation(format!(
                "matrix.trail_cells must be <= {MAX_TRAIL_CELLS}"
            )));
        }
        if self.max_cells_per_column > MAX_CELLS_PER_COLUMN {
            return Err(RevealError::validation(format!(
                "matrix.max_cells_per_column must be <= {MAX_CELLS_PER_COLUMN}"
            )));
        }
        let (lo, hi) = (self.fall_speed_min_px_per_s, self.fall_speed_max_px_per_s);
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || hi < lo {
            return Err(RevealError::validation(
                "matrix fall speeds must be finite with 0 < min <= max",
            ));
        }
        if !self.column_delay_ms.is_finite() || self.column_delay_ms < 0.0 {
            return Err(RevealError::validation("matrix.column_delay_ms must be finite and >= 0"));
        }
        let (dmin, dmax) = (self.density_min, self.density_max);
        if !(0.0..=1.0).contains(&dmin) || !(0.0..=1.0).contains(&dmax) || dmin > dmax {
            return Err(RevealError::validation(
                "matrix density bounds must satisfy 0 <= min <= max <= 1",
            ));
        }
        if !self.spawn_rate_per_s.is_finite() || self.spawn_rate_per_s < 0.0 {
            return Err(RevealError::validation("matrix.spawn_rate_per_s must be finite and >= 0"));
        }
        if let Some(clip) = &self.clip_reveal {
            if !(0.0..=1.0).contains(&clip.alpha_max) {
                return Err(RevealError::validation(
                    "matrix.clip_reveal.alpha_max must be in [0, 1]",
                ));
            }
            if clip.max_fragment_px == 0 {
                return Err(RevealError::validation(
                    "matrix.clip_reveal.max_fragment_px must be > 0",
                ));
            }
            if !clip.polygon.is_empty() && clip.polygon.len() < 3 {
                return Err(RevealError::validation(
                    "matrix.clip_reveal.polygon needs at least 3 vertices",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/config.rs"]
mod tests;
