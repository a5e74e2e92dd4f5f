use serde::{Deserialize, Serialize};

use sheetnest::entities::RotationPolicy;
use sheetnest::error::{PackingError, Result};

/// Smallest step (physical units) the mask fill accepts
pub const MIN_MASK_STEP: f64 = 0.2;

/// Search effort of the nesting driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Coarse grid, only scanned when no structural candidate is valid
    Fast,
    /// Regular grid, only scanned when no structural candidate is valid
    #[default]
    Balanced,
    /// Fine grid, always evaluated together with the structural candidates
    Best,
}

impl Quality {
    /// Multiplier applied to the base grid step
    pub fn grid_multiplier(&self) -> f64 {
        match self {
            Quality::Fast => 2.0,
            Quality::Balanced => 1.0,
            Quality::Best => 0.5,
        }
    }
}

/// Configuration for the nesting driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestingConfig {
    pub rotation: RotationPolicy,
    /// Clearance kept around every part, in surface units
    pub spacing: f64,
    pub quality: Quality,
    /// Base step of the fallback grid. If undefined, it is derived from the spacing or the surface
    pub grid_step: Option<f64>,
}

impl Default for NestingConfig {
    fn default() -> Self {
        Self {
            rotation: RotationPolicy::None,
            spacing: 0.0,
            quality: Quality::Balanced,
            grid_step: None,
        }
    }
}

impl NestingConfig {
    pub fn validate(&self) -> Result<Self> {
        if !(self.spacing.is_finite() && self.spacing >= 0.0) {
            return Err(PackingError::InvalidOptions(format!(
                "spacing must be finite and non-negative, got {}",
                self.spacing
            )));
        }
        if let Some(step) = self.grid_step {
            if !(step.is_finite() && step > 0.0) {
                return Err(PackingError::InvalidOptions(format!(
                    "grid step must be finite and positive, got {step}"
                )));
            }
        }
        Ok(*self)
    }
}

/// Which way round the catalogue pairs widths and heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Landscape,
    Portrait,
    #[default]
    Both,
}

/// Configuration for the mask fill, all lengths in physical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskFillConfig {
    pub max_width: f64,
    pub max_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    /// Row advance and size catalogue decrement
    pub step: f64,
    /// Clearance between two suggested rectangles
    pub neighbor_gap: f64,
    /// Clearance between a suggested rectangle and an inherent obstacle
    pub obstacle_gap: f64,
    /// Minimum fraction of usable cells inside a suggestion
    pub coverage_threshold: f64,
    pub orientation: Orientation,
    /// Maximum number of suggestions per run
    pub max_items: usize,
    /// Rows between two progress reports
    pub progress_interval_rows: usize,
    /// Rows between two cooperative yields, 0 disables yielding
    pub yield_after_rows: usize,
    /// Only rows within this height contribute to the progress total. If undefined, the full mask height is used
    pub effective_height: Option<f64>,
    /// Number of recent edges remembered per axis
    pub edge_cache_size: usize,
}

impl Default for MaskFillConfig {
    fn default() -> Self {
        Self {
            max_width: 100.0,
            max_height: 100.0,
            min_width: 20.0,
            min_height: 20.0,
            step: 10.0,
            neighbor_gap: 5.0,
            obstacle_gap: 1.0,
            coverage_threshold: 0.95,
            orientation: Orientation::Both,
            max_items: 200,
            progress_interval_rows: 5,
            yield_after_rows: 20,
            effective_height: None,
            edge_cache_size: 50,
        }
    }
}

impl MaskFillConfig {
    /// Rejects contradicting options and returns a copy with the soft bounds clamped.
    pub fn validate(&self) -> Result<Self> {
        let lengths = [
            ("max_width", self.max_width),
            ("max_height", self.max_height),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
            ("step", self.step),
            ("neighbor_gap", self.neighbor_gap),
            ("obstacle_gap", self.obstacle_gap),
            ("coverage_threshold", self.coverage_threshold),
        ];
        if let Some((name, v)) = lengths.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PackingError::InvalidOptions(format!("{name} is not finite: {v}")));
        }
        if self.min_width <= 0.0 || self.min_height <= 0.0 {
            return Err(PackingError::InvalidOptions(format!(
                "minimum size must be positive, got {} x {}",
                self.min_width, self.min_height
            )));
        }
        if self.min_width > self.max_width || self.min_height > self.max_height {
            return Err(PackingError::InvalidOptions(format!(
                "minimum size {} x {} exceeds maximum size {} x {}",
                self.min_width, self.min_height, self.max_width, self.max_height
            )));
        }
        if let Some(h) = self.effective_height {
            if !(h.is_finite() && h > 0.0) {
                return Err(PackingError::InvalidOptions(format!(
                    "effective height must be finite and positive, got {h}"
                )));
            }
        }

        Ok(Self {
            step: self.step.max(MIN_MASK_STEP),
            neighbor_gap: self.neighbor_gap.max(0.0),
            obstacle_gap: self.obstacle_gap.max(0.0),
            coverage_threshold: self.coverage_threshold.clamp(0.0, 1.0),
            progress_interval_rows: self.progress_interval_rows.max(1),
            ..*self
        })
    }
}

/// Configuration file of the `blf` binary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BLFConfig {
    pub nesting: NestingConfig,
    pub mask_fill: MaskFillConfig,
}
