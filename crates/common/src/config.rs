//! Session configuration.
//!
//! All values are fixed at session start. Every constructor that accepts
//! external input validates before returning, and an out-of-range value
//! is a [`SketchError::Config`] rather than a silent clamp.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SketchError, SketchResult};

/// Smallest accepted brush width in pixels.
pub const MIN_BRUSH_WIDTH: u32 = 1;
/// Largest accepted brush width in pixels.
pub const MAX_BRUSH_WIDTH: u32 = 20;

/// Largest eraser radius, as a multiple of the brush width.
pub const MAX_ERASER_SCALE: u32 = 10;

/// Complete configuration for one sketching session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fingertip smoothing filter tuning.
    pub filter: FilterConfig,

    /// Ink settings.
    pub brush: BrushConfig,

    /// Undo/redo behavior.
    pub history: HistoryConfig,

    /// Gesture classification thresholds.
    pub gestures: GestureThresholds,

    /// Canvas raster dimensions.
    pub canvas: CanvasConfig,

    /// Advance the active color when a hand starts pinching.
    pub pinch_cycles_color: bool,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Adaptive (1-euro style) smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Smooth the fingertip at all. When off the pen follows the raw tip.
    pub enabled: bool,

    /// Cutoff frequency (Hz) at zero velocity. Lower is smoother at rest.
    pub min_cutoff: f64,

    /// Cutoff growth per unit of speed. Higher means less lag when moving fast.
    pub beta: f64,

    /// Cutoff frequency (Hz) used to low-pass the velocity estimate.
    pub d_cutoff: f64,

    /// Lower bound applied to the sample interval, in seconds.
    pub min_dt_secs: f64,
}

/// Brush (ink) settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Stroke width in pixels, `1..=20`.
    pub width: u32,

    /// Initial ink color as RGB.
    pub color: [u8; 3],

    /// Ink opacity in `[0.0, 1.0]`; below 1.0 the ink is blended toward white.
    pub opacity: f64,

    /// Eraser radius as a multiple of the brush width.
    pub eraser_scale: u32,
}

/// How many snapshots a continuous stroke contributes to the undo stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryGranularity {
    /// Every mutating command pushes one snapshot.
    #[default]
    PerCommand,
    /// Only the first command of a continuous Draw or Erase run pushes.
    PerStroke,
}

/// Undo/redo settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept on each stack.
    pub undo_depth: usize,

    /// Snapshot granularity for continuous strokes.
    pub granularity: HistoryGranularity,
}

/// Thresholds used by finger-state classification and gesture debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Number of identical consecutive raw labels required to switch.
    pub debounce_window: usize,

    /// Thumb-tip to index-tip distance (normalized image units) below which
    /// the hand is pinching.
    pub pinch_distance: f64,

    /// How far (normalized) a fingertip must be above its PIP joint to
    /// count as extended.
    pub extension_margin: f64,

    /// How far (normalized) the thumb tip must be lateral of its IP joint
    /// to count as extended.
    pub thumb_margin: f64,
}

/// Canvas raster settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Background color; background pixels are transparent when compositing.
    pub background: [u8; 3],
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "airsketch=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            brush: BrushConfig::default(),
            history: HistoryConfig::default(),
            gestures: GestureThresholds::default(),
            canvas: CanvasConfig::default(),
            pinch_cycles_color: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_cutoff: 1.0,
            beta: 0.007,
            d_cutoff: 1.0,
            min_dt_secs: 0.001,
        }
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            width: 5,
            color: [255, 0, 0],
            opacity: 1.0,
            eraser_scale: 3,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            undo_depth: 20,
            granularity: HistoryGranularity::PerCommand,
        }
    }
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            debounce_window: 5,
            pinch_distance: 0.06,
            extension_margin: 0.0,
            thumb_margin: 0.0,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            background: [0, 0, 0],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> SketchResult<()> {
        require_positive("filter.min_cutoff", self.min_cutoff)?;
        require_non_negative("filter.beta", self.beta)?;
        require_positive("filter.d_cutoff", self.d_cutoff)?;
        require_positive("filter.min_dt_secs", self.min_dt_secs)
    }
}

impl BrushConfig {
    pub fn validate(&self) -> SketchResult<()> {
        validate_brush_width(self.width)?;
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(SketchError::config(format!(
                "brush.opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        if !(1..=MAX_ERASER_SCALE).contains(&self.eraser_scale) {
            return Err(SketchError::config(format!(
                "brush.eraser_scale must be within [1, {MAX_ERASER_SCALE}], got {}",
                self.eraser_scale
            )));
        }
        Ok(())
    }

    /// Eraser radius derived from the brush width.
    pub fn eraser_radius(&self) -> u32 {
        self.width.saturating_mul(self.eraser_scale)
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> SketchResult<()> {
        if self.undo_depth == 0 {
            return Err(SketchError::config("history.undo_depth must be >= 1"));
        }
        Ok(())
    }
}

impl GestureThresholds {
    pub fn validate(&self) -> SketchResult<()> {
        if self.debounce_window == 0 {
            return Err(SketchError::config(
                "gestures.debounce_window must be >= 1",
            ));
        }
        require_positive("gestures.pinch_distance", self.pinch_distance)?;
        require_non_negative("gestures.extension_margin", self.extension_margin)?;
        require_non_negative("gestures.thumb_margin", self.thumb_margin)
    }
}

impl CanvasConfig {
    pub fn validate(&self) -> SketchResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SketchError::config(format!(
                "canvas dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl SessionConfig {
    /// Check every value against its documented range.
    pub fn validate(&self) -> SketchResult<()> {
        self.filter.validate()?;
        self.brush.validate()?;
        self.history.validate()?;
        self.gestures.validate()?;
        self.canvas.validate()
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(content: &str) -> SketchResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load_from(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded session config");
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> SketchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Validate a brush width outside of a full config (runtime control surface).
pub fn validate_brush_width(width: u32) -> SketchResult<()> {
    if !(MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH).contains(&width) {
        return Err(SketchError::config(format!(
            "brush.width must be within [{MIN_BRUSH_WIDTH}, {MAX_BRUSH_WIDTH}], got {width}"
        )));
    }
    Ok(())
}

// NaN fails both comparisons below.
fn require_positive(field: &str, value: f64) -> SketchResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SketchError::config(format!(
            "{field} must be > 0, got {value}"
        )))
    }
}

fn require_non_negative(field: &str, value: f64) -> SketchResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SketchError::config(format!(
            "{field} must be >= 0, got {value}"
        )))
    }
}
