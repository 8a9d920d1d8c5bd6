//! Tunable constants for the editor.
//!
//! Every field has a default, so a config file only needs to name the values
//! it overrides.

use crate::error::{SketchError, SketchResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub viewport: ViewportConfig,
    pub handles: HandleConfig,
    pub history: HistoryConfig,
    pub freehand: FreehandConfig,
    pub eraser: EraserConfig,
    pub laser: TrailConfig,
}

/// Zoom limits and steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplicative step for the zoom in / zoom out buttons.
    pub button_step: f64,
    /// Additive zoom change per wheel notch.
    pub wheel_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 10.0,
            button_step: 1.1,
            wheel_step: 0.1,
        }
    }
}

/// Selection handle geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    /// Handle hit radius in screen pixels (divided by zoom before use).
    pub hit_tolerance: f64,
    /// Distance from the top edge to the rotate handle, in canvas units.
    pub rotate_offset: f64,
    /// Smallest width or height a resize can produce.
    pub min_shape_size: f64,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: 8.0,
            rotate_offset: crate::handles::ROTATE_HANDLE_OFFSET,
            min_shape_size: crate::handles::MIN_SHAPE_SIZE,
        }
    }
}

/// Undo history limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

/// Freehand stroke capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreehandConfig {
    /// Points closer than this to the previous one are dropped.
    pub min_point_distance: f64,
    /// Ramer-Douglas-Peucker tolerance applied on commit (0 disables).
    pub simplify_tolerance: f64,
}

impl Default for FreehandConfig {
    fn default() -> Self {
        Self {
            min_point_distance: 1.0,
            simplify_tolerance: 0.5,
        }
    }
}

/// Trail length and fade behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub max_points: usize,
    pub min_distance: f64,
    pub fade_millis: u64,
}

impl TrailConfig {
    /// Defaults for the laser pointer.
    pub fn laser() -> Self {
        Self {
            max_points: 30,
            min_distance: 1.5,
            fade_millis: 600,
        }
    }

    /// Defaults for the eraser.
    pub fn eraser() -> Self {
        Self {
            max_points: 10,
            min_distance: 2.0,
            fade_millis: 150,
        }
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_millis)
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self::laser()
    }
}

/// Eraser tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraserConfig {
    /// Hit radius around each trail point, in canvas units.
    pub radius: f64,
    pub trail: TrailConfig,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            trail: TrailConfig::eraser(),
        }
    }
}

impl SketchConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> SketchResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check that the values describe a usable editor.
    pub fn validate(&self) -> SketchResult<()> {
        let vp = &self.viewport;
        if vp.min_zoom.is_nan() || vp.min_zoom <= 0.0 || !vp.max_zoom.is_finite() {
            return Err(SketchError::InvalidConfig(format!(
                "zoom limits must be positive and finite, got [{}, {}]",
                vp.min_zoom, vp.max_zoom
            )));
        }
        if vp.min_zoom > vp.max_zoom {
            return Err(SketchError::InvalidConfig(format!(
                "min_zoom {} exceeds max_zoom {}",
                vp.min_zoom, vp.max_zoom
            )));
        }
        if vp.button_step.is_nan() || vp.button_step <= 1.0 {
            return Err(SketchError::InvalidConfig(format!(
                "button_step must be greater than 1, got {}",
                vp.button_step
            )));
        }
        let min_size = self.handles.min_shape_size;
        if min_size.is_nan() || min_size <= 0.0 {
            return Err(SketchError::InvalidConfig(format!(
                "min_shape_size must be positive, got {min_size}"
            )));
        }
        if self.history.capacity == 0 {
            return Err(SketchError::InvalidConfig(
                "history capacity must be at least 1".to_string(),
            ));
        }
        for (name, trail) in [("eraser", &self.eraser.trail), ("laser", &self.laser)] {
            if trail.max_points < 2 {
                return Err(SketchError::InvalidConfig(format!(
                    "{name} trail needs at least 2 points, got {}",
                    trail.max_points
                )));
            }
        }
        Ok(())
    }
}
