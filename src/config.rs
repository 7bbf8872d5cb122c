//! Tracker configuration and per-call parameters.
//!
//! `TrackerConfig::default()` matches the reference deployment: a 1280x720
//! HUD with the mini-map centered at (108, 111) and the player pointer drawn
//! on top of it.

use crate::geom::Rect;
use crate::image::Rgba;
#[cfg(feature = "serde")]
use crate::trace::trace_warn;
use crate::util::{MapTrackError, MapTrackResult};
use std::collections::BTreeMap;

/// Default location precision (resampling scale).
pub const DEFAULT_PRECISION: f64 = 0.4;
/// Default confidence threshold for a hit.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Square screen region `(2 * radius + 1)` pixels wide around a center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CropAnchor {
    pub center_x: usize,
    pub center_y: usize,
    pub radius: usize,
}

impl Default for CropAnchor {
    fn default() -> Self {
        Self {
            center_x: 108,
            center_y: 111,
            radius: 40,
        }
    }
}

/// Rotation step as a function of precision.
///
/// Precision below `coarse_below` uses `coarse_step_deg`, below
/// `medium_below` uses `medium_step_deg`, anything else `fine_step_deg`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AngleSteps {
    pub coarse_below: f64,
    pub coarse_step_deg: u32,
    pub medium_below: f64,
    pub medium_step_deg: u32,
    pub fine_step_deg: u32,
}

impl Default for AngleSteps {
    fn default() -> Self {
        Self {
            coarse_below: 0.3,
            coarse_step_deg: 12,
            medium_below: 0.6,
            medium_step_deg: 6,
            fine_step_deg: 3,
        }
    }
}

impl AngleSteps {
    /// Angular step in degrees for `precision`.
    pub fn step_for(&self, precision: f64) -> u32 {
        if precision < self.coarse_below {
            self.coarse_step_deg
        } else if precision < self.medium_below {
            self.medium_step_deg
        } else {
            self.fine_step_deg
        }
    }

    fn validate(&self) -> MapTrackResult<()> {
        let steps = [self.coarse_step_deg, self.medium_step_deg, self.fine_step_deg];
        if steps.iter().any(|&s| s == 0 || s > 360) {
            return Err(MapTrackError::InvalidConfig {
                reason: format!("rotation steps must be in 1..=360, got {steps:?}"),
            });
        }
        if self.coarse_below > self.medium_below {
            return Err(MapTrackError::InvalidConfig {
                reason: format!(
                    "coarse_below ({}) must not exceed medium_below ({})",
                    self.coarse_below, self.medium_below
                ),
            });
        }
        Ok(())
    }
}

/// Engine-wide configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TrackerConfig {
    /// Mini-map crop on the screen.
    pub minimap: CropAnchor,
    /// Pointer crop on the screen.
    pub pointer: CropAnchor,
    /// Rotation step schedule.
    pub angle_steps: AngleSteps,
    /// Colour for corners exposed by rotating the pointer patch.
    pub rotation_fill: Rgba,
    /// Run location and rotation concurrently and scan rows in parallel
    /// (`rayon` feature only).
    pub parallel: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            minimap: CropAnchor::default(),
            pointer: CropAnchor {
                radius: 12,
                ..CropAnchor::default()
            },
            angle_steps: AngleSteps::default(),
            rotation_fill: [0, 0, 0, 255],
            parallel: true,
        }
    }
}

impl TrackerConfig {
    /// Checks the configuration for values the engine cannot work with.
    pub fn validate(&self) -> MapTrackResult<()> {
        if self.minimap.radius == 0 || self.pointer.radius == 0 {
            return Err(MapTrackError::InvalidConfig {
                reason: "crop radius must be at least 1".to_string(),
            });
        }
        self.angle_steps.validate()
    }
}

/// Parameters of a single inference call.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InferParams {
    /// Location resampling scale in `(0, 1]`.
    pub precision: f64,
    /// Hit threshold in `[0, 1)` applied to both confidences.
    pub threshold: f64,
}

impl Default for InferParams {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

fn precision_in_range(precision: f64) -> bool {
    precision > 0.0 && precision <= 1.0
}

fn threshold_in_range(threshold: f64) -> bool {
    (0.0..1.0).contains(&threshold)
}

/// Fails unless `precision` lies in `(0, 1]`.
pub fn check_precision(precision: f64) -> MapTrackResult<()> {
    if precision_in_range(precision) {
        Ok(())
    } else {
        Err(MapTrackError::InvalidConfig {
            reason: format!("precision must be in (0, 1], got {precision}"),
        })
    }
}

impl InferParams {
    /// Creates validated parameters.
    pub fn new(precision: f64, threshold: f64) -> MapTrackResult<Self> {
        check_precision(precision)?;
        if !threshold_in_range(threshold) {
            return Err(MapTrackError::InvalidConfig {
                reason: format!("threshold must be in [0, 1), got {threshold}"),
            });
        }
        Ok(Self {
            precision,
            threshold,
        })
    }

    /// Parses the host's JSON parameter string.
    ///
    /// Never fails. Empty input,
    /// malformed JSON, anything but an object and missing fields all fall back
    /// to the defaults. A field that is not a number or lies outside its range
    /// falls back to its own default. Everything except a missing field is
    /// reported as a warning. JSON integers are read as floats.
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Self {
        let mut params = Self::default();
        if text.trim().is_empty() {
            return params;
        }
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                trace_warn!("params_malformed", reason = err.to_string().as_str());
                return params;
            }
        };
        let Some(fields) = value.as_object() else {
            trace_warn!("params_not_object", kind = value_kind(&value));
            return params;
        };

        match fields.get("precision").map(serde_json::Value::as_f64) {
            Some(Some(p)) if precision_in_range(p) => params.precision = p,
            Some(raw) => {
                trace_warn!(
                    "precision_ignored",
                    value = raw.unwrap_or(f64::NAN),
                    fallback = DEFAULT_PRECISION
                );
            }
            None => {}
        }
        match fields.get("threshold").map(serde_json::Value::as_f64) {
            Some(Some(t)) if threshold_in_range(t) => params.threshold = t,
            Some(raw) => {
                trace_warn!(
                    "threshold_ignored",
                    value = raw.unwrap_or(f64::NAN),
                    fallback = DEFAULT_THRESHOLD
                );
            }
            None => {}
        }
        params
    }
}

#[cfg(feature = "serde")]
fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Hand-tuned playable bounds of the reference deployment's maps, in native
/// map pixels.
pub fn default_valid_regions() -> BTreeMap<String, Rect> {
    [
        ("map01_lv001", Rect::new(135, 195, 840, 685)),
        ("map01_lv002", Rect::new(85, 80, 360, 400)),
        ("map01_lv003", Rect::new(60, 90, 365, 405)),
        ("map01_lv005", Rect::new(60, 95, 585, 470)),
        ("map01_lv006", Rect::new(115, 100, 590, 690)),
        ("map01_lv007", Rect::new(170, 105, 605, 620)),
        ("map02_lv001", Rect::new(90, 30, 605, 620)),
        ("map02_lv002", Rect::new(90, 110, 790, 1010)),
    ]
    .into_iter()
    .map(|(name, rect)| (name.to_string(), rect))
    .collect()
}
