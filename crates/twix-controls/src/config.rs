//! Spring control configuration, loadable from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::debounce::{DEFAULT_DELAY_MS, DebounceConfig};
use crate::drag::{DragScale, FRICTION_PER_PX, TENSION_PER_PX};
use crate::error::{ControlError, ControlResult};
use crate::preview::{PREVIEW_TIME_SCALE, STROKE_COLOR_NAME};

/// Tunables for one spring control.
///
/// Every field has a default, so a partial YAML document is valid:
///
/// ```
/// use twix_controls::ControlConfig;
///
/// let cfg = ControlConfig::from_yaml_str("commit_delay_ms: 100\n").unwrap();
/// assert_eq!(cfg.commit_delay_ms, 100.0);
/// assert_eq!(cfg.resize_delay_ms, 250.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Quiet interval before an edit is committed (ms).
    pub commit_delay_ms: f64,
    /// Quiet interval before a resize redraws the preview (ms).
    pub resize_delay_ms: f64,
    /// Milliseconds of spring time per preview pixel.
    pub preview_time_scale: f64,
    pub tension_per_px: f64,
    pub friction_per_px: f64,
    /// Theme color name for the preview stroke.
    pub stroke_color: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: DEFAULT_DELAY_MS,
            resize_delay_ms: DEFAULT_DELAY_MS,
            preview_time_scale: PREVIEW_TIME_SCALE,
            tension_per_px: TENSION_PER_PX,
            friction_per_px: FRICTION_PER_PX,
            stroke_color: STROKE_COLOR_NAME.to_string(),
        }
    }
}

impl ControlConfig {
    pub fn from_yaml_str(text: &str) -> ControlResult<Self> {
        let cfg: Self = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> ControlResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> ControlResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> ControlResult<()> {
        self.commit_debounce()?;
        self.resize_debounce()?;
        for (name, v) in [
            ("preview_time_scale", self.preview_time_scale),
            ("tension_per_px", self.tension_per_px),
            ("friction_per_px", self.friction_per_px),
        ] {
            if !v.is_finite() || v == 0.0 {
                return Err(ControlError::InvalidConfig {
                    what: format!("{name} must be finite and non-zero, got {v}"),
                });
            }
        }
        Ok(())
    }

    pub fn commit_debounce(&self) -> ControlResult<DebounceConfig> {
        DebounceConfig::new(self.commit_delay_ms).map_err(|_| ControlError::InvalidConfig {
            what: format!("commit_delay_ms must be positive, got {}", self.commit_delay_ms),
        })
    }

    pub fn resize_debounce(&self) -> ControlResult<DebounceConfig> {
        DebounceConfig::new(self.resize_delay_ms).map_err(|_| ControlError::InvalidConfig {
            what: format!("resize_delay_ms must be positive, got {}", self.resize_delay_ms),
        })
    }

    pub fn drag_scale(&self) -> DragScale {
        DragScale {
            tension_per_px: self.tension_per_px,
            friction_per_px: self.friction_per_px,
        }
    }
}
