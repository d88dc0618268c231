use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// How the externally requested zoom factor `k` maps onto the view scale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// `scale = k`; the host keeps its zoom transform in sync with the view.
    #[default]
    Direct,
    /// `scale = k * (scale / k)` with the ratio captured at gesture start.
    Relative,
}

/// Initial view and interaction settings.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub rotation: [f64; 3],
    /// Sphere radius relative to half the smaller extent dimension.
    pub scale: f64,
    /// Center offset in units of the sphere radius.
    pub translate: [f64; 2],
    /// Viewport size in pixels.
    pub extent: [f64; 2],
    /// Guards divisions by the reach factor and marks the pole fallback
    /// threshold.
    pub epsilon: f64,
    pub scale_mode: ScaleMode,
    /// Apply only the latest move per animation frame.
    pub coalesce_moves: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            rotation: [0.0, 0.0, 0.0],
            scale: 0.96,
            translate: [0.0, 0.0],
            extent: [960.0, 500.0],
            epsilon: 1e-4,
            scale_mode: ScaleMode::Direct,
            coalesce_moves: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "I/O error: {err}"),
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ViewConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let payload = fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&payload)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if self.extent.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "extent must be positive, got {:?}",
                self.extent
            )));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "epsilon must lie in (0, 1), got {}",
                self.epsilon
            )));
        }
        if self
            .rotation
            .iter()
            .chain(self.translate.iter())
            .any(|v| !v.is_finite())
        {
            return Err(ConfigError::Invalid(
                "rotation and translate must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
