use foundation::math::{Orthographic, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;

/// Single source of truth for the projection parameters.
///
/// Gesture handlers mutate this in place; renderers read it after every
/// committed step. Radius and center are derived on every read because scale,
/// translate and forced scale all change from frame to frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionViewState {
    /// `[spin, tilt, roll]` in degrees.
    pub rotation: [f64; 3],
    /// Sphere radius relative to half the smaller extent dimension.
    pub scale: f64,
    /// Center offset in units of the (forced) sphere radius.
    pub translate: [f64; 2],
    /// Viewport size in pixels.
    pub extent: [f64; 2],
    /// Transient multiplier (>= 1) that keeps the grabbed point reachable.
    pub forced_scale: f64,
}

impl Default for ProjectionViewState {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

impl ProjectionViewState {
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            rotation: config.rotation,
            scale: config.scale,
            translate: config.translate,
            extent: config.extent,
            forced_scale: 1.0,
        }
    }

    /// Sphere radius in pixels, before forced scaling.
    pub fn radius(&self) -> f64 {
        self.extent[0].min(self.extent[1]) / 2.0 * self.scale
    }

    /// Sphere radius in pixels as rendered.
    pub fn effective_radius(&self) -> f64 {
        self.radius() * self.forced_scale
    }

    /// Pixel position of the sphere center.
    pub fn center(&self) -> Vec2 {
        let r = self.effective_radius();
        Vec2::new(
            self.extent[0] / 2.0 + self.translate[0] * r,
            self.extent[1] / 2.0 + self.translate[1] * r,
        )
    }

    /// Projection matching the current state, clipped to the viewport.
    pub fn projection(&self) -> Orthographic {
        Orthographic::new(self.rotation, self.effective_radius(), self.center().to_array())
            .with_clip_extent([[0.0, 0.0], self.extent])
    }

    /// Fold the forced scale into the committed scale.
    pub fn commit_forced_scale(&mut self) {
        self.scale *= self.forced_scale;
        self.forced_scale = 1.0;
    }

    pub fn is_finite(&self) -> bool {
        self.rotation
            .iter()
            .chain(self.translate.iter())
            .chain(self.extent.iter())
            .chain([self.scale, self.forced_scale].iter())
            .all(|v| v.is_finite())
    }
}
