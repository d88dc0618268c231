use foundation::math::{LonLat, Vec2, angle_diff, cosd, wrap_deg};
use scene::{ProjectionViewState, ScaleMode};
use tracing::debug;

/// State captured when a gesture starts and kept until it ends.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GestureSession {
    /// Sphere point grabbed at start.
    pub anchor: LonLat,
    /// `max(cos(anchor.lat), epsilon)`; half-width of the parallel through the
    /// anchor, as seen with its nearer pole centered.
    pub reach: f64,
    /// The anchor sits so close to a pole that rotation cannot follow the
    /// pointer; moves pan instead.
    pub pole_bound: bool,
    /// `scale / k` at start, present in [`ScaleMode::Relative`].
    pub base_scale_ratio: Option<f64>,
}

impl GestureSession {
    /// Grab the sphere point under `pointer`.
    ///
    /// Returns `None` (leaving `view` untouched) when the pointer misses the
    /// sphere. Otherwise applies the antipodal flip if needed and folds the
    /// forced scale into the committed scale.
    pub fn start(
        view: &mut ProjectionViewState,
        pointer: Vec2,
        k: f64,
        epsilon: f64,
        mode: ScaleMode,
    ) -> Option<Self> {
        let anchor = view.projection().invert(pointer.to_array())?;
        if !anchor.is_finite() {
            return None;
        }

        let cos_lat = cosd(anchor.lat);
        let flipped = antipodal_flip(view, anchor.lon);
        view.commit_forced_scale();

        let base_scale_ratio = match mode {
            ScaleMode::Direct => None,
            ScaleMode::Relative if k.is_finite() && k > 0.0 => Some(view.scale / k),
            ScaleMode::Relative => Some(1.0),
        };

        debug!(
            lon = anchor.lon,
            lat = anchor.lat,
            flipped,
            scale = view.scale,
            "gesture session started"
        );

        Some(Self {
            anchor,
            reach: cos_lat.max(epsilon),
            pole_bound: cos_lat < epsilon,
            base_scale_ratio,
        })
    }

    /// View scale requested by a move carrying `k`.
    pub fn target_scale(&self, k: f64) -> f64 {
        match self.base_scale_ratio {
            Some(ratio) => ratio * k,
            None => k,
        }
    }
}

/// Turn the globe upside down when the grabbed longitude lies on the far side
/// of the central meridian.
///
/// Spin and roll both move by 180 degrees and the tilt is mirrored to
/// `180 - tilt`, which leaves every visible point where it was. Returns
/// whether the flip happened.
pub fn antipodal_flip(view: &mut ProjectionViewState, anchor_lon: f64) -> bool {
    if angle_diff(anchor_lon, -view.rotation[0]).abs() <= 90.0 {
        return false;
    }
    let [spin, tilt, roll] = view.rotation;
    view.rotation = [
        wrap_deg(spin - 180.0),
        wrap_deg(180.0 - tilt),
        wrap_deg(roll + 180.0),
    ];
    true
}
