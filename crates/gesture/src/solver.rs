//! Per-move rotation solve.
//!
//! With the grabbed point's nearer pole conceptually centered, the parallel
//! through the anchor spans `[-reach, reach]` horizontally. The solve picks
//! the spin that puts the anchor's meridian on the pointer's vertical line,
//! then the tilt that lifts it to the pointer's height. When the pointer lies
//! outside the disc or beyond the reach, the sphere is scaled up just enough
//! (`forced_scale`) for the solution to exist.

use std::fmt;

use foundation::math::{Vec2, cosd, safe_asind, sign, wrap_deg};
use scene::ProjectionViewState;

use crate::session::GestureSession;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SolveError {
    /// The solve produced NaN or infinity; nothing may be committed.
    NonFinite {
        pointer: [f64; 2],
        scale: f64,
        rotation: [f64; 3],
        forced_scale: f64,
    },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::NonFinite {
                pointer,
                scale,
                rotation,
                forced_scale,
            } => write!(
                f,
                "non-finite solve for pointer {pointer:?} at scale {scale}: \
                 rotation {rotation:?}, forced scale {forced_scale}"
            ),
        }
    }
}

impl std::error::Error for SolveError {}

/// Solve the view for one move.
///
/// Returns the candidate state with `scale`, `rotation[0..2]` and
/// `forced_scale` replaced; roll and extent are carried over. `translate` is
/// rescaled so the sphere center stays on the pixel the pointer was measured
/// from. The input view is never modified.
pub fn solve(
    view: &ProjectionViewState,
    session: &GestureSession,
    pointer: Vec2,
    scale: f64,
) -> Result<ProjectionViewState, SolveError> {
    let mut next = ProjectionViewState { scale, ..*view };

    let unit = (pointer - next.center())
        .rotate(next.rotation[2])
        .scale(1.0 / next.radius());
    let (x, y) = (unit.x, unit.y);

    let reach = session.reach;
    let forced = x.hypot(y).max(x.abs() / reach).max(1.0);
    let (x, y) = (x / forced, y / forced);

    let (lon, lat) = (session.anchor.lon, session.anchor.lat);
    let spin = safe_asind(x / reach) - lon;
    let reach_y = (1.0 - x * x).max(0.0).sqrt().max(f64::EPSILON);
    let lat_ = -90.0 + safe_asind(cosd(lat) * cosd(lon + spin) / reach_y);
    let tilt = -safe_asind(y / reach_y) + lat_ * sign(lat);

    next.rotation[0] = wrap_deg(spin);
    next.rotation[1] = tilt;
    // translate is in units of the rendered radius
    let keep = view.forced_scale / forced;
    next.translate = [view.translate[0] * keep, view.translate[1] * keep];
    next.forced_scale = forced;

    if !next.is_finite() {
        return Err(SolveError::NonFinite {
            pointer: pointer.to_array(),
            scale,
            rotation: [spin, tilt, view.rotation[2]],
            forced_scale: forced,
        });
    }
    Ok(next)
}
