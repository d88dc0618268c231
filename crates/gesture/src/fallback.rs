use foundation::math::{LonLat, Vec2};
use scene::ProjectionViewState;

use crate::session::GestureSession;

/// What to do with a move whose anchor sits on a pole.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FallbackAction {
    /// Translate the globe so the anchor lands under the pointer.
    #[default]
    Pan,
    /// Leave the view as it is.
    Skip,
}

/// Inputs handed to a [`PoleFallback`] hook.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PoleContext {
    pub anchor: LonLat,
    pub reach: f64,
    pub pointer: Vec2,
    pub scale: f64,
}

/// Decides how pole-bound moves are handled.
pub trait PoleFallback {
    fn on_pole(&mut self, ctx: &PoleContext) -> FallbackAction;
}

/// Always pans.
#[derive(Debug, Copy, Clone, Default)]
pub struct PanFallback;

impl PoleFallback for PanFallback {
    fn on_pole(&mut self, _ctx: &PoleContext) -> FallbackAction {
        FallbackAction::Pan
    }
}

impl<F> PoleFallback for F
where
    F: FnMut(&PoleContext) -> FallbackAction,
{
    fn on_pole(&mut self, ctx: &PoleContext) -> FallbackAction {
        self(ctx)
    }
}

/// Candidate view for a pan: scale set, forced scale dropped, rotation kept,
/// translate moved so the anchor projects onto `pointer`.
pub fn pan_to_pointer(
    view: &ProjectionViewState,
    session: &GestureSession,
    pointer: Vec2,
    scale: f64,
) -> ProjectionViewState {
    let mut next = ProjectionViewState {
        scale,
        forced_scale: 1.0,
        ..*view
    };
    let anchor_px = Vec2::from(next.projection().project_unclipped(session.anchor));
    let shift = (pointer - anchor_px).scale(1.0 / next.effective_radius());
    next.translate = [next.translate[0] + shift.x, next.translate[1] + shift.y];
    next
}
