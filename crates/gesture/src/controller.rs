//! Event wiring: gesture and resize events in, committed view states out.

use foundation::math::{LonLat, Vec2};
use runtime::{Debouncer, DiagnosticBus, FrameHandle, FrameScheduler, ManualFrames};
use scene::{ProjectionViewState, ScaleMode, ViewConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fallback::{FallbackAction, PanFallback, PoleContext, PoleFallback, pan_to_pointer};
use crate::session::GestureSession;
use crate::solver::solve;

pub const POLE_FALLBACK: &str = "pole_fallback";
pub const NON_FINITE_ROTATION: &str = "non_finite_rotation";

/// Who produced an event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Pointer, touch or wheel input.
    #[default]
    User,
    /// Emitted by the host itself, e.g. when syncing its zoom transform.
    Programmatic,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    Start {
        pointer: [f64; 2],
        k: f64,
        #[serde(default)]
        source: EventSource,
    },
    Move {
        pointer: [f64; 2],
        k: f64,
        #[serde(default)]
        source: EventSource,
    },
    End,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct PendingMove {
    pointer: Vec2,
    k: f64,
    step: u64,
}

/// Owns the view state and applies gestures to it.
pub struct OrthoZoom<S: FrameScheduler = ManualFrames> {
    view: ProjectionViewState,
    epsilon: f64,
    scale_mode: ScaleMode,
    coalesce_moves: bool,
    session: Option<GestureSession>,
    frames: S,
    resize: Debouncer<[f64; 2]>,
    moves: Debouncer<PendingMove>,
    diagnostics: DiagnosticBus,
    fallback: Box<dyn PoleFallback>,
    step: u64,
}

impl OrthoZoom<ManualFrames> {
    pub fn new(config: &ViewConfig) -> Self {
        Self::with_scheduler(config, ManualFrames::new())
    }

    /// Release every requested frame and handle it.
    pub fn pump_frames(&mut self) {
        for handle in self.frames.advance() {
            self.on_frame(handle);
        }
    }
}

impl<S: FrameScheduler> OrthoZoom<S> {
    pub fn with_scheduler(config: &ViewConfig, frames: S) -> Self {
        Self {
            view: ProjectionViewState::from_config(config),
            epsilon: config.epsilon,
            scale_mode: config.scale_mode,
            coalesce_moves: config.coalesce_moves,
            session: None,
            frames,
            resize: Debouncer::new(),
            moves: Debouncer::new(),
            diagnostics: DiagnosticBus::new(),
            fallback: Box::new(PanFallback),
            step: 0,
        }
    }

    pub fn set_pole_fallback(&mut self, fallback: impl PoleFallback + 'static) {
        self.fallback = Box::new(fallback);
    }

    pub fn state(&self) -> &ProjectionViewState {
        &self.view
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn diagnostics(&self) -> &DiagnosticBus {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticBus {
        &mut self.diagnostics
    }

    pub fn frames(&self) -> &S {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut S {
        &mut self.frames
    }

    /// Number of events handled so far.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn handle(&mut self, event: GestureEvent) {
        self.step += 1;
        match event {
            GestureEvent::Start { pointer, k, source } => {
                if source == EventSource::User {
                    self.start(Vec2::from(pointer), k);
                }
            }
            GestureEvent::Move { pointer, k, source } => {
                if source != EventSource::User || self.session.is_none() {
                    return;
                }
                let pending = PendingMove {
                    pointer: Vec2::from(pointer),
                    k,
                    step: self.step,
                };
                if self.coalesce_moves {
                    self.moves.trigger(&mut self.frames, pending);
                } else {
                    self.apply_move(pending);
                }
            }
            GestureEvent::End => {
                if let Some(pending) = self.moves.cancel(&mut self.frames) {
                    self.apply_move(pending);
                }
                self.session = None;
            }
        }
    }

    /// Schedule a viewport change; only the latest size per frame is applied.
    pub fn on_resize(&mut self, extent: [f64; 2]) {
        self.step += 1;
        let handle = self.resize.trigger(&mut self.frames, extent);
        debug!(handle = handle.0, ?extent, "resize scheduled");
    }

    /// Run work attached to a fired frame.
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if let Some(extent) = self.resize.fire(handle) {
            debug!(?extent, "resize applied");
            self.view.extent = extent;
        }
        if let Some(pending) = self.moves.fire(handle) {
            self.apply_move(pending);
        }
    }

    /// Sphere point under `pointer`, for dragging markers along the surface.
    pub fn drag_point(&self, pointer: [f64; 2]) -> Option<LonLat> {
        self.view.projection().invert(pointer)
    }

    fn start(&mut self, pointer: Vec2, k: f64) {
        // A move still waiting for its frame belongs to the previous gesture.
        self.moves.cancel(&mut self.frames);
        if let Some(session) =
            GestureSession::start(&mut self.view, pointer, k, self.epsilon, self.scale_mode)
        {
            self.session = Some(session);
        }
    }

    fn apply_move(&mut self, pending: PendingMove) {
        let Some(session) = self.session else {
            return;
        };
        let PendingMove { pointer, k, step } = pending;
        let scale = session.target_scale(k);

        if session.pole_bound {
            let ctx = PoleContext {
                anchor: session.anchor,
                reach: session.reach,
                pointer,
                scale,
            };
            let action = self.fallback.on_pole(&ctx);
            self.diagnostics.warn(
                step,
                POLE_FALLBACK,
                format!(
                    "anchor ({}, {}) within epsilon of a pole; {action:?}",
                    session.anchor.lon, session.anchor.lat
                ),
            );
            if action == FallbackAction::Pan {
                let next = pan_to_pointer(&self.view, &session, pointer, scale);
                if next.is_finite() {
                    self.view = next;
                } else {
                    self.diagnostics.error(
                        step,
                        NON_FINITE_ROTATION,
                        format!("non-finite pan for pointer {:?}", pointer.to_array()),
                    );
                }
            }
            return;
        }

        match solve(&self.view, &session, pointer, scale) {
            Ok(next) => self.view = next,
            Err(err) => self.diagnostics.error(step, NON_FINITE_ROTATION, err.to_string()),
        }
    }
}
