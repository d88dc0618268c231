//! Replay a recorded gesture script against a fresh controller.
//!
//! A script is a JSON array of events. Gesture events use the controller's
//! own encoding (`start`, `move`, `end`); the host events `resize` and
//! `frame` stand in for the viewport observer and the animation-frame tick.

use std::fs;
use std::path::Path;

use gesture::{GestureEvent, OrthoZoom};
use runtime::{Diagnostic, Severity};
use scene::{ProjectionViewState, ViewConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ScriptError;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    Resize { extent: [f64; 2] },
    Frame,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptEvent {
    Gesture(GestureEvent),
    Host(HostEvent),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub view: ProjectionViewState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    pub step: u64,
    pub kind: &'static str,
    pub severity: &'static str,
    pub message: String,
}

impl From<Diagnostic> for DiagnosticRecord {
    fn from(d: Diagnostic) -> Self {
        Self {
            step: d.step,
            kind: d.kind,
            severity: match d.severity {
                Severity::Warning => "warning",
                Severity::Error => "error",
            },
            message: d.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// View state after each script event, in order.
    pub states: Vec<StepRecord>,
    pub diagnostics: Vec<DiagnosticRecord>,
}

impl ReplayReport {
    pub fn final_view(&self) -> Option<&ProjectionViewState> {
        self.states.last().map(|s| &s.view)
    }
}

pub fn parse_script(payload: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    Ok(serde_json::from_str(payload)?)
}

pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<ScriptEvent>, ScriptError> {
    parse_script(&fs::read_to_string(path.as_ref())?)
}

pub fn replay(config: &ViewConfig, events: &[ScriptEvent]) -> ReplayReport {
    let mut zoom = OrthoZoom::new(config);
    let mut states = Vec::with_capacity(events.len());

    for (i, event) in events.iter().enumerate() {
        match *event {
            ScriptEvent::Gesture(gesture) => zoom.handle(gesture),
            ScriptEvent::Host(HostEvent::Resize { extent }) => zoom.on_resize(extent),
            ScriptEvent::Host(HostEvent::Frame) => zoom.pump_frames(),
        }
        states.push(StepRecord {
            step: i,
            view: *zoom.state(),
        });
    }

    let diagnostics: Vec<DiagnosticRecord> = zoom
        .diagnostics_mut()
        .drain()
        .into_iter()
        .map(DiagnosticRecord::from)
        .collect();
    info!(
        events = events.len(),
        diagnostics = diagnostics.len(),
        "replay finished"
    );

    ReplayReport {
        states,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use gesture::{EventSource, GestureEvent};
    use pretty_assertions::assert_eq;
    use scene::ViewConfig;

    use super::{HostEvent, ScriptEvent, parse_script, replay};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn parses_gesture_and_host_events() {
        let events = parse_script(
            r#"[
                {"type": "resize", "extent": [500, 500]},
                {"type": "frame"},
                {"type": "start", "pointer": [250, 250], "k": 0.96},
                {"type": "end"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                ScriptEvent::Host(HostEvent::Resize {
                    extent: [500.0, 500.0]
                }),
                ScriptEvent::Host(HostEvent::Frame),
                ScriptEvent::Gesture(GestureEvent::Start {
                    pointer: [250.0, 250.0],
                    k: 0.96,
                    source: EventSource::User,
                }),
                ScriptEvent::Gesture(GestureEvent::End),
            ]
        );
    }

    #[test]
    fn unknown_event_type_is_a_parse_error() {
        let err = parse_script(r#"[{"type": "teleport"}]"#).unwrap_err();
        assert!(err.to_string().starts_with("script parse error"));
    }

    #[test]
    fn replay_records_every_step() {
        let events = parse_script(
            r#"[
                {"type": "resize", "extent": [500, 500]},
                {"type": "frame"},
                {"type": "start", "pointer": [250, 250], "k": 0.96},
                {"type": "move", "pointer": [375, 250], "k": 0.96},
                {"type": "end"}
            ]"#,
        )
        .unwrap();
        let report = replay(&ViewConfig::default(), &events);

        assert_eq!(report.states.len(), 5);
        assert_eq!(report.states[0].view.extent, [960.0, 500.0]);
        assert_eq!(report.states[1].view.extent, [500.0, 500.0]);
        let view = report.final_view().unwrap();
        assert_close(view.rotation[0], (125.0_f64 / 240.0).asin().to_degrees(), 1e-9);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn replay_reports_pole_fallback() {
        let events = parse_script(
            r#"[
                {"type": "start", "pointer": [250, 10.00000004], "k": 0.96},
                {"type": "move", "pointer": [260, 30], "k": 0.96}
            ]"#,
        )
        .unwrap();
        let config = ViewConfig {
            extent: [500.0, 500.0],
            ..ViewConfig::default()
        };
        let report = replay(&config, &events);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, "pole_fallback");
        assert_eq!(report.diagnostics[0].severity, "warning");
        assert_eq!(report.final_view().unwrap().rotation, [0.0, 0.0, 0.0]);
    }
}
