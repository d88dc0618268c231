use tracing::{error, warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A recorded, non-fatal problem.
///
/// Diagnostics never interrupt the caller; they are collected here (and
/// mirrored to `tracing`) so the surrounding application can decide whether
/// repeated reports warrant aborting an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Index of the step (event) that produced the diagnostic.
    pub step: u64,
    pub kind: &'static str,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct DiagnosticBus {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBus {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn warn(&mut self, step: u64, kind: &'static str, message: impl Into<String>) {
        self.emit(step, kind, Severity::Warning, message.into());
    }

    pub fn error(&mut self, step: u64, kind: &'static str, message: impl Into<String>) {
        self.emit(step, kind, Severity::Error, message.into());
    }

    fn emit(&mut self, step: u64, kind: &'static str, severity: Severity, message: String) {
        match severity {
            Severity::Warning => warn!(step, kind, "{message}"),
            Severity::Error => error!(step, kind, "{message}"),
        }
        self.diagnostics.push(Diagnostic {
            step,
            kind,
            severity,
            message,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn count(&self, kind: &str) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
