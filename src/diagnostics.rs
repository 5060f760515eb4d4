//! Diagnostics
//!
//! Non-fatal failures (a line that will not decode, a partition name that
//! will not parse, a file the sweeper could not remove) are reported here
//! instead of aborting the surrounding scan or sweep.

use std::fmt;

use parking_lot::Mutex;

/// How serious a reported failure is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single reported failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Originating operation ("scan", "sweep", ...)
    pub operation: &'static str,

    pub message: String,
}

impl Diagnostic {
    pub fn warning(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            operation,
            message: message.into(),
        }
    }

    pub fn error(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            operation,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.severity, self.operation, self.message)
    }
}

/// Receives diagnostics from the store
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: forwards every diagnostic to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(
                operation = diagnostic.operation,
                "{}",
                diagnostic.message
            ),
            Severity::Error => tracing::error!(
                operation = diagnostic.operation,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// Sink that keeps every diagnostic in memory (useful in tests)
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn reports(&self) -> Vec<Diagnostic> {
        self.reports.lock().clone()
    }

    /// Number of reports from the given operation
    pub fn count_for(&self, operation: &str) -> usize {
        self.reports
            .lock()
            .iter()
            .filter(|d| d.operation == operation)
            .count()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        self.reports.lock().push(diagnostic);
    }
}
