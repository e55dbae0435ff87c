//! Diagnostic reporting for recoverable failures.
//!
//! Font, raster and page-writing failures never abort a device. They are
//! turned into a message and handed to a [`DiagnosticSink`] supplied at
//! construction time.

use std::fmt;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// Receiver for diagnostics emitted by a device.
pub trait DiagnosticSink {
    fn report(&mut self, severity: Severity, message: &str);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Severity, &str),
{
    fn report(&mut self, severity: Severity, message: &str) {
        self(severity, message)
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl DiagnosticSink for LogDiagnostics {
    fn report(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => log::info!(target: "ink", "{}", message),
            Severity::Warning => log::warn!(target: "ink", "{}", message),
            Severity::Error => log::error!(target: "ink", "{}", message),
        }
    }
}
