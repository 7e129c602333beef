//! Diagnostics emitted while classifying and validating frames.
//!
//! Components never log on their own. Callers pass a [`DiagnosticSink`];
//! [`TracingSink`] forwards to `tracing`, [`RecordingSink`] keeps events for
//! inspection.

use std::fmt::Write as _;
use std::sync::Mutex;

use crate::kind::MessageKind;

/// Longest frame prefix rendered by [`preview`].
const PREVIEW_LIMIT: usize = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Warn,
}

/// A structured diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A `GLT` frame matched none of the known list markers.
    UnknownGltSubtype { preview: String },
    /// A frame failed validation and will not be forwarded.
    Rejected { kind: MessageKind, reason: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::UnknownGltSubtype { .. } => Severity::Warn,
            Diagnostic::Rejected { .. } => Severity::Debug,
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::UnknownGltSubtype { preview } => {
                tracing::warn!(%preview, "unhandled GLT list type");
            }
            Diagnostic::Rejected { kind, reason } => {
                tracing::debug!(%kind, %reason, "frame failed validation");
            }
        }
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<S> {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

/// Render frame bytes for logs.
///
/// CR and LF become `\r` and `\n`, other non-printable bytes become `\xNN`.
/// Output is cut at a fixed length and marked with `...`.
pub fn preview(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(PREVIEW_LIMIT)];
    let mut out = String::with_capacity(shown.len());
    for &b in shown {
        match b {
            b'\r' => out.push_str("\\r"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    if bytes.len() > PREVIEW_LIMIT {
        out.push_str("...");
    }
    out
}
