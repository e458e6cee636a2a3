use std::sync::{Mutex, PoisonError};

use crate::Severity;

/// Destination of the messages produced by background work such as metadata fetching.
///
/// Reporting never fails and never blocks the caller for long.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, message: &str, severity: Severity);
}

/// Forward every message to [`tracing`] under the `appmeta::fetch` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(target: "appmeta::fetch", "{message}"),
            Severity::Warning => tracing::warn!(target: "appmeta::fetch", "{message}"),
            _ => tracing::info!(target: "appmeta::fetch", "{message}"),
        }
    }
}

/// Drop every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _message: &str, _severity: Severity) {}
}

/// A message received by [`CollectorSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message: String,
    pub severity: Severity,
}

/// Keep every message in memory so that it can be inspected later.
#[derive(Debug, Default)]
pub struct CollectorSink {
    messages: Mutex<Vec<Message>>,
}

impl CollectorSink {
    /// Snapshot of the messages received so far.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of messages received with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|message| message.severity == severity)
            .count()
    }
}

impl DiagnosticSink for CollectorSink {
    fn report(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Message { message: message.to_string(), severity });
    }
}
