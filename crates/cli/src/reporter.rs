use appmeta_diagnostics::{DiagnosticSink, Severity, TracingSink};

/// Print every diagnostic of the fetch tasks to stderr.
///
/// The message is also forwarded to [`TracingSink`] so that it shows up in `TRACE` output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&self, message: &str, severity: Severity) {
        let label = match severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            _ => "info",
        };
        eprintln!("{label}: {message}");
        TracingSink.report(message, severity);
    }
}
