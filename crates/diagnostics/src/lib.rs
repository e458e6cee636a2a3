mod local_tracing;
mod sink;

pub use miette;
pub use tracing;

pub use local_tracing::enable_tracing_by_env;
pub use sink::{CollectorSink, DiagnosticSink, Message, NullSink, TracingSink};

pub type Error = miette::Error;
pub type Severity = miette::Severity;
pub type Report = miette::Report;
pub type Result<T> = miette::Result<T>;
