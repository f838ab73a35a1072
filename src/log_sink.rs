use std::sync::Arc;

/// Destination for the interception log lines of one component.
///
/// The core never emits structured fields of its own; each intercepted call
/// produces plain text lines in the shapes described on
/// [`CallRecorder`](crate::CallRecorder).
pub trait LogSink: Send + Sync {
    fn info(&self, line: &str);
}

/// Hands out a [`LogSink`] keyed by the component's declared type name.
///
/// Queried once per managed component, at wrap time. The default provider is
/// [`TracingLoggerProvider`]; tests typically substitute an in-memory sink.
pub trait LoggerProvider: Send + Sync {
    fn logger(&self, component: &'static str) -> Arc<dyn LogSink>;
}

struct TracingSink {
    component: &'static str,
}

impl LogSink for TracingSink {
    fn info(&self, line: &str) {
        tracing::info!(target: "profiled", component = self.component, "{line}");
    }
}

/// Default provider emitting through `tracing` at info level, with the
/// declared type name attached as the `component` field.
#[derive(Debug, Default)]
pub struct TracingLoggerProvider;

impl LoggerProvider for TracingLoggerProvider {
    fn logger(&self, component: &'static str) -> Arc<dyn LogSink> {
        Arc::new(TracingSink { component })
    }
}
