use serde::Serialize;

use super::failure::Origin;

/// Structured context attached to every logged failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogContext {
    pub message: String,
    pub class: String,
    pub trace: String,
}

impl LogContext {
    pub fn new(message: impl Into<String>, origin: &Origin) -> Self {
        Self {
            message: message.into(),
            class: origin.class().to_string(),
            trace: origin.trace(),
        }
    }
}

/// Sink for failures that reach the responder
pub trait ErrorLogger: Send + Sync {
    fn error(&self, message: &str, context: &LogContext);
}

/// Forwards failures to `tracing` at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ErrorLogger for TracingLogger {
    fn error(&self, message: &str, context: &LogContext) {
        tracing::error!(
            error.message = %context.message,
            error.class = %context.class,
            error.trace = %context.trace,
            "{}",
            message
        );
    }
}
