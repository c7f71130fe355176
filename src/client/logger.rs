//! Logging seam for request/response activity.
//!
//! The client reports every request and response through a [`Logger`].
//! [`TracingLogger`] is used unless another logger is installed with
//! [`ApiClient::set_logger`](crate::ApiClient::set_logger).

use serde_json::Value;

/// Target used for events emitted by [`TracingLogger`].
pub const LOG_TARGET: &str = "mpapi_client";

/// A leveled logger receiving a message and a JSON context.
pub trait Logger: Send {
    /// Log informational activity.
    fn info(&self, message: &str, context: &Value);

    /// Log a failure.
    fn error(&self, message: &str, context: &Value);
}

/// Forwards log entries to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str, context: &Value) {
        tracing::info!(target: LOG_TARGET, context = %context, "{}", message);
    }

    fn error(&self, message: &str, context: &Value) {
        tracing::error!(target: LOG_TARGET, context = %context, "{}", message);
    }
}

/// Discards every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _message: &str, _context: &Value) {}

    fn error(&self, _message: &str, _context: &Value) {}
}

impl<L: Logger + Sync + ?Sized> Logger for std::sync::Arc<L> {
    fn info(&self, message: &str, context: &Value) {
        (**self).info(message, context)
    }

    fn error(&self, message: &str, context: &Value) {
        (**self).error(message, context)
    }
}
