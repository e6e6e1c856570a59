//! Caller-supplied hooks for analysis events.
//!
//! The analyzer itself performs no logging; it reports to an observer.

use crate::models::Operation;
use crate::Error;

pub trait AnalysisObserver: Send + Sync {
    fn on_request(&self, _operation: Operation, _part_count: usize) {}

    fn on_success(&self, _operation: Operation, _question_count: usize) {}

    /// Parsing fell back because the response lacked the expected structure.
    fn on_degraded(&self, _operation: Operation) {}

    fn on_failure(&self, _operation: Operation, _error: &Error) {}
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}

/// Observer that forwards events to `tracing`.
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn on_request(&self, operation: Operation, part_count: usize) {
        tracing::info!("[{}] Sending request with {} parts", operation, part_count);
    }

    fn on_success(&self, operation: Operation, question_count: usize) {
        tracing::info!("[{}] Received {} questions", operation, question_count);
    }

    fn on_degraded(&self, operation: Operation) {
        tracing::warn!(
            "[{}] Response did not follow the section layout; using fallback parse",
            operation
        );
    }

    fn on_failure(&self, operation: Operation, error: &Error) {
        tracing::error!("[{}] Request failed: {}", operation, error);
    }
}
