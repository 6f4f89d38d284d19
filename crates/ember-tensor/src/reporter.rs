//! Built-in [`ErrorReporter`] implementations.

use ember_core::ErrorReporter;

/// Forwards diagnostics to `tracing` at `error` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&mut self, message: &str) {
        tracing::error!(target: "ember", "{message}");
    }
}

/// Discards all diagnostics.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl ErrorReporter for NullReporter {
    fn report(&mut self, _message: &str) {}
}
