//! Tracing utilities for materializer observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level event for the schema cache (`hit`, `miss`, `built`, `failed`).
///
/// ```ignore
/// qrm_trace_schema!("miss", T::descriptor().name, columns.len());
/// ```
#[macro_export]
macro_rules! qrm_trace_schema {
    ($event:literal, $record:expr, $columns:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(event = $event, record = %$record, columns = $columns, "qrm.schema");
    };
}

/// Emit a debug-level event once a run has drained its row source.
///
/// ```ignore
/// qrm_trace_run!(rows, roots, skipped);
/// ```
#[macro_export]
macro_rules! qrm_trace_run {
    ($rows:expr, $roots:expr, $skipped:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(rows = $rows, roots = $roots, skipped = $skipped, "qrm.run");
    };
}

/// Emit a debug-level event for a row or node left out of the graph.
///
/// ```ignore
/// qrm_trace_skip!("to_one_key_conflict", node.path(), row);
/// ```
#[macro_export]
macro_rules! qrm_trace_skip {
    ($reason:literal, $path:expr, $row:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(reason = $reason, path = %$path, row = $row, "qrm.skip");
    };
}

/// Emit an info-level event when the caller's context stops a run.
#[macro_export]
macro_rules! qrm_trace_cancel {
    ($cause:expr, $row:expr) => {
        #[cfg(feature = "tracing")]
        tracing::info!(cause = %$cause, row = $row, "qrm.cancelled");
    };
}
