//! Tracing utilities for rewrite observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! The macro no-ops when the feature is disabled, avoiding `#[cfg]`
//! boilerplate at the call site.

/// Emit a debug-level tracing event with the input length and the number of
/// placeholders rewritten.
///
/// ```ignore
/// trace_rewrite!(query.len(), placeholder_count);
/// ```
#[macro_export]
macro_rules! trace_rewrite {
    ($input_len:expr, $placeholders:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            input_len = $input_len,
            placeholders = $placeholders,
            "pgparams.rewrite"
        );
    };
}
