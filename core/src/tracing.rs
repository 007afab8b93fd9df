//! Tracing utilities for query and store observability.
//!
//! Enable the `tracing` feature to emit spans and events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Re-exported so the macros resolve `tracing` from downstream crates.
#[cfg(feature = "tracing")]
#[doc(hidden)]
pub use ::tracing as __tracing;

/// Emit a debug-level event describing a planned store query.
///
/// ```ignore
/// inscribe_trace_query!(schema.name, predicates.len(), "cursor");
/// ```
#[macro_export]
macro_rules! inscribe_trace_query {
    ($entity:expr, $predicates:expr, $mode:expr) => {
        #[cfg(feature = "tracing")]
        $crate::tracing::__tracing::debug!(
            entity = %$entity,
            predicates = $predicates,
            mode = $mode,
            "inscribe.query"
        );
    };
}

/// Emit a debug-level event with the size of a returned page.
#[macro_export]
macro_rules! inscribe_trace_page {
    ($entity:expr, $rows:expr, $total:expr) => {
        #[cfg(feature = "tracing")]
        $crate::tracing::__tracing::debug!(
            entity = %$entity,
            rows = $rows,
            total = $total,
            "inscribe.page"
        );
    };
}

/// Emit an error-level event carrying the raw store diagnostic.
///
/// The diagnostic never reaches response bodies, so this is the only place it
/// is recorded.
#[macro_export]
macro_rules! inscribe_trace_store_error {
    ($entity:expr, $err:expr) => {
        #[cfg(feature = "tracing")]
        $crate::tracing::__tracing::error!(
            entity = %$entity,
            diagnostic = %$err.diagnostic,
            "inscribe.store_error"
        );
    };
}

/// Emit a debug-level event for rejected request parameters.
#[macro_export]
macro_rules! inscribe_trace_invalid {
    ($entity:expr, $issues:expr) => {
        #[cfg(feature = "tracing")]
        $crate::tracing::__tracing::debug!(
            entity = %$entity,
            issues = $issues,
            "inscribe.invalid_request"
        );
    };
}
