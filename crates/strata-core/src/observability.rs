//! Observability infrastructure for Strata.
//!
//! Structured logging with consistent spans across the launch and layout
//! components. This module provides initialization helpers and span
//! constructors so every component logs the same way.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at application startup. Safe to call multiple times;
/// subsequent calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `strata_launch=debug`)
///
/// # Example
///
/// ```rust
/// use strata_core::observability::{LogFormat, init_logging};
///
/// init_logging(LogFormat::Pretty);
/// ```
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for launch operations with standard fields.
///
/// # Example
///
/// ```rust
/// use strata_core::observability::launch_span;
///
/// let span = launch_span("launch_run", "analytics_job");
/// let _guard = span.enter();
/// // ... issue launch calls
/// ```
#[must_use]
pub fn launch_span(operation: &str, job_name: &str) -> Span {
    tracing::info_span!("launch", op = operation, job = job_name)
}

/// Creates a span for layout worker operations.
#[must_use]
pub fn layout_span(request_kind: &str, node_count: usize) -> Span {
    tracing::info_span!("layout", kind = request_kind, nodes = node_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(LogFormat::Pretty);
        init_logging(LogFormat::Pretty); // Second call should be no-op
    }

    #[test]
    fn launch_span_carries_fields() {
        let span = launch_span("launch_run", "analytics_job");
        let _guard = span.enter();
        tracing::info!("test message in span");
    }

    #[test]
    fn layout_span_carries_fields() {
        let span = layout_span("op_graph", 4);
        let _guard = span.enter();
        tracing::info!("layout message");
    }
}
