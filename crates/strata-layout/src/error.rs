//! Error types for the layout domain.

/// The result type used throughout strata-layout.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while computing a layout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A cycle was detected in the graph being laid out.
    #[error("cycle detected in graph: {cycle:?}")]
    CycleDetected {
        /// A node on the cycle.
        cycle: Vec<String>,
    },

    /// The layout worker is no longer running.
    #[error("layout worker is closed")]
    WorkerClosed,
}
