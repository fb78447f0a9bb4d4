//! Metric names and labels for the launch domain.

/// Metric name constants.
pub mod names {
    /// Counter: launch attempts, labeled by path.
    pub const LAUNCH_ATTEMPTS_TOTAL: &str = "strata_launch_attempts_total";
    /// Counter: successful launches, labeled by path.
    pub const LAUNCH_SUCCESS_TOTAL: &str = "strata_launch_success_total";
    /// Counter: failed launches, labeled by path.
    pub const LAUNCH_FAILURES_TOTAL: &str = "strata_launch_failures_total";
}

/// Metric label constants.
pub mod labels {
    /// Launch path label: `single_run` or `backfill`.
    pub const PATH: &str = "path";
}

/// Label value for the single-run path.
pub const PATH_SINGLE_RUN: &str = "single_run";
/// Label value for the backfill path.
pub const PATH_BACKFILL: &str = "backfill";
