//! Launch outcome reporting.
//!
//! The reporter is the seam where a host surfaces launch outcomes to a user
//! (a toast, a modal, a log line). The launch session notifies it exactly
//! once per attempt, with either the success or the failure path - never
//! both.

use std::sync::{Mutex, PoisonError};

use strata_core::id::{BackfillId, RunId};

/// A launch outcome notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchReport {
    /// A single run was launched.
    RunLaunched {
        /// Job the run executes.
        job_name: String,
        /// Identifier of the launched run.
        run_id: RunId,
    },
    /// A backfill was launched.
    BackfillLaunched {
        /// Partition set addressed by the backfill.
        partition_set: String,
        /// Identifier of the launched backfill.
        backfill_id: BackfillId,
        /// Number of partitions in the backfill.
        partition_count: usize,
    },
    /// The launch attempt failed.
    LaunchFailed {
        /// The failed operation (e.g. "load partition tags").
        operation: String,
        /// Underlying error detail.
        detail: String,
    },
}

/// Receives launch outcome notifications.
pub trait LaunchReporter: Send + Sync {
    /// Reports one launch outcome.
    fn report(&self, report: &LaunchReport);
}

/// Reporter that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl LaunchReporter for NullReporter {
    fn report(&self, _report: &LaunchReport) {}
}

/// Recording reporter for tests.
///
/// Stores every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<LaunchReport>>,
}

impl RecordingReporter {
    /// Creates an empty recording reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the notifications received so far.
    #[must_use]
    pub fn reports(&self) -> Vec<LaunchReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LaunchReporter for RecordingReporter {
    fn report(&self, report: &LaunchReport) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
    }
}
