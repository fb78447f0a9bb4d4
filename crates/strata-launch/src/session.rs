//! Session-scoped launch state and the launch decision.
//!
//! A [`LaunchSession`] is constructed when a launch surface opens and dropped
//! when it closes; reopening builds a fresh session, so partition health and
//! selection state never leak between openings. The session decides, from the
//! selection cardinality, whether to issue a single-run launch (query tags
//! and configuration, then mutate) or a backfill launch (single mutation, no
//! per-partition fetches), and notifies its reporter exactly once per
//! attempt.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use metrics::counter;

use strata_core::health::{
    PartitionHealthSet, reject_upstream_unavailable, upstream_unavailable_spans,
};
use strata_core::id::{BackfillId, RunId};
use strata_core::partition::Selection;
use strata_core::span::Span;

use crate::config::{RunConfig, Tag};
use crate::error::{Error, Result};
use crate::metrics::{PATH_BACKFILL, PATH_SINGLE_RUN, labels, names};
use crate::report::{LaunchReport, LaunchReporter};
use crate::service::{
    BackfillRequest, LaunchBackfillResult, LaunchMutationService, LaunchRunResult,
    PartitionConfigResult, PartitionQueryService, PartitionSetMeta, PartitionSetsResult,
    RunConfigOrError, SingleRunRequest, TagsOrError, compute_request_fingerprint,
};

/// Outcome of a successful launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A single run was launched.
    Run {
        /// Identifier of the launched run.
        run_id: RunId,
    },
    /// A backfill was launched.
    Backfill {
        /// Identifier of the launched backfill.
        backfill_id: BackfillId,
        /// Partition set the backfill addresses.
        partition_set: String,
        /// Number of partitions in the backfill.
        partition_count: usize,
    },
}

/// Resets the in-progress flag on every exit path.
struct InProgressGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InProgressGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(Error::LaunchInProgress);
        }
        Ok(Self { flag })
    }
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Session-scoped launch state for one job.
pub struct LaunchSession {
    job_name: String,
    step_keys: Vec<String>,
    selection: Selection,
    queries: Arc<dyn PartitionQueryService>,
    mutations: Arc<dyn LaunchMutationService>,
    reporter: Arc<dyn LaunchReporter>,
    in_progress: AtomicBool,
}

impl std::fmt::Debug for LaunchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchSession")
            .field("job_name", &self.job_name)
            .field("step_keys", &self.step_keys)
            .field("selection", &self.selection)
            .field("in_progress", &self.in_progress)
            .finish_non_exhaustive()
    }
}

impl LaunchSession {
    /// Creates a session for a job and its step keys.
    #[must_use]
    pub fn new(
        job_name: impl Into<String>,
        step_keys: Vec<String>,
        queries: Arc<dyn PartitionQueryService>,
        mutations: Arc<dyn LaunchMutationService>,
        reporter: Arc<dyn LaunchReporter>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            step_keys,
            selection: Selection::empty(),
            queries,
            mutations,
            reporter,
            in_progress: AtomicBool::new(false),
        }
    }

    /// Returns the job this session launches.
    #[must_use]
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Returns the current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces the current selection.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Returns true while a launch is in flight.
    #[must_use]
    pub fn is_launching(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Assembles the spans of the selection that are upstream-unavailable,
    /// for warning display.
    #[must_use]
    pub fn upstream_unavailable_spans(&self, upstream: &PartitionHealthSet) -> Vec<Span> {
        upstream_unavailable_spans(&self.selection, upstream)
    }

    /// Removes the upstream-unavailable keys from the selection.
    pub fn remove_upstream_unavailable(&mut self, upstream: &PartitionHealthSet) {
        self.selection = reject_upstream_unavailable(&self.selection, upstream);
    }

    /// Launches the current selection.
    ///
    /// A selection of one key issues a query-then-mutate single-run launch;
    /// a larger selection issues a single backfill mutation. The reporter is
    /// notified exactly once with the outcome. The in-progress flag is reset
    /// on every exit path.
    ///
    /// # Errors
    /// Returns an error if a launch is already in flight, the selection is
    /// empty, the partition set cannot be resolved, a tag or configuration
    /// fetch returns an error-typed payload, or the mutation reports a
    /// failure variant. None of these are retried.
    pub async fn launch(&self) -> Result<LaunchOutcome> {
        let guard = InProgressGuard::acquire(&self.in_progress)?;

        let result = self.decide_and_launch().await;
        match &result {
            Ok(outcome) => self.reporter.report(&success_report(&self.job_name, outcome)),
            Err(error) => self.reporter.report(&failure_report(error)),
        }

        drop(guard);
        result
    }

    async fn decide_and_launch(&self) -> Result<LaunchOutcome> {
        let path = if self.selection.len() == 1 {
            PATH_SINGLE_RUN
        } else {
            PATH_BACKFILL
        };
        counter!(names::LAUNCH_ATTEMPTS_TOTAL, labels::PATH => path).increment(1);

        if self.selection.is_empty() {
            return Err(Error::InvalidSelection {
                message: "no partitions selected".to_string(),
            });
        }

        let partition_set = self.resolve_partition_set().await?;

        let result = if self.selection.len() == 1 {
            self.launch_single_run(&partition_set).await
        } else {
            self.launch_backfill(&partition_set).await
        };

        match &result {
            Ok(_) => counter!(names::LAUNCH_SUCCESS_TOTAL, labels::PATH => path).increment(1),
            Err(_) => counter!(names::LAUNCH_FAILURES_TOTAL, labels::PATH => path).increment(1),
        }
        result
    }

    /// Resolves the partition set for the job.
    ///
    /// When a job spans multiple partition spaces the first set returned by
    /// the service wins.
    async fn resolve_partition_set(&self) -> Result<PartitionSetMeta> {
        match self.queries.partition_sets_for_job(&self.job_name).await? {
            PartitionSetsResult::Sets { results } => {
                results
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::PartitionSetNotFound {
                        job_name: self.job_name.clone(),
                        detail: "no details provided".to_string(),
                    })
            }
            PartitionSetsResult::Error(payload) => Err(Error::PartitionSetNotFound {
                job_name: self.job_name.clone(),
                detail: payload.message,
            }),
        }
    }

    async fn launch_single_run(&self, partition_set: &PartitionSetMeta) -> Result<LaunchOutcome> {
        let [key] = self.selection.keys() else {
            return Err(Error::InvalidSelection {
                message: format!(
                    "single-run launch requires exactly one key, found {}",
                    self.selection.len()
                ),
            });
        };

        let fetched = self
            .queries
            .partition_tags_and_config(&partition_set.name, key)
            .await?;

        let (tags, run_config, mode) = match fetched {
            PartitionConfigResult::Partition {
                tags,
                run_config,
                mode,
            } => (tags, run_config, mode),
            PartitionConfigResult::NotFound => {
                return Err(Error::remote(
                    "load partition",
                    format!("partition {key} not found in set {}", partition_set.name),
                ));
            }
            PartitionConfigResult::Error(payload) => {
                return Err(Error::remote("load partition", payload.message));
            }
        };

        let mut tags = match tags {
            TagsOrError::Tags { results } => results,
            TagsOrError::Error(payload) => {
                return Err(Error::remote("load partition tags", payload.message));
            }
        };

        let document = match run_config {
            RunConfigOrError::Yaml { document } => document,
            RunConfigOrError::Error(payload) => {
                return Err(Error::remote("load run configuration", payload.message));
            }
        };
        let run_config = RunConfig::parse_yaml(&document)?;

        tags.push(Tag::step_selection(&self.step_keys));

        let request = SingleRunRequest {
            job_name: self.job_name.clone(),
            partition_key: key.clone(),
            run_config,
            mode,
            step_keys: self.step_keys.clone(),
            tags,
            request_fingerprint: compute_request_fingerprint(std::slice::from_ref(key)),
        };

        tracing::info!(job = %self.job_name, partition = %key, "launching single run");

        match self.mutations.launch_run(request).await? {
            LaunchRunResult::Success { run_id } => Ok(LaunchOutcome::Run { run_id }),
            LaunchRunResult::InvalidConfig { message }
            | LaunchRunResult::ConflictingRun { message } => {
                Err(Error::LaunchRejected { detail: message })
            }
            LaunchRunResult::Error(payload) => Err(Error::LaunchRejected {
                detail: payload.message,
            }),
        }
    }

    async fn launch_backfill(&self, partition_set: &PartitionSetMeta) -> Result<LaunchOutcome> {
        let partition_keys = self.selection.keys().to_vec();
        let partition_count = partition_keys.len();

        let request = BackfillRequest {
            partition_set: partition_set.name.clone(),
            request_fingerprint: compute_request_fingerprint(&partition_keys),
            partition_keys,
            reexecution_steps: self.step_keys.clone(),
            from_failure: false,
            tags: Vec::new(),
        };

        tracing::info!(
            job = %self.job_name,
            partition_set = %partition_set.name,
            partitions = partition_count,
            "launching backfill"
        );

        match self.mutations.launch_backfill(request).await? {
            LaunchBackfillResult::Success { backfill_id } => Ok(LaunchOutcome::Backfill {
                backfill_id,
                partition_set: partition_set.name.clone(),
                partition_count,
            }),
            LaunchBackfillResult::InvalidRequest { message }
            | LaunchBackfillResult::ConflictingBackfill { message } => {
                Err(Error::LaunchRejected { detail: message })
            }
            LaunchBackfillResult::Error(payload) => Err(Error::LaunchRejected {
                detail: payload.message,
            }),
        }
    }
}

fn success_report(job_name: &str, outcome: &LaunchOutcome) -> LaunchReport {
    match outcome {
        LaunchOutcome::Run { run_id } => LaunchReport::RunLaunched {
            job_name: job_name.to_string(),
            run_id: *run_id,
        },
        LaunchOutcome::Backfill {
            backfill_id,
            partition_set,
            partition_count,
        } => LaunchReport::BackfillLaunched {
            partition_set: partition_set.clone(),
            backfill_id: *backfill_id,
            partition_count: *partition_count,
        },
    }
}

fn failure_report(error: &Error) -> LaunchReport {
    let operation = match error {
        Error::PartitionSetNotFound { .. } => "resolve partition set",
        Error::Remote { operation, .. } => operation.as_str(),
        Error::LaunchRejected { .. } => "launch",
        Error::InvalidConfig { .. } => "parse run configuration",
        Error::InvalidSelection { .. } | Error::LaunchInProgress => "validate selection",
    };
    LaunchReport::LaunchFailed {
        operation: operation.to_string(),
        detail: error.to_string(),
    }
}
