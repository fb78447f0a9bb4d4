//! Orchestration service abstractions for launches.
//!
//! This module provides:
//!
//! - [`PartitionQueryService`]: Trait resolving partition-set metadata,
//!   per-partition tags and run configuration, and partition health
//! - [`LaunchMutationService`]: Trait accepting single-run and backfill
//!   launch requests
//! - Serializable request payloads and typed success/error result variants
//!
//! ## Design Principles
//!
//! - **Backend agnostic**: Same interface for a GraphQL gateway, an HTTP
//!   API, or an in-memory double
//! - **Typed unions**: Remote failures arrive as data, not transport errors;
//!   transport errors use the crate [`Result`](crate::error::Result)
//! - **Structured payloads**: JSON-serializable request envelopes

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use strata_core::health::PartitionHealth;
use strata_core::id::{BackfillId, RunId};
use strata_core::partition::PartitionKey;

use crate::config::{RunConfig, Tag};
use crate::error::Result;

/// An error payload returned by the orchestration service inside an
/// otherwise-successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteErrorPayload {
    /// Human-readable error message.
    pub message: String,
    /// Optional remote stack trace or extended detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RemoteErrorPayload {
    /// Creates an error payload with a message only.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }
}

/// Metadata for one partition set associated with a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionSetMeta {
    /// Partition set name, used to address mutations.
    pub name: String,
    /// Target execution mode for runs launched from this set.
    pub mode: String,
}

/// Result of resolving the partition sets for a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartitionSetsResult {
    /// The job's partition sets, possibly empty.
    Sets {
        /// Partition sets in service order.
        results: Vec<PartitionSetMeta>,
    },
    /// The lookup itself failed remotely.
    Error(RemoteErrorPayload),
}

/// Per-field result for a partition's tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TagsOrError {
    /// The partition's tags.
    Tags {
        /// Tag list in service order.
        results: Vec<Tag>,
    },
    /// Tag resolution failed remotely.
    Error(RemoteErrorPayload),
}

/// Per-field result for a partition's run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunConfigOrError {
    /// The YAML-formatted run configuration document.
    Yaml {
        /// Document text; may be empty.
        document: String,
    },
    /// Run configuration resolution failed remotely.
    Error(RemoteErrorPayload),
}

/// Result of fetching tags and run configuration for a single partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartitionConfigResult {
    /// The partition was found; tags and configuration carry their own
    /// success/error variants.
    Partition {
        /// Tags, or the error that prevented resolving them.
        tags: TagsOrError,
        /// Run configuration, or the error that prevented resolving it.
        run_config: RunConfigOrError,
        /// Target mode for the launched run.
        mode: String,
    },
    /// No such partition in the partition set.
    NotFound,
    /// The fetch itself failed remotely.
    Error(RemoteErrorPayload),
}

/// Request to launch a single run for one partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleRunRequest {
    /// Job to execute.
    pub job_name: String,
    /// The partition being materialized.
    pub partition_key: PartitionKey,
    /// Parsed run configuration mapping.
    pub run_config: RunConfig,
    /// Target execution mode.
    pub mode: String,
    /// Explicit step keys to execute.
    pub step_keys: Vec<String>,
    /// Merged tags (fetched partition tags plus the derived
    /// step-selection tag).
    pub tags: Vec<Tag>,
    /// Deterministic fingerprint of the request for deduplication.
    pub request_fingerprint: String,
}

/// Request to launch a backfill over multiple partitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillRequest {
    /// Partition set addressed by the backfill.
    pub partition_set: String,
    /// Selected partition keys, in catalog order.
    pub partition_keys: Vec<PartitionKey>,
    /// Step keys to re-execute per partition.
    pub reexecution_steps: Vec<String>,
    /// Whether only failed partitions should be retried.
    pub from_failure: bool,
    /// Tags to attach to every backfill run.
    pub tags: Vec<Tag>,
    /// Deterministic fingerprint of the request for deduplication.
    pub request_fingerprint: String,
}

/// Result of a single-run launch mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaunchRunResult {
    /// The run was launched.
    Success {
        /// Identifier of the launched run.
        run_id: RunId,
    },
    /// The submitted run configuration was rejected.
    InvalidConfig {
        /// Rejection detail.
        message: String,
    },
    /// A conflicting run is already in progress.
    ConflictingRun {
        /// Conflict detail.
        message: String,
    },
    /// The mutation failed remotely.
    Error(RemoteErrorPayload),
}

/// Result of a backfill launch mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaunchBackfillResult {
    /// The backfill was launched.
    Success {
        /// Identifier of the launched backfill.
        backfill_id: BackfillId,
    },
    /// The backfill request was rejected as invalid.
    InvalidRequest {
        /// Rejection detail.
        message: String,
    },
    /// A conflicting backfill is already in progress.
    ConflictingBackfill {
        /// Conflict detail.
        message: String,
    },
    /// The mutation failed remotely.
    Error(RemoteErrorPayload),
}

/// Read-side orchestration service.
///
/// Resolves partition-set metadata, per-partition launch inputs, partition
/// health per asset, and running backfills. All responses are typed
/// success/error unions; transport failures surface through the crate
/// `Result`.
#[async_trait]
pub trait PartitionQueryService: Send + Sync {
    /// Resolves the partition sets associated with a job.
    async fn partition_sets_for_job(&self, job_name: &str) -> Result<PartitionSetsResult>;

    /// Fetches tags and run configuration for one partition of a set.
    async fn partition_tags_and_config(
        &self,
        partition_set: &str,
        key: &PartitionKey,
    ) -> Result<PartitionConfigResult>;

    /// Fetches materialization health for one asset.
    async fn partition_health(&self, asset_key: &str) -> Result<PartitionHealth>;

    /// Lists backfills currently running against a partition set.
    async fn running_backfills(&self, partition_set: &str) -> Result<Vec<BackfillId>>;
}

/// Write-side orchestration service.
#[async_trait]
pub trait LaunchMutationService: Send + Sync {
    /// Submits a single-run launch request.
    async fn launch_run(&self, request: SingleRunRequest) -> Result<LaunchRunResult>;

    /// Submits a backfill launch request.
    async fn launch_backfill(&self, request: BackfillRequest) -> Result<LaunchBackfillResult>;
}

/// Computes a deterministic fingerprint over the partition keys of a request.
#[must_use]
pub fn compute_request_fingerprint(partition_keys: &[PartitionKey]) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for key in partition_keys {
        hasher.update(key.as_str().as_bytes());
        hasher.update(b"|");
    }
    let result = hasher.finalize();
    // First 16 bytes (128 bits) of the hash - SHA-256 always produces 32 bytes
    let bytes: [u8; 16] = result
        .get(..16)
        .and_then(|s| s.try_into().ok())
        .unwrap_or([0u8; 16]);
    hex::encode(bytes)
}
