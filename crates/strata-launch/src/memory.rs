//! In-memory orchestration service for testing.
//!
//! This module provides [`InMemoryOrchestrator`], a scriptable, recording
//! implementation of [`PartitionQueryService`] and [`LaunchMutationService`]
//! suitable for testing and development.
//!
//! ## Limitations
//!
//! - **NOT suitable for production**: No persistence, no remote service
//! - **Single-process only**: State is not visible across process boundaries
//! - **Scripted responses**: Unscripted lookups return empty/not-found
//!   results rather than errors, mirroring a service with no matching data

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use strata_core::health::PartitionHealth;
use strata_core::id::{BackfillId, RunId};
use strata_core::partition::PartitionKey;

use crate::error::Result;
use crate::service::{
    BackfillRequest, LaunchBackfillResult, LaunchMutationService, LaunchRunResult,
    PartitionConfigResult, PartitionQueryService, PartitionSetsResult, SingleRunRequest,
};

/// Internal state protected by a single lock.
#[derive(Debug, Default)]
struct OrchestratorState {
    partition_sets: HashMap<String, PartitionSetsResult>,
    partition_configs: HashMap<(String, String), PartitionConfigResult>,
    health: HashMap<String, PartitionHealth>,
    running_backfills: HashMap<String, Vec<BackfillId>>,
    run_result: Option<LaunchRunResult>,
    backfill_result: Option<LaunchBackfillResult>,
    run_requests: Vec<SingleRunRequest>,
    backfill_requests: Vec<BackfillRequest>,
    config_queries: Vec<(String, PartitionKey)>,
}

/// In-memory orchestration service double.
///
/// Responses are scripted up front; every mutation request and per-partition
/// config query is recorded for later inspection, so tests can verify call
/// counts and request shapes instead of UI behavior.
#[derive(Debug, Default)]
pub struct InMemoryOrchestrator {
    state: RwLock<OrchestratorState>,
}

impl InMemoryOrchestrator {
    /// Creates an orchestrator with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&OrchestratorState) -> T) -> T {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<T>(&self, f: impl FnOnce(&mut OrchestratorState) -> T) -> T {
        f(&mut self.state.write().unwrap_or_else(PoisonError::into_inner))
    }

    /// Scripts the partition-set resolution result for a job.
    pub fn script_partition_sets(&self, job_name: impl Into<String>, result: PartitionSetsResult) {
        self.write(|state| {
            state.partition_sets.insert(job_name.into(), result);
        });
    }

    /// Scripts the tags-and-config result for one partition of a set.
    pub fn script_partition_config(
        &self,
        partition_set: impl Into<String>,
        key: impl Into<PartitionKey>,
        result: PartitionConfigResult,
    ) {
        self.write(|state| {
            state
                .partition_configs
                .insert((partition_set.into(), key.into().to_string()), result);
        });
    }

    /// Scripts health data for an asset.
    pub fn script_health(&self, health: PartitionHealth) {
        self.write(|state| {
            state.health.insert(health.asset_key.clone(), health);
        });
    }

    /// Scripts the running backfills for a partition set.
    pub fn script_running_backfills(
        &self,
        partition_set: impl Into<String>,
        backfills: Vec<BackfillId>,
    ) {
        self.write(|state| {
            state.running_backfills.insert(partition_set.into(), backfills);
        });
    }

    /// Scripts the result of the next (and any later) run launch.
    pub fn script_run_result(&self, result: LaunchRunResult) {
        self.write(|state| {
            state.run_result = Some(result);
        });
    }

    /// Scripts the result of the next (and any later) backfill launch.
    pub fn script_backfill_result(&self, result: LaunchBackfillResult) {
        self.write(|state| {
            state.backfill_result = Some(result);
        });
    }

    /// Returns the recorded single-run launch requests.
    #[must_use]
    pub fn run_requests(&self) -> Vec<SingleRunRequest> {
        self.read(|state| state.run_requests.clone())
    }

    /// Returns the recorded backfill launch requests.
    #[must_use]
    pub fn backfill_requests(&self) -> Vec<BackfillRequest> {
        self.read(|state| state.backfill_requests.clone())
    }

    /// Returns the recorded per-partition config queries as
    /// `(partition_set, key)` pairs.
    #[must_use]
    pub fn config_queries(&self) -> Vec<(String, PartitionKey)> {
        self.read(|state| state.config_queries.clone())
    }
}

#[async_trait]
impl PartitionQueryService for InMemoryOrchestrator {
    async fn partition_sets_for_job(&self, job_name: &str) -> Result<PartitionSetsResult> {
        Ok(self.read(|state| {
            state
                .partition_sets
                .get(job_name)
                .cloned()
                .unwrap_or(PartitionSetsResult::Sets {
                    results: Vec::new(),
                })
        }))
    }

    async fn partition_tags_and_config(
        &self,
        partition_set: &str,
        key: &PartitionKey,
    ) -> Result<PartitionConfigResult> {
        Ok(self.write(|state| {
            state
                .config_queries
                .push((partition_set.to_string(), key.clone()));
            state
                .partition_configs
                .get(&(partition_set.to_string(), key.to_string()))
                .cloned()
                .unwrap_or(PartitionConfigResult::NotFound)
        }))
    }

    async fn partition_health(&self, asset_key: &str) -> Result<PartitionHealth> {
        Ok(self.read(|state| {
            state.health.get(asset_key).cloned().unwrap_or_else(|| {
                PartitionHealth::new(
                    asset_key,
                    Vec::<PartitionKey>::new(),
                    Vec::<PartitionKey>::new(),
                )
            })
        }))
    }

    async fn running_backfills(&self, partition_set: &str) -> Result<Vec<BackfillId>> {
        Ok(self.read(|state| {
            state
                .running_backfills
                .get(partition_set)
                .cloned()
                .unwrap_or_default()
        }))
    }
}

#[async_trait]
impl LaunchMutationService for InMemoryOrchestrator {
    async fn launch_run(&self, request: SingleRunRequest) -> Result<LaunchRunResult> {
        Ok(self.write(|state| {
            state.run_requests.push(request);
            state.run_result.clone().unwrap_or(LaunchRunResult::Success {
                run_id: RunId::generate(),
            })
        }))
    }

    async fn launch_backfill(&self, request: BackfillRequest) -> Result<LaunchBackfillResult> {
        Ok(self.write(|state| {
            state.backfill_requests.push(request);
            state
                .backfill_result
                .clone()
                .unwrap_or(LaunchBackfillResult::Success {
                    backfill_id: BackfillId::generate(),
                })
        }))
    }
}
