//! # strata-launch
//!
//! Launch decision engine for the Strata partition launch system.
//!
//! This crate decides, from the size of a partition selection, whether to
//! launch a single execution run or a multi-run backfill against an external
//! orchestration service, and assembles the appropriate request payload:
//!
//! - **Single run** (selection of one): fetch the partition's tags and
//!   YAML-formatted run configuration, merge in the derived step-selection
//!   tag, and submit one run launch
//! - **Backfill** (selection of two or more): submit one backfill naming the
//!   partition set, the selected keys, and the steps to re-execute; the
//!   orchestration service resolves per-partition inputs internally
//!
//! ## Guarantees
//!
//! - **One call pair per attempt**: query-then-mutate for a single run, a
//!   single mutation for a backfill; success and failure notifications are
//!   mutually exclusive
//! - **No retries**: every failure is terminal for the attempt
//! - **Reentrancy-safe**: one launch in flight per session, with the
//!   in-progress flag reset on every exit path
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use strata_core::partition::{PartitionCatalog, Selection};
//! use strata_launch::memory::InMemoryOrchestrator;
//! use strata_launch::report::NullReporter;
//! use strata_launch::session::LaunchSession;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Arc::new(InMemoryOrchestrator::new());
//! let catalog = PartitionCatalog::new(["2024-01-01", "2024-01-02"])?;
//!
//! let mut session = LaunchSession::new(
//!     "analytics_job",
//!     vec!["build_table".to_string()],
//!     orchestrator.clone(),
//!     orchestrator.clone(),
//!     Arc::new(NullReporter),
//! );
//! session.set_selection(Selection::all(&catalog));
//!
//! // With nothing scripted the partition set cannot be resolved, so the
//! // launch fails before any mutation is issued.
//! assert!(session.launch().await.is_err());
//! assert!(orchestrator.backfill_requests().is_empty());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod report;
pub mod service;
pub mod session;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{RunConfig, STEP_SELECTION_TAG, Tag};
    pub use crate::error::{Error, Result};
    pub use crate::report::{LaunchReport, LaunchReporter, NullReporter, RecordingReporter};
    pub use crate::service::{
        BackfillRequest, LaunchBackfillResult, LaunchMutationService, LaunchRunResult,
        PartitionConfigResult, PartitionQueryService, PartitionSetMeta, PartitionSetsResult,
        RemoteErrorPayload, RunConfigOrError, SingleRunRequest, TagsOrError,
    };
    pub use crate::session::{LaunchOutcome, LaunchSession};
}

pub use error::{Error, Result};
pub use session::{LaunchOutcome, LaunchSession};
