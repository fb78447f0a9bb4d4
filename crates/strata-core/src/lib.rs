//! # strata-core
//!
//! Core abstractions for the Strata partition launch engine.
//!
//! This crate provides the foundational types used across all Strata
//! components:
//!
//! - **Partition Catalog**: The canonical ordered universe of partition keys
//! - **Selection**: Catalog-ordered subsets with preset constructors
//! - **Span Assembly**: Predicate-driven grouping of keys into maximal
//!   contiguous runs for compact range display
//! - **Partition Health**: Per-asset materialization status with tolerant
//!   multi-asset aggregation
//! - **Identifiers**: Strongly-typed IDs for runs and backfills
//!
//! ## Ordering
//!
//! Partition keys are opaque strings. Their order is always the catalog's
//! positional order, never lexicographic. Every selection and span operation
//! in this crate preserves that invariant.
//!
//! ## Example
//!
//! ```rust
//! use strata_core::partition::{PartitionCatalog, Selection};
//! use strata_core::span::{assemble_into_spans, string_for_span};
//!
//! let catalog = PartitionCatalog::new(["2024-01-01", "2024-01-02", "2024-01-03"])?;
//! let selection = Selection::all(&catalog);
//!
//! let spans = assemble_into_spans(selection.keys(), |_| true);
//! assert_eq!(spans.len(), 1);
//! assert_eq!(
//!     string_for_span(&spans[0], selection.keys()),
//!     "2024-01-01 ... 2024-01-03"
//! );
//! # Ok::<(), strata_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod health;
pub mod id;
pub mod observability;
pub mod partition;
pub mod span;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use strata_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::health::{PartitionHealth, PartitionHealthSet};
    pub use crate::id::{BackfillId, RunId};
    pub use crate::partition::{PartitionCatalog, PartitionKey, Selection};
    pub use crate::span::{Span, assemble_into_spans, string_for_span};
}

pub use error::{Error, Result};
pub use health::{PartitionHealth, PartitionHealthSet};
pub use id::{BackfillId, RunId};
pub use observability::{LogFormat, init_logging};
pub use partition::{PartitionCatalog, PartitionKey, Selection};
pub use span::{Span, assemble_into_spans, string_for_span};
