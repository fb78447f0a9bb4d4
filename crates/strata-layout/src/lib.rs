//! # strata-layout
//!
//! Graph layout worker for Strata visualizations.
//!
//! Layout runs in an isolated worker task so the caller's loop never blocks
//! on coordinate computation. The protocol is a tagged union of request
//! kinds - one for op graphs, one for asset dependency graphs - with exactly
//! one response per request and no streaming:
//!
//! - [`worker::LayoutWorker`]: the worker task and its lifecycle
//! - [`worker::LayoutClient`]: awaitable request handle
//! - [`engine::LayoutEngine`]: the pluggable coordinate-assignment seam,
//!   with a deterministic layered default
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use strata_layout::engine::LayeredLayoutEngine;
//! use strata_layout::graph::{OpGraph, OpNode};
//! use strata_layout::worker::LayoutWorker;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let worker = LayoutWorker::spawn(Arc::new(LayeredLayoutEngine::new()));
//! let client = worker.client();
//!
//! let graph = OpGraph::new(vec![
//!     OpNode::new("ingest", Vec::<String>::new()),
//!     OpNode::new("transform", ["ingest"]),
//! ]);
//!
//! let layout = client.layout_op_graph(graph).await?;
//! assert_eq!(layout.positions.len(), 2);
//!
//! worker.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod engine;
pub mod error;
pub mod graph;
pub mod worker;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{GraphLayout, LayeredLayoutEngine, LayoutEngine, NodePosition};
    pub use crate::error::{Error, Result};
    pub use crate::graph::{AssetGraphData, DependencyEdge, OpGraph, OpNode};
    pub use crate::worker::{LayoutClient, LayoutRequest, LayoutWorker};
}

pub use error::{Error, Result};
pub use worker::{LayoutClient, LayoutWorker};
