//! The layout worker: a request/response actor for coordinate computation.
//!
//! Layout runs off the caller's loop in an isolated tokio task with
//! message-passing semantics: one request in, exactly one correlated
//! response posted back, no shared mutable state between requester and
//! worker. The protocol is a tagged union of request kinds with one handler
//! per kind - a simple request/response actor, not a general task queue.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::{mpsc, oneshot};

use strata_core::observability::layout_span;

use crate::engine::{GraphLayout, LayoutEngine};
use crate::error::{Error, Result};
use crate::graph::{AssetGraphData, OpGraph};

/// Metric name constants for the layout worker.
pub mod names {
    /// Counter: layout requests handled, labeled by request kind.
    pub const LAYOUT_REQUESTS_TOTAL: &str = "strata_layout_requests_total";
}

/// Metric label constants for the layout worker.
pub mod labels {
    /// Request kind label: `op_graph` or `asset_graph`.
    pub const KIND: &str = "kind";
}

/// A layout request, tagged by graph kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutRequest {
    /// Lay out the ops of a job.
    OpGraph {
        /// The op graph to lay out.
        graph: OpGraph,
    },
    /// Lay out an asset dependency graph.
    AssetGraph {
        /// The asset graph to lay out.
        graph: AssetGraphData,
    },
}

impl LayoutRequest {
    fn kind(&self) -> &'static str {
        match self {
            Self::OpGraph { .. } => "op_graph",
            Self::AssetGraph { .. } => "asset_graph",
        }
    }
}

/// One in-flight request with its response channel.
struct Envelope {
    request: LayoutRequest,
    respond_to: oneshot::Sender<Result<GraphLayout>>,
}

/// Handle for submitting layout requests to a running worker.
///
/// Cloning the client is cheap; all clones feed the same worker task.
#[derive(Debug, Clone)]
pub struct LayoutClient {
    tx: mpsc::Sender<Envelope>,
}

impl LayoutClient {
    /// Computes positions for an op graph.
    ///
    /// # Errors
    /// Returns an error if the graph is cyclic or the worker has shut down.
    pub async fn layout_op_graph(&self, graph: OpGraph) -> Result<GraphLayout> {
        self.request(LayoutRequest::OpGraph { graph }).await
    }

    /// Computes positions for an asset dependency graph.
    ///
    /// # Errors
    /// Returns an error if the graph is cyclic or the worker has shut down.
    pub async fn layout_asset_graph(&self, graph: AssetGraphData) -> Result<GraphLayout> {
        self.request(LayoutRequest::AssetGraph { graph }).await
    }

    async fn request(&self, request: LayoutRequest) -> Result<GraphLayout> {
        let (respond_to, response) = oneshot::channel();
        self.tx
            .send(Envelope {
                request,
                respond_to,
            })
            .await
            .map_err(|_| Error::WorkerClosed)?;
        response.await.map_err(|_| Error::WorkerClosed)?
    }
}

/// An isolated worker task computing graph layouts.
pub struct LayoutWorker {
    tx: mpsc::Sender<Envelope>,
    shutdown_tx: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for LayoutWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutWorker").finish_non_exhaustive()
    }
}

impl LayoutWorker {
    /// Spawns a worker task that serves requests with the given engine.
    #[must_use]
    pub fn spawn(engine: Arc<dyn LayoutEngine>) -> Self {
        let (tx, mut rx) = mpsc::channel::<Envelope>(32);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    maybe_envelope = rx.recv() => {
                        let Some(envelope) = maybe_envelope else {
                            break;
                        };
                        let result = handle_request(engine.as_ref(), &envelope.request);
                        // The requester may have gone away; that consumes
                        // the response but must not stop the worker.
                        let _ = envelope.respond_to.send(result);
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
        });

        Self {
            tx,
            shutdown_tx,
            handle,
        }
    }

    /// Returns a client handle for submitting requests.
    #[must_use]
    pub fn client(&self) -> LayoutClient {
        LayoutClient {
            tx: self.tx.clone(),
        }
    }

    /// Shuts the worker down.
    ///
    /// Requests still queued are discarded; their callers observe
    /// [`Error::WorkerClosed`].
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}

fn handle_request(engine: &dyn LayoutEngine, request: &LayoutRequest) -> Result<GraphLayout> {
    let (nodes, edges) = match request {
        LayoutRequest::OpGraph { graph } => (graph.node_names(), graph.edges()),
        LayoutRequest::AssetGraph { graph } => (graph.node_names(), graph.edges()),
    };

    let span = layout_span(request.kind(), nodes.len());
    let _guard = span.enter();

    counter!(names::LAYOUT_REQUESTS_TOTAL, labels::KIND => request.kind()).increment(1);

    let result = engine.layout(&nodes, &edges);
    match &result {
        Ok(layout) => tracing::debug!(nodes = layout.positions.len(), "layout computed"),
        Err(error) => tracing::warn!(%error, "layout failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::LayeredLayoutEngine;
    use crate::graph::OpNode;

    fn spawn_worker() -> LayoutWorker {
        LayoutWorker::spawn(Arc::new(LayeredLayoutEngine::new()))
    }

    #[tokio::test]
    async fn each_request_gets_exactly_one_response() {
        let worker = spawn_worker();
        let client = worker.client();

        let graph = OpGraph::new(vec![
            OpNode::new("ingest", Vec::<String>::new()),
            OpNode::new("transform", ["ingest"]),
        ]);

        let layout = client.layout_op_graph(graph).await.expect("layout");
        assert_eq!(layout.positions.len(), 2);

        worker.shutdown().await;
    }

    #[tokio::test]
    async fn requests_after_shutdown_fail_with_worker_closed() {
        let worker = spawn_worker();
        let client = worker.client();
        worker.shutdown().await;

        let result = client.layout_op_graph(OpGraph::default()).await;
        assert!(matches!(result, Err(Error::WorkerClosed)));
    }
}
