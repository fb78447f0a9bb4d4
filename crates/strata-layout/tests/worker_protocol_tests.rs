//! Layout worker protocol semantics (hermetic, deterministic).
//!
//! One request in, exactly one correlated response back, for each request
//! kind, under concurrency, and across errors.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use strata_layout::engine::{LayeredLayoutEngine, LayoutEngine};
use strata_layout::error::Error;
use strata_layout::graph::{AssetGraphData, DependencyEdge, OpGraph, OpNode};
use strata_layout::worker::LayoutWorker;

fn spawn_worker() -> LayoutWorker {
    LayoutWorker::spawn(Arc::new(LayeredLayoutEngine::new()))
}

fn op_graph() -> OpGraph {
    OpGraph::new(vec![
        OpNode::new("ingest", Vec::<String>::new()),
        OpNode::new("transform", ["ingest"]),
        OpNode::new("publish", ["transform"]),
    ])
}

fn asset_graph() -> AssetGraphData {
    AssetGraphData::new(
        vec!["raw.events".into(), "analytics.daily".into()],
        vec![DependencyEdge {
            upstream: "raw.events".into(),
            downstream: "analytics.daily".into(),
        }],
    )
}

#[tokio::test]
async fn op_graph_request_returns_positions_for_every_op() {
    let worker = spawn_worker();
    let client = worker.client();

    let layout = client.layout_op_graph(op_graph()).await.expect("layout");
    assert_eq!(layout.positions.len(), 3);
    assert!(layout.positions["ingest"].y < layout.positions["transform"].y);

    worker.shutdown().await;
}

#[tokio::test]
async fn asset_graph_request_returns_positions_for_every_asset() {
    let worker = spawn_worker();
    let client = worker.client();

    let layout = client
        .layout_asset_graph(asset_graph())
        .await
        .expect("layout");
    assert_eq!(layout.positions.len(), 2);
    assert!(layout.positions["raw.events"].y < layout.positions["analytics.daily"].y);

    worker.shutdown().await;
}

#[tokio::test]
async fn worker_response_matches_the_inline_engine_result() {
    let worker = spawn_worker();
    let client = worker.client();

    let graph = op_graph();
    let from_worker = client.layout_op_graph(graph.clone()).await.expect("layout");
    let inline = LayeredLayoutEngine::new()
        .layout(&graph.node_names(), &graph.edges())
        .expect("layout");

    assert_eq!(from_worker, inline);
    worker.shutdown().await;
}

#[tokio::test]
async fn concurrent_requests_each_receive_their_own_response() {
    let worker = spawn_worker();

    let ops = {
        let client = worker.client();
        tokio::spawn(async move { client.layout_op_graph(op_graph()).await })
    };
    let assets = {
        let client = worker.client();
        tokio::spawn(async move { client.layout_asset_graph(asset_graph()).await })
    };

    let op_layout = ops.await.expect("join").expect("layout");
    let asset_layout = assets.await.expect("join").expect("layout");

    // Each caller got the layout for its own graph, not the other's.
    assert!(op_layout.positions.contains_key("ingest"));
    assert!(!op_layout.positions.contains_key("raw.events"));
    assert!(asset_layout.positions.contains_key("raw.events"));
    assert!(!asset_layout.positions.contains_key("ingest"));

    worker.shutdown().await;
}

#[tokio::test]
async fn cyclic_graph_surfaces_a_cycle_error() {
    let worker = spawn_worker();
    let client = worker.client();

    let graph = OpGraph::new(vec![
        OpNode::new("a", ["b"]),
        OpNode::new("b", ["a"]),
    ]);

    let result = client.layout_op_graph(graph).await;
    assert!(matches!(result, Err(Error::CycleDetected { .. })));

    // The worker stays alive after an error response.
    let layout = client.layout_op_graph(op_graph()).await.expect("layout");
    assert_eq!(layout.positions.len(), 3);

    worker.shutdown().await;
}

#[tokio::test]
async fn shutdown_discards_pending_work_and_closes_clients() {
    let worker = spawn_worker();
    let client = worker.client();
    worker.shutdown().await;

    let result = client.layout_asset_graph(asset_graph()).await;
    assert!(matches!(result, Err(Error::WorkerClosed)));
}

#[tokio::test]
async fn layout_response_serializes_for_transport() {
    let worker = spawn_worker();
    let client = worker.client();

    let layout = client.layout_op_graph(op_graph()).await.expect("layout");
    let json = serde_json::to_string(&layout).expect("serialize");
    assert!(json.contains("\"positions\""));
    assert!(json.contains("ingest"));

    worker.shutdown().await;
}
