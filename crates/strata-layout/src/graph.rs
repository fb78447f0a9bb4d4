//! Graph inputs for layout requests.
//!
//! Two graph shapes arrive at the worker: an op graph (the steps of one job,
//! optionally scoped to a parent op whose children are being laid out) and an
//! asset dependency graph. Both reduce to the same node/edge form before
//! coordinate assignment.

use serde::{Deserialize, Serialize};

/// One op in an op graph, with its upstream dependencies by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpNode {
    /// Op name, unique within the graph.
    pub name: String,
    /// Names of the ops this op consumes from.
    #[serde(default)]
    pub upstream: Vec<String>,
}

impl OpNode {
    /// Creates an op with upstream dependencies.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, upstream: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            upstream: upstream.into_iter().map(Into::into).collect(),
        }
    }
}

/// The ops of one job, in definition order.
///
/// When `parent_op` is set the ops are the children of that composite op;
/// the parent frame itself receives no coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpGraph {
    /// The ops to lay out.
    pub ops: Vec<OpNode>,
    /// Composite op whose children are being laid out, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_op: Option<String>,
}

impl OpGraph {
    /// Creates an op graph with no parent context.
    #[must_use]
    pub fn new(ops: Vec<OpNode>) -> Self {
        Self {
            ops,
            parent_op: None,
        }
    }

    /// Scopes the graph to a composite parent op.
    #[must_use]
    pub fn with_parent_op(mut self, parent_op: impl Into<String>) -> Self {
        self.parent_op = Some(parent_op.into());
        self
    }

    /// Returns the node names in definition order.
    #[must_use]
    pub fn node_names(&self) -> Vec<String> {
        self.ops.iter().map(|op| op.name.clone()).collect()
    }

    /// Returns the `(upstream, downstream)` edges in definition order.
    #[must_use]
    pub fn edges(&self) -> Vec<(String, String)> {
        self.ops
            .iter()
            .flat_map(|op| {
                op.upstream
                    .iter()
                    .map(|upstream| (upstream.clone(), op.name.clone()))
            })
            .collect()
    }
}

/// A dependency edge in an asset graph: `upstream` feeds `downstream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    /// The producing asset.
    pub upstream: String,
    /// The consuming asset.
    pub downstream: String,
}

/// An asset dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGraphData {
    /// Asset keys, in definition order.
    pub asset_keys: Vec<String>,
    /// Dependency edges between assets.
    pub dependencies: Vec<DependencyEdge>,
}

impl AssetGraphData {
    /// Creates an asset graph.
    #[must_use]
    pub fn new(asset_keys: Vec<String>, dependencies: Vec<DependencyEdge>) -> Self {
        Self {
            asset_keys,
            dependencies,
        }
    }

    /// Returns the node names in definition order.
    #[must_use]
    pub fn node_names(&self) -> Vec<String> {
        self.asset_keys.clone()
    }

    /// Returns the `(upstream, downstream)` edges in definition order.
    #[must_use]
    pub fn edges(&self) -> Vec<(String, String)> {
        self.dependencies
            .iter()
            .map(|edge| (edge.upstream.clone(), edge.downstream.clone()))
            .collect()
    }
}
