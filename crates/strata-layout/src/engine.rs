//! Coordinate assignment for graph layouts.
//!
//! The worker treats coordinate assignment as a pluggable capability: given a
//! graph of nodes and edges, produce 2D coordinates for each node. The
//! default implementation is a deterministic layered layout - nodes are
//! placed on rows by dependency depth, with definition order breaking ties -
//! which is enough for dependency visualizations without an external layout
//! library.

use std::collections::{BTreeMap, HashMap, VecDeque};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A computed 2D position for one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePosition {
    /// Horizontal coordinate of the node's top-left corner.
    pub x: f64,
    /// Vertical coordinate of the node's top-left corner.
    pub y: f64,
}

/// Positions for every node of a graph, plus the overall extent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLayout {
    /// Position per node, keyed by node name.
    pub positions: BTreeMap<String, NodePosition>,
    /// Total width of the laid-out graph.
    pub width: f64,
    /// Total height of the laid-out graph.
    pub height: f64,
}

/// Assigns 2D coordinates to the nodes of a graph.
///
/// Implementations must be deterministic: the same nodes and edges always
/// produce the same positions.
pub trait LayoutEngine: Send + Sync {
    /// Computes positions for every node.
    ///
    /// Edge endpoints not present in `nodes` are registered in first-mention
    /// order.
    ///
    /// # Errors
    /// Returns an error if the graph contains a cycle.
    fn layout(&self, nodes: &[String], edges: &[(String, String)]) -> Result<GraphLayout>;
}

/// Deterministic layered layout.
///
/// Nodes are placed on rows by dependency depth (a node's row is one past
/// its deepest upstream), and within a row in the order they are reached,
/// with definition order breaking ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayeredLayoutEngine {
    /// Width reserved per node.
    pub node_width: f64,
    /// Height reserved per node.
    pub node_height: f64,
    /// Horizontal gap between nodes in a row.
    pub horizontal_gap: f64,
    /// Vertical gap between rows.
    pub vertical_gap: f64,
}

impl Default for LayeredLayoutEngine {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            node_height: 90.0,
            horizontal_gap: 40.0,
            vertical_gap: 60.0,
        }
    }
}

impl LayeredLayoutEngine {
    /// Creates an engine with the default node geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Graph state shared by the layering passes.
struct IndexedGraph {
    graph: DiGraph<String, ()>,
    insertion_order: Vec<NodeIndex>,
}

impl IndexedGraph {
    fn build(nodes: &[String], edges: &[(String, String)]) -> Self {
        let mut graph = DiGraph::new();
        let mut index_map: HashMap<String, NodeIndex> = HashMap::new();
        let mut insertion_order = Vec::new();

        fn intern(
            graph: &mut DiGraph<String, ()>,
            index_map: &mut HashMap<String, NodeIndex>,
            insertion_order: &mut Vec<NodeIndex>,
            name: &str,
        ) -> NodeIndex {
            if let Some(&idx) = index_map.get(name) {
                return idx;
            }
            let idx = graph.add_node(name.to_owned());
            index_map.insert(name.to_owned(), idx);
            insertion_order.push(idx);
            idx
        }

        for name in nodes {
            intern(&mut graph, &mut index_map, &mut insertion_order, name);
        }
        for (upstream, downstream) in edges {
            let from = intern(&mut graph, &mut index_map, &mut insertion_order, upstream);
            let to = intern(&mut graph, &mut index_map, &mut insertion_order, downstream);
            graph.add_edge(from, to, ());
        }

        Self {
            graph,
            insertion_order,
        }
    }

    fn order_position(&self, idx: NodeIndex) -> usize {
        self.insertion_order
            .iter()
            .position(|&i| i == idx)
            .unwrap_or(usize::MAX)
    }

    /// Topological order via Kahn's algorithm with insertion-order
    /// tie-breaking for deterministic results.
    fn toposort(&self) -> Result<Vec<NodeIndex>> {
        let node_count = self.graph.node_count();
        let mut in_degree: HashMap<NodeIndex, usize> = HashMap::with_capacity(node_count);
        for idx in self.graph.node_indices() {
            in_degree.insert(idx, 0);
        }
        for edge in self.graph.edge_references() {
            *in_degree.entry(edge.target()).or_insert(0) += 1;
        }

        let mut queue: VecDeque<NodeIndex> = self
            .insertion_order
            .iter()
            .filter(|&&idx| in_degree.get(&idx).copied().unwrap_or(0) == 0)
            .copied()
            .collect();

        let mut order = Vec::with_capacity(node_count);
        while let Some(idx) = queue.pop_front() {
            order.push(idx);

            let mut neighbors: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .collect();
            neighbors.sort_by_key(|&n| self.order_position(n));

            for neighbor in neighbors {
                if let Some(degree) = in_degree.get_mut(&neighbor) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        if order.len() != node_count {
            let cycle_node = self
                .insertion_order
                .iter()
                .find(|&&idx| in_degree.get(&idx).copied().unwrap_or(0) > 0)
                .and_then(|&idx| self.graph.node_weight(idx))
                .cloned()
                .unwrap_or_default();
            return Err(Error::CycleDetected {
                cycle: vec![cycle_node],
            });
        }

        Ok(order)
    }
}

impl LayoutEngine for LayeredLayoutEngine {
    #[allow(clippy::cast_precision_loss)]
    fn layout(&self, nodes: &[String], edges: &[(String, String)]) -> Result<GraphLayout> {
        let indexed = IndexedGraph::build(nodes, edges);
        if indexed.graph.node_count() == 0 {
            return Ok(GraphLayout::default());
        }

        let order = indexed.toposort()?;

        // Row per node: one past the deepest upstream.
        let mut rows: HashMap<NodeIndex, usize> = HashMap::with_capacity(order.len());
        for &idx in &order {
            let row = indexed
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .filter_map(|upstream| rows.get(&upstream))
                .max()
                .map_or(0, |deepest| deepest + 1);
            rows.insert(idx, row);
        }

        // Column per node: arrival order within its row.
        let mut columns_filled: HashMap<usize, usize> = HashMap::new();
        let mut positions = BTreeMap::new();
        let mut max_column = 0;
        let mut max_row = 0;

        for &idx in &order {
            let row = rows.get(&idx).copied().unwrap_or(0);
            let column = columns_filled.entry(row).or_insert(0);

            let Some(name) = indexed.graph.node_weight(idx) else {
                continue;
            };
            positions.insert(
                name.clone(),
                NodePosition {
                    x: *column as f64 * (self.node_width + self.horizontal_gap),
                    y: row as f64 * (self.node_height + self.vertical_gap),
                },
            );

            max_column = max_column.max(*column);
            max_row = max_row.max(row);
            *column += 1;
        }

        Ok(GraphLayout {
            positions,
            width: (max_column + 1) as f64 * self.node_width
                + max_column as f64 * self.horizontal_gap,
            height: (max_row + 1) as f64 * self.node_height + max_row as f64 * self.vertical_gap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_of(nodes: &[&str], edges: &[(&str, &str)]) -> GraphLayout {
        let nodes: Vec<String> = nodes.iter().map(ToString::to_string).collect();
        let edges: Vec<(String, String)> = edges
            .iter()
            .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
            .collect();
        LayeredLayoutEngine::new()
            .layout(&nodes, &edges)
            .expect("layout")
    }

    #[test]
    fn empty_graph_yields_empty_layout() {
        let layout = layout_of(&[], &[]);
        assert!(layout.positions.is_empty());
        assert!(layout.width.abs() < f64::EPSILON);
    }

    #[test]
    fn single_node_sits_at_origin() {
        let layout = layout_of(&["ingest"], &[]);
        assert_eq!(layout.positions["ingest"], NodePosition { x: 0.0, y: 0.0 });
    }

    #[test]
    fn downstream_nodes_land_on_deeper_rows() {
        let layout = layout_of(
            &["ingest", "transform", "publish"],
            &[("ingest", "transform"), ("transform", "publish")],
        );

        let y = |name: &str| layout.positions[name].y;
        assert!(y("ingest") < y("transform"));
        assert!(y("transform") < y("publish"));
    }

    #[test]
    fn diamond_places_siblings_on_one_row() {
        let layout = layout_of(
            &["source", "left", "right", "sink"],
            &[
                ("source", "left"),
                ("source", "right"),
                ("left", "sink"),
                ("right", "sink"),
            ],
        );

        let position = |name: &str| layout.positions[name];
        assert!((position("left").y - position("right").y).abs() < f64::EPSILON);
        assert!((position("left").x - position("right").x).abs() > f64::EPSILON);
        assert!(position("sink").y > position("left").y);
    }

    #[test]
    fn layout_is_deterministic() {
        let nodes = &["a", "b", "c", "d"];
        let edges = &[("a", "c"), ("b", "c"), ("c", "d")];
        assert_eq!(layout_of(nodes, edges), layout_of(nodes, edges));
    }

    #[test]
    fn edge_endpoints_missing_from_nodes_are_registered() {
        let layout = layout_of(&["known"], &[("known", "implicit")]);
        assert!(layout.positions.contains_key("implicit"));
    }

    #[test]
    fn engine_geometry_deserializes_with_defaults() {
        let engine: LayeredLayoutEngine = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(engine, LayeredLayoutEngine::default());
    }

    #[test]
    fn cycle_is_reported_as_an_error() {
        let nodes: Vec<String> = vec!["a".into(), "b".into()];
        let edges: Vec<(String, String)> =
            vec![("a".into(), "b".into()), ("b".into(), "a".into())];

        let result = LayeredLayoutEngine::new().layout(&nodes, &edges);
        assert!(matches!(result, Err(Error::CycleDetected { .. })));
    }
}
