use crate::domain::edge::Edge;
use crate::domain::error::ViewError;
use crate::domain::node::Node;
use crate::domain::ports::GraphView;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Builder output: everything a renderer needs to instantiate the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl LineageGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Navigable in-memory instance of a [`LineageGraph`].
pub struct LiveGraph {
    pub graph: DiGraph<Node, Edge>,
    id_to_node: HashMap<String, NodeIndex>,
}

impl LiveGraph {
    pub fn from_lineage(lineage: &LineageGraph) -> Result<Self, ViewError> {
        let mut graph = DiGraph::with_capacity(lineage.nodes.len(), lineage.edges.len());
        let mut id_to_node = HashMap::with_capacity(lineage.nodes.len());

        for node in &lineage.nodes {
            if id_to_node.contains_key(&node.id) {
                return Err(ViewError::DuplicateNode(node.id.clone()));
            }
            let idx = graph.add_node(node.clone());
            id_to_node.insert(node.id.clone(), idx);
        }

        for edge in &lineage.edges {
            let endpoint = |id: &str| {
                id_to_node
                    .get(id)
                    .copied()
                    .ok_or_else(|| ViewError::DanglingEdge {
                        source_id: edge.source.clone(),
                        target_id: edge.target.clone(),
                        missing: id.to_string(),
                    })
            };
            let source = endpoint(&edge.source)?;
            let target = endpoint(&edge.target)?;
            graph.add_edge(source, target, edge.clone());
        }

        Ok(Self { graph, id_to_node })
    }

    pub fn node_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_node.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    pub fn edge(&self, idx: EdgeIndex) -> &Edge {
        &self.graph[idx]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn edges_in(&self, node: NodeIndex, dir: Direction) -> Vec<EdgeIndex> {
        // petgraph yields adjacency newest-first; keep insertion order instead.
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(node, dir)
            .map(|e| e.id())
            .collect();
        edges.sort();
        edges
    }
}

impl GraphView for LiveGraph {
    type NodeRef = NodeIndex;
    type EdgeRef = EdgeIndex;

    fn in_edges(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        self.edges_in(node, Direction::Incoming)
    }

    fn out_edges(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        self.edges_in(node, Direction::Outgoing)
    }

    fn source(&self, edge: EdgeIndex) -> NodeIndex {
        self.graph.raw_edges()[edge.index()].source()
    }

    fn target(&self, edge: EdgeIndex) -> NodeIndex {
        self.graph.raw_edges()[edge.index()].target()
    }

    fn source_anchor(&self, edge: EdgeIndex) -> &str {
        &self.graph[edge].source_anchor
    }

    fn target_anchor(&self, edge: EdgeIndex) -> &str {
        &self.graph[edge].target_anchor
    }

    fn id(&self, node: NodeIndex) -> &str {
        &self.graph[node].id
    }
}
