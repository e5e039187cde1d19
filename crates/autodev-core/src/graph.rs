//! Stage dependency graph
//!
//! Names the generation stages and their ordering. Graphs produced by the
//! heuristic generator are always the fixed chain returned by
//! [`DependencyGraph::default_chain`]; graphs supplied by a model are checked
//! for dangling edges and cycles before they are accepted.

use crate::error::GraphError;
use indexmap::IndexSet;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

/// Stages of the fixed generation chain, in execution order
pub const DEFAULT_STAGES: [&str; 4] = ["database", "backend", "frontend", "testing"];

/// Directed edge between two named stages
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Upstream stage
    #[serde(alias = "from")]
    pub from_node: String,
    /// Downstream stage
    pub to: String,
}

impl DependencyEdge {
    /// Create new edge
    #[inline]
    #[must_use]
    pub fn new(from_node: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_node: from_node.into(),
            to: to.into(),
        }
    }
}

/// Stage graph: a node set plus ordered edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Declared stages (insertion ordered, unique)
    pub nodes: IndexSet<String>,
    /// Ordering constraints between stages
    pub edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Linear chain through `stages` in the given order
    #[must_use]
    pub fn chain<S: AsRef<str>>(stages: &[S]) -> Self {
        let nodes: IndexSet<String> = stages.iter().map(|s| s.as_ref().to_string()).collect();
        let edges = stages
            .windows(2)
            .map(|pair| DependencyEdge::new(pair[0].as_ref(), pair[1].as_ref()))
            .collect();

        Self { nodes, edges }
    }

    /// `database -> backend -> frontend -> testing`
    // TODO: derive stages from tech hints once emission agents can be skipped per story.
    #[inline]
    #[must_use]
    pub fn default_chain() -> Self {
        Self::chain(&DEFAULT_STAGES)
    }

    /// Check that every edge endpoint is declared and that the graph is acyclic
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for node in &self.nodes {
            graph.add_node(node.as_str());
        }

        for edge in &self.edges {
            for endpoint in [&edge.from_node, &edge.to] {
                if !self.nodes.contains(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        from: edge.from_node.clone(),
                        to: edge.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }

            if edge.from_node == edge.to {
                return Err(GraphError::SelfLoop(edge.from_node.clone()));
            }

            graph.add_edge(edge.from_node.as_str(), edge.to.as_str(), ());
        }

        petgraph::algo::toposort(&graph, None)
            .map(|_| ())
            .map_err(|cycle| GraphError::CycleDetected(cycle.node_id().to_string()))
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::default_chain()
    }
}
