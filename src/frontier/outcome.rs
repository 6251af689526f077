use serde::Serialize;

use crate::frontier::engine::{walk_predecessors, VertexState};
use crate::graph::{VertexId, Weight};

/// A path from a source to a target with its total cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    pub vertices: Vec<VertexId>,
    pub cost: Weight,
}

/// Result of a search for a single target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(Path),
    NoPath,
}

impl SearchOutcome {
    /// Get the found path, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::NoPath => None
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Single-source shortest distances and the predecessors realizing them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortestPaths {
    pub source: VertexId,
    /// Distance of every vertex, `None` if it is unreachable
    pub distances: Vec<Option<Weight>>,
    pub predecessors: Vec<Option<VertexId>>,
}

impl ShortestPaths {
    pub(crate) fn from_states(source: VertexId, vertices: &[VertexState]) -> Self {
        Self {
            source,
            distances: best_values(vertices),
            predecessors: vertices.iter().map(|vs| vs.predecessor).collect(),
        }
    }

    /// Get the shortest distance from the source to `target`.
    /// Returns `None` if `target` is unreachable or out of range.
    pub fn distance(&self, target: VertexId) -> Option<Weight> {
        self.distances.get(target).copied().flatten()
    }

    /// Returns `true` if `target` can be reached from the source
    pub fn is_reachable(&self, target: VertexId) -> bool {
        self.distance(target).is_some()
    }

    /// Reconstruct the shortest path from the source to `target`
    pub fn path_to(&self, target: VertexId) -> SearchOutcome {
        match self.distance(target) {
            Some(cost) => SearchOutcome::Found(Path {
                vertices: walk_predecessors(target, |v| self.predecessors[v]),
                cost,
            }),
            None => SearchOutcome::NoPath
        }
    }
}

/// Result of an A* search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AStarSearch {
    pub source: VertexId,
    pub goal: VertexId,
    pub outcome: SearchOutcome,
    /// Best known path cost (g-score) of every vertex when the search ended
    pub distances: Vec<Option<Weight>>,
    pub predecessors: Vec<Option<VertexId>>,
    /// Number of vertices settled before the search ended
    pub expanded: usize,
}

/// Edge of a spanning tree from `parent` (already in the tree) to `child`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpanningEdge {
    pub parent: VertexId,
    pub child: VertexId,
    pub weight: Weight,
}

/// Minimum spanning tree of one connected component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanningTree {
    pub root: VertexId,
    /// Tree edges in the order their child vertices were added
    pub edges: Vec<SpanningEdge>,
    pub total_weight: Weight,
}

impl SpanningTree {
    /// Collect the tree grown from `root`, whose vertices were settled in `order`
    pub(crate) fn from_settled(root: VertexId, order: &[VertexId], vertices: &[VertexState]) -> Self {
        let edges: Vec<_> = order.iter()
            .filter_map(|&child| vertices[child].predecessor.map(|parent| SpanningEdge {
                parent,
                child,
                weight: vertices[child].best,
            }))
            .collect();
        let total_weight = edges.iter().map(|e| e.weight).sum();

        Self {
            root,
            edges,
            total_weight,
        }
    }

    /// Get the number of vertices spanned by this tree
    pub fn num_vertices(&self) -> usize {
        self.edges.len() + 1
    }
}

/// Minimum spanning forest, one tree per connected component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanningForest {
    pub trees: Vec<SpanningTree>,
    pub total_weight: Weight,
}

impl SpanningForest {
    pub(crate) fn new(trees: Vec<SpanningTree>) -> Self {
        let total_weight = trees.iter().map(|t| t.total_weight).sum();
        Self { trees, total_weight }
    }

    /// Returns `true` if the forest is a single tree, i.e. the graph is connected
    pub fn is_connected(&self) -> bool {
        self.trees.len() == 1
    }
}

/// Convert best values to distances, mapping unreached vertices to `None`
pub(crate) fn best_values(vertices: &[VertexState]) -> Vec<Option<Weight>> {
    vertices.iter()
        .map(|vs| if vs.is_reached() { Some(vs.best) } else { None })
        .collect()
}
