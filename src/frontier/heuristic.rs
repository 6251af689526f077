use std::fs;

use crate::graph::{LineCursor, ParseError, VertexId, Weight};

/// Estimate of the remaining cost from a vertex to the goal for A* search.
///
/// A* only returns optimal paths for admissible heuristics, i.e. ones that never
/// overestimate the true remaining cost. This is not checked at runtime.
pub trait Heuristic {
    fn estimate(&self, vertex: VertexId, goal: VertexId) -> Weight;
}

impl<F> Heuristic for F
where
    F: Fn(VertexId, VertexId) -> Weight,
{
    fn estimate(&self, vertex: VertexId, goal: VertexId) -> Weight {
        self(vertex, goal)
    }
}

/// Heuristic without any information; A* then settles vertices like Dijkstra
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _vertex: VertexId, _goal: VertexId) -> Weight {
        0
    }
}

/// Precomputed per-vertex estimates towards one fixed goal.
/// Vertices without a table entry are estimated at 0.
#[derive(Debug, Clone, Default)]
pub struct TableHeuristic {
    values: Vec<Weight>,
}

impl TableHeuristic {
    pub fn new(values: Vec<Weight>) -> Self {
        Self { values }
    }

    /// Parse estimates from the file at `file_path`
    pub fn parse_from_file(file_path: &str) -> Result<Self, ParseError> {
        let content = fs::read_to_string(file_path)?;
        Self::parse_from_str(&content)
    }

    /// Parse estimates from text holding one value per line, in vertex order.
    /// Lines starting with `#` are ignored.
    pub fn parse_from_str(content: &str) -> Result<Self, ParseError> {
        let mut lines = LineCursor::new(content);
        let mut values = Vec::new();
        while let Some(line) = lines.try_next_content() {
            values.push(line.trim().parse()?);
        }
        Ok(Self::new(values))
    }

    /// Get the number of vertices with an estimate
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Heuristic for TableHeuristic {
    fn estimate(&self, vertex: VertexId, _goal: VertexId) -> Weight {
        self.values.get(vertex).copied().unwrap_or(0)
    }
}
