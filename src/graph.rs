use std::{fmt::Formatter,
          fs,
          num::ParseIntError,
          str::Lines};

use rand::prelude::*;
use serde::Serialize;

/// Dense vertex identifier in `[0, num_vertices)`
pub type VertexId = usize;

/// Edge weight, distance or priority
pub type Weight = usize;

/// Best value of a vertex that has not been reached yet
pub const INFINITY: Weight = Weight::MAX;

/// Read-only view on a weighted graph as consumed by the frontier engine.
/// `neighbors` must be restartable: it is called once per settled vertex.
pub trait GraphView {
    type Neighbors<'a>: Iterator<Item = (VertexId, Weight)>
    where
        Self: 'a;

    /// Get the number of vertices
    fn num_vertices(&self) -> usize;

    /// Get the out-neighbors of `vertex` together with the weights of the connecting edges
    fn neighbors(&self, vertex: VertexId) -> Self::Neighbors<'_>;
}

/// A directed graph edge with source, target and weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub src: VertexId,
    pub tgt: VertexId,
    pub dist: Weight,
}

/// A directed graph with edges sorted by source and per-vertex edge offsets
#[derive(Debug, Serialize)]
pub struct Graph {
    pub edges: Vec<Edge>,
    pub offsets: Vec<usize>,
    pub num_nodes: usize,
    pub num_edges: usize,
}

/// Iterator over the out-edges of one vertex
pub struct NeighborIter<'a> {
    edges: std::slice::Iter<'a, Edge>,
}

impl<'a> Iterator for NeighborIter<'a> {
    type Item = (VertexId, Weight);

    fn next(&mut self) -> Option<Self::Item> {
        self.edges.next().map(|edge| (edge.tgt, edge.dist))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.edges.size_hint()
    }
}

impl GraphView for Graph {
    type Neighbors<'a> = NeighborIter<'a>;

    fn num_vertices(&self) -> usize {
        self.num_nodes
    }

    fn neighbors(&self, vertex: VertexId) -> Self::Neighbors<'_> {
        NeighborIter {
            edges: self.edges[self.offsets[vertex]..self.offsets[vertex + 1]].iter(),
        }
    }
}

/// Plain adjacency lists, `adj[v]` holding `(neighbor, weight)` pairs
impl GraphView for Vec<Vec<(VertexId, Weight)>> {
    type Neighbors<'a> = std::iter::Copied<std::slice::Iter<'a, (VertexId, Weight)>>;

    fn num_vertices(&self) -> usize {
        self.len()
    }

    fn neighbors(&self, vertex: VertexId) -> Self::Neighbors<'_> {
        self[vertex].iter().copied()
    }
}

impl Graph {
    /// Create a directed graph with `num_nodes` vertices from a list of edges.
    /// Returns an error if an edge refers to a vertex outside of `[0, num_nodes)`.
    pub fn from_edges(num_nodes: usize, mut edges: Vec<Edge>) -> Result<Self, ParseError> {
        if let Some(edge) = edges.iter().find(|e| e.src >= num_nodes || e.tgt >= num_nodes) {
            let invalid = if edge.src >= num_nodes { edge.src } else { edge.tgt };
            return Err(ParseError::InvalidNode(invalid));
        }

        // Stable, so parallel edges keep their input order
        edges.sort_by_key(|e| e.src);

        let mut offsets = vec![0; num_nodes + 1];
        for edge in &edges {
            offsets[edge.src + 1] += 1;
        }
        for i in 0..num_nodes {
            offsets[i + 1] += offsets[i];
        }

        Ok(Self {
            num_nodes,
            num_edges: edges.len(),
            edges,
            offsets,
        })
    }

    /// Create a graph that holds both directions of every `(a, b, weight)` triple
    pub fn from_undirected_edges(num_nodes: usize, edges: &[(VertexId, VertexId, Weight)]) -> Result<Self, ParseError> {
        let directed = edges.iter()
            .flat_map(|&(a, b, dist)| [Edge { src: a, tgt: b, dist }, Edge { src: b, tgt: a, dist }])
            .collect();
        Self::from_edges(num_nodes, directed)
    }

    /// Parse a graph from the file at `file_path`
    pub fn parse_from_file(file_path: &str) -> Result<Self, ParseError> {
        let content = fs::read_to_string(file_path)?;
        Self::parse_from_str(&content)
    }

    /// Parse a graph from text: `#` comment lines, the number of vertices,
    /// the number of edges and one `src tgt weight` line per directed edge
    pub fn parse_from_str(content: &str) -> Result<Self, ParseError> {
        let mut lines = LineCursor::new(content);

        let num_nodes: usize = lines.next_content()?.trim().parse()?;
        let num_edges: usize = lines.next_content()?.trim().parse()?;

        let mut edges = Vec::with_capacity(num_edges);
        for _ in 0..num_edges {
            let line = lines.next_content()?;
            let line_no = lines.line_no;
            let mut split = line.split_whitespace();

            let edge = Edge {
                src: split.next()
                    .ok_or(ParseError::MissingField(line_no, "edge source"))?
                    .parse()?,
                tgt: split.next()
                    .ok_or(ParseError::MissingField(line_no, "edge target"))?
                    .parse()?,
                dist: split.next()
                    .ok_or(ParseError::MissingField(line_no, "edge weight"))?
                    .parse()?,
            };
            edges.push(edge);
        }

        Self::from_edges(num_nodes, edges)
    }

    /// Get the number of outgoing edges of the node with id `node_id`
    pub fn get_out_degree(&self, node_id: VertexId) -> usize {
        self.offsets[node_id + 1] - self.offsets[node_id]
    }

    /// Create the graph with every edge pointing in the opposite direction
    pub fn reversed(&self) -> Self {
        let edges = self.edges.iter()
            .map(|e| Edge { src: e.tgt, tgt: e.src, dist: e.dist })
            .collect();
        // All vertices were validated when `self` was built
        match Self::from_edges(self.num_nodes, edges) {
            Ok(graph) => graph,
            Err(err) => unreachable!("reversing a valid graph failed: {}", err),
        }
    }

    /// Generate an undirected `rows` x `cols` grid graph with 4-neighbourhood and random
    /// weights in `1..=max_weight`. The vertex in row `r` and column `c` has id `r * cols + c`.
    pub fn gen_grid<R: Rng>(rows: usize, cols: usize, max_weight: Weight, rng: &mut R) -> Self {
        let mut edges = Vec::with_capacity(2 * rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let id = r * cols + c;
                if c + 1 < cols {
                    edges.push((id, id + 1, rng.gen_range(1..=max_weight)));
                }
                if r + 1 < rows {
                    edges.push((id, id + cols, rng.gen_range(1..=max_weight)));
                }
            }
        }
        match Self::from_undirected_edges(rows * cols, &edges) {
            Ok(graph) => graph,
            Err(err) => unreachable!("generated grid is invalid: {}", err),
        }
    }

    /// Generate a connected undirected graph: a random spanning tree over `num_nodes`
    /// vertices plus `extra_edges` random edges, all weights in `1..=max_weight`
    pub fn gen_random_connected<R: Rng>(num_nodes: usize, extra_edges: usize, max_weight: Weight,
                                        rng: &mut R) -> Self {
        let mut order: Vec<VertexId> = (0..num_nodes).collect();
        order.shuffle(rng);

        let mut edges = Vec::with_capacity(num_nodes + extra_edges);
        for i in 1..num_nodes {
            let parent = order[rng.gen_range(0..i)];
            edges.push((parent, order[i], rng.gen_range(1..=max_weight)));
        }
        if num_nodes > 1 {
            for _ in 0..extra_edges {
                let a = rng.gen_range(0..num_nodes);
                let b = rng.gen_range(0..num_nodes);
                if a != b {
                    edges.push((a, b, rng.gen_range(1..=max_weight)));
                }
            }
        }
        match Self::from_undirected_edges(num_nodes, &edges) {
            Ok(graph) => graph,
            Err(err) => unreachable!("generated graph is invalid: {}", err),
        }
    }
}

/// Line reader that skips `#` comments and blank lines and counts line numbers
pub(crate) struct LineCursor<'a> {
    lines: Lines<'a>,
    pub(crate) line_no: usize,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines(),
            line_no: 0,
        }
    }

    /// Get the next line with content, if any
    pub(crate) fn try_next_content(&mut self) -> Option<&'a str> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                return Some(line);
            }
        }
        None
    }

    /// Get the next line with content or fail with the current line number
    pub(crate) fn next_content(&mut self) -> Result<&'a str, ParseError> {
        self.try_next_content()
            .ok_or(ParseError::UnexpectedEof(self.line_no))
    }
}

#[derive(Debug)]
pub enum ParseError {
    IO(std::io::Error),
    ParseInt(ParseIntError),
    UnexpectedEof(usize),
    MissingField(usize, &'static str),
    InvalidNode(usize),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(err) => write!(f, "{}", err),
            Self::ParseInt(err) => write!(f, "{}", err),
            Self::UnexpectedEof(line_no) => write!(f, "Unexpected EOF after line {}", line_no),
            Self::MissingField(line_no, field) =>
                write!(f, "Unexpected EOL while parsing {} in line {}", field, line_no),
            Self::InvalidNode(node_id) => write!(f, "Invalid node {}", node_id)
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Self::IO(ref err) => Some(err),
            Self::ParseInt(ref err) => Some(err),
            _ => None
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IO(err)
    }
}

impl From<ParseIntError> for ParseError {
    fn from(err: ParseIntError) -> Self {
        Self::ParseInt(err)
    }
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use crate::graph::{Edge, Graph, GraphView, ParseError};

    const SAMPLE: &str = "\
# Directed sample graph
# vertices, edges, then src tgt weight

4
5
0 1 5
2 3 1
0 2 9
1 2 4
# trailing comment
3 0 7
";

    #[test]
    fn test_parse() {
        let graph = Graph::parse_from_str(SAMPLE).unwrap();

        assert_eq!(graph.num_nodes, 4);
        assert_eq!(graph.num_edges, 5);
        assert_eq!(graph.offsets, vec![0, 2, 3, 4, 5]);

        let from_0: Vec<_> = graph.neighbors(0).collect();
        assert_eq!(from_0, vec![(1, 5), (2, 9)]);
        assert_eq!(graph.get_out_degree(2), 1);
        assert_eq!(graph.neighbors(3).collect::<Vec<_>>(), vec![(0, 7)]);
    }

    #[test]
    fn test_parse_errors() {
        match Graph::parse_from_str("3\n2\n0 1 4\n") {
            Err(ParseError::UnexpectedEof(line)) => assert_eq!(line, 3),
            other => panic!("expected unexpected EOF, got {:?}", other),
        }
        match Graph::parse_from_str("3\n1\n0 1\n") {
            Err(ParseError::MissingField(line, field)) => {
                assert_eq!(line, 3);
                assert_eq!(field, "edge weight");
            }
            other => panic!("expected missing field, got {:?}", other),
        }
        assert!(matches!(Graph::parse_from_str("3\n1\n0 7 1\n"), Err(ParseError::InvalidNode(7))));
        assert!(matches!(Graph::parse_from_str("three\n"), Err(ParseError::ParseInt(_))));
        assert!(matches!(Graph::parse_from_file("does/not/exist.graph"), Err(ParseError::IO(_))));
    }

    #[test]
    fn test_isolated_trailing_nodes() {
        let graph = Graph::from_edges(5, vec![Edge { src: 1, tgt: 0, dist: 2 }]).unwrap();

        assert_eq!(graph.offsets, vec![0, 0, 1, 1, 1, 1]);
        for node in [0, 2, 3, 4] {
            assert_eq!(graph.neighbors(node).count(), 0, "node {} should have no out-edges", node);
        }
    }

    #[test]
    fn test_undirected_and_reversed() {
        let graph = Graph::from_undirected_edges(3, &[(0, 1, 4), (1, 2, 6)]).unwrap();
        assert_eq!(graph.num_edges, 4);
        assert_eq!(graph.neighbors(1).collect::<Vec<_>>(), vec![(0, 4), (2, 6)]);

        let directed = Graph::from_edges(3, vec![Edge { src: 0, tgt: 2, dist: 3 }]).unwrap();
        let reversed = directed.reversed();
        assert_eq!(reversed.neighbors(2).collect::<Vec<_>>(), vec![(0, 3)]);
        assert_eq!(reversed.neighbors(0).count(), 0);
    }

    #[test]
    fn test_adjacency_lists() {
        let adj: Vec<Vec<(usize, usize)>> = vec![vec![(1, 2)], vec![], vec![(0, 1), (1, 8)]];
        assert_eq!(adj.num_vertices(), 3);
        assert_eq!(adj.neighbors(2).collect::<Vec<_>>(), vec![(0, 1), (1, 8)]);
    }

    #[test]
    fn test_generators() {
        let mut rng = StdRng::seed_from_u64(7);

        let grid = Graph::gen_grid(3, 4, 9, &mut rng);
        assert_eq!(grid.num_nodes, 12);
        // 3 * 3 horizontal + 2 * 4 vertical, both directions
        assert_eq!(grid.num_edges, 2 * (9 + 8));
        assert!(grid.edges.iter().all(|e| e.dist >= 1 && e.dist <= 9));

        let random = Graph::gen_random_connected(50, 30, 20, &mut rng);
        assert_eq!(random.num_nodes, 50);
        assert!(random.num_edges >= 2 * 49, "num edges: {}", random.num_edges);
        for edge in &random.edges {
            let back = random.neighbors(edge.tgt).any(|(n, w)| n == edge.src && w == edge.dist);
            assert!(back, "edge {:?} has no reverse edge", edge);
        }
    }
}
