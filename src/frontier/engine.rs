use crate::binary_minheap::BinaryMinHeap;
use crate::error::FrontierError;
use crate::graph::{GraphView, VertexId, Weight, INFINITY};

/// Lifecycle of a frontier run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Unstarted,
    Running,
    /// Every vertex reachable from the seeds has been settled
    Completed,
    /// The goal vertex has been settled
    GoalFound,
    /// The frontier ran dry before the goal was settled
    Exhausted,
}

impl RunState {
    /// Is this a state in which no further vertex will be settled?
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::GoalFound | Self::Exhausted)
    }
}

/// Traversal state of a single vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexState {
    /// Best known value, `INFINITY` if the vertex has not been reached
    pub best: Weight,
    /// Vertex through which `best` was achieved
    pub predecessor: Option<VertexId>,
    /// Set once the vertex has been extracted; `best` is final from then on
    pub settled: bool,
}

impl VertexState {
    fn unreached() -> Self {
        Self {
            best: INFINITY,
            predecessor: None,
            settled: false,
        }
    }

    /// Returns `true` if the vertex has been reached from a seed
    pub fn is_reached(&self) -> bool {
        self.best != INFINITY
    }
}

/// Problem specific rules plugged into the frontier engine
pub trait Relaxation {
    /// Candidate best value for `neighbor` when reached from the settled vertex `current`
    /// over an edge with weight `weight`
    fn relax(&self, current: &VertexState, neighbor: VertexId, weight: Weight) -> Weight;

    /// Heap priority of `vertex` given its best value `best`
    fn priority(&self, _vertex: VertexId, best: Weight) -> Weight {
        best
    }

    /// Vertex at which the run stops as soon as it is settled
    fn goal(&self) -> Option<VertexId> {
        None
    }
}

/// Greedy frontier expansion over a graph: repeatedly settles the frontier vertex
/// with the minimum priority and relaxes its out-edges.
///
/// Every vertex occupies exactly one heap slot from the start; relaxations only
/// ever decrease keys. All state is owned by the engine, so independent runs over
/// a shared graph need no synchronization.
pub struct FrontierEngine<'g, G: GraphView, R: Relaxation> {
    graph: &'g G,
    relaxation: R,
    heap: BinaryMinHeap,
    vertices: Vec<VertexState>,
    settle_order: Vec<VertexId>,
    state: RunState,
}

impl<'g, G: GraphView, R: Relaxation> FrontierEngine<'g, G, R> {
    /// Create a new engine that expands the frontier from `seed`.
    /// Fails if the graph is empty, or if `seed`, the goal of `relaxation` or the target
    /// of any edge is out of range.
    pub fn new(graph: &'g G, relaxation: R, seed: VertexId) -> Result<Self, FrontierError> {
        let num_vertices = graph.num_vertices();
        if num_vertices == 0 {
            return Err(FrontierError::EmptyGraph);
        }
        FrontierError::check_vertex(seed, num_vertices)?;
        if let Some(goal) = relaxation.goal() {
            FrontierError::check_vertex(goal, num_vertices)?;
        }
        for vertex in 0..num_vertices {
            for (neighbor, _) in graph.neighbors(vertex) {
                FrontierError::check_vertex(neighbor, num_vertices)?;
            }
        }

        let mut vertices = vec![VertexState::unreached(); num_vertices];
        vertices[seed].best = 0;

        let priorities: Vec<_> = vertices.iter()
            .enumerate()
            .map(|(vertex, vs)| if vs.is_reached() { reached_priority(&relaxation, vertex, vs.best) } else { INFINITY })
            .collect();

        Ok(Self {
            graph,
            relaxation,
            heap: BinaryMinHeap::from_priorities(&priorities),
            vertices,
            settle_order: Vec::with_capacity(num_vertices),
            state: RunState::Unstarted,
        })
    }

    /// Start a new tree at the unsettled vertex `seed`, e.g. after the run completed
    /// without reaching every vertex. A run that found its goal cannot be reseeded.
    pub fn reseed(&mut self, seed: VertexId) -> Result<(), FrontierError> {
        if self.state == RunState::GoalFound {
            if let Some(goal) = self.relaxation.goal() {
                return Err(FrontierError::GoalSettled { goal });
            }
        }
        FrontierError::check_vertex(seed, self.vertices.len())?;
        if self.vertices[seed].settled {
            return Err(FrontierError::AlreadySettled { vertex: seed });
        }

        let vs = &mut self.vertices[seed];
        vs.best = 0;
        vs.predecessor = None;
        self.heap.decrease_key(seed, reached_priority(&self.relaxation, seed, 0));

        if self.state != RunState::Unstarted {
            self.state = RunState::Running;
        }
        log::debug!("Reseeded frontier at vertex {}", seed);

        Ok(())
    }

    /// Terminal state the run ends in once the frontier is empty
    fn drained_state(&self) -> RunState {
        if self.relaxation.goal().is_some() {
            RunState::Exhausted
        } else {
            RunState::Completed
        }
    }

    /// Settle the next vertex and relax its out-edges.
    /// Returns the settled vertex, or `None` once the run is in a terminal state.
    pub fn step(&mut self) -> Option<VertexId> {
        if self.state.is_terminal() {
            return None;
        }
        self.state = RunState::Running;

        // Reached vertices sort before unreached ones, so an unreached minimum
        // means no remaining vertex can be reached from any seed
        match self.heap.peek() {
            Some(entry) if self.vertices[entry.vertex].is_reached() => (),
            _ => {
                self.state = self.drained_state();
                return None;
            }
        }
        let entry = self.heap.pop()?;
        let current = entry.vertex;

        debug_assert!(!self.vertices[current].settled, "vertex {} settled twice", current);
        self.vertices[current].settled = true;
        self.settle_order.push(current);

        log::debug!("Settled vertex {} with priority {} (best {}, via {:?})",
            current, entry.priority, self.vertices[current].best, self.vertices[current].predecessor);

        if self.relaxation.goal() == Some(current) {
            self.state = RunState::GoalFound;
            return Some(current);
        }

        let graph = self.graph;
        let current_state = self.vertices[current];
        for (neighbor, weight) in graph.neighbors(current) {
            let neighbor_state = &mut self.vertices[neighbor];
            if neighbor_state.settled {
                continue;
            }

            let candidate = self.relaxation.relax(&current_state, neighbor, weight);
            if candidate < neighbor_state.best {
                log::trace!("Relaxed vertex {} from {} to {} via {}",
                    neighbor, neighbor_state.best, candidate, current);
                neighbor_state.best = candidate;
                neighbor_state.predecessor = Some(current);
                self.heap.decrease_key(neighbor, reached_priority(&self.relaxation, neighbor, candidate));
            }
        }

        Some(current)
    }

    /// Settle vertices until the run reaches a terminal state
    pub fn run(&mut self) -> RunState {
        while self.step().is_some() {}

        log::debug!("Frontier run ended in state {:?} after settling {} of {} vertices",
            self.state, self.settle_order.len(), self.vertices.len());

        self.state
    }

    /// Get the current state of the run
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Get the traversal state of all vertices
    pub fn vertex_states(&self) -> &[VertexState] {
        &self.vertices
    }

    /// Get the vertices in the order they have been settled
    pub fn settle_order(&self) -> &[VertexId] {
        &self.settle_order
    }

    /// Follow the predecessor links from `target` back to its seed.
    /// Returns the vertices from seed to `target`, or `None` if `target` has not been reached.
    pub fn path_to(&self, target: VertexId) -> Option<Vec<VertexId>> {
        if !self.vertices.get(target)?.is_reached() {
            return None;
        }
        Some(walk_predecessors(target, |v| self.vertices[v].predecessor))
    }
}

/// Heap priority of a reached vertex, kept below `INFINITY` so that it is always
/// extracted before every unreached vertex
fn reached_priority<R: Relaxation>(relaxation: &R, vertex: VertexId, best: Weight) -> Weight {
    relaxation.priority(vertex, best).min(INFINITY - 1)
}

/// Walk the predecessor chain from `target` back to the seed it was reached from
/// and return it in seed-to-target order
pub(crate) fn walk_predecessors<P>(target: VertexId, predecessor: P) -> Vec<VertexId>
where
    P: Fn(VertexId) -> Option<VertexId>,
{
    let mut path = vec![target];
    let mut current = target;
    while let Some(pred) = predecessor(current) {
        path.push(pred);
        current = pred;
    }

    path.reverse();
    path
}
