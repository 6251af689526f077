use serde::{Deserialize, Serialize};
use strum::VariantNames;
use strum_macros::{Display, EnumString, EnumVariantNames};

use crate::error::FrontierError;
use crate::frontier::{engine::{FrontierEngine, Relaxation, RunState, VertexState},
                      heuristic::Heuristic,
                      outcome::{best_values, AStarSearch, Path, SearchOutcome, ShortestPaths,
                                SpanningForest, SpanningTree}};
use crate::graph::{GraphView, VertexId, Weight};

/// Frontier expansion strategies that can be selected by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumVariantNames, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Prim,
    Dijkstra,
    AStar,
}

impl StrategyKind {
    /// Returns a list of available frontier strategies
    pub fn available_strategies() -> Vec<String> {
        Self::VARIANTS.iter()
            .map(<&str>::to_string)
            .collect::<Vec<_>>()
    }
}

/// Prim: a vertex is worth the weight of the cheapest edge connecting it to the tree
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimRelaxation;

impl Relaxation for PrimRelaxation {
    fn relax(&self, _current: &VertexState, _neighbor: VertexId, weight: Weight) -> Weight {
        weight
    }
}

/// Dijkstra: a vertex is worth the length of the shortest known path to it
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRelaxation {
    pub target: Option<VertexId>,
}

impl Relaxation for DijkstraRelaxation {
    fn relax(&self, current: &VertexState, _neighbor: VertexId, weight: Weight) -> Weight {
        current.best.saturating_add(weight)
    }

    fn goal(&self) -> Option<VertexId> {
        self.target
    }
}

/// A*: best values are g-scores, vertices are ordered by `g + h`
pub struct AStarRelaxation<'h, H: Heuristic + ?Sized> {
    pub goal: VertexId,
    pub heuristic: &'h H,
}

impl<'h, H: Heuristic + ?Sized> Relaxation for AStarRelaxation<'h, H> {
    fn relax(&self, current: &VertexState, _neighbor: VertexId, weight: Weight) -> Weight {
        current.best.saturating_add(weight)
    }

    fn priority(&self, vertex: VertexId, best: Weight) -> Weight {
        best.saturating_add(self.heuristic.estimate(vertex, self.goal))
    }

    fn goal(&self) -> Option<VertexId> {
        Some(self.goal)
    }
}

/// Compute a minimum spanning tree of the undirected `graph` with Prim's algorithm,
/// growing it from `root`. Every undirected edge must be present in both directions.
/// Returns `FrontierError::Disconnected` if the tree cannot reach every vertex.
pub fn prim<G: GraphView>(graph: &G, root: VertexId) -> Result<SpanningTree, FrontierError> {
    let mut engine = FrontierEngine::new(graph, PrimRelaxation, root)?;
    engine.run();

    let num_vertices = graph.num_vertices();
    let reached = engine.settle_order().len();
    if reached < num_vertices {
        log::info!("Spanning tree from root {} reaches only {} of {} vertices", root, reached, num_vertices);
        return Err(FrontierError::Disconnected { reached, num_vertices });
    }

    let tree = SpanningTree::from_settled(root, engine.settle_order(), engine.vertex_states());
    log::info!("Computed minimum spanning tree from root {} with total weight {}", root, tree.total_weight);

    Ok(tree)
}

/// Compute a minimum spanning forest of the undirected `graph`: one minimum spanning
/// tree per connected component, each rooted at its lowest vertex id
pub fn prim_forest<G: GraphView>(graph: &G) -> Result<SpanningForest, FrontierError> {
    let mut engine = FrontierEngine::new(graph, PrimRelaxation, 0)?;
    let mut trees = Vec::new();
    let mut root = 0;

    loop {
        let start = engine.settle_order().len();
        engine.run();
        trees.push(SpanningTree::from_settled(root, &engine.settle_order()[start..], engine.vertex_states()));

        match engine.vertex_states().iter().position(|vs| !vs.settled) {
            Some(next_root) => {
                engine.reseed(next_root)?;
                root = next_root;
            }
            None => break
        }
    }

    let forest = SpanningForest::new(trees);
    log::info!("Computed minimum spanning forest with {} trees and total weight {}",
        forest.trees.len(), forest.total_weight);

    Ok(forest)
}

/// Compute the shortest distances from `source` to every vertex of `graph`
pub fn dijkstra<G: GraphView>(graph: &G, source: VertexId) -> Result<ShortestPaths, FrontierError> {
    let mut engine = FrontierEngine::new(graph, DijkstraRelaxation::default(), source)?;
    engine.run();

    log::info!("Computed shortest distances from source {} to {} vertices",
        source, engine.settle_order().len());

    Ok(ShortestPaths::from_states(source, engine.vertex_states()))
}

/// Compute the shortest path from `source` to `target`, stopping as soon as `target` is settled
pub fn dijkstra_to<G: GraphView>(graph: &G, source: VertexId, target: VertexId) -> Result<SearchOutcome, FrontierError> {
    let relaxation = DijkstraRelaxation { target: Some(target) };
    let mut engine = FrontierEngine::new(graph, relaxation, source)?;

    Ok(goal_outcome(&mut engine, target))
}

/// Search the shortest path from `source` to `goal` with A*, guided by `heuristic`.
/// The path is only guaranteed to be optimal for admissible heuristics.
pub fn a_star<G, H>(graph: &G, source: VertexId, goal: VertexId, heuristic: &H) -> Result<AStarSearch, FrontierError>
where
    G: GraphView,
    H: Heuristic + ?Sized,
{
    let mut engine = FrontierEngine::new(graph, AStarRelaxation { goal, heuristic }, source)?;
    let outcome = goal_outcome(&mut engine, goal);

    let states = engine.vertex_states();
    Ok(AStarSearch {
        source,
        goal,
        outcome,
        distances: best_values(states),
        predecessors: states.iter().map(|vs| vs.predecessor).collect(),
        expanded: engine.settle_order().len(),
    })
}

/// Run `engine` until `goal` is settled or the frontier is exhausted
fn goal_outcome<G: GraphView, R: Relaxation>(engine: &mut FrontierEngine<G, R>, goal: VertexId) -> SearchOutcome {
    match engine.run() {
        RunState::GoalFound => {
            let cost = engine.vertex_states()[goal].best;
            let vertices = engine.path_to(goal).unwrap_or_default();
            log::info!("Found path to {} with cost {} after settling {} vertices",
                goal, cost, engine.settle_order().len());
            SearchOutcome::Found(Path { vertices, cost })
        }
        state => {
            log::info!("No path to {} (run ended in state {:?})", goal, state);
            SearchOutcome::NoPath
        }
    }
}
