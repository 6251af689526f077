use std::{fs,
          str::FromStr,
          sync::Arc};

use serde::{Deserialize, Serialize};

use crate::error::FrontierError;
use crate::frontier::{heuristic::{Heuristic, TableHeuristic, ZeroHeuristic},
                      outcome::{AStarSearch, SearchOutcome, ShortestPaths, SpanningForest, SpanningTree},
                      strategy::{self, StrategyKind}};
use crate::graph::{Graph, VertexId};

/// Settings for a frontier problem instance
#[derive(Debug, Deserialize, Clone)]
pub struct FrontierSettings {
    pub graph_name: String,
    pub strategy_name: String,
    /// Source of Dijkstra and A*, root of Prim
    #[serde(default)]
    pub source: VertexId,
    /// Target of Dijkstra (optional) and A* (required)
    #[serde(default)]
    pub goal: Option<VertexId>,
    /// File with per-vertex A* estimates towards `goal`
    #[serde(default)]
    pub heuristic_path: Option<String>,
    /// Compute a spanning forest instead of a single spanning tree with Prim
    #[serde(default)]
    pub forest: bool,
}

impl FrontierSettings {
    /// Create settings for running `strategy_name` from `source` on the graph `graph_name`
    pub fn new(graph_name: &str, strategy_name: &str, source: VertexId) -> Self {
        Self {
            graph_name: graph_name.to_string(),
            strategy_name: strategy_name.to_string(),
            source,
            goal: None,
            heuristic_path: None,
            forest: false,
        }
    }

    /// Read settings from the JSON file at `file_path`
    pub fn from_file(file_path: &str) -> Result<Self, FrontierError> {
        let content = fs::read_to_string(file_path)
            .map_err(|err| FrontierError::BadSettings {
                message: format!("Failed to read settings file '{}': {}", file_path, err)
            })?;
        serde_json::from_str(&content)
            .map_err(|err| FrontierError::BadSettings {
                message: format!("Invalid settings file '{}': {}", file_path, err)
            })
    }
}

/// Result of solving a frontier problem
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum FrontierResponse {
    SpanningTree(SpanningTree),
    SpanningForest(SpanningForest),
    ShortestPaths(ShortestPaths),
    Route(SearchOutcome),
    AStarSearch(AStarSearch),
}

/// A validated frontier problem instance on a shared graph
#[derive(Debug)]
pub struct FrontierProblem {
    graph: Arc<Graph>,
    settings: FrontierSettings,
    strategy: StrategyKind,
    heuristic: Option<TableHeuristic>,
}

impl FrontierProblem {
    /// Create a new problem instance on `graph`, validating `settings` against it
    pub fn new(graph: Arc<Graph>, settings: FrontierSettings) -> Result<Self, FrontierError> {
        let strategy = StrategyKind::from_str(&settings.strategy_name)
            .map_err(|_| FrontierError::BadSettings {
                message: format!("Unknown strategy '{}', expected one of {:?}",
                                 settings.strategy_name, StrategyKind::available_strategies())
            })?;

        if graph.num_nodes == 0 {
            return Err(FrontierError::EmptyGraph);
        }
        FrontierError::check_vertex(settings.source, graph.num_nodes)?;
        if let Some(goal) = settings.goal {
            FrontierError::check_vertex(goal, graph.num_nodes)?;
        }

        if strategy == StrategyKind::AStar && settings.goal.is_none() {
            return Err(FrontierError::BadSettings {
                message: "Strategy 'a_star' requires a goal".to_string()
            });
        }

        let heuristic = match &settings.heuristic_path {
            Some(path) => {
                let table = TableHeuristic::parse_from_file(path)
                    .map_err(|err| FrontierError::BadSettings {
                        message: format!("Failed to parse heuristic '{}': {}", path, err)
                    })?;
                if table.len() < graph.num_nodes {
                    log::warn!("Heuristic '{}' covers only {} of {} vertices, the rest is estimated at 0",
                        path, table.len(), graph.num_nodes);
                }
                Some(table)
            }
            None => None
        };

        Ok(Self {
            graph,
            settings,
            strategy,
            heuristic,
        })
    }

    /// Get the strategy this problem is solved with
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn settings(&self) -> &FrontierSettings {
        &self.settings
    }

    /// Run the configured strategy on the graph
    pub fn solve(&self) -> Result<FrontierResponse, FrontierError> {
        let graph = self.graph.as_ref();
        let source = self.settings.source;
        log::info!("Solving with strategy {} from vertex {} on graph '{}'",
            self.strategy, source, self.settings.graph_name);

        let response = match (self.strategy, self.settings.goal) {
            (StrategyKind::Prim, _) if self.settings.forest =>
                FrontierResponse::SpanningForest(strategy::prim_forest(graph)?),
            (StrategyKind::Prim, _) =>
                FrontierResponse::SpanningTree(strategy::prim(graph, source)?),
            (StrategyKind::Dijkstra, Some(target)) =>
                FrontierResponse::Route(strategy::dijkstra_to(graph, source, target)?),
            (StrategyKind::Dijkstra, None) =>
                FrontierResponse::ShortestPaths(strategy::dijkstra(graph, source)?),
            (StrategyKind::AStar, Some(goal)) => {
                let heuristic: &dyn Heuristic = match &self.heuristic {
                    Some(table) => table,
                    None => {
                        log::warn!("No heuristic given for A*, falling back to Dijkstra order");
                        &ZeroHeuristic
                    }
                };
                FrontierResponse::AStarSearch(strategy::a_star(graph, source, goal, heuristic)?)
            }
            (StrategyKind::AStar, None) => return Err(FrontierError::BadSettings {
                message: "Strategy 'a_star' requires a goal".to_string()
            }),
        };

        Ok(response)
    }
}

#[cfg(test)]
mod test {
    use std::{env, fs, sync::Arc};

    use crate::error::FrontierError;
    use crate::frontier::{outcome::SearchOutcome,
                          problem::{FrontierProblem, FrontierResponse, FrontierSettings},
                          strategy::StrategyKind};
    use crate::graph::Graph;

    fn square() -> Arc<Graph> {
        Arc::new(Graph::from_undirected_edges(5, &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 0, 4)]).unwrap())
    }

    #[test]
    fn test_settings_from_json() {
        let settings: FrontierSettings = serde_json::from_str(
            r#"{"graph_name": "square", "strategy_name": "a_star", "source": 1, "goal": 3}"#).unwrap();
        assert_eq!(settings.source, 1);
        assert_eq!(settings.goal, Some(3));
        assert_eq!(settings.heuristic_path, None);
        assert!(!settings.forest);

        let path = env::temp_dir().join("greedy_frontier_settings_test.json");
        fs::write(&path, r#"{"graph_name": "square", "strategy_name": "prim", "forest": true}"#).unwrap();
        let settings = FrontierSettings::from_file(path.to_str().unwrap()).unwrap();
        assert!(settings.forest);
        assert_eq!(settings.source, 0);

        fs::write(&path, r#"{"graph_name": "square"}"#).unwrap();
        let err = FrontierSettings::from_file(path.to_str().unwrap()).unwrap_err();
        assert_eq!(err.name(), "Bad Settings");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bad_settings() {
        let graph = square();

        let err = FrontierProblem::new(graph.clone(), FrontierSettings::new("square", "kruskal", 0)).unwrap_err();
        assert!(matches!(err, FrontierError::BadSettings { .. }), "unexpected error: {:?}", err);

        let err = FrontierProblem::new(graph.clone(), FrontierSettings::new("square", "dijkstra", 5)).unwrap_err();
        assert_eq!(err, FrontierError::VertexOutOfRange { vertex: 5, num_vertices: 5 });

        let err = FrontierProblem::new(graph.clone(), FrontierSettings::new("square", "a_star", 0)).unwrap_err();
        assert!(matches!(err, FrontierError::BadSettings { .. }), "unexpected error: {:?}", err);

        let mut settings = FrontierSettings::new("square", "a_star", 0);
        settings.goal = Some(2);
        settings.heuristic_path = Some("/nonexistent/square.heuristic".to_string());
        let err = FrontierProblem::new(graph, settings).unwrap_err();
        assert!(matches!(err, FrontierError::BadSettings { .. }), "unexpected error: {:?}", err);
    }

    #[test]
    fn test_solve() {
        let graph = square();

        let problem = FrontierProblem::new(graph.clone(), FrontierSettings::new("square", "prim", 0)).unwrap();
        assert_eq!(problem.strategy(), StrategyKind::Prim);
        assert_eq!(problem.settings().graph_name, "square");
        // Vertex 4 is isolated
        assert_eq!(problem.solve().unwrap_err(), FrontierError::Disconnected { reached: 4, num_vertices: 5 });

        let mut settings = FrontierSettings::new("square", "prim", 0);
        settings.forest = true;
        match FrontierProblem::new(graph.clone(), settings).unwrap().solve().unwrap() {
            FrontierResponse::SpanningForest(forest) => {
                assert_eq!(forest.trees.len(), 2);
                assert_eq!(forest.total_weight, 6);
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let problem = FrontierProblem::new(graph.clone(), FrontierSettings::new("square", "dijkstra", 0)).unwrap();
        match problem.solve().unwrap() {
            FrontierResponse::ShortestPaths(paths) => {
                assert_eq!(paths.distances, vec![Some(0), Some(1), Some(3), Some(4), None]);
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let mut settings = FrontierSettings::new("square", "dijkstra", 0);
        settings.goal = Some(4);
        match FrontierProblem::new(graph, settings).unwrap().solve().unwrap() {
            FrontierResponse::Route(outcome) => assert_eq!(outcome, SearchOutcome::NoPath),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_solve_a_star_with_table() {
        let path = env::temp_dir().join("greedy_frontier_square.heuristic");
        fs::write(&path, "# estimates towards vertex 2\n3\n2\n0\n3\n0\n").unwrap();

        let mut settings = FrontierSettings::new("square", "a_star", 0);
        settings.goal = Some(2);
        settings.heuristic_path = Some(path.to_str().unwrap().to_string());
        let problem = FrontierProblem::new(square(), settings).unwrap();
        fs::remove_file(&path).unwrap();

        let response = problem.solve().unwrap();
        match &response {
            FrontierResponse::AStarSearch(search) => {
                let found = search.outcome.path().expect("vertex 2 is reachable");
                assert_eq!(found.vertices, vec![0, 1, 2]);
                assert_eq!(found.cost, 3);
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "a_star_search");
        assert_eq!(json["result"]["outcome"]["result"], "found");
        assert_eq!(json["result"]["outcome"]["cost"], 3);
    }
}
