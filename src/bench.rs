use std::{env,
          str::FromStr,
          time::Instant};

use rand::prelude::*;

use frontier_lib::frontier::strategy::{self, StrategyKind};
use frontier_lib::graph::{Graph, VertexId, Weight};

#[derive(Debug)]
struct BenchResults {
    avg_settled: f64,
    avg_cost: f64,
    avg_millis: f64,
}

/// Manhattan distance between two vertices of a grid with `cols` columns
fn manhattan(cols: usize) -> impl Fn(VertexId, VertexId) -> Weight {
    move |vertex, goal| {
        let (vr, vc) = (vertex / cols, vertex % cols);
        let (gr, gc) = (goal / cols, goal % cols);
        vr.abs_diff(gr) + vc.abs_diff(gc)
    }
}

/// Run `kind` once on `graph` from the top left to the bottom right corner.
/// Returns the number of settled vertices and the cost of the result.
fn run_once(kind: StrategyKind, graph: &Graph, cols: usize) -> (usize, Weight) {
    let goal = graph.num_nodes - 1;
    match kind {
        StrategyKind::Prim => {
            let tree = strategy::prim(graph, 0).expect("Generated grid is connected");
            (tree.num_vertices(), tree.total_weight)
        }
        StrategyKind::Dijkstra => {
            let paths = strategy::dijkstra(graph, 0).expect("Invalid source");
            let settled = (0..graph.num_nodes).filter(|&v| paths.is_reachable(v)).count();
            (settled, paths.distance(goal).unwrap_or_default())
        }
        StrategyKind::AStar => {
            // All weights are at least 1, so the Manhattan distance is admissible
            let heuristic = manhattan(cols);
            let search = strategy::a_star(graph, 0, goal, &heuristic).expect("Invalid goal");
            (search.expanded, search.outcome.path().map_or(0, |p| p.cost))
        }
    }
}

fn main() {
    // Initialize logger
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env::set_var("RUST_BACKTRACE", "1");
    env_logger::init();

    let args: Vec<_> = env::args().collect();

    if !args.contains(&"--strategy".to_string()) {
        let err = "Missing required argument: --strategy";
        log::error!("{}", err);
        panic!("{}", err);
    }

    let mut strategy_name = String::new();
    let mut rows: usize = 100;
    let mut cols: usize = 100;
    let mut max_weight: Weight = 10;
    let mut seed: u64 = 42;
    let mut loop_count: usize = 1;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--strategy" => {
                strategy_name = args[i+1].clone();
            }
            "-r" => {
                rows = args[i+1].parse()
                    .expect("Invalid argument: rows");
            }
            "-c" => {
                cols = args[i+1].parse()
                    .expect("Invalid argument: cols");
            }
            "-w" => {
                max_weight = args[i+1].parse()
                    .expect("Invalid argument: max_weight");
            }
            "--seed" => {
                seed = args[i+1].parse()
                    .expect("Invalid argument: seed");
            }
            "--loop" => {
                loop_count = args[i+1].parse()
                    .expect("Invalid argument: loop_count");
            }
            _ => {
                panic!("Unknown argument: {}", &args[i]);
            }
        }
        i += 2;
    }

    let kind = StrategyKind::from_str(&strategy_name)
        .unwrap_or_else(|_| panic!("Invalid strategy specified, expected one of {:?}",
                                   StrategyKind::available_strategies()));

    log::info!("Benchmarking {} on {}x{} grids with weights up to {}", kind, rows, cols, max_weight);
    log::info!("Loop count: {}", loop_count);
    log::info!("Starting benchmarks");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut sum_settled = 0;
    let mut sum_cost = 0;
    let mut sum_millis = 0.0;
    for _ in 0..loop_count {
        let graph = Graph::gen_grid(rows, cols, max_weight, &mut rng);

        let start = Instant::now();
        let (settled, cost) = run_once(kind, &graph, cols);
        sum_millis += start.elapsed().as_secs_f64() * 1000.0;

        sum_settled += settled;
        sum_cost += cost;
    }

    let bench_results = BenchResults {
        avg_settled: sum_settled as f64 / loop_count as f64,
        avg_cost: sum_cost as f64 / loop_count as f64,
        avg_millis: sum_millis / loop_count as f64,
    };

    log::info!("Benchmark results:\n{:#?}", bench_results);
}
