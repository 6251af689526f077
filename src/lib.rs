pub mod binary_minheap;
pub mod error;
pub mod frontier;
pub mod graph;

use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::sync::Arc;

use crate::graph::Graph;

/// Load all graphs stored as `*.graph` files in `graphs_path`.
/// Returns a `HashMap` that gives access to shared references to the graphs by their
/// file stems if the operation succeeds, or an `Err` otherwise.
pub fn load_graphs(graphs_path: &str) -> Result<HashMap<String, Arc<Graph>>, Box<dyn Error>> {
    // Collect names and paths of files containing graphs
    let graph_data: Vec<_> = fs::read_dir(graphs_path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "graph"))
        .filter_map(|path| {
            let graph_name = path.file_stem()?.to_str()?.to_string();
            let graph_path = path.to_str()?.to_string();
            Some((graph_name, graph_path))
        })
        .collect();

    // Parse and load graphs into a map
    let mut graphs = HashMap::with_capacity(graph_data.len());
    for (graph_name, graph_path) in graph_data {
        match Graph::parse_from_file(&graph_path) {
            Ok(graph) => {
                log::info!("Parsed graph '{}' with {} vertices and {} edges",
                    &graph_name, graph.num_nodes, graph.num_edges);
                graphs.insert(graph_name, Arc::new(graph));
            }
            Err(err) => {
                log::warn!("Failed to parse graph '{}': {}", &graph_name, err);
                return Err(err.into());
            }
        }
    }

    Ok(graphs)
}

#[cfg(test)]
mod test {
    use std::{env, fs};

    use crate::graph::GraphView;
    use crate::load_graphs;

    #[test]
    fn test_load_graphs() {
        let dir = env::temp_dir().join("greedy_frontier_load_graphs_test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("line.graph"), "# line\n3\n2\n0 1 4\n1 2 5\n").unwrap();
        fs::write(dir.join("notes.txt"), "not a graph").unwrap();

        let graphs = load_graphs(dir.to_str().unwrap()).unwrap();
        assert_eq!(graphs.len(), 1, "loaded graphs: {:?}", graphs.keys().collect::<Vec<_>>());
        let graph = &graphs["line"];
        assert_eq!(graph.num_vertices(), 3);
        assert_eq!(graph.neighbors(1).collect::<Vec<_>>(), vec![(2, 5)]);

        fs::write(dir.join("broken.graph"), "3\n2\n0 1\n").unwrap();
        assert!(load_graphs(dir.to_str().unwrap()).is_err());

        fs::remove_dir_all(&dir).unwrap();
        assert!(load_graphs(dir.to_str().unwrap()).is_err());
    }
}
