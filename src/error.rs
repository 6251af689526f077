use derive_more::{Display, Error};

use crate::graph::VertexId;

/// Greedy frontier custom error
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum FrontierError {
    #[display(fmt = "Graph has no vertices")]
    EmptyGraph,
    #[display(fmt = "Vertex {} is out of range for a graph with {} vertices", vertex, num_vertices)]
    VertexOutOfRange { vertex: VertexId, num_vertices: usize },
    #[display(fmt = "Vertex {} has already been settled", vertex)]
    AlreadySettled { vertex: VertexId },
    #[display(fmt = "Goal {} has already been settled", goal)]
    GoalSettled { goal: VertexId },
    #[display(fmt = "Graph is not connected: spanning tree reaches {} of {} vertices", reached, num_vertices)]
    Disconnected { reached: usize, num_vertices: usize },
    #[display(fmt = "{}", message)]
    BadSettings { message: String },
}

impl FrontierError {
    /// Return the name of this error
    pub fn name(&self) -> String {
        match self {
            Self::EmptyGraph => "Empty Graph".to_string(),
            Self::VertexOutOfRange { .. } => "Vertex Out Of Range".to_string(),
            Self::AlreadySettled { .. } => "Already Settled".to_string(),
            Self::GoalSettled { .. } => "Goal Settled".to_string(),
            Self::Disconnected { .. } => "Disconnected Graph".to_string(),
            Self::BadSettings { .. } => "Bad Settings".to_string()
        }
    }

    /// Fail with `VertexOutOfRange` unless `vertex` is in `[0, num_vertices)`
    pub(crate) fn check_vertex(vertex: VertexId, num_vertices: usize) -> Result<(), Self> {
        if vertex < num_vertices {
            Ok(())
        } else {
            Err(Self::VertexOutOfRange { vertex, num_vertices })
        }
    }
}
