//! Error types for fleet-graph.

use fleet_core::{FleetError, VertexId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("level '{0}' not found in graph file")]
    LevelNotFound(String),

    #[error("malformed vertex entry at index {0}")]
    MalformedVertex(usize),

    #[error("malformed lane entry at index {0}")]
    MalformedLane(usize),

    #[error("lane endpoint {endpoint} out of range (vertex count {vertex_count})")]
    LaneOutOfRange { endpoint: VertexId, vertex_count: usize },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] FleetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
