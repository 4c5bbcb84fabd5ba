//! JSON level-file loading.
//!
//! # File format
//!
//! ```json
//! {
//!   "levels": {
//!     "level1": {
//!       "vertices": [[x, y, {"name": "a", "is_charger": true}], ...],
//!       "lanes":    [[0, 1, {"cost": 2}], ...]
//!     }
//!   }
//! }
//! ```
//!
//! Vertex and lane entries are heterogeneous arrays (two numbers followed by
//! an optional metadata object), so parsing walks `serde_json::Value` rather
//! than deriving a struct.  Lanes in the file are directed; a two-way
//! corridor appears as two entries.  All indices are validated here — a
//! graph built by this loader contains no dangling lane endpoints.

use std::fs;
use std::path::Path;

use serde_json::Value;

use fleet_core::VertexId;

use crate::error::{GraphError, GraphResult};
use crate::graph::{NavGraph, NavGraphBuilder, VertexMeta};

/// Load the named level from a JSON graph file.
pub fn load_level(path: &Path, level: &str) -> GraphResult<NavGraph> {
    let text = fs::read_to_string(path)?;
    parse_level(&text, level)
}

/// Parse a level from JSON text.  Split out from [`load_level`] so tests can
/// feed literals without touching the filesystem.
pub fn parse_level(text: &str, level: &str) -> GraphResult<NavGraph> {
    let root: Value = serde_json::from_str(text)?;
    let level_obj = root
        .get("levels")
        .and_then(|l| l.get(level))
        .ok_or_else(|| GraphError::LevelNotFound(level.to_string()))?;

    let vertices = level_obj.get("vertices").and_then(Value::as_array);
    let lanes    = level_obj.get("lanes").and_then(Value::as_array);

    let vertices = vertices.map(Vec::as_slice).unwrap_or(&[]);
    let lanes    = lanes.map(Vec::as_slice).unwrap_or(&[]);

    let mut builder = NavGraphBuilder::with_capacity(vertices.len(), lanes.len());

    for (i, entry) in vertices.iter().enumerate() {
        builder.add_vertex(parse_vertex(entry, i)?);
    }
    let vertex_count = builder.vertex_count();

    for (i, entry) in lanes.iter().enumerate() {
        let (from, to, cost) = parse_lane(entry, i)?;
        for endpoint in [from, to] {
            if endpoint.index() >= vertex_count {
                return Err(GraphError::LaneOutOfRange { endpoint, vertex_count });
            }
        }
        builder.add_lane(from, to, cost);
    }

    Ok(builder.build())
}

fn parse_vertex(entry: &Value, idx: usize) -> GraphResult<VertexMeta> {
    let arr = entry.as_array().ok_or(GraphError::MalformedVertex(idx))?;
    let x = arr.first().and_then(Value::as_f64).ok_or(GraphError::MalformedVertex(idx))?;
    let y = arr.get(1).and_then(Value::as_f64).ok_or(GraphError::MalformedVertex(idx))?;

    let mut meta = VertexMeta { x, y, ..Default::default() };
    if let Some(obj) = arr.get(2).and_then(Value::as_object) {
        if let Some(name) = obj.get("name").and_then(Value::as_str) {
            meta.name = name.to_string();
        }
        meta.is_charger = obj
            .get("is_charger")
            .and_then(Value::as_bool)
            .unwrap_or(false);
    }
    Ok(meta)
}

fn parse_lane(entry: &Value, idx: usize) -> GraphResult<(VertexId, VertexId, u32)> {
    let arr = entry.as_array().ok_or(GraphError::MalformedLane(idx))?;
    let from = arr.first().and_then(Value::as_u64).ok_or(GraphError::MalformedLane(idx))?;
    let to   = arr.get(1).and_then(Value::as_u64).ok_or(GraphError::MalformedLane(idx))?;
    if from == to || from > u32::MAX as u64 || to > u32::MAX as u64 {
        return Err(GraphError::MalformedLane(idx));
    }

    let cost = arr
        .get(2)
        .and_then(Value::as_object)
        .and_then(|m| m.get("cost"))
        .and_then(Value::as_u64)
        .map(|c| c.clamp(1, u32::MAX as u64) as u32)
        .unwrap_or(1);

    Ok((VertexId(from as u32), VertexId(to as u32), cost))
}
