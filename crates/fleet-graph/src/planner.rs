//! The `PathProvider` trait and the default Dijkstra shortest path.
//!
//! # Pluggability
//!
//! The arbitration core (`fleet-agent`, `fleet-sim`) only ever talks to a
//! [`PathProvider`], so tests can substitute a canned-path fake and future
//! planners (A* with a geometric heuristic, congestion-aware costs) can drop
//! in without touching the core.
//!
//! # Path convention
//!
//! `shortest_path` returns the **full** vertex sequence including both
//! endpoints; an empty vec means unreachable; `from == to` yields `[from]`.
//! Consumers that want "head = next vertex" strip the leading element.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fleet_core::{Lane, VertexId};

use crate::graph::{NavGraph, VertexMeta};

// ── PathProvider trait ────────────────────────────────────────────────────────

/// Pathfinding and topology queries consumed by the fleet core.
///
/// Implementations must be `Send + Sync`; the provider is shared read-only
/// across every robot tick.
pub trait PathProvider: Send + Sync {
    /// Ordered vertex sequence from `from` to `to` (inclusive), or empty if
    /// unreachable.  Out-of-range endpoints are simply unreachable.
    fn shortest_path(&self, from: VertexId, to: VertexId) -> Vec<VertexId>;

    /// Metadata of `v`, or `None` if the vertex does not exist.
    fn vertex_meta(&self, v: VertexId) -> Option<&VertexMeta>;

    /// Topological existence of `lane`, independent of occupancy.
    fn lane_exists(&self, lane: Lane) -> bool;

    /// All charger-flagged vertices.
    fn charger_vertices(&self) -> &[VertexId];

    /// Number of vertices (used for boundary validation of caller input).
    fn vertex_count(&self) -> usize;
}

impl PathProvider for NavGraph {
    fn shortest_path(&self, from: VertexId, to: VertexId) -> Vec<VertexId> {
        dijkstra(self, from, to)
    }

    fn vertex_meta(&self, v: VertexId) -> Option<&VertexMeta> {
        self.vertex_meta.get(v.index())
    }

    fn lane_exists(&self, lane: Lane) -> bool {
        self.has_lane(lane)
    }

    fn charger_vertices(&self) -> &[VertexId] {
        &self.chargers
    }

    fn vertex_count(&self) -> usize {
        NavGraph::vertex_count(self)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(graph: &NavGraph, from: VertexId, to: VertexId) -> Vec<VertexId> {
    if !graph.contains_vertex(from) || !graph.contains_vertex(to) {
        return vec![];
    }
    if from == to {
        return vec![from];
    }

    let n = graph.vertex_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![u32::MAX; n];
    // prev[v] = vertex that reached v; INVALID for unreached vertices.
    let mut prev = vec![VertexId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, vertex). Reverse makes BinaryHeap (max) behave as
    // min-heap.  Secondary key VertexId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u32, VertexId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, vertex))) = heap.pop() {
        if vertex == to {
            return reconstruct(prev, from, to);
        }

        // Skip stale heap entries.
        if cost > dist[vertex.index()] {
            continue;
        }

        for (neighbor, lane_cost) in graph.out_lanes(vertex) {
            let new_cost = cost.saturating_add(lane_cost);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = vertex;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    vec![]
}

fn reconstruct(prev: Vec<VertexId>, from: VertexId, to: VertexId) -> Vec<VertexId> {
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        path.push(cur);
    }
    path.reverse();
    path
}
