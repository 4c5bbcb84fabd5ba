//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing lanes.
//! Given a `VertexId v`, its outgoing lanes occupy the slice:
//!
//! ```text
//! lane_to[ vertex_out_start[v] .. vertex_out_start[v+1] ]
//! ```
//!
//! The lane arrays (`lane_to`, `lane_cost`) are sorted by source vertex.
//! Iteration over a vertex's outgoing lanes is therefore a contiguous memory
//! scan — ideal for Dijkstra's inner loop.
//!
//! Lane cost defaults to 1, giving hop-count shortest paths; level files may
//! override it per lane.

use fleet_core::{Lane, VertexId};

// ── VertexMeta ────────────────────────────────────────────────────────────────

/// Per-vertex metadata from the level file.
///
/// Coordinates exist only for position interpolation and display; the
/// arbitration core never reads them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexMeta {
    pub name:       String,
    pub is_charger: bool,
    pub x:          f64,
    pub y:          f64,
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Directed navigation graph in CSR format.
///
/// Arrays are `pub` for direct indexed access on hot paths.  Do not construct
/// directly; use [`NavGraphBuilder`] or [`crate::load_level`].
#[derive(Debug)]
pub struct NavGraph {
    /// Metadata of each vertex.  Indexed by `VertexId`.
    pub vertex_meta: Vec<VertexMeta>,

    /// CSR row pointer.  Outgoing lanes of vertex `v` are at positions
    /// `vertex_out_start[v] .. vertex_out_start[v+1]`.
    /// Length = `vertex_count + 1`.
    pub vertex_out_start: Vec<u32>,

    /// Destination vertex of each lane.
    pub lane_to: Vec<VertexId>,

    /// Traversal cost of each lane.  1 unless the level file says otherwise.
    pub lane_cost: Vec<u32>,

    /// Vertices flagged `is_charger`, ascending.  Cached at build time so the
    /// low-battery diversion does not rescan all metadata.
    pub chargers: Vec<VertexId>,
}

impl NavGraph {
    /// Construct an empty graph with no vertices or lanes.
    ///
    /// Any path query against it returns "unreachable".
    pub fn empty() -> Self {
        NavGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertex_meta.len()
    }

    pub fn lane_count(&self) -> usize {
        self.lane_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_meta.is_empty()
    }

    /// `true` if `v` names a vertex of this graph.
    #[inline]
    pub fn contains_vertex(&self, v: VertexId) -> bool {
        v.index() < self.vertex_meta.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over `(destination, cost)` of all outgoing lanes from `v`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_lanes(&self, v: VertexId) -> impl Iterator<Item = (VertexId, u32)> + '_ {
        let start = self.vertex_out_start[v.index()] as usize;
        let end   = self.vertex_out_start[v.index() + 1] as usize;
        (start..end).map(|i| (self.lane_to[i], self.lane_cost[i]))
    }

    /// `true` if a directed lane from `lane.from` to `lane.to` exists.
    pub fn has_lane(&self, lane: Lane) -> bool {
        if !self.contains_vertex(lane.from) || !self.contains_vertex(lane.to) {
            return false;
        }
        self.out_lanes(lane.from).any(|(to, _)| to == lane.to)
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts vertices and directed lanes in any order.  `build()`
/// sorts lanes by source vertex and constructs the CSR arrays.
///
/// # Example
///
/// ```
/// use fleet_graph::{NavGraphBuilder, VertexMeta};
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_vertex(VertexMeta { name: "a".into(), ..Default::default() });
/// let c = b.add_vertex(VertexMeta { name: "c".into(), ..Default::default() });
/// b.add_corridor(a, c, 1);
/// let graph = b.build();
/// assert_eq!(graph.vertex_count(), 2);
/// assert_eq!(graph.lane_count(), 2); // bidirectional
/// ```
pub struct NavGraphBuilder {
    vertices:  Vec<VertexMeta>,
    raw_lanes: Vec<RawLane>,
}

struct RawLane {
    from: VertexId,
    to:   VertexId,
    cost: u32,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self { vertices: Vec::new(), raw_lanes: Vec::new() }
    }

    /// Pre-allocate for the expected vertex and lane counts.
    pub fn with_capacity(vertices: usize, lanes: usize) -> Self {
        Self {
            vertices:  Vec::with_capacity(vertices),
            raw_lanes: Vec::with_capacity(lanes),
        }
    }

    /// Add a vertex and return its `VertexId` (sequential from 0).
    pub fn add_vertex(&mut self, meta: VertexMeta) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(meta);
        id
    }

    /// Add a **directed** lane from `from` to `to` with traversal `cost`.
    pub fn add_lane(&mut self, from: VertexId, to: VertexId, cost: u32) {
        self.raw_lanes.push(RawLane { from, to, cost });
    }

    /// Convenience: add lanes in **both directions** for a two-way corridor
    /// (the common case in warehouse level files).
    pub fn add_corridor(&mut self, a: VertexId, b: VertexId, cost: u32) {
        self.add_lane(a, b, cost);
        self.add_lane(b, a, cost);
    }

    pub fn vertex_count(&self) -> usize { self.vertices.len() }
    pub fn lane_count(&self) -> usize { self.raw_lanes.len() }

    /// Consume the builder and produce a [`NavGraph`].
    ///
    /// Time complexity: O(L log L) for lane sort, where L = lanes.
    pub fn build(self) -> NavGraph {
        let vertex_count = self.vertices.len();
        let lane_count   = self.raw_lanes.len();

        // Sort lanes by source vertex for CSR construction.  Secondary key on
        // destination keeps out-lane order deterministic.
        let mut raw = self.raw_lanes;
        raw.sort_unstable_by_key(|l| (l.from.0, l.to.0));

        let lane_to:   Vec<VertexId> = raw.iter().map(|l| l.to).collect();
        let lane_cost: Vec<u32>      = raw.iter().map(|l| l.cost).collect();

        // Build CSR row pointer (vertex_out_start).
        let mut vertex_out_start = vec![0u32; vertex_count + 1];
        for l in &raw {
            vertex_out_start[l.from.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            vertex_out_start[i] += vertex_out_start[i - 1];
        }
        debug_assert_eq!(vertex_out_start[vertex_count] as usize, lane_count);

        let chargers: Vec<VertexId> = self
            .vertices
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_charger)
            .map(|(i, _)| VertexId(i as u32))
            .collect();

        NavGraph {
            vertex_meta: self.vertices,
            vertex_out_start,
            lane_to,
            lane_cost,
            chargers,
        }
    }
}

impl Default for NavGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
