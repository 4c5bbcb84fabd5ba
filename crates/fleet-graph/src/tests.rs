//! Unit tests for fleet-graph.

use fleet_core::{Lane, VertexId};

use crate::{loader, GraphError, NavGraph, NavGraphBuilder, PathProvider, VertexMeta};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn v(n: u32) -> VertexId {
    VertexId(n)
}

fn lane(from: u32, to: u32) -> Lane {
    Lane::new(v(from), v(to)).unwrap()
}

/// Line graph 0 ↔ 1 ↔ 2 ↔ 3, vertex 3 a charger.
fn line_graph() -> NavGraph {
    let mut b = NavGraphBuilder::new();
    for i in 0..4 {
        b.add_vertex(VertexMeta {
            name: format!("v{i}"),
            is_charger: i == 3,
            ..Default::default()
        });
    }
    b.add_corridor(v(0), v(1), 1);
    b.add_corridor(v(1), v(2), 1);
    b.add_corridor(v(2), v(3), 1);
    b.build()
}

/// Two disconnected components: {0, 1} and {2}.
fn split_graph() -> NavGraph {
    let mut b = NavGraphBuilder::new();
    for _ in 0..3 {
        b.add_vertex(VertexMeta::default());
    }
    b.add_corridor(v(0), v(1), 1);
    b.build()
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

mod graph {
    use super::*;

    #[test]
    fn csr_out_lanes_contiguous() {
        let g = line_graph();
        let out: Vec<_> = g.out_lanes(v(1)).map(|(to, _)| to).collect();
        assert_eq!(out, vec![v(0), v(2)]);
    }

    #[test]
    fn has_lane_is_directional_existence() {
        let mut b = NavGraphBuilder::new();
        b.add_vertex(VertexMeta::default());
        b.add_vertex(VertexMeta::default());
        b.add_lane(v(0), v(1), 1); // one-way
        let g = b.build();
        assert!(g.has_lane(lane(0, 1)));
        assert!(!g.has_lane(lane(1, 0)));
    }

    #[test]
    fn has_lane_out_of_range_is_false() {
        let g = line_graph();
        assert!(!g.has_lane(lane(0, 99)));
    }

    #[test]
    fn chargers_cached_at_build() {
        let g = line_graph();
        assert_eq!(g.chargers, vec![v(3)]);
    }

    #[test]
    fn empty_graph() {
        let g = NavGraph::empty();
        assert!(g.is_empty());
        assert!(g.shortest_path(v(0), v(1)).is_empty());
    }

    // `GraphResult<NavGraph>` must be usable with `unwrap_err` and friends.
    #[test]
    fn graph_is_debug_formattable() {
        let rendered = format!("{:?}", line_graph());
        assert!(rendered.contains("vertex_out_start"));
    }
}

// ── Shortest path ─────────────────────────────────────────────────────────────

mod shortest_path {
    use super::*;

    #[test]
    fn line_path_in_order() {
        let g = line_graph();
        assert_eq!(g.shortest_path(v(0), v(3)), vec![v(0), v(1), v(2), v(3)]);
        assert_eq!(g.shortest_path(v(3), v(0)), vec![v(3), v(2), v(1), v(0)]);
    }

    #[test]
    fn trivial_path_is_single_vertex() {
        let g = line_graph();
        assert_eq!(g.shortest_path(v(2), v(2)), vec![v(2)]);
    }

    #[test]
    fn unreachable_is_empty() {
        let g = split_graph();
        assert!(g.shortest_path(v(0), v(2)).is_empty());
    }

    #[test]
    fn out_of_range_is_empty() {
        let g = line_graph();
        assert!(g.shortest_path(v(0), v(42)).is_empty());
        assert!(g.shortest_path(v(42), v(0)).is_empty());
    }

    #[test]
    fn respects_lane_cost() {
        // Triangle: 0→1→2 at cost 1+1, direct 0→2 at cost 5.
        let mut b = NavGraphBuilder::new();
        for _ in 0..3 {
            b.add_vertex(VertexMeta::default());
        }
        b.add_lane(v(0), v(1), 1);
        b.add_lane(v(1), v(2), 1);
        b.add_lane(v(0), v(2), 5);
        let g = b.build();
        assert_eq!(g.shortest_path(v(0), v(2)), vec![v(0), v(1), v(2)]);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

mod loader_tests {
    use super::*;

    const LEVEL: &str = r#"{
        "levels": {
            "l1": {
                "vertices": [
                    [0.0, 0.0, {"name": "dock", "is_charger": true}],
                    [1.0, 0.0, {"name": "aisle"}],
                    [2.0, 0.0]
                ],
                "lanes": [
                    [0, 1, {"cost": 2}],
                    [1, 0],
                    [1, 2],
                    [2, 1]
                ]
            }
        }
    }"#;

    #[test]
    fn parses_vertices_and_lanes() {
        let g = loader::parse_level(LEVEL, "l1").unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.lane_count(), 4);
        assert_eq!(g.vertex_meta[0].name, "dock");
        assert!(g.vertex_meta[0].is_charger);
        assert!(!g.vertex_meta[1].is_charger);
        assert_eq!(g.chargers, vec![v(0)]);
        assert!(g.has_lane(lane(0, 1)));
    }

    #[test]
    fn lane_cost_override() {
        let g = loader::parse_level(LEVEL, "l1").unwrap();
        // 0→1 carries cost 2, the reverse defaults to 1.
        let c01 = g.out_lanes(v(0)).find(|&(to, _)| to == v(1)).unwrap().1;
        let c10 = g.out_lanes(v(1)).find(|&(to, _)| to == v(0)).unwrap().1;
        assert_eq!(c01, 2);
        assert_eq!(c10, 1);
    }

    #[test]
    fn missing_level_errors() {
        let err = loader::parse_level(LEVEL, "nope").unwrap_err();
        assert!(matches!(err, GraphError::LevelNotFound(_)));
    }

    #[test]
    fn out_of_range_lane_endpoint_errors() {
        let text = r#"{"levels": {"l": {"vertices": [[0,0],[1,0]], "lanes": [[0, 9]]}}}"#;
        let err = loader::parse_level(text, "l").unwrap_err();
        assert!(matches!(err, GraphError::LaneOutOfRange { .. }));
    }

    #[test]
    fn degenerate_lane_rejected() {
        let text = r#"{"levels": {"l": {"vertices": [[0,0],[1,0]], "lanes": [[1, 1]]}}}"#;
        let err = loader::parse_level(text, "l").unwrap_err();
        assert!(matches!(err, GraphError::MalformedLane(0)));
    }

    #[test]
    fn malformed_vertex_rejected() {
        let text = r#"{"levels": {"l": {"vertices": [["x"]], "lanes": []}}}"#;
        let err = loader::parse_level(text, "l").unwrap_err();
        assert!(matches!(err, GraphError::MalformedVertex(0)));
    }
}

// ── PathProvider surface ──────────────────────────────────────────────────────

mod provider {
    use super::*;

    #[test]
    fn vertex_meta_lookup() {
        let g = line_graph();
        assert_eq!(g.vertex_meta(v(0)).unwrap().name, "v0");
        assert!(g.vertex_meta(v(99)).is_none());
    }

    #[test]
    fn lane_exists_matches_topology() {
        let g = line_graph();
        assert!(g.lane_exists(lane(2, 3)));
        assert!(!g.lane_exists(lane(0, 3)));
    }
}
