//! Synthetic warehouse floor definition.
//!
//! A `COLS × ROWS` grid of aisle intersections with bidirectional aisles
//! between neighbors.  Charging docks sit in two opposite corners, the way
//! small AMR (autonomous mobile robot) floors usually place them.

use fleet_core::VertexId;
use fleet_graph::{NavGraph, NavGraphBuilder, VertexMeta};

pub const COLS: u32 = 6;
pub const ROWS: u32 = 4;

/// Build the warehouse grid.  Vertex ids run row-major: `row * COLS + col`.
pub fn build_warehouse() -> NavGraph {
    let mut b = NavGraphBuilder::with_capacity((COLS * ROWS) as usize, (COLS * ROWS * 4) as usize);

    for row in 0..ROWS {
        for col in 0..COLS {
            let corner = (row == 0 && col == 0) || (row == ROWS - 1 && col == COLS - 1);
            b.add_vertex(VertexMeta {
                name:       format!("r{row}c{col}"),
                is_charger: corner,
                x:          col as f64,
                y:          row as f64,
            });
        }
    }

    for row in 0..ROWS {
        for col in 0..COLS {
            let here = VertexId(row * COLS + col);
            if col + 1 < COLS {
                b.add_corridor(here, VertexId(row * COLS + col + 1), 1);
            }
            if row + 1 < ROWS {
                b.add_corridor(here, VertexId((row + 1) * COLS + col), 1);
            }
        }
    }

    b.build()
}
