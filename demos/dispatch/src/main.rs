//! dispatch — random-order dispatch over a synthetic warehouse grid.
//!
//! Six robots shuttle between randomly drawn aisle intersections on a 6×4
//! warehouse floor.  Idle robots are immediately handed a fresh order, so
//! the corridors stay contended and the lane arbiter earns its keep.  The
//! full traffic event log lands in `output/dispatch/traffic_events.csv`.
//!
//! Run with:
//!   cargo run -p dispatch --release

mod warehouse;

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use fleet_agent::RobotStatus;
use fleet_core::{EventKind, EventSink, TrafficEvent, VertexId};
use fleet_output::{CsvEventWriter, WriterSink};
use fleet_sim::{Fleet, FleetConfig};

use warehouse::{build_warehouse, COLS, ROWS};

// ── Constants ─────────────────────────────────────────────────────────────────

const ROBOT_COUNT: usize = 6;
const SEED:        u64   = 42;
const TICKS:       usize = 6_000;
const DT_SECS:     f64   = 0.1;

// ── Counting sink wrapper ─────────────────────────────────────────────────────

/// Wraps the CSV sink and tallies events per kind for the end-of-run summary.
struct CountingSink<S: EventSink> {
    inner:    S,
    granted:  usize,
    released: usize,
    queued:   usize,
    timeouts: usize,
    blocked:  usize,
}

impl<S: EventSink> CountingSink<S> {
    fn new(inner: S) -> Self {
        Self { inner, granted: 0, released: 0, queued: 0, timeouts: 0, blocked: 0 }
    }
}

impl<S: EventSink> EventSink for CountingSink<S> {
    fn record(&mut self, event: &TrafficEvent) {
        match event.kind {
            EventKind::Granted  => self.granted += 1,
            EventKind::Released => self.released += 1,
            EventKind::Queued   => self.queued += 1,
            EventKind::Timeout  => self.timeouts += 1,
            EventKind::Blocked  => self.blocked += 1,
        }
        self.inner.record(event);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== dispatch — fleet lane arbitration demo ===");
    println!("Robots: {ROBOT_COUNT}  |  Floor: {COLS}x{ROWS}  |  Seed: {SEED}");
    println!();

    // 1. Build the warehouse floor.
    let graph = build_warehouse();
    println!(
        "Warehouse grid: {} intersections, {} aisle lanes",
        graph.vertex_count(),
        graph.lane_count()
    );

    // 2. Set up output.
    std::fs::create_dir_all("output/dispatch")?;
    let writer = CsvEventWriter::new(Path::new("output/dispatch"))?;
    let sink = CountingSink::new(WriterSink::new(writer));

    // 3. Spawn the fleet, one robot per column of the bottom row.
    let mut fleet = Fleet::new(graph, FleetConfig::default(), sink);
    let vertex_count = fleet.provider().vertex_count() as u32;
    for col in 0..ROBOT_COUNT as u32 {
        fleet.spawn_robot(VertexId(col))?;
    }

    // 4. Run, re-dispatching any robot that goes idle (or errors out).
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut orders_assigned = 0usize;
    let mut orders_refused = 0usize;

    let t0 = Instant::now();
    for _ in 0..TICKS {
        for snap in fleet.snapshots() {
            if snap.status != RobotStatus::Idle && snap.status != RobotStatus::Error {
                continue;
            }
            let destination = VertexId(rng.gen_range(0..vertex_count));
            if fleet.assign_task(snap.id, destination).success() {
                orders_assigned += 1;
            } else {
                orders_refused += 1;
            }
        }
        fleet.tick(DT_SECS);
    }
    let elapsed = t0.elapsed();
    let final_snaps = fleet.snapshots();

    // 5. Flush the event log.
    let mut counting = fleet.into_sink();
    counting.inner.finish();
    if let Some(e) = counting.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    let sim_secs = TICKS as f64 * DT_SECS;
    println!("Simulated {sim_secs:.0} s in {:.3} s wall time", elapsed.as_secs_f64());
    println!("  orders assigned : {orders_assigned} ({orders_refused} refused)");
    println!("  lane grants     : {}", counting.granted);
    println!("  lane releases   : {}", counting.released);
    println!("  queue entries   : {}", counting.queued);
    println!("  stale reclaims  : {}", counting.timeouts);
    println!("  emergency stops : {}", counting.blocked);
    println!();

    // 7. Final robot positions table.
    println!("{:<10} {:<14} {:<10} {:<8}", "Robot", "Status", "Vertex", "Battery");
    println!("{}", "-".repeat(44));
    for snap in &final_snaps {
        println!(
            "{:<10} {:<14} {:<10} {:<8.1}",
            snap.id.0,
            snap.status.as_str(),
            snap.current_vertex.0,
            snap.battery,
        );
    }

    Ok(())
}
