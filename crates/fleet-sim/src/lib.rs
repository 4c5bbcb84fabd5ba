//! `fleet-sim` — the fleet registry and tick orchestrator.
//!
//! # Tick loop
//!
//! ```text
//! fleet.tick(dt):
//!   ① Clock      — advance simulation time by dt.
//!   ② Maintain   — on the maintenance cadence (default every 2 s):
//!                    reclaim stale reservations (default > 5 s old),
//!                    resolve wait-for deadlocks (victims are replanned),
//!                    assert the head-on exclusion invariant.
//!   ③ Robots     — tick every robot once, ascending RobotId order.
//! ```
//!
//! Robots are updated sequentially; every arbiter operation is a serialized
//! `&mut` critical section, so the head-on invariant holds mid-tick too.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_core::{MemorySink, VertexId};
//! use fleet_graph::load_level;
//! use fleet_sim::{Fleet, FleetConfig};
//!
//! let graph = load_level(path, "level1")?;
//! let mut fleet = Fleet::new(graph, FleetConfig::default(), MemorySink::new());
//! let robot = fleet.spawn_robot(VertexId(0))?;
//! let receipt = fleet.assign_task(robot, VertexId(7));
//! for _ in 0..600 {
//!     fleet.tick(0.1);
//! }
//! ```

pub mod fleet;
pub mod receipt;

#[cfg(test)]
mod tests;

pub use fleet::{Fleet, FleetConfig};
pub use receipt::{TaskOutcome, TaskReceipt};
