//! `fleet-core` — foundational types for the fleet coordination workspace.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It
//! intentionally has no `fleet-*` dependencies and minimal external ones
//! (only `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                          |
//! |-------------|---------------------------------------------------|
//! | [`ids`]     | `RobotId`, `VertexId`                             |
//! | [`lane`]    | `Lane` (directed, reservable edge)                |
//! | [`time`]    | `SimTime`, `FleetClock`                           |
//! | [`event`]   | `TrafficEvent`, `EventKind`, `EventSink`          |
//! | [`error`]   | `FleetError`, `FleetResult`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod event;
pub mod ids;
pub mod lane;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FleetError, FleetResult};
pub use event::{EventKind, EventSink, MemorySink, NoopSink, TrafficEvent};
pub use ids::{RobotId, VertexId};
pub use lane::Lane;
pub use time::{FleetClock, SimTime};
