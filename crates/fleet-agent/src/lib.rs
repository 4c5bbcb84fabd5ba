//! `fleet-agent` — the per-robot movement/charging state machine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                        |
//! |------------|-------------------------------------------------|
//! | [`config`] | `RobotConfig` (speeds, rates, thresholds)       |
//! | [`robot`]  | `Robot`, `RobotStatus`, `RobotSnapshot`         |
//!
//! A `Robot` owns its own position, path, battery, and status, and is
//! mutated exclusively through [`Robot::tick`] and [`Robot::assign_task`].
//! Lane access goes through the [`fleet_traffic::LaneArbiter`]; paths come
//! from a [`fleet_graph::PathProvider`].  The robot never touches another
//! robot's state.

pub mod config;
pub mod robot;


pub use config::RobotConfig;
pub use robot::{Robot, RobotSnapshot, RobotStatus};
