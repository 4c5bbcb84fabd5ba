//! `fleet-graph` — navigation graph, level loading, and shortest paths.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`graph`]   | `NavGraph` (CSR adjacency + vertex metadata), builder    |
//! | [`planner`] | `PathProvider` trait, Dijkstra shortest path             |
//! | [`loader`]  | JSON level-file loading (`load_level`)                   |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                           |
//!
//! The arbitration core (`fleet-traffic`, `fleet-agent`) consumes this crate
//! exclusively through the [`PathProvider`] trait, so tests and alternative
//! planners can stand in for the real graph.

pub mod error;
pub mod graph;
pub mod loader;
pub mod planner;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{NavGraph, NavGraphBuilder, VertexMeta};
pub use loader::load_level;
pub use planner::PathProvider;
