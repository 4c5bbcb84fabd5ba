//! `fleet-traffic` — mutual exclusion over bidirectional lane pairs.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`arbiter`]  | `LaneArbiter`: reservations, wait queues, reclamation   |
//! | [`deadlock`] | Wait-for graph cycle detection and forced resolution    |
//!
//! # Ownership model
//!
//! The `LaneArbiter` is the sole owner of reservation and queue state and
//! exposes only `&mut self` operations, so every request/release/reclaim is
//! a serialized read-then-write critical section by construction.  Nothing
//! here blocks: a denied request returns immediately and the requester polls
//! again on a future tick.

pub mod arbiter;
pub mod deadlock;


pub use arbiter::{LaneArbiter, Reservation};
