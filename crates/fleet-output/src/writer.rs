//! The `EventWriter` trait implemented by all backend writers.

use fleet_core::TrafficEvent;

use crate::OutputResult;

/// Trait implemented by the CSV and SQLite writers.
pub trait EventWriter {
    /// Persist a batch of traffic events.
    fn write_events(&mut self, events: &[TrafficEvent]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
