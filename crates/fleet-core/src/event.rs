//! Structured traffic events and the `EventSink` abstraction.
//!
//! Events are observability only — nothing in the arbitration core reads
//! them back, and a sink that drops everything ([`NoopSink`]) changes no
//! behavior.  The sink is injected at construction and lives for the whole
//! run; persistent backends (see `fleet-output`) flush on `finish`.

use crate::ids::RobotId;
use crate::lane::Lane;
use crate::time::SimTime;

// ── Event types ───────────────────────────────────────────────────────────────

/// What happened to a lane, from the arbiter's or a robot's point of view.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A lane reservation was granted to a robot.
    Granted,
    /// A reservation was released (arrival or reassignment).
    Released,
    /// A denied robot joined the lane's wait queue.
    Queued,
    /// A reservation was forcibly reclaimed (stale hold or deadlock victim).
    Timeout,
    /// A robot entered emergency stop because its next lane was occupied.
    Blocked,
}

impl EventKind {
    /// Stable lowercase name used by log writers.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Granted  => "granted",
            EventKind::Released => "released",
            EventKind::Queued   => "queued",
            EventKind::Timeout  => "timeout",
            EventKind::Blocked  => "blocked",
        }
    }
}

/// One arbitration/movement event.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficEvent {
    pub at:    SimTime,
    pub kind:  EventKind,
    pub robot: RobotId,
    pub lane:  Lane,
}

// ── EventSink ─────────────────────────────────────────────────────────────────

/// Receiver of [`TrafficEvent`]s.
///
/// `record` is infallible by design: the tick loop must never stall on
/// observability.  Backends that can fail (files, databases) store their
/// first error internally and surface it after the run.
pub trait EventSink {
    fn record(&mut self, event: &TrafficEvent);
}

/// An [`EventSink`] that discards everything.
pub struct NoopSink;

impl EventSink for NoopSink {
    #[inline]
    fn record(&mut self, _event: &TrafficEvent) {}
}

/// An [`EventSink`] that buffers events in memory.  Used by tests and by
/// callers that want to inspect the event stream after a run.
#[derive(Default)]
pub struct MemorySink {
    pub events: Vec<TrafficEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of one kind, in emission order.
    pub fn of_kind(&self, kind: EventKind) -> Vec<TrafficEvent> {
        self.events.iter().filter(|e| e.kind == kind).copied().collect()
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &TrafficEvent) {
        self.events.push(*event);
    }
}

// Allow passing `&mut sink` through call chains without re-borrowing noise.
impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn record(&mut self, event: &TrafficEvent) {
        (**self).record(event);
    }
}
