//! The `LaneArbiter` — grants, denies, and reclaims exclusive lane access.
//!
//! # Invariants
//!
//! 1. If a lane is reserved, its reverse is not (`request_lane` checks both
//!    directions before granting).
//! 2. A robot appears at most once in any single wait queue, and in at most
//!    one wait queue overall (enqueueing moves the robot, never copies it).
//!
//! Wait queues are advisory: a freed lane is **never** auto-granted to the
//! queue head, because a queued robot may have replanned since it enqueued.
//! Whoever re-requests first in program order wins the freed lane.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use fleet_core::{EventKind, EventSink, Lane, RobotId, SimTime, TrafficEvent};

// ── Reservation ───────────────────────────────────────────────────────────────

/// Exclusive ownership record binding a lane to one robot since `granted_at`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Reservation {
    pub owner:      RobotId,
    pub granted_at: SimTime,
}

// ── LaneArbiter ───────────────────────────────────────────────────────────────

/// Owner of all reservation and wait-queue state.
#[derive(Default)]
pub struct LaneArbiter {
    /// Currently reserved lanes.  At most one entry per lane; never an entry
    /// for both a lane and its reverse.
    reserved: FxHashMap<Lane, Reservation>,

    /// FIFO wait queues.  Insertion order = priority, advisory only.
    queues: FxHashMap<Lane, VecDeque<RobotId>>,
}

impl LaneArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Request / release ─────────────────────────────────────────────────

    /// Request exclusive access to `lane` for `robot`.
    ///
    /// Grants iff neither `lane` nor its reverse is reserved.  A grant
    /// removes `robot` from every wait queue (a grant supersedes any pending
    /// wait) and records `Granted`.  A denial enqueues `robot` FIFO on
    /// `lane` — idempotently — and records `Queued` on first enqueue only.
    ///
    /// Re-requesting a lane the robot already holds is a no-op grant.
    pub fn request_lane<S: EventSink>(
        &mut self,
        robot: RobotId,
        lane:  Lane,
        now:   SimTime,
        sink:  &mut S,
    ) -> bool {
        if let Some(res) = self.reserved.get(&lane) {
            if res.owner == robot {
                return true;
            }
        }

        if self.reserved.contains_key(&lane) || self.reserved.contains_key(&lane.reverse()) {
            if self.enqueue_waiter(robot, lane) {
                sink.record(&TrafficEvent { at: now, kind: EventKind::Queued, robot, lane });
            }
            return false;
        }

        self.reserved.insert(lane, Reservation { owner: robot, granted_at: now });
        self.remove_waiter(robot);
        sink.record(&TrafficEvent { at: now, kind: EventKind::Granted, robot, lane });
        true
    }

    /// Release the reservation on `lane`, if any.  Releasing an unreserved
    /// lane is a no-op.  Waiters are *not* auto-granted.
    pub fn release_lane<S: EventSink>(&mut self, lane: Lane, now: SimTime, sink: &mut S) {
        if let Some(res) = self.reserved.remove(&lane) {
            sink.record(&TrafficEvent {
                at:    now,
                kind:  EventKind::Released,
                robot: res.owner,
                lane,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if exactly `lane` is reserved (the reverse is not consulted).
    #[inline]
    pub fn is_lane_occupied(&self, lane: Lane) -> bool {
        self.reserved.contains_key(&lane)
    }

    /// The robot holding `lane`, if reserved.
    #[inline]
    pub fn holder(&self, lane: Lane) -> Option<RobotId> {
        self.reserved.get(&lane).map(|r| r.owner)
    }

    /// The lane `robot` is currently queued on, if any.
    pub fn waiting_on(&self, robot: RobotId) -> Option<Lane> {
        self.queues
            .iter()
            .find(|(_, q)| q.contains(&robot))
            .map(|(&lane, _)| lane)
    }

    /// FIFO position of `robot` in `lane`'s queue (0 = head).
    pub fn queue_position(&self, robot: RobotId, lane: Lane) -> Option<usize> {
        self.queues.get(&lane)?.iter().position(|&r| r == robot)
    }

    pub fn queue_len(&self, lane: Lane) -> usize {
        self.queues.get(&lane).map_or(0, VecDeque::len)
    }

    pub fn reserved_count(&self) -> usize {
        self.reserved.len()
    }

    /// All current reservations, sorted by lane for deterministic iteration.
    pub fn reservations(&self) -> Vec<(Lane, Reservation)> {
        let mut all: Vec<_> = self.reserved.iter().map(|(&l, &r)| (l, r)).collect();
        all.sort_by_key(|(l, _)| *l);
        all
    }

    // ── Queue maintenance ─────────────────────────────────────────────────

    /// Remove `robot` from every wait queue.  Called on grant and by the
    /// fleet on reassignment/replan so stale memberships cannot linger.
    pub fn remove_waiter(&mut self, robot: RobotId) {
        for q in self.queues.values_mut() {
            q.retain(|&r| r != robot);
        }
        self.queues.retain(|_, q| !q.is_empty());
    }

    /// Append `robot` to `lane`'s queue unless already present there.  A
    /// robot waits for exactly one lane, so any membership elsewhere is
    /// moved, not duplicated.  Returns `true` if newly enqueued.
    fn enqueue_waiter(&mut self, robot: RobotId, lane: Lane) -> bool {
        if let Some(q) = self.queues.get(&lane) {
            if q.contains(&robot) {
                return false;
            }
        }
        self.remove_waiter(robot);
        self.queues.entry(lane).or_default().push_back(robot);
        true
    }

    /// Drop all reservations and queues (simulation reset).
    pub fn clear(&mut self) {
        self.reserved.clear();
        self.queues.clear();
    }

    // ── Safety nets ───────────────────────────────────────────────────────

    /// All reserved `(lane, reverse)` pairs — the head-on invariant's runtime
    /// assertion surface.  Always empty under correct arbitration; a
    /// non-empty result is an internal-bug signal, not a runtime condition
    /// to handle.
    pub fn detect_collisions(&self) -> Vec<(Lane, Lane)> {
        let mut pairs: Vec<(Lane, Lane)> = self
            .reserved
            .keys()
            .filter(|&&l| l < l.reverse() && self.reserved.contains_key(&l.reverse()))
            .map(|&l| (l, l.reverse()))
            .collect();
        pairs.sort();
        pairs
    }

    /// Force-release every reservation held longer than `stale_after`
    /// seconds, recording a `Timeout` event per reclaimed lane.
    ///
    /// Returns the evicted `(lane, owner)` pairs, sorted by lane, so the
    /// orchestrator can reconcile the owners (each clears its held lane on
    /// its next tick).  Invoked on the maintenance cadence, not every tick.
    pub fn reclaim_stale<S: EventSink>(
        &mut self,
        now:         SimTime,
        stale_after: f64,
        sink:        &mut S,
    ) -> Vec<(Lane, RobotId)> {
        let mut stale: Vec<(Lane, RobotId)> = self
            .reserved
            .iter()
            .filter(|(_, res)| now.secs_since(res.granted_at) > stale_after)
            .map(|(&lane, res)| (lane, res.owner))
            .collect();
        stale.sort_by_key(|&(lane, _)| lane);

        for &(lane, robot) in &stale {
            self.reserved.remove(&lane);
            sink.record(&TrafficEvent { at: now, kind: EventKind::Timeout, robot, lane });
        }
        stale
    }

    // ── Internals shared with the deadlock module ─────────────────────────

    pub(crate) fn reserved_map(&self) -> &FxHashMap<Lane, Reservation> {
        &self.reserved
    }

    pub(crate) fn queues_map(&self) -> &FxHashMap<Lane, VecDeque<RobotId>> {
        &self.queues
    }

    pub(crate) fn force_release<S: EventSink>(&mut self, lane: Lane, now: SimTime, sink: &mut S) {
        if let Some(res) = self.reserved.remove(&lane) {
            sink.record(&TrafficEvent {
                at:    now,
                kind:  EventKind::Timeout,
                robot: res.owner,
                lane,
            });
        }
    }
}
