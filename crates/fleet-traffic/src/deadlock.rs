//! Wait-for graph construction and deadlock resolution.
//!
//! # Model
//!
//! Edge `A → B` means robot `A` is queued on a lane whose reservation (on
//! the lane itself or its reverse) is held by robot `B`.  Because a robot
//! waits on at most one lane, every robot has at most one outgoing edge, so
//! the wait-for graph is functional and each robot belongs to at most one
//! cycle.
//!
//! # Resolution policy
//!
//! For each cycle, force-release the **oldest** reservation held by any
//! cycle participant; ties break toward the lower `RobotId`, then the lower
//! lane.  The eviction is recorded as a `Timeout` event and the victim is
//! returned so the orchestrator can replan it.  Resolution repeats until no
//! cycle remains — each pass removes at least one reservation, so the loop
//! terminates.

use rustc_hash::FxHashMap;

use fleet_core::{EventSink, Lane, RobotId, SimTime};

use crate::arbiter::LaneArbiter;

impl LaneArbiter {
    /// Detect wait-for cycles among currently blocked robots and forcibly
    /// resolve every one of them.  Returns the evicted robots (deduplicated,
    /// ascending) for replanning.  No-op when no cycle exists — the common
    /// case, since the movement protocol releases before requesting.
    pub fn resolve_deadlocks<S: EventSink>(
        &mut self,
        now:  SimTime,
        sink: &mut S,
    ) -> Vec<RobotId> {
        let mut victims: Vec<RobotId> = Vec::new();

        loop {
            let wait_for = self.build_wait_for();
            let Some(cycle) = find_cycle(&wait_for) else {
                break;
            };

            let Some((lane, owner)) = self.oldest_reservation_of(&cycle) else {
                // Cycle members hold nothing to release (their holders sit
                // outside the cycle) — cannot happen in a true cycle, but
                // bail rather than spin.
                break;
            };
            self.force_release(lane, now, sink);
            victims.push(owner);
        }

        victims.sort_unstable();
        victims.dedup();
        victims
    }

    /// One outgoing edge per queued robot: waiter → holder of the requested
    /// lane or its reverse.  Self-edges are skipped.
    fn build_wait_for(&self) -> FxHashMap<RobotId, RobotId> {
        let mut edges = FxHashMap::default();
        for (&lane, queue) in self.queues_map() {
            let holder = self
                .holder(lane)
                .or_else(|| self.holder(lane.reverse()));
            let Some(holder) = holder else { continue };
            for &waiter in queue {
                if waiter != holder {
                    edges.insert(waiter, holder);
                }
            }
        }
        edges
    }

    /// The oldest reservation held by any robot in `cycle`, keyed by
    /// `(granted_at, owner, lane)` for deterministic tie-breaking.
    fn oldest_reservation_of(&self, cycle: &[RobotId]) -> Option<(Lane, RobotId)> {
        self.reserved_map()
            .iter()
            .filter(|(_, res)| cycle.contains(&res.owner))
            .min_by(|(la, ra), (lb, rb)| {
                ra.granted_at
                    .0
                    .total_cmp(&rb.granted_at.0)
                    .then(ra.owner.cmp(&rb.owner))
                    .then(la.cmp(lb))
            })
            .map(|(&lane, res)| (lane, res.owner))
    }
}

/// Find one cycle in a functional graph (≤1 outgoing edge per node).
///
/// Walks each start node following edges, coloring nodes grey while on the
/// current walk and black once fully explored.  Hitting a grey node closes a
/// cycle.  Start nodes are visited in ascending `RobotId` order so the
/// returned cycle is deterministic.
fn find_cycle(edges: &FxHashMap<RobotId, RobotId>) -> Option<Vec<RobotId>> {
    #[derive(Copy, Clone, PartialEq)]
    enum Color {
        White,
        Grey,
        Black,
    }

    let mut starts: Vec<RobotId> = edges.keys().copied().collect();
    starts.sort_unstable();

    let mut color: FxHashMap<RobotId, Color> = FxHashMap::default();

    for start in starts {
        if color.get(&start).copied().unwrap_or(Color::White) != Color::White {
            continue;
        }

        let mut walk: Vec<RobotId> = Vec::new();
        let mut cur = start;
        loop {
            match color.get(&cur).copied().unwrap_or(Color::White) {
                Color::Black => break,
                Color::Grey => {
                    // Cycle: the suffix of the walk starting at `cur`.
                    let pos = walk.iter().position(|&r| r == cur).unwrap_or(0);
                    return Some(walk[pos..].to_vec());
                }
                Color::White => {
                    color.insert(cur, Color::Grey);
                    walk.push(cur);
                    match edges.get(&cur) {
                        Some(&next) => cur = next,
                        None => break,
                    }
                }
            }
        }
        for r in walk {
            color.insert(r, Color::Black);
        }
    }

    None
}
