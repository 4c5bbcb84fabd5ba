//! The `Robot` state machine.
//!
//! # States
//!
//! | State           | Entered on                                  | Left on                                   |
//! |-----------------|---------------------------------------------|-------------------------------------------|
//! | `Idle`          | spawn, path exhausted, full charge          | successful task assignment                |
//! | `Moving`        | assignment, replan, wait grant, recovery    | arrival, denial, conflict, plan failure   |
//! | `Waiting`       | lane request denied                         | grant, or wait-timeout replan             |
//! | `Charging`      | low battery while stationary at a charger   | battery back at 100 %                     |
//! | `Error`         | path computation yielded no path            | external reassignment                     |
//! | `EmergencyStop` | predicted conflict on the next lane         | next lane observed free                   |
//!
//! # Movement protocol
//!
//! The robot holds at most one lane — the one from `current_vertex` to the
//! path head — and releases it *before* requesting the next, so two healthy
//! robots can never wait on each other.  A reservation lost to stale
//! reclamation is noticed on the next tick (the arbiter no longer attributes
//! the lane to this robot) and simply re-requested.

use std::collections::VecDeque;

use fleet_core::{EventKind, EventSink, Lane, RobotId, SimTime, TrafficEvent, VertexId};
use fleet_graph::PathProvider;
use fleet_traffic::LaneArbiter;

use crate::config::RobotConfig;

// ── RobotStatus ───────────────────────────────────────────────────────────────

/// Lifecycle state of one robot.  Initial: `Idle`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum RobotStatus {
    #[default]
    Idle,
    Moving,
    Waiting,
    Charging,
    Error,
    EmergencyStop,
}

impl RobotStatus {
    /// Stable lowercase name used in reports and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            RobotStatus::Idle          => "idle",
            RobotStatus::Moving        => "moving",
            RobotStatus::Waiting       => "waiting",
            RobotStatus::Charging      => "charging",
            RobotStatus::Error         => "error",
            RobotStatus::EmergencyStop => "emergency_stop",
        }
    }
}

impl std::fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Robot ─────────────────────────────────────────────────────────────────────

/// One autonomous robot.
///
/// Fields are `pub` for inspection; mutate only through [`assign_task`]
/// (external command) and [`tick`] (simulation step).
///
/// [`assign_task`]: Robot::assign_task
/// [`tick`]: Robot::tick
pub struct Robot {
    pub id:             RobotId,
    pub current_vertex: VertexId,
    pub destination:    Option<VertexId>,

    /// Remaining vertices to visit; front = next vertex.  Never contains
    /// `current_vertex`.
    pub path: VecDeque<VertexId>,

    pub status:  RobotStatus,
    /// Battery percentage, clamped to `[0, 100]`.
    pub battery: f64,
    /// Fraction of the held lane already covered, in `[0, 1)` between ticks.
    pub progress: f64,
    /// Lane this robot believes it holds.  Equals
    /// `(current_vertex, path[0])` while `Moving`.
    pub current_lane: Option<Lane>,
    pub wait_started_at: Option<SimTime>,

    /// Task put aside by a low-battery diversion, resumed after charging.
    deferred_destination: Option<VertexId>,
    /// Set once a diversion has been attempted, so it is not recomputed
    /// every tick on the way to the charger (or after giving up).
    diverting: bool,

    config: RobotConfig,
}

impl Robot {
    pub fn new(id: RobotId, start_vertex: VertexId, config: RobotConfig) -> Self {
        Self {
            id,
            current_vertex: start_vertex,
            destination: None,
            path: VecDeque::new(),
            status: RobotStatus::Idle,
            battery: 100.0,
            progress: 0.0,
            current_lane: None,
            wait_started_at: None,
            deferred_destination: None,
            diverting: false,
            config,
        }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    // ── Task assignment ───────────────────────────────────────────────────

    /// Assign a new destination.
    ///
    /// Rejected without state change while `Charging`.  Allowed from `Error`
    /// — an external reassignment is the only way out of that state.  Any
    /// held lane is released and queue memberships purged *before* the old
    /// path is discarded, so a reservation is never orphaned.
    ///
    /// Returns `false` (with status `Error`) if no path exists.
    pub fn assign_task<P: PathProvider, S: EventSink>(
        &mut self,
        provider:    &P,
        destination: VertexId,
        arbiter:     &mut LaneArbiter,
        now:         SimTime,
        sink:        &mut S,
    ) -> bool {
        if self.status == RobotStatus::Charging {
            return false;
        }

        self.release_held(arbiter, now, sink);
        self.destination = Some(destination);
        self.deferred_destination = None;
        self.diverting = false;
        self.wait_started_at = None;
        self.progress = 0.0;

        self.plan_to(provider, destination)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance this robot by `dt` seconds of simulated time.
    pub fn tick<P: PathProvider, S: EventSink>(
        &mut self,
        provider: &P,
        arbiter:  &mut LaneArbiter,
        now:      SimTime,
        dt:       f64,
        sink:     &mut S,
    ) {
        // One-tick lookahead: stop before completing a move onto an occupied
        // lane rather than after.
        if let Some(conflict) = self.imminent_conflict(arbiter, dt) {
            self.enter_emergency_stop(conflict, now, sink);
        }

        if self.status == RobotStatus::Charging {
            self.handle_charging(provider, dt);
        } else if self.status == RobotStatus::Error {
            // Inert until externally reassigned.
        } else if self.battery < self.config.min_battery
            && (self.ready_to_charge(provider) || !self.diverting)
        {
            self.handle_low_battery(provider, arbiter, now, sink);
        } else {
            match self.status {
                RobotStatus::Moving => {
                    self.handle_movement(arbiter, now, dt, sink);
                    // The move itself may have created a new conflict.
                    if let Some(conflict) = self.imminent_conflict(arbiter, dt) {
                        self.enter_emergency_stop(conflict, now, sink);
                    }
                }
                RobotStatus::Waiting => self.handle_waiting(provider, arbiter, now, sink),
                RobotStatus::EmergencyStop => self.try_recover(arbiter),
                _ => {}
            }
        }
    }

    // ── External reconciliation ───────────────────────────────────────────

    /// Called by the orchestrator after this robot's reservation was
    /// forcibly released (deadlock victim).  Drops the stale lane claim and
    /// replans from the current vertex toward the existing destination.
    pub fn force_replan<P: PathProvider, S: EventSink>(
        &mut self,
        provider: &P,
        arbiter:  &mut LaneArbiter,
        _now:     SimTime,
        _sink:    &mut S,
    ) {
        self.current_lane = None;
        self.progress = 0.0;
        self.wait_started_at = None;
        arbiter.remove_waiter(self.id);

        match self.status {
            RobotStatus::Moving | RobotStatus::Waiting | RobotStatus::EmergencyStop => {
                match self.destination {
                    Some(dest) => {
                        self.plan_to(provider, dest);
                    }
                    None => self.status = RobotStatus::Idle,
                }
            }
            _ => {}
        }
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Interpolated `(x, y)` position from vertex coordinates.  `None` if
    /// the current vertex is unknown to the provider.
    pub fn position<P: PathProvider>(&self, provider: &P) -> Option<(f64, f64)> {
        let at = provider.vertex_meta(self.current_vertex)?;
        let Some(lane) = self.current_lane else {
            return Some((at.x, at.y));
        };
        let to = provider.vertex_meta(lane.to)?;
        Some((
            at.x + (to.x - at.x) * self.progress,
            at.y + (to.y - at.y) * self.progress,
        ))
    }

    /// Plain-data view of this robot for reporting.
    pub fn snapshot(&self) -> RobotSnapshot {
        RobotSnapshot {
            id:             self.id,
            current_vertex: self.current_vertex,
            destination:    self.destination,
            status:         self.status,
            battery:        self.battery,
            path:           self.path.iter().copied().collect(),
            current_lane:   self.current_lane,
            progress:       self.progress,
        }
    }

    // ── State handlers ────────────────────────────────────────────────────

    fn handle_movement<S: EventSink>(
        &mut self,
        arbiter: &mut LaneArbiter,
        now:     SimTime,
        dt:      f64,
        sink:    &mut S,
    ) {
        let Some(&next) = self.path.front() else {
            self.status = RobotStatus::Idle;
            return;
        };
        let Ok(lane) = Lane::new(self.current_vertex, next) else {
            // A planner bug put the current vertex at the path head.
            self.path.clear();
            self.status = RobotStatus::Error;
            return;
        };

        // Reconcile a reservation lost to stale reclamation or reassignment:
        // trust the arbiter, not our own memory.
        if let Some(held) = self.current_lane {
            if held != lane || arbiter.holder(held) != Some(self.id) {
                self.current_lane = None;
            }
        }

        if self.current_lane.is_none() {
            if arbiter.request_lane(self.id, lane, now, sink) {
                self.current_lane = Some(lane);
                self.progress = 0.0;
            } else {
                if self.wait_started_at.is_none() {
                    self.wait_started_at = Some(now);
                }
                self.status = RobotStatus::Waiting;
                return;
            }
        }

        self.progress += self.config.movement_speed * dt;
        self.battery = (self.battery - self.config.battery_drain_rate * dt).max(0.0);

        if self.progress >= 1.0 {
            self.current_vertex = next;
            self.path.pop_front();
            self.progress = 0.0;
            if let Some(l) = self.current_lane.take() {
                arbiter.release_lane(l, now, sink);
            }
            if self.path.is_empty() {
                self.status = RobotStatus::Idle;
                self.wait_started_at = None;
            }
        }
    }

    fn handle_waiting<P: PathProvider, S: EventSink>(
        &mut self,
        provider: &P,
        arbiter:  &mut LaneArbiter,
        now:      SimTime,
        sink:     &mut S,
    ) {
        let Some(&next) = self.path.front() else {
            self.status = RobotStatus::Idle;
            self.wait_started_at = None;
            return;
        };
        let Ok(lane) = Lane::new(self.current_vertex, next) else {
            self.path.clear();
            self.status = RobotStatus::Error;
            return;
        };

        // Poll again — queued robots are never auto-granted.
        if arbiter.request_lane(self.id, lane, now, sink) {
            self.current_lane = Some(lane);
            self.progress = 0.0;
            self.status = RobotStatus::Moving;
            self.wait_started_at = None;
            return;
        }

        let timed_out = self
            .wait_started_at
            .is_some_and(|start| now.secs_since(start) > self.config.max_wait_secs);
        if timed_out {
            // Retry-with-replan: if the fresh path is blocked too, the robot
            // re-enters Waiting on the very next tick with a fresh timer.
            arbiter.remove_waiter(self.id);
            self.wait_started_at = None;
            match self.destination {
                Some(dest) => {
                    self.plan_to(provider, dest);
                }
                None => self.status = RobotStatus::Idle,
            }
        }
    }

    fn handle_charging<P: PathProvider>(&mut self, provider: &P, dt: f64) {
        self.battery = (self.battery + self.config.charge_rate * dt).min(100.0);
        if self.battery >= 100.0 {
            self.status = RobotStatus::Idle;
            self.diverting = false;
            match self.deferred_destination.take() {
                Some(dest) => {
                    // Resume the task the diversion put aside.
                    self.destination = Some(dest);
                    self.plan_to(provider, dest);
                }
                None => self.destination = None,
            }
        }
    }

    fn handle_low_battery<P: PathProvider, S: EventSink>(
        &mut self,
        provider: &P,
        arbiter:  &mut LaneArbiter,
        now:      SimTime,
        sink:     &mut S,
    ) {
        if self.ready_to_charge(provider) {
            arbiter.remove_waiter(self.id);
            self.wait_started_at = None;
            self.progress = 0.0;
            // Put an interrupted task aside for resumption after charging.
            // A destination equal to this vertex is the diversion target (or
            // a task that happened to end here) — complete, not deferred.
            if self.destination == Some(self.current_vertex) {
                self.destination = None;
            } else if self.deferred_destination.is_none() {
                self.deferred_destination = self.destination.take();
            }
            self.status = RobotStatus::Charging;
            return;
        }

        // Divert once; `diverting` stays set so the trip to the charger (or
        // a hopeless no-charger map) does not re-route every tick.
        self.diverting = true;
        if let Some(charger) = self.nearest_charger(provider) {
            self.deferred_destination = self.destination;
            self.destination = Some(charger);
            self.release_held(arbiter, now, sink);
            self.wait_started_at = None;
            self.progress = 0.0;
            self.plan_to(provider, charger);
        }
        // No reachable charger: carry on with the task; battery clamps at 0.
    }

    fn try_recover(&mut self, arbiter: &LaneArbiter) {
        match self.next_lane() {
            Some(next_lane) if arbiter.is_lane_occupied(next_lane) => {}
            // Conflict cleared (or no longer possible): resume.
            _ => self.status = RobotStatus::Moving,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// The lane after the held one: `(path[0], path[1])`.
    fn next_lane(&self) -> Option<Lane> {
        let (&a, &b) = (self.path.front()?, self.path.get(1)?);
        Lane::new(a, b).ok()
    }

    /// The next lane, if this tick's movement would finish the held lane
    /// while that next lane is occupied.
    fn imminent_conflict(&self, arbiter: &LaneArbiter, dt: f64) -> Option<Lane> {
        self.current_lane?;
        let next_lane = self.next_lane()?;
        let projected = self.progress + self.config.movement_speed * dt;
        (projected >= 1.0 && arbiter.is_lane_occupied(next_lane)).then_some(next_lane)
    }

    fn enter_emergency_stop<S: EventSink>(&mut self, conflict: Lane, now: SimTime, sink: &mut S) {
        if self.status != RobotStatus::EmergencyStop {
            self.status = RobotStatus::EmergencyStop;
            sink.record(&TrafficEvent {
                at:    now,
                kind:  EventKind::Blocked,
                robot: self.id,
                lane:  conflict,
            });
        }
    }

    /// `true` if stationary at a charger vertex (never mid-lane).
    fn ready_to_charge<P: PathProvider>(&self, provider: &P) -> bool {
        self.current_lane.is_none()
            && provider
                .vertex_meta(self.current_vertex)
                .is_some_and(|m| m.is_charger)
    }

    /// Nearest charger by path length; ties break toward the lower vertex id
    /// (charger lists are ascending).
    fn nearest_charger<P: PathProvider>(&self, provider: &P) -> Option<VertexId> {
        let mut best: Option<(usize, VertexId)> = None;
        for &charger in provider.charger_vertices() {
            let path = provider.shortest_path(self.current_vertex, charger);
            if path.is_empty() {
                continue;
            }
            if best.is_none_or(|(len, _)| path.len() < len) {
                best = Some((path.len(), charger));
            }
        }
        best.map(|(_, charger)| charger)
    }

    /// Release the held lane (if the arbiter still attributes it to us) and
    /// purge any wait-queue membership.
    fn release_held<S: EventSink>(&mut self, arbiter: &mut LaneArbiter, now: SimTime, sink: &mut S) {
        if let Some(lane) = self.current_lane.take() {
            if arbiter.holder(lane) == Some(self.id) {
                arbiter.release_lane(lane, now, sink);
            }
        }
        arbiter.remove_waiter(self.id);
    }

    /// Compute and install a path from the current vertex to `dest`.
    ///
    /// Empty result ⇒ `Error` and `false`.  A trivial path (already there)
    /// ⇒ `Idle` and `true`.  Otherwise the leading current vertex is
    /// stripped, leaving head = next vertex, and the robot is `Moving`.
    fn plan_to<P: PathProvider>(&mut self, provider: &P, dest: VertexId) -> bool {
        let full = provider.shortest_path(self.current_vertex, dest);
        if full.is_empty() {
            self.path.clear();
            self.status = RobotStatus::Error;
            return false;
        }

        self.path = full.into_iter().skip(1).collect();
        self.current_lane = None;
        self.progress = 0.0;
        self.status = if self.path.is_empty() {
            RobotStatus::Idle
        } else {
            RobotStatus::Moving
        };
        true
    }
}

// ── RobotSnapshot ─────────────────────────────────────────────────────────────

/// Plain-data view of one robot, for status reports and output writers.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotSnapshot {
    pub id:             RobotId,
    pub current_vertex: VertexId,
    pub destination:    Option<VertexId>,
    pub status:         RobotStatus,
    pub battery:        f64,
    pub path:           Vec<VertexId>,
    pub current_lane:   Option<Lane>,
    pub progress:       f64,
}
