//! The `Fleet` — robot registry, task dispatch, and the simulation tick loop.

use fleet_agent::{Robot, RobotConfig, RobotSnapshot, RobotStatus};
use fleet_core::{EventSink, FleetClock, FleetError, FleetResult, RobotId, SimTime, VertexId};
use fleet_graph::PathProvider;
use fleet_traffic::LaneArbiter;

use crate::receipt::{TaskOutcome, TaskReceipt};

/// Fleet-level tuning knobs.  Per-robot knobs live in [`RobotConfig`].
#[derive(Clone, Debug)]
pub struct FleetConfig {
    /// A reservation older than this is reclaimed during maintenance.
    pub stale_after_secs: f64,
    /// How often the maintenance pass (reclamation + deadlock resolution)
    /// runs.
    pub maintenance_interval_secs: f64,
    /// Per-hop traversal time used for task-receipt estimates.
    pub secs_per_hop: f64,
    /// Configuration applied to every spawned robot.
    pub robot: RobotConfig,
}

impl Default for FleetConfig {
    fn default() -> Self {
        FleetConfig {
            stale_after_secs:          5.0,
            maintenance_interval_secs: 2.0,
            secs_per_hop:              1.0,
            robot:                     RobotConfig::default(),
        }
    }
}

/// Owns the robots, the arbiter, the clock, and the event sink, and drives
/// them all from [`Fleet::tick`].
///
/// `RobotId`s are dense indices into the robot table, assigned sequentially
/// by [`Fleet::spawn_robot`].  Robots are never removed.
pub struct Fleet<P: PathProvider, S: EventSink> {
    provider: P,
    robots:   Vec<Robot>,
    arbiter:  LaneArbiter,
    clock:    FleetClock,
    sink:     S,
    config:   FleetConfig,

    last_maintenance: SimTime,
}

impl<P: PathProvider, S: EventSink> Fleet<P, S> {
    pub fn new(provider: P, config: FleetConfig, sink: S) -> Self {
        Fleet {
            provider,
            robots: Vec::new(),
            arbiter: LaneArbiter::new(),
            clock: FleetClock::new(),
            sink,
            config,
            last_maintenance: SimTime(0.0),
        }
    }

    // ── Registry ──────────────────────────────────────────────────────────

    /// Register a new robot at `start_vertex` and return its id.
    pub fn spawn_robot(&mut self, start_vertex: VertexId) -> FleetResult<RobotId> {
        if start_vertex.index() >= self.provider.vertex_count() {
            return Err(FleetError::VertexOutOfRange(start_vertex));
        }
        let id = RobotId(self.robots.len() as u32);
        self.robots
            .push(Robot::new(id, start_vertex, self.config.robot.clone()));
        Ok(id)
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    pub fn robot(&self, id: RobotId) -> FleetResult<&Robot> {
        self.robots
            .get(id.index())
            .ok_or(FleetError::RobotNotFound(id))
    }

    /// Direct mutable access, for drivers that bypass [`Fleet::assign_task`].
    pub fn robot_mut(&mut self, id: RobotId) -> FleetResult<&mut Robot> {
        self.robots
            .get_mut(id.index())
            .ok_or(FleetError::RobotNotFound(id))
    }

    /// Plain-data snapshots of every robot, in id order.
    pub fn snapshots(&self) -> Vec<RobotSnapshot> {
        self.robots.iter().map(Robot::snapshot).collect()
    }

    pub fn snapshot(&self, robot: RobotId) -> Option<RobotSnapshot> {
        self.robots.get(robot.index()).map(Robot::snapshot)
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Ask `robot` to travel to `destination`.
    ///
    /// Never panics and never leaves the fleet inconsistent: every failure
    /// mode maps to a [`TaskOutcome`] on the returned receipt.  On success
    /// the receipt carries the planned route and a contention-free time
    /// estimate (`path.len() × secs_per_hop`).
    pub fn assign_task(&mut self, robot: RobotId, destination: VertexId) -> TaskReceipt {
        let now = self.clock.now();

        let Some(agent) = self.robots.get_mut(robot.index()) else {
            return TaskReceipt::rejected(TaskOutcome::RobotNotFound);
        };
        if agent.snapshot().status == RobotStatus::Charging {
            return TaskReceipt::rejected(TaskOutcome::RobotCharging);
        }
        if destination.index() >= self.provider.vertex_count() {
            return TaskReceipt::rejected(TaskOutcome::VertexOutOfRange);
        }

        let path = self
            .provider
            .shortest_path(agent.snapshot().current_vertex, destination);
        if path.is_empty() {
            // Still routed through the robot so it lands in `Error` and shows
            // up as needing attention, matching a direct `assign_task` call.
            agent.assign_task(&self.provider, destination, &mut self.arbiter, now, &mut self.sink);
            return TaskReceipt::rejected(TaskOutcome::NoPath);
        }

        if agent.assign_task(&self.provider, destination, &mut self.arbiter, now, &mut self.sink) {
            TaskReceipt {
                outcome:        TaskOutcome::Assigned,
                estimated_secs: path.len() as f64 * self.config.secs_per_hop,
                path,
            }
        } else {
            TaskReceipt::rejected(TaskOutcome::Rejected)
        }
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the whole fleet by `dt` seconds of simulated time.
    pub fn tick(&mut self, dt: f64) {
        self.clock.advance(dt);
        let now = self.clock.now();

        if now.secs_since(self.last_maintenance) >= self.config.maintenance_interval_secs {
            self.run_maintenance(now);
            self.last_maintenance = now;
        }

        for robot in &mut self.robots {
            robot.tick(&self.provider, &mut self.arbiter, now, dt, &mut self.sink);
        }
    }

    /// Reclaim stale reservations, break wait-for deadlocks, and check the
    /// head-on exclusion invariant.
    fn run_maintenance(&mut self, now: SimTime) {
        self.arbiter
            .reclaim_stale(now, self.config.stale_after_secs, &mut self.sink);

        let victims = self.arbiter.resolve_deadlocks(now, &mut self.sink);
        for victim in victims {
            if let Some(robot) = self.robots.get_mut(victim.index()) {
                robot.force_replan(&self.provider, &mut self.arbiter, now, &mut self.sink);
            }
        }

        let collisions = self.arbiter.detect_collisions();
        if !collisions.is_empty() {
            // The arbiter refuses head-on grants, so this can only mean a
            // bookkeeping bug.  Loud in debug, logged in release.
            debug_assert!(false, "head-on reservations detected: {collisions:?}");
            eprintln!("BUG: head-on reservations detected: {collisions:?}");
        }
    }

    // ── Access ────────────────────────────────────────────────────────────

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn arbiter(&self) -> &LaneArbiter {
        &self.arbiter
    }

    /// Mutable arbiter access, for tooling that injects or clears
    /// reservations outside the robot protocol.
    pub fn arbiter_mut(&mut self) -> &mut LaneArbiter {
        &mut self.arbiter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Tear the fleet down, handing back the sink (useful when the sink
    /// buffers events for post-run flushing).
    pub fn into_sink(self) -> S {
        self.sink
    }
}
