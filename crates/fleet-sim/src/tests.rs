//! Unit and integration tests for fleet-sim.

use fleet_core::{EventKind, FleetError, Lane, MemorySink, NoopSink, RobotId, SimTime, VertexId};
use fleet_graph::{NavGraph, NavGraphBuilder, VertexMeta};
use fleet_agent::RobotStatus;

use crate::{Fleet, FleetConfig, TaskOutcome};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn v(n: u32) -> VertexId {
    VertexId(n)
}

fn lane(from: u32, to: u32) -> Lane {
    Lane::new(v(from), v(to)).unwrap()
}

/// Line graph 0 ↔ 1 ↔ 2 ↔ 3, charger at vertex 0.
fn line_graph() -> NavGraph {
    let mut b = NavGraphBuilder::new();
    for i in 0..4 {
        b.add_vertex(VertexMeta {
            name: format!("v{i}"),
            is_charger: i == 0,
            x: i as f64,
            y: 0.0,
        });
    }
    for i in 0..3u32 {
        b.add_corridor(v(i), v(i + 1), 1);
    }
    b.build()
}

/// Two connected vertices plus an unreachable island at vertex 2.
fn island_graph() -> NavGraph {
    let mut b = NavGraphBuilder::new();
    for i in 0..3 {
        b.add_vertex(VertexMeta { x: i as f64, ..Default::default() });
    }
    b.add_corridor(v(0), v(1), 1);
    b.build()
}

fn fleet() -> Fleet<NavGraph, MemorySink> {
    Fleet::new(line_graph(), FleetConfig::default(), MemorySink::new())
}

// ── Registry ──────────────────────────────────────────────────────────────────

mod registry {
    use super::*;

    #[test]
    fn ids_are_assigned_sequentially() {
        let mut fleet = fleet();
        assert_eq!(fleet.spawn_robot(v(0)).unwrap(), RobotId(0));
        assert_eq!(fleet.spawn_robot(v(1)).unwrap(), RobotId(1));
        assert_eq!(fleet.spawn_robot(v(2)).unwrap(), RobotId(2));
        assert_eq!(fleet.robot_count(), 3);
    }

    #[test]
    fn spawning_outside_the_graph_fails() {
        let mut fleet = fleet();
        let err = fleet.spawn_robot(v(99)).unwrap_err();
        assert!(matches!(err, FleetError::VertexOutOfRange(vertex) if vertex == v(99)));
        assert_eq!(fleet.robot_count(), 0);
    }

    #[test]
    fn lookup_of_unknown_robot_errors() {
        let mut fleet = fleet();
        let known = fleet.spawn_robot(v(0)).unwrap();
        assert!(fleet.robot(known).is_ok());
        assert!(matches!(
            fleet.robot(RobotId(9)),
            Err(FleetError::RobotNotFound(id)) if id == RobotId(9)
        ));
        assert!(matches!(
            fleet.robot_mut(RobotId(9)),
            Err(FleetError::RobotNotFound(id)) if id == RobotId(9)
        ));
    }

    #[test]
    fn snapshots_report_in_id_order() {
        let mut fleet = fleet();
        fleet.spawn_robot(v(2)).unwrap();
        fleet.spawn_robot(v(0)).unwrap();

        let snaps = fleet.snapshots();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].id, RobotId(0));
        assert_eq!(snaps[0].current_vertex, v(2));
        assert_eq!(snaps[1].id, RobotId(1));
        assert_eq!(snaps[1].current_vertex, v(0));
        assert!(fleet.snapshot(RobotId(5)).is_none());
    }
}

// ── Dispatch receipts ─────────────────────────────────────────────────────────

mod dispatch {
    use super::*;

    #[test]
    fn accepted_task_carries_route_and_estimate() {
        let mut fleet = fleet();
        let robot = fleet.spawn_robot(v(0)).unwrap();

        let receipt = fleet.assign_task(robot, v(3));
        assert!(receipt.success());
        assert_eq!(receipt.outcome, TaskOutcome::Assigned);
        assert_eq!(receipt.path, vec![v(0), v(1), v(2), v(3)]);
        assert_eq!(receipt.estimated_secs, 4.0);
    }

    #[test]
    fn unknown_robot_is_reported() {
        let mut fleet = fleet();
        let receipt = fleet.assign_task(RobotId(7), v(1));
        assert_eq!(receipt.outcome, TaskOutcome::RobotNotFound);
        assert!(!receipt.success());
        assert!(receipt.path.is_empty());
    }

    #[test]
    fn destination_outside_the_graph_is_reported() {
        let mut fleet = fleet();
        let robot = fleet.spawn_robot(v(0)).unwrap();
        let receipt = fleet.assign_task(robot, v(42));
        assert_eq!(receipt.outcome, TaskOutcome::VertexOutOfRange);
        // The robot is untouched.
        assert_eq!(fleet.snapshot(robot).unwrap().status, RobotStatus::Idle);
    }

    #[test]
    fn unreachable_destination_puts_the_robot_in_error() {
        let mut fleet = Fleet::new(island_graph(), FleetConfig::default(), MemorySink::new());
        let robot = fleet.spawn_robot(v(0)).unwrap();

        let receipt = fleet.assign_task(robot, v(2));
        assert_eq!(receipt.outcome, TaskOutcome::NoPath);
        assert_eq!(fleet.snapshot(robot).unwrap().status, RobotStatus::Error);

        // A reachable reassignment recovers it.
        let receipt = fleet.assign_task(robot, v(1));
        assert_eq!(receipt.outcome, TaskOutcome::Assigned);
        assert_eq!(fleet.snapshot(robot).unwrap().status, RobotStatus::Moving);
    }

    #[test]
    fn charging_robots_refuse_tasks() {
        // min_battery above full forces an immediate charge at the spawn
        // charger on the first tick.
        let mut config = FleetConfig::default();
        config.robot.min_battery = 101.0;
        let mut fleet = Fleet::new(line_graph(), config, MemorySink::new());
        let robot = fleet.spawn_robot(v(0)).unwrap();

        fleet.tick(0.1);
        assert_eq!(fleet.snapshot(robot).unwrap().status, RobotStatus::Charging);

        let receipt = fleet.assign_task(robot, v(3));
        assert_eq!(receipt.outcome, TaskOutcome::RobotCharging);
        assert_eq!(fleet.snapshot(robot).unwrap().status, RobotStatus::Charging);
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

mod ticking {
    use super::*;

    #[test]
    fn a_lone_robot_completes_its_trip() {
        let mut fleet = fleet();
        let robot = fleet.spawn_robot(v(0)).unwrap();
        fleet.assign_task(robot, v(3));

        for _ in 0..12 {
            fleet.tick(0.5);
        }

        let snap = fleet.snapshot(robot).unwrap();
        assert_eq!(snap.status, RobotStatus::Idle);
        assert_eq!(snap.current_vertex, v(3));
        assert_eq!(fleet.now(), SimTime(6.0));
        assert_eq!(fleet.arbiter().reserved_count(), 0);
    }

    #[test]
    fn head_on_robots_take_turns_in_a_corridor() {
        let mut fleet = fleet();
        let a = fleet.spawn_robot(v(0)).unwrap();
        let b = fleet.spawn_robot(v(1)).unwrap();
        fleet.assign_task(a, v(1));
        fleet.assign_task(b, v(0));

        // Tick 1: a claims 0→1; b is refused the reverse and queues.
        fleet.tick(0.5);
        assert_eq!(fleet.arbiter().holder(lane(0, 1)), Some(a));
        assert_eq!(fleet.snapshot(b).unwrap().status, RobotStatus::Waiting);
        assert_eq!(fleet.arbiter().queue_position(b, lane(1, 0)), Some(0));

        // Tick 2: a arrives and releases; b, ticking after, is granted.
        fleet.tick(0.5);
        assert_eq!(fleet.snapshot(a).unwrap().status, RobotStatus::Idle);
        assert_eq!(fleet.snapshot(a).unwrap().current_vertex, v(1));
        assert_eq!(fleet.arbiter().holder(lane(1, 0)), Some(b));

        // Ticks 3-4: b crosses.
        fleet.tick(0.5);
        fleet.tick(0.5);
        let snap = fleet.snapshot(b).unwrap();
        assert_eq!(snap.status, RobotStatus::Idle);
        assert_eq!(snap.current_vertex, v(0));

        let sink = fleet.into_sink();
        assert_eq!(sink.of_kind(EventKind::Granted).len(), 2);
        assert_eq!(sink.of_kind(EventKind::Queued).len(), 1);
        assert_eq!(sink.of_kind(EventKind::Released).len(), 2);
    }
}

// ── Maintenance ───────────────────────────────────────────────────────────────

mod maintenance {
    use super::*;

    #[test]
    fn stale_reservations_are_reclaimed_on_cadence() {
        let mut fleet = fleet();
        fleet.spawn_robot(v(0)).unwrap();

        // A phantom holder that will never release.
        let phantom = RobotId(99);
        let mut sink = NoopSink;
        assert!(fleet
            .arbiter_mut()
            .request_lane(phantom, lane(2, 3), SimTime(0.0), &mut sink));

        // Maintenance passes at t = 2 and t = 4 leave it alone (< 5 s old).
        for _ in 0..4 {
            fleet.tick(1.0);
        }
        assert_eq!(fleet.arbiter().holder(lane(2, 3)), Some(phantom));

        // At t = 6 it is six seconds old and gets reclaimed.
        fleet.tick(1.0);
        fleet.tick(1.0);
        assert_eq!(fleet.arbiter().holder(lane(2, 3)), None);

        let timeouts = fleet.sink().of_kind(EventKind::Timeout);
        assert_eq!(timeouts.len(), 1);
        assert_eq!(timeouts[0].robot, phantom);
        assert_eq!(timeouts[0].lane, lane(2, 3));
    }

    #[test]
    fn wait_for_cycles_are_broken() {
        let mut fleet = fleet();
        let r0 = fleet.spawn_robot(v(0)).unwrap();
        let r1 = fleet.spawn_robot(v(2)).unwrap();

        // Manufacture a two-cycle directly: each holds one lane and queues
        // for the other's.
        let mut sink = NoopSink;
        let arbiter = fleet.arbiter_mut();
        assert!(arbiter.request_lane(r0, lane(0, 1), SimTime(0.0), &mut sink));
        assert!(arbiter.request_lane(r1, lane(2, 3), SimTime(0.5), &mut sink));
        assert!(!arbiter.request_lane(r0, lane(2, 3), SimTime(1.0), &mut sink));
        assert!(!arbiter.request_lane(r1, lane(0, 1), SimTime(1.0), &mut sink));

        // First maintenance pass evicts the oldest reservation (r0's) and
        // replans the victim, which clears its queue membership too.
        fleet.tick(2.0);
        assert_eq!(fleet.arbiter().holder(lane(0, 1)), None);
        assert_eq!(fleet.arbiter().holder(lane(2, 3)), Some(r1));
        assert_eq!(fleet.arbiter().waiting_on(r0), None);
    }
}
