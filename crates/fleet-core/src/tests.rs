//! Unit tests for fleet-core.

use crate::{EventKind, EventSink, FleetClock, FleetError, Lane, MemorySink, RobotId, SimTime, TrafficEvent, VertexId};

// ── IDs ───────────────────────────────────────────────────────────────────────

mod ids {
    use super::*;

    #[test]
    fn default_is_invalid() {
        assert_eq!(RobotId::default(), RobotId::INVALID);
        assert_eq!(VertexId::default(), VertexId::INVALID);
    }

    #[test]
    fn index_round_trip() {
        let v = VertexId(7);
        assert_eq!(v.index(), 7);
        assert_eq!(VertexId::try_from(7usize).unwrap(), v);
    }

    #[test]
    fn display_includes_type_name() {
        assert_eq!(RobotId(3).to_string(), "RobotId(3)");
    }
}

// ── Lane ──────────────────────────────────────────────────────────────────────

mod lane {
    use super::*;

    #[test]
    fn new_rejects_degenerate() {
        let err = Lane::new(VertexId(4), VertexId(4)).unwrap_err();
        assert!(matches!(err, FleetError::DegenerateLane(VertexId(4))));
    }

    #[test]
    fn reverse_flips_direction() {
        let lane = Lane::new(VertexId(0), VertexId(1)).unwrap();
        let rev = lane.reverse();
        assert_eq!(rev.from, VertexId(1));
        assert_eq!(rev.to, VertexId(0));
        assert_ne!(lane, rev);
        assert_eq!(rev.reverse(), lane);
    }

    #[test]
    fn conflict_is_reverse_only() {
        let ab = Lane::new(VertexId(0), VertexId(1)).unwrap();
        let ba = Lane::new(VertexId(1), VertexId(0)).unwrap();
        let ac = Lane::new(VertexId(0), VertexId(2)).unwrap();
        assert!(ab.conflicts_with(ba));
        assert!(ba.conflicts_with(ab));
        assert!(!ab.conflicts_with(ac));
        assert!(!ab.conflicts_with(ab));
    }
}

// ── Time ──────────────────────────────────────────────────────────────────────

mod time {
    use super::*;

    #[test]
    fn clock_advances_by_dt() {
        let mut clock = FleetClock::new();
        clock.advance(0.5);
        clock.advance(1.25);
        assert!((clock.now().0 - 1.75).abs() < 1e-9);
    }

    #[test]
    fn clock_ignores_non_positive_dt() {
        let mut clock = FleetClock::new();
        clock.advance(1.0);
        clock.advance(0.0);
        clock.advance(-5.0);
        assert!((clock.now().0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn secs_since_measures_elapsed() {
        let t0 = SimTime(2.0);
        let t1 = t0.offset(3.5);
        assert!((t1.secs_since(t0) - 3.5).abs() < 1e-9);
        assert!(t0.secs_since(t1) < 0.0);
    }
}

// ── Event sinks ───────────────────────────────────────────────────────────────

mod sinks {
    use super::*;

    fn event(kind: EventKind) -> TrafficEvent {
        TrafficEvent {
            at:    SimTime(1.0),
            kind,
            robot: RobotId(0),
            lane:  Lane::new(VertexId(0), VertexId(1)).unwrap(),
        }
    }

    #[test]
    fn memory_sink_records_in_order() {
        let mut sink = MemorySink::new();
        sink.record(&event(EventKind::Granted));
        sink.record(&event(EventKind::Released));
        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.events[0].kind, EventKind::Granted);
        assert_eq!(sink.of_kind(EventKind::Released).len(), 1);
    }

    #[test]
    fn sink_usable_through_mut_ref() {
        let mut sink = MemorySink::new();
        {
            let mut by_ref = &mut sink;
            by_ref.record(&event(EventKind::Queued));
        }
        assert_eq!(sink.events.len(), 1);
    }
}
