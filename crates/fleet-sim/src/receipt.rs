//! Task receipts — the dispatcher-facing result of an assignment attempt.

use fleet_core::VertexId;

/// How an assignment attempt resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The robot accepted the task and planned a route.
    Assigned,
    /// No robot with that id is registered.
    RobotNotFound,
    /// The robot is charging and does not take tasks until it finishes.
    RobotCharging,
    /// The destination vertex is not part of the nav graph.
    VertexOutOfRange,
    /// No route exists from the robot's vertex to the destination.
    NoPath,
    /// The robot refused the task for some other reason.
    Rejected,
}

/// Outcome plus routing detail for a single `assign_task` call.
///
/// `path` and `estimated_secs` are populated only on [`TaskOutcome::Assigned`];
/// the estimate is the planned vertex count times the per-hop traversal time
/// and ignores contention.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskReceipt {
    pub outcome:        TaskOutcome,
    pub estimated_secs: f64,
    pub path:           Vec<VertexId>,
}

impl TaskReceipt {
    pub(crate) fn rejected(outcome: TaskOutcome) -> Self {
        TaskReceipt { outcome, estimated_secs: 0.0, path: Vec::new() }
    }

    /// True when the task was accepted.
    pub fn success(&self) -> bool {
        self.outcome == TaskOutcome::Assigned
    }
}
