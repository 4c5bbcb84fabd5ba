//! `Lane` — a directed, reservable graph edge.
//!
//! A lane and its reverse are *distinct* values that *conflict*: the arbiter
//! must never hold reservations on both at once (head-on exclusion).  A
//! `Lane` is well-formed by construction — [`Lane::new`] rejects degenerate
//! `from == to` pairs, so downstream code never re-validates.

use std::fmt;

use crate::error::{FleetError, FleetResult};
use crate::ids::VertexId;

/// An ordered pair of vertices, directionally distinct from its reverse.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    pub from: VertexId,
    pub to:   VertexId,
}

impl Lane {
    /// Construct a lane, rejecting the degenerate `from == to` case.
    pub fn new(from: VertexId, to: VertexId) -> FleetResult<Lane> {
        if from == to {
            return Err(FleetError::DegenerateLane(from));
        }
        Ok(Lane { from, to })
    }

    /// The opposing direction of travel over the same physical segment.
    #[inline]
    pub fn reverse(self) -> Lane {
        Lane { from: self.to, to: self.from }
    }

    /// `true` if `other` is the reverse of `self` (head-on conflict).
    #[inline]
    pub fn conflicts_with(self, other: Lane) -> bool {
        self.reverse() == other
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.from.0, self.to.0)
    }
}
