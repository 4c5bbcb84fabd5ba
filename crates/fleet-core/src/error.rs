//! Workspace error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `FleetError` via `From` impls, or keep them separate and wrap `FleetError`
//! as one variant.  Both patterns are acceptable; prefer whichever keeps
//! error sites clean.

use thiserror::Error;

use crate::{RobotId, VertexId};

/// The top-level error type for `fleet-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("robot {0} not found")]
    RobotNotFound(RobotId),

    #[error("vertex {0} is out of range")]
    VertexOutOfRange(VertexId),

    #[error("degenerate lane at vertex {0} (from == to)")]
    DegenerateLane(VertexId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `fleet-*` crates.
pub type FleetResult<T> = Result<T, FleetError>;
