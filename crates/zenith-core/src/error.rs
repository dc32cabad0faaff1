//! Snapshot contract and arena configuration errors.
//!
//! These are programming defects in whatever produced the snapshot, not
//! recoverable runtime conditions. They abort the step instead of being
//! defaulted, because a silently patched snapshot corrupts the training
//! signal.

use crate::id::AgentId;

/// A per-step input violated the snapshot contract.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// An active agent has no car in the snapshot.
    #[error("agent {agent} has no car in the snapshot")]
    MissingCar {
        /// The agent without a car.
        agent: AgentId,
    },
    /// A termination or truncation map has no entry for an active agent.
    #[error("{map} flags have no entry for agent {agent}")]
    MissingFlag {
        /// Which map (`"terminated"` or `"truncated"`).
        map: &'static str,
        /// The agent without an entry.
        agent: AgentId,
    },
    /// `goal_scored` is set but the scoring team is unknown.
    #[error("goal_scored is set without a scoring team")]
    MissingScoringTeam,
}

/// An [`ArenaConstants`](crate::ArenaConstants) value is unusable.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ArenaError {
    /// A dimension or limit is NaN, infinite, zero, or negative.
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive {
        /// Which field.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A coordinate is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NotFinite {
        /// Which field.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}
