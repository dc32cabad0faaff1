//! Core types for the Zenith reward engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! per-step world snapshot consumed by every detector: agent and team
//! identifiers, vector math, car/ball physical state, the arena constants
//! injected into detectors, and the snapshot contract errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod error;
pub mod id;
pub mod math;
pub mod state;

pub use arena::ArenaConstants;
pub use error::{ArenaError, SnapshotError};
pub use id::{AgentFlags, AgentId, Team};
pub use math::{EulerAngles, Orientation, Vec3, EPSILON};
pub use state::{CarState, GameState, PhysicsState};
