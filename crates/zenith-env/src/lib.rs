//! Match environment for the Zenith reward engine.
//!
//! Connects an external [`TransitionEngine`] to the detector bank:
//!
//! - [`config`]: [`EnvConfig`] loaded from TOML and validated once.
//! - [`lifecycle`]: the [`EpisodeController`] phase machine around the
//!   reward combiner.
//! - [`conditions`]: goal termination and tick-based truncation.
//! - [`action`]: the discrete [`LookupTable`] and [`RepeatAction`] decoder.
//! - [`obs`]: team-relative [`ObsEncoder`].
//! - [`env`]: [`MatchEnv`], which ties them together.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod conditions;
pub mod config;
pub mod engine;
pub mod env;
pub mod lifecycle;
pub mod obs;

pub use action::{ActionError, ControllerState, LookupTable, RepeatAction};
pub use conditions::{
    AnyCondition, DoneCondition, GoalCondition, NoTouchTimeoutCondition, TimeoutCondition,
};
pub use config::{ConfigError, EnvConfig, MatchConfig};
pub use engine::TransitionEngine;
pub use env::{EnvError, MatchEnv, Observations, Transition};
pub use lifecycle::{EpisodeController, EpisodeError, EpisodePhase};
pub use obs::{ObsEncoder, ObsError, BALL_OBS_LEN, CAR_OBS_LEN};
