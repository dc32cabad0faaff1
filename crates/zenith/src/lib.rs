//! Zenith: a mechanic-detection reward engine for vehicle-and-ball
//! reinforcement learning.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Zenith sub-crates. For most users, adding `zenith` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use zenith::prelude::*;
//!
//! // Pays 1.0 to every car that is in the air.
//! struct Airborne;
//! impl Detector for Airborne {
//!     fn name(&self) -> &str { "airborne" }
//!     fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}
//!     fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
//!         ctx.cars()
//!             .iter()
//!             .map(|&(id, car)| (id, if car.on_ground { 0.0 } else { 1.0 }))
//!             .collect()
//!     }
//! }
//!
//! let detectors: Vec<(Box<dyn Detector>, f32)> = vec![
//!     (MechanicKind::Goal.build(ArenaConstants::standard()), 30.0),
//!     (Box::new(Airborne) as Box<dyn Detector>, 2.0),
//! ];
//! let mut combiner = RewardCombiner::new(detectors).unwrap();
//!
//! let mut state = GameState::new(Vec3::new(0.0, 0.0, 93.0));
//! state.cars.insert(AgentId(0), CarState::new(Team::Blue));
//! state.cars.insert(AgentId(1), CarState::new(Team::Orange));
//! let agents = state.agent_ids();
//! combiner.reset(&agents, &state).unwrap();
//!
//! state.cars[&AgentId(0)].on_ground = false;
//! state.goal_scored = true;
//! state.scoring_team = Some(Team::Blue);
//! let done: AgentFlags = agents.iter().map(|&a| (a, false)).collect();
//! let out = combiner.step(&agents, &state, &done, &done).unwrap();
//! assert_eq!(out.total(AgentId(0)), Some(10.0 * 30.0 + 2.0));
//! assert_eq!(out.total(AgentId(1)), Some(-10.0 * 30.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `zenith-core` | IDs, vector math, snapshots, arena constants |
//! | [`reward`] | `zenith-reward` | Detector trait, step context, reward combiner |
//! | [`mechanics`] | `zenith-mechanics` | The maneuver detectors and weight table |
//! | [`env`] | `zenith-env` | Configuration, episode lifecycle, match environment |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`zenith-core`).
///
/// Agent and team IDs, [`types::GameState`] snapshots, the
/// [`types::Orientation`] basis, and [`types::ArenaConstants`].
pub use zenith_core as types;

/// Detector trait and reward combiner (`zenith-reward`).
///
/// [`reward::Detector`] is the main extension point for new maneuvers.
pub use zenith_reward as reward;

/// The maneuver detectors (`zenith-mechanics`).
///
/// [`mechanics::MechanicKind`] lists every detector in combiner order;
/// [`mechanics::WeightTable`] builds the standard combiner.
pub use zenith_mechanics as mechanics;

/// Match environment (`zenith-env`).
///
/// [`env::MatchEnv`] drives a [`env::TransitionEngine`] and returns
/// observations, rewards, and done flags per step.
pub use zenith_env as env;

/// Common imports for typical Zenith usage.
///
/// ```rust
/// use zenith::prelude::*;
/// ```
pub mod prelude {
    // Snapshot types
    pub use zenith_core::{
        AgentFlags, AgentId, ArenaConstants, CarState, GameState, Orientation, PhysicsState, Team,
        Vec3,
    };

    // Errors
    pub use zenith_core::SnapshotError;
    pub use zenith_env::{ConfigError, EnvError, EpisodeError};
    pub use zenith_reward::{CombinerError, RewardError};

    // Rewards
    pub use zenith_reward::{AgentRewards, CombinedRewards, Detector, RewardCombiner, StepContext};

    // Mechanics
    pub use zenith_mechanics::{MechanicKind, WeightTable};

    // Environment
    pub use zenith_env::{
        ControllerState, EnvConfig, EpisodePhase, MatchEnv, Transition, TransitionEngine,
    };
}
