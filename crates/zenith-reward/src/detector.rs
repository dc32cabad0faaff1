//! The [`Detector`] trait.
//!
//! Detectors are independent, stateful maneuver classifiers executed in
//! sequence each step. Each one owns private per-agent memory, created at
//! [`reset`](Detector::reset) and mutated only by its own
//! [`step`](Detector::step).

use indexmap::IndexMap;
use zenith_core::{AgentId, GameState};

use crate::context::StepContext;

/// One reward value per agent, in agent-set order.
pub type AgentRewards = IndexMap<AgentId, f32>;

/// A stateful classifier that turns the snapshot stream into per-agent
/// rewards for one maneuver.
///
/// # Contract
///
/// - `reset()` discards all memory from the previous episode. Calling it
///   twice with the same arguments must leave identical state.
/// - `step()` returns exactly one finite value per agent in the context,
///   `0.0` when the maneuver is not recognised. It never fails.
/// - A detector never reads or writes another detector's memory.
///
/// # Object safety
///
/// This trait is object-safe; the combiner stores detectors as
/// `Vec<Box<dyn Detector>>`.
///
/// # Examples
///
/// A detector that pays a fixed bonus while the car is airborne:
///
/// ```
/// use zenith_core::{AgentId, GameState};
/// use zenith_reward::{AgentRewards, Detector, StepContext};
///
/// struct Airborne;
///
/// impl Detector for Airborne {
///     fn name(&self) -> &str { "airborne" }
///
///     fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}
///
///     fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
///         ctx.cars()
///             .iter()
///             .map(|&(id, car)| (id, if car.on_ground { 0.0 } else { 1.0 }))
///             .collect()
///     }
/// }
///
/// assert_eq!(Airborne.name(), "airborne");
/// ```
pub trait Detector: Send + 'static {
    /// Stable identifier used for weights, error reports, and tallies.
    fn name(&self) -> &str;

    /// Start a new episode.
    ///
    /// `agents` may be disjoint from the previous episode's set. Memory for
    /// every agent is rebuilt from `initial` (for example, a "had flip" flag
    /// seeded from the car's current `has_flip`).
    fn reset(&mut self, agents: &[AgentId], initial: &GameState);

    /// Observe one step and return a reward for every agent.
    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        (**self).reset(agents, initial);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        (**self).step(ctx)
    }
}
