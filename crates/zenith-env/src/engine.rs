//! The transition engine seam.
//!
//! Physics lives outside this workspace. A [`TransitionEngine`] spawns
//! kickoff states and advances the world one physics tick at a time from
//! decoded controls; [`MatchEnv`](crate::MatchEnv) drives it.

use indexmap::IndexMap;
use zenith_core::{AgentId, GameState};

use crate::action::ControllerState;

/// Produces world snapshots from controls.
///
/// Implementations must keep `tick_count` non-decreasing across `step`
/// calls and must report every car's cumulative touch count.
pub trait TransitionEngine: Send {
    /// Spawn a kickoff with `blue` and `orange` cars and return its
    /// snapshot. The car set of the returned snapshot defines the agent set
    /// for the episode.
    fn reset(&mut self, blue: usize, orange: usize) -> GameState;

    /// Apply one tick of `controls` (one entry per agent) and return the
    /// resulting snapshot.
    fn step(&mut self, controls: &IndexMap<AgentId, ControllerState>) -> GameState;
}

impl<E: TransitionEngine + ?Sized> TransitionEngine for Box<E> {
    fn reset(&mut self, blue: usize, orange: usize) -> GameState {
        (**self).reset(blue, orange)
    }

    fn step(&mut self, controls: &IndexMap<AgentId, ControllerState>) -> GameState {
        (**self).step(controls)
    }
}
