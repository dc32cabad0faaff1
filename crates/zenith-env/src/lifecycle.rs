//! Episode lifecycle state machine.
//!
//! ```text
//! Uninitialized ──reset──▶ Ready ──step──▶ Running ──step──▶ Terminated
//!                            ▲                │    └───────▶ Truncated
//!                            └────reset───────┴─────────────────┘
//! ```
//!
//! `reset` is accepted from every phase, including straight after the
//! finishing step. Termination and truncation are decided by the caller and
//! passed in as per-agent flags; the controller only records them.

use std::fmt;

use tracing::debug;
use zenith_core::{AgentFlags, AgentId, GameState};
use zenith_reward::{CombinedRewards, RewardCombiner, RewardError};

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from driving an episode.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EpisodeError {
    /// `step()` before the first `reset()`.
    #[error("step called before reset")]
    NotReset,

    /// `step()` after the episode terminated or was truncated.
    #[error("episode already {phase}; reset before stepping")]
    EpisodeFinished {
        /// The finishing phase.
        phase: EpisodePhase,
    },

    /// The combiner rejected the reset or step.
    #[error(transparent)]
    Reward(#[from] RewardError),
}

// ── EpisodePhase ───────────────────────────────────────────────────

/// Where the episode is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EpisodePhase {
    /// Constructed, never reset.
    Uninitialized,
    /// Reset, no step yet.
    Ready,
    /// At least one step, not finished.
    Running,
    /// An agent's terminated flag was set on the last step.
    Terminated,
    /// An agent's truncated flag was set on the last step (and none
    /// terminated).
    Truncated,
}

impl EpisodePhase {
    /// Whether the episode has ended.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Terminated | Self::Truncated)
    }
}

impl fmt::Display for EpisodePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Terminated => "terminated",
            Self::Truncated => "truncated",
        };
        f.write_str(s)
    }
}

// ── EpisodeController ──────────────────────────────────────────────

/// Owns the reward combiner and the current episode's agent set.
pub struct EpisodeController {
    combiner: RewardCombiner,
    agents: Vec<AgentId>,
    phase: EpisodePhase,
    steps: u64,
}

impl EpisodeController {
    /// Wrap a built combiner. Starts [`Uninitialized`](EpisodePhase::Uninitialized).
    pub fn new(combiner: RewardCombiner) -> Self {
        Self {
            combiner,
            agents: Vec::new(),
            phase: EpisodePhase::Uninitialized,
            steps: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Agents of the current episode (empty before the first reset).
    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    /// Steps taken since the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The wrapped combiner.
    pub fn combiner(&self) -> &RewardCombiner {
        &self.combiner
    }

    /// Start a new episode with `agents`, which may differ from the
    /// previous episode's set.
    ///
    /// On failure the controller drops back to
    /// [`Uninitialized`](EpisodePhase::Uninitialized).
    pub fn reset(&mut self, agents: &[AgentId], initial: &GameState) -> Result<(), EpisodeError> {
        if let Err(e) = self.combiner.reset(agents, initial) {
            self.phase = EpisodePhase::Uninitialized;
            self.agents.clear();
            return Err(e.into());
        }
        self.agents = agents.to_vec();
        self.phase = EpisodePhase::Ready;
        self.steps = 0;
        Ok(())
    }

    /// Check that a step is allowed in the current phase.
    pub fn check_step(&self) -> Result<(), EpisodeError> {
        match self.phase {
            EpisodePhase::Uninitialized => Err(EpisodeError::NotReset),
            EpisodePhase::Ready | EpisodePhase::Running => Ok(()),
            phase @ (EpisodePhase::Terminated | EpisodePhase::Truncated) => {
                Err(EpisodeError::EpisodeFinished { phase })
            }
        }
    }

    /// Score one snapshot and advance the phase.
    ///
    /// The phase is left unchanged if the combiner rejects the step.
    pub fn step(
        &mut self,
        state: &GameState,
        terminated: &AgentFlags,
        truncated: &AgentFlags,
    ) -> Result<CombinedRewards, EpisodeError> {
        self.check_step()?;
        let rewards = self
            .combiner
            .step(&self.agents, state, terminated, truncated)?;
        self.steps += 1;

        let any = |flags: &AgentFlags| self.agents.iter().any(|a| flags.get(a) == Some(&true));
        self.phase = if any(terminated) {
            EpisodePhase::Terminated
        } else if any(truncated) {
            EpisodePhase::Truncated
        } else {
            EpisodePhase::Running
        };
        if self.phase.is_finished() {
            debug!(steps = self.steps, phase = %self.phase, "episode finished");
        }
        Ok(rewards)
    }
}

impl fmt::Debug for EpisodeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EpisodeController")
            .field("phase", &self.phase)
            .field("agents", &self.agents)
            .field("steps", &self.steps)
            .field("detectors", &self.combiner.len())
            .finish()
    }
}
