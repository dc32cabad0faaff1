//! Weighted reward combination and detector lifecycle.
//!
//! [`RewardCombiner::new`] runs once at environment construction to check
//! the `(detector, weight)` list for structural errors. Every step then
//! validates the snapshot into a [`StepContext`], dispatches it to each
//! detector in registration order, enforces the per-agent output contract,
//! and reduces the outputs into one weighted scalar per agent.

use indexmap::IndexSet;
use tracing::{debug, error};
use zenith_core::{AgentFlags, AgentId, GameState, SnapshotError};

use crate::context::StepContext;
use crate::detector::{AgentRewards, Detector};
use crate::metrics::EpisodeTally;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from combiner construction (startup-time, not per-step).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombinerError {
    /// No detectors registered.
    #[error("combiner has no detectors")]
    Empty,

    /// Two detectors report the same name.
    #[error("detector '{name}' is registered more than once")]
    DuplicateDetector {
        /// The repeated name.
        name: String,
    },

    /// A weight is NaN, infinite, or negative.
    #[error("detector '{name}' has weight {weight} (must be finite and non-negative)")]
    InvalidWeight {
        /// Which detector.
        name: String,
        /// The rejected weight.
        weight: f32,
    },
}

/// Contract violations detected while resetting or stepping.
///
/// Each one is a programming defect in the snapshot producer or in a
/// detector. The step is aborted rather than patched.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RewardError {
    /// `step()` was called before `reset()`, either at startup or after a
    /// detector contract violation ended the episode.
    #[error("step called before reset")]
    NotReset,

    /// The agent set lists the same agent twice.
    #[error("agent {agent} appears more than once in the agent set")]
    DuplicateAgent {
        /// The repeated agent.
        agent: AgentId,
    },

    /// The agent set differs from the one given at reset.
    #[error("agent set changed since reset: expected {expected:?}, got {actual:?}")]
    AgentSetChanged {
        /// Agents recorded at reset.
        expected: Vec<AgentId>,
        /// Agents passed to this step.
        actual: Vec<AgentId>,
    },

    /// A detector omitted an active agent from its output.
    #[error("detector '{detector}' returned no reward for agent {agent}")]
    MissingAgent {
        /// Which detector.
        detector: String,
        /// The omitted agent.
        agent: AgentId,
    },

    /// A detector returned a reward for an agent outside the active set.
    #[error("detector '{detector}' returned a reward for inactive agent {agent}")]
    UnexpectedAgent {
        /// Which detector.
        detector: String,
        /// The unexpected agent.
        agent: AgentId,
    },

    /// A detector returned NaN or infinity.
    #[error("detector '{detector}' returned non-finite reward {value} for agent {agent}")]
    NonFiniteReward {
        /// Which detector.
        detector: String,
        /// The affected agent.
        agent: AgentId,
        /// The offending value.
        value: f32,
    },

    /// The snapshot violated its contract.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

// ── Output ─────────────────────────────────────────────────────────

/// Result of one combiner step.
#[derive(Clone, Debug, PartialEq)]
pub struct CombinedRewards {
    totals: AgentRewards,
    breakdown: Vec<AgentRewards>,
}

impl CombinedRewards {
    /// Weighted sum per agent, in agent-set order.
    pub fn totals(&self) -> &AgentRewards {
        &self.totals
    }

    /// Weighted sum for one agent.
    pub fn total(&self, agent: AgentId) -> Option<f32> {
        self.totals.get(&agent).copied()
    }

    /// Unweighted output of the detector at `index` in combiner order.
    pub fn raw(&self, index: usize) -> Option<&AgentRewards> {
        self.breakdown.get(index)
    }

    /// Unweighted outputs of every detector, in combiner order.
    pub fn breakdown(&self) -> &[AgentRewards] {
        &self.breakdown
    }

    /// Consume the result, keeping only the weighted totals.
    pub fn into_totals(self) -> AgentRewards {
        self.totals
    }
}

// ── Combiner ───────────────────────────────────────────────────────

struct WeightedDetector {
    detector: Box<dyn Detector>,
    weight: f32,
}

/// Ordered list of `(detector, weight)` pairs plus the active agent set.
///
/// Built once at environment construction. Weights are fixed for the
/// combiner's lifetime.
pub struct RewardCombiner {
    entries: Vec<WeightedDetector>,
    agents: Option<Vec<AgentId>>,
    tally: EpisodeTally,
}

impl RewardCombiner {
    /// Validate and build a combiner.
    ///
    /// Checks performed:
    ///
    /// 1. The list is non-empty.
    /// 2. Detector names are unique.
    /// 3. Every weight is finite and non-negative.
    pub fn new(detectors: Vec<(Box<dyn Detector>, f32)>) -> Result<Self, CombinerError> {
        if detectors.is_empty() {
            return Err(CombinerError::Empty);
        }

        let mut seen = IndexSet::with_capacity(detectors.len());
        for (detector, weight) in &detectors {
            let name = detector.name();
            if !seen.insert(name.to_string()) {
                return Err(CombinerError::DuplicateDetector {
                    name: name.to_string(),
                });
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(CombinerError::InvalidWeight {
                    name: name.to_string(),
                    weight: *weight,
                });
            }
        }

        let tally = EpisodeTally::new(seen.iter().map(String::as_str));
        debug!(detectors = detectors.len(), "reward combiner built");

        Ok(Self {
            entries: detectors
                .into_iter()
                .map(|(detector, weight)| WeightedDetector { detector, weight })
                .collect(),
            agents: None,
            tally,
        })
    }

    /// Number of detectors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the combiner has no detectors. Always false once built.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detector names, in combiner order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.detector.name())
    }

    /// Position of a detector by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.detector.name() == name)
    }

    /// Weight of a detector by name.
    pub fn weight(&self, name: &str) -> Option<f32> {
        self.index_of(name).map(|i| self.entries[i].weight)
    }

    /// Agent set recorded at the last reset.
    pub fn agents(&self) -> Option<&[AgentId]> {
        self.agents.as_deref()
    }

    /// Tallies for the current episode.
    pub fn tally(&self) -> &EpisodeTally {
        &self.tally
    }

    /// Start a new episode.
    ///
    /// Logs the finished episode's tally, then resets every detector in
    /// order with the new agent set and initial snapshot.
    pub fn reset(&mut self, agents: &[AgentId], initial: &GameState) -> Result<(), RewardError> {
        let mut unique = IndexSet::with_capacity(agents.len());
        for &agent in agents {
            if !unique.insert(agent) {
                error!(%agent, "duplicate agent in reset");
                return Err(RewardError::DuplicateAgent { agent });
            }
            if let Err(e) = initial.car(agent) {
                error!(error = %e, "initial snapshot rejected");
                return Err(e.into());
            }
        }

        if self.tally.steps() > 0 {
            self.log_tally();
        }
        self.tally.clear();

        for entry in &mut self.entries {
            entry.detector.reset(agents, initial);
        }
        self.agents = Some(agents.to_vec());
        debug!(agents = agents.len(), "reward combiner reset");
        Ok(())
    }

    /// Run every detector on one snapshot and combine the outputs.
    ///
    /// Agent-set and snapshot errors are raised before any detector runs
    /// and leave the episode intact. A detector contract violation is
    /// raised after the detectors before it have already consumed the
    /// snapshot, so it ends the episode: every later `step` returns
    /// [`RewardError::NotReset`] until the next [`reset`](Self::reset).
    pub fn step(
        &mut self,
        agents: &[AgentId],
        state: &GameState,
        terminated: &AgentFlags,
        truncated: &AgentFlags,
    ) -> Result<CombinedRewards, RewardError> {
        let expected = self.agents.as_deref().ok_or(RewardError::NotReset)?;
        if expected != agents {
            error!(?expected, actual = ?agents, "agent set changed without reset");
            return Err(RewardError::AgentSetChanged {
                expected: expected.to_vec(),
                actual: agents.to_vec(),
            });
        }

        let ctx = StepContext::new(agents, state, terminated, truncated).map_err(|e| {
            error!(error = %e, tick = state.tick_count, "snapshot rejected");
            RewardError::from(e)
        })?;

        let mut breakdown = Vec::with_capacity(self.entries.len());
        for entry in &mut self.entries {
            let rewards = entry.detector.step(&ctx);
            if let Err(e) = check_output(entry.detector.name(), agents, &rewards) {
                error!(error = %e, tick = state.tick_count, "detector contract violated");
                // Earlier detectors already advanced.
                self.agents = None;
                return Err(e);
            }
            breakdown.push(rewards);
        }

        let mut totals: AgentRewards = agents.iter().map(|&a| (a, 0.0)).collect();
        self.tally.record_step();
        for (index, (entry, rewards)) in self.entries.iter().zip(&breakdown).enumerate() {
            for (agent, total) in totals.iter_mut() {
                let raw = rewards.get(agent).copied().unwrap_or(0.0);
                *total += raw * entry.weight;
                self.tally.record(index, raw, entry.weight);
            }
        }

        Ok(CombinedRewards { totals, breakdown })
    }

    fn log_tally(&self) {
        debug!(
            steps = self.tally.steps(),
            weighted_total = self.tally.weighted_total(),
            "episode reward summary"
        );
        for (name, t) in self.tally.iter().filter(|(_, t)| t.fires > 0) {
            debug!(
                detector = name,
                fires = t.fires,
                raw_sum = t.raw_sum,
                weighted_sum = t.weighted_sum,
                "detector tally"
            );
        }
    }
}

/// Every agent covered exactly once, every value finite.
fn check_output(
    detector: &str,
    agents: &[AgentId],
    rewards: &AgentRewards,
) -> Result<(), RewardError> {
    for &agent in agents {
        match rewards.get(&agent) {
            None => {
                return Err(RewardError::MissingAgent {
                    detector: detector.to_string(),
                    agent,
                })
            }
            Some(&value) if !value.is_finite() => {
                return Err(RewardError::NonFiniteReward {
                    detector: detector.to_string(),
                    agent,
                    value,
                })
            }
            Some(_) => {}
        }
    }
    if rewards.len() != agents.len() {
        if let Some(&agent) = rewards.keys().find(|a| !agents.contains(a)) {
            return Err(RewardError::UnexpectedAgent {
                detector: detector.to_string(),
                agent,
            });
        }
    }
    Ok(())
}
