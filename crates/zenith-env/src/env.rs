//! The match environment.
//!
//! [`MatchEnv`] wires a [`TransitionEngine`] to the reward combiner, the
//! done conditions, the action decoder and the observation encoder. Each
//! call to [`step()`](MatchEnv::step) decodes one action per agent, advances
//! the engine `action_repeat` ticks, and scores only the final snapshot.
//!
//! # Ownership model
//!
//! `MatchEnv` is [`Send`] but not [`Sync`]: the detectors and the engine are
//! `Send` trait objects and every mutating method takes `&mut self`.

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;
use zenith_core::{AgentFlags, AgentId, GameState};
use zenith_reward::{CombinedRewards, EpisodeTally};

use crate::action::{ActionError, LookupTable, RepeatAction};
use crate::conditions::{
    AnyCondition, DoneCondition, GoalCondition, NoTouchTimeoutCondition, TimeoutCondition,
};
use crate::config::{ConfigError, EnvConfig};
use crate::engine::TransitionEngine;
use crate::lifecycle::{EpisodeController, EpisodeError, EpisodePhase};
use crate::obs::{ObsEncoder, ObsError};

// Compile-time assertion: MatchEnv is Send whenever its engine is.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check<E: TransitionEngine>() {
        assert_send::<MatchEnv<E>>();
    }
};

/// Per-agent observation vectors.
pub type Observations = IndexMap<AgentId, Vec<f32>>;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from building or driving a [`MatchEnv`].
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The episode lifecycle or the reward contract was violated.
    #[error(transparent)]
    Episode(#[from] EpisodeError),

    /// An action could not be decoded.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// An observation could not be encoded.
    #[error(transparent)]
    Obs(#[from] ObsError),

    /// An active agent has no action this step.
    #[error("no action for agent {agent}")]
    MissingAction {
        /// The agent without an action.
        agent: AgentId,
    },

    /// An action names an agent outside the episode.
    #[error("action for unknown agent {agent}")]
    UnknownAgent {
        /// The unknown agent.
        agent: AgentId,
    },
}

// ── Transition ─────────────────────────────────────────────────────

/// Everything one environment step returns.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Observation per agent after the step.
    pub observations: Observations,
    /// Weighted totals and per-mechanic breakdown.
    pub rewards: CombinedRewards,
    /// Terminal flag per agent.
    pub terminated: AgentFlags,
    /// Truncation flag per agent.
    pub truncated: AgentFlags,
}

impl Transition {
    /// Whether the episode ended on this step.
    pub fn is_done(&self) -> bool {
        self.terminated.values().chain(self.truncated.values()).any(|&d| d)
    }
}

// ── MatchEnv ───────────────────────────────────────────────────────

/// A configured match: engine, rewards, done conditions, and encoders.
pub struct MatchEnv<E> {
    config: EnvConfig,
    engine: E,
    controller: EpisodeController,
    parser: RepeatAction,
    encoder: ObsEncoder,
    termination: GoalCondition,
    truncation: AnyCondition,
    state: Option<GameState>,
}

impl<E: TransitionEngine> MatchEnv<E> {
    /// Validate `config` and build the environment around `engine`.
    ///
    /// No episode is started; call [`reset()`](Self::reset) first.
    pub fn new(config: EnvConfig, engine: E) -> Result<Self, EnvError> {
        config.validate()?;
        let combiner = config
            .weights
            .build_combiner(config.arena)
            .map_err(ConfigError::from)?;
        let rules = &config.rules;
        let parser = RepeatAction::new(LookupTable::standard(), rules.action_repeat)?;
        let encoder = ObsEncoder::new(config.arena, rules.team_size);
        let truncation = AnyCondition::new(vec![
            Box::new(NoTouchTimeoutCondition::new(
                rules.no_touch_timeout_seconds,
                rules,
            )),
            Box::new(TimeoutCondition::new(rules.game_timeout_seconds, rules)),
        ]);
        debug!(
            team_size = rules.team_size,
            action_repeat = rules.action_repeat,
            mechanics = combiner.len(),
            "match environment built"
        );
        Ok(Self {
            controller: EpisodeController::new(combiner),
            parser,
            encoder,
            termination: GoalCondition,
            truncation,
            state: None,
            config,
            engine,
        })
    }

    /// Spawn a kickoff and start a new episode. Returns the initial
    /// observations.
    pub fn reset(&mut self) -> Result<Observations, EnvError> {
        let rules = &self.config.rules;
        let initial = self.engine.reset(rules.blue_size(), rules.orange_size());
        let agents = initial.agent_ids();

        self.controller.reset(&agents, &initial)?;
        self.termination.reset(&agents, &initial);
        self.truncation.reset(&agents, &initial);
        let observations = self.encoder.encode(&agents, &initial)?;
        debug!(agents = agents.len(), tick = initial.tick_count, "episode reset");
        self.state = Some(initial);
        Ok(observations)
    }

    /// Advance the match by one decision step.
    ///
    /// `actions` must hold exactly one lookup-table index per agent. Nothing
    /// is sent to the engine unless every action decodes. The engine runs
    /// `action_repeat` ticks, stopping early on the tick a goal is scored,
    /// and that final snapshot is the one scored.
    pub fn step(&mut self, actions: &IndexMap<AgentId, usize>) -> Result<Transition, EnvError> {
        self.controller.check_step()?;
        let agents = self.controller.agents().to_vec();

        if let Some(&agent) = actions.keys().find(|a| !agents.contains(a)) {
            return Err(EnvError::UnknownAgent { agent });
        }
        let ordered = agents
            .iter()
            .map(|&agent| {
                actions
                    .get(&agent)
                    .map(|&index| (agent, index))
                    .ok_or(EnvError::MissingAction { agent })
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;
        let frames = self.parser.decode(&ordered)?;

        let mut last = None;
        for controls in &frames {
            let state = self.engine.step(controls);
            let goal = state.goal_scored;
            last = Some(state);
            // A goal ends the repeat.
            if goal {
                break;
            }
        }
        // `decode` never yields an empty frame list.
        let Some(state) = last else {
            return Err(ActionError::ZeroRepeat.into());
        };

        let terminated = self.termination.is_done(&agents, &state);
        let truncated = self.truncation.is_done(&agents, &state);
        let rewards = self.controller.step(&state, &terminated, &truncated)?;
        let observations = self.encoder.encode(&agents, &state)?;
        self.state = Some(state);

        Ok(Transition {
            observations,
            rewards,
            terminated,
            truncated,
        })
    }

    /// Current phase of the episode.
    pub fn phase(&self) -> EpisodePhase {
        self.controller.phase()
    }

    /// Agents of the current episode.
    pub fn agents(&self) -> &[AgentId] {
        self.controller.agents()
    }

    /// The most recent snapshot, if an episode has started.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Reward statistics for the current episode.
    pub fn tally(&self) -> &EpisodeTally {
        self.controller.combiner().tally()
    }

    /// Length of every observation vector.
    pub fn obs_len(&self) -> usize {
        self.encoder.obs_len()
    }

    /// Number of discrete actions.
    pub fn action_count(&self) -> usize {
        self.parser.table().len()
    }

    /// The configuration the environment was built from.
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E> fmt::Debug for MatchEnv<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchEnv")
            .field("controller", &self.controller)
            .field("truncation", &self.truncation)
            .field("action_repeat", &self.parser.repeats())
            .finish_non_exhaustive()
    }
}
