//! Termination and truncation conditions.
//!
//! A [`DoneCondition`] is reset with the initial snapshot and then asked,
//! once per environment step, for a flag per agent. Timeouts are counted in
//! physics ticks (`GameState::tick_count`), so they do not depend on how
//! many ticks each environment step spans.

use indexmap::IndexMap;
use zenith_core::{AgentFlags, AgentId, GameState};

use crate::config::MatchConfig;

/// Per-agent done flags derived from the world state.
pub trait DoneCondition: Send {
    /// Condition name, for logs.
    fn name(&self) -> &str;

    /// Start tracking a new episode.
    fn reset(&mut self, agents: &[AgentId], initial: &GameState);

    /// Flag for every agent in `agents`.
    fn is_done(&mut self, agents: &[AgentId], state: &GameState) -> AgentFlags;
}

fn uniform(agents: &[AgentId], value: bool) -> AgentFlags {
    agents.iter().map(|&a| (a, value)).collect()
}

// ── GoalCondition ──────────────────────────────────────────────────

/// Done for everyone on a goal step.
#[derive(Clone, Debug, Default)]
pub struct GoalCondition;

impl DoneCondition for GoalCondition {
    fn name(&self) -> &str {
        "goal"
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}

    fn is_done(&mut self, agents: &[AgentId], state: &GameState) -> AgentFlags {
        uniform(agents, state.goal_scored)
    }
}

// ── TimeoutCondition ───────────────────────────────────────────────

/// Done for everyone once a fixed number of ticks has elapsed.
#[derive(Clone, Debug)]
pub struct TimeoutCondition {
    limit_ticks: u64,
    start_tick: u64,
}

impl TimeoutCondition {
    /// Timeout after `seconds` at the match tick rate.
    pub fn new(seconds: f64, rules: &MatchConfig) -> Self {
        Self::from_ticks(rules.seconds_to_ticks(seconds))
    }

    /// Timeout after `limit_ticks` physics ticks.
    pub fn from_ticks(limit_ticks: u64) -> Self {
        Self {
            limit_ticks,
            start_tick: 0,
        }
    }

    /// The configured limit.
    pub fn limit_ticks(&self) -> u64 {
        self.limit_ticks
    }
}

impl DoneCondition for TimeoutCondition {
    fn name(&self) -> &str {
        "timeout"
    }

    fn reset(&mut self, _agents: &[AgentId], initial: &GameState) {
        self.start_tick = initial.tick_count;
    }

    fn is_done(&mut self, agents: &[AgentId], state: &GameState) -> AgentFlags {
        let elapsed = state.tick_count.saturating_sub(self.start_tick);
        uniform(agents, elapsed >= self.limit_ticks)
    }
}

// ── NoTouchTimeoutCondition ────────────────────────────────────────

/// Done for everyone when nobody has touched the ball for too long.
///
/// Any car's touch counter increasing counts as a touch.
#[derive(Clone, Debug)]
pub struct NoTouchTimeoutCondition {
    limit_ticks: u64,
    last_touch_tick: u64,
    touches: IndexMap<AgentId, u32>,
}

impl NoTouchTimeoutCondition {
    /// Timeout after `seconds` without a touch at the match tick rate.
    pub fn new(seconds: f64, rules: &MatchConfig) -> Self {
        Self::from_ticks(rules.seconds_to_ticks(seconds))
    }

    /// Timeout after `limit_ticks` physics ticks without a touch.
    pub fn from_ticks(limit_ticks: u64) -> Self {
        Self {
            limit_ticks,
            last_touch_tick: 0,
            touches: IndexMap::new(),
        }
    }

    /// The configured limit.
    pub fn limit_ticks(&self) -> u64 {
        self.limit_ticks
    }
}

impl DoneCondition for NoTouchTimeoutCondition {
    fn name(&self) -> &str {
        "no_touch_timeout"
    }

    fn reset(&mut self, _agents: &[AgentId], initial: &GameState) {
        self.last_touch_tick = initial.tick_count;
        self.touches = initial
            .cars
            .iter()
            .map(|(&id, car)| (id, car.ball_touches))
            .collect();
    }

    fn is_done(&mut self, agents: &[AgentId], state: &GameState) -> AgentFlags {
        let mut touched = false;
        for (&id, car) in &state.cars {
            let last = self.touches.insert(id, car.ball_touches).unwrap_or(0);
            touched |= car.ball_touches > last;
        }
        if touched {
            self.last_touch_tick = state.tick_count;
        }
        let idle = state.tick_count.saturating_sub(self.last_touch_tick);
        uniform(agents, idle >= self.limit_ticks)
    }
}

// ── AnyCondition ───────────────────────────────────────────────────

/// Flags an agent when any inner condition flags it.
pub struct AnyCondition {
    conditions: Vec<Box<dyn DoneCondition>>,
}

impl AnyCondition {
    /// Combine `conditions`. Every inner condition is evaluated each step.
    pub fn new(conditions: Vec<Box<dyn DoneCondition>>) -> Self {
        Self { conditions }
    }

    /// Number of inner conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether there are no inner conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl DoneCondition for AnyCondition {
    fn name(&self) -> &str {
        "any"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        for c in &mut self.conditions {
            c.reset(agents, initial);
        }
    }

    fn is_done(&mut self, agents: &[AgentId], state: &GameState) -> AgentFlags {
        let mut out = uniform(agents, false);
        for c in &mut self.conditions {
            for (agent, done) in c.is_done(agents, state) {
                if done {
                    if let Some(flag) = out.get_mut(&agent) {
                        *flag = true;
                    }
                }
            }
        }
        out
    }
}

impl std::fmt::Debug for AnyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.conditions.iter().map(|c| c.name()))
            .finish()
    }
}
