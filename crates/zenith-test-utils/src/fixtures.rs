//! Reusable detector test fixtures.
//!
//! - [`ConstDetector`]: pays a constant to every agent.
//! - [`MissingAgentDetector`]: omits one agent from its output.
//! - [`NanDetector`]: returns NaN after N calls.
//! - [`ResetCounter`]: counts resets and steps.

use zenith_core::{AgentId, GameState};
use zenith_reward::{AgentRewards, Detector, StepContext};

/// Pays a constant to every agent on every step.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstDetector {
    pub name: String,
    pub value: f32,
}

impl ConstDetector {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Detector for ConstDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        ctx.agents().iter().map(|&a| (a, self.value)).collect()
    }
}

/// Returns zero for every agent except `skip`, which it omits.
#[derive(Clone, Debug)]
pub struct MissingAgentDetector {
    pub skip: AgentId,
}

impl Detector for MissingAgentDetector {
    fn name(&self) -> &str {
        "missing_agent"
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        ctx.agents()
            .iter()
            .filter(|&&a| a != self.skip)
            .map(|&a| (a, 0.0))
            .collect()
    }
}

/// Returns zero for the first `healthy_steps` calls, then NaN.
#[derive(Clone, Debug)]
pub struct NanDetector {
    pub healthy_steps: usize,
    calls: usize,
}

impl NanDetector {
    pub fn new(healthy_steps: usize) -> Self {
        Self {
            healthy_steps,
            calls: 0,
        }
    }
}

impl Detector for NanDetector {
    fn name(&self) -> &str {
        "nan"
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {
        self.calls = 0;
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        self.calls += 1;
        let value = if self.calls > self.healthy_steps {
            f32::NAN
        } else {
            0.0
        };
        ctx.agents().iter().map(|&a| (a, value)).collect()
    }
}

/// Counts resets and steps; pays the number of steps since the last reset.
#[derive(Clone, Debug, Default)]
pub struct ResetCounter {
    pub resets: usize,
    pub steps: usize,
    pub last_agents: Vec<AgentId>,
}

impl Detector for ResetCounter {
    fn name(&self) -> &str {
        "reset_counter"
    }

    fn reset(&mut self, agents: &[AgentId], _initial: &GameState) {
        self.resets += 1;
        self.steps = 0;
        self.last_agents = agents.to_vec();
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        self.steps += 1;
        ctx.agents()
            .iter()
            .map(|&a| (a, self.steps as f32))
            .collect()
    }
}
