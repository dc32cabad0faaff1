//! Validated per-step view passed to every detector.
//!
//! [`StepContext`] is built once per step by checking the snapshot against
//! the active agent set and the termination/truncation maps. Detectors
//! iterate [`StepContext::cars`] and therefore can never observe an agent
//! whose car is missing from the snapshot.

use smallvec::SmallVec;
use zenith_core::{AgentFlags, AgentId, CarState, GameState, PhysicsState, SnapshotError, Team};

/// Execution context passed to each detector's `step()` method.
///
/// Borrowed from the snapshot for one step only; detectors copy whatever
/// they need next step into their own memory.
#[derive(Debug)]
pub struct StepContext<'a> {
    agents: &'a [AgentId],
    state: &'a GameState,
    cars: SmallVec<[(AgentId, &'a CarState); 8]>,
    terminated: &'a AgentFlags,
    truncated: &'a AgentFlags,
    goal: Option<Team>,
}

impl<'a> StepContext<'a> {
    /// Validate a snapshot and build the context.
    ///
    /// Fails when an agent has no car, a flag map has no entry for an
    /// agent, or a goal is flagged without a scoring team.
    pub fn new(
        agents: &'a [AgentId],
        state: &'a GameState,
        terminated: &'a AgentFlags,
        truncated: &'a AgentFlags,
    ) -> Result<Self, SnapshotError> {
        let mut cars = SmallVec::with_capacity(agents.len());
        for &agent in agents {
            cars.push((agent, state.car(agent)?));
            if !terminated.contains_key(&agent) {
                return Err(SnapshotError::MissingFlag {
                    map: "terminated",
                    agent,
                });
            }
            if !truncated.contains_key(&agent) {
                return Err(SnapshotError::MissingFlag {
                    map: "truncated",
                    agent,
                });
            }
        }
        let goal = state.goal()?;

        Ok(Self {
            agents,
            state,
            cars,
            terminated,
            truncated,
            goal,
        })
    }

    /// Active agents, in the order rewards are reported.
    pub fn agents(&self) -> &[AgentId] {
        self.agents
    }

    /// The active agents' cars, in agent order.
    pub fn cars(&self) -> &[(AgentId, &'a CarState)] {
        &self.cars
    }

    /// Look up one active agent's car.
    pub fn car(&self, agent: AgentId) -> Option<&'a CarState> {
        self.cars
            .iter()
            .find(|(id, _)| *id == agent)
            .map(|&(_, car)| car)
    }

    /// The ball.
    pub fn ball(&self) -> &'a PhysicsState {
        &self.state.ball
    }

    /// The full snapshot, including cars of inactive agents.
    pub fn state(&self) -> &'a GameState {
        self.state
    }

    /// Team credited with a goal on this step.
    pub fn goal(&self) -> Option<Team> {
        self.goal
    }

    /// Physics tick of the snapshot.
    pub fn tick(&self) -> u64 {
        self.state.tick_count
    }

    /// Whether the episode terminated for `agent` on this step.
    pub fn is_terminated(&self, agent: AgentId) -> bool {
        self.terminated.get(&agent).copied().unwrap_or(false)
    }

    /// Whether the episode was truncated for `agent` on this step.
    pub fn is_truncated(&self, agent: AgentId) -> bool {
        self.truncated.get(&agent).copied().unwrap_or(false)
    }
}
