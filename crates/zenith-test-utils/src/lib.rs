//! Test utilities and snapshot builders for Zenith development.
//!
//! Provides [`CarBuilder`] and [`GameStateBuilder`] for constructing
//! synthetic snapshots, a [`DetectorHarness`] that drives one detector
//! through a sequence of snapshots, mock detectors in [`fixtures`], and
//! scripted transition engines in [`engine`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod engine;
pub mod fixtures;

use zenith_core::{
    AgentFlags, AgentId, CarState, GameState, Orientation, PhysicsState, Team, Vec3,
};
use zenith_reward::{AgentRewards, Detector, StepContext};

pub use engine::{IdleEngine, ScriptedEngine};

/// Flag map with the same value for every agent.
pub fn flags(agents: &[AgentId], value: bool) -> AgentFlags {
    agents.iter().map(|&a| (a, value)).collect()
}

/// Builder for one [`CarState`].
///
/// Defaults to a grounded car at the origin facing `+x`, at rest, with a
/// flip available and no ball touches.
#[derive(Clone, Debug)]
pub struct CarBuilder {
    car: CarState,
}

impl CarBuilder {
    pub fn new(team: Team) -> Self {
        Self {
            car: CarState::new(team),
        }
    }

    pub fn blue() -> Self {
        Self::new(Team::Blue)
    }

    pub fn orange() -> Self {
        Self::new(Team::Orange)
    }

    pub fn position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.car.physics.position = Vec3::new(x, y, z);
        self
    }

    pub fn velocity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.car.physics.linear_velocity = Vec3::new(x, y, z);
        self
    }

    pub fn angular_velocity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.car.physics.angular_velocity = Vec3::new(x, y, z);
        self
    }

    /// Orientation from `(pitch, yaw, roll)` in radians.
    pub fn euler(mut self, pitch: f32, yaw: f32, roll: f32) -> Self {
        self.car.physics.orientation = Orientation::from_euler(pitch, yaw, roll);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.car.physics.orientation = orientation;
        self
    }

    /// Roof pointing at the floor.
    pub fn upside_down(self) -> Self {
        self.euler(0.0, 0.0, std::f32::consts::PI)
    }

    pub fn on_ground(mut self, on_ground: bool) -> Self {
        self.car.on_ground = on_ground;
        self
    }

    /// Shorthand for `on_ground(false)`.
    pub fn airborne(self) -> Self {
        self.on_ground(false)
    }

    pub fn has_flip(mut self, has_flip: bool) -> Self {
        self.car.has_flip = has_flip;
        self
    }

    pub fn boosting(mut self, boosting: bool) -> Self {
        self.car.is_boosting = boosting;
        self
    }

    pub fn handbrake(mut self, handbrake: bool) -> Self {
        self.car.handbrake = handbrake;
        self
    }

    pub fn touches(mut self, touches: u32) -> Self {
        self.car.ball_touches = touches;
        self
    }

    pub fn boost(mut self, amount: f32) -> Self {
        self.car.boost_amount = amount;
        self
    }

    pub fn demoed(mut self, demoed: bool) -> Self {
        self.car.is_demoed = demoed;
        self
    }

    pub fn build(self) -> CarState {
        self.car
    }
}

/// Builder for a [`GameState`].
///
/// Defaults to tick 0, no goal, and the ball at rest on the centre spot.
#[derive(Clone, Debug)]
pub struct GameStateBuilder {
    state: GameState,
}

impl GameStateBuilder {
    pub fn new() -> Self {
        Self {
            state: GameState::new(Vec3::new(0.0, 0.0, 93.0)),
        }
    }

    /// Start from an existing snapshot.
    pub fn from_state(state: &GameState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub fn tick(mut self, tick: u64) -> Self {
        self.state.tick_count = tick;
        self
    }

    pub fn ball_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.state.ball.position = Vec3::new(x, y, z);
        self
    }

    pub fn ball_velocity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.state.ball.linear_velocity = Vec3::new(x, y, z);
        self
    }

    pub fn ball_angular_velocity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.state.ball.angular_velocity = Vec3::new(x, y, z);
        self
    }

    pub fn ball(mut self, ball: PhysicsState) -> Self {
        self.state.ball = ball;
        self
    }

    /// Flag a goal for `team`.
    pub fn goal(mut self, team: Team) -> Self {
        self.state.goal_scored = true;
        self.state.scoring_team = Some(team);
        self
    }

    /// Insert or replace the car for `agent`.
    pub fn car(mut self, agent: AgentId, car: impl Into<CarState>) -> Self {
        self.state.cars.insert(agent, car.into());
        self
    }

    pub fn build(self) -> GameState {
        self.state
    }
}

impl Default for GameStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CarBuilder> for CarState {
    fn from(b: CarBuilder) -> Self {
        b.build()
    }
}

/// Drives a single detector through a sequence of snapshots.
///
/// The agent set is taken from the initial snapshot and the termination
/// and truncation maps are all `false`. Panics if a snapshot violates the
/// contract, which is always a bug in the test itself.
pub struct DetectorHarness<D> {
    detector: D,
    agents: Vec<AgentId>,
}

impl<D: Detector> DetectorHarness<D> {
    /// Reset `detector` with every car in `initial`.
    pub fn new(mut detector: D, initial: &GameState) -> Self {
        let agents = initial.agent_ids();
        detector.reset(&agents, initial);
        Self { detector, agents }
    }

    /// Reset with the agent set of `initial`.
    pub fn reset(&mut self, initial: &GameState) {
        self.agents = initial.agent_ids();
        self.detector.reset(&self.agents, initial);
    }

    /// Step once and return every agent's reward.
    pub fn step(&mut self, state: &GameState) -> AgentRewards {
        let done = flags(&self.agents, false);
        let ctx = StepContext::new(&self.agents, state, &done, &done)
            .expect("harness snapshot violates the contract");
        self.detector.step(&ctx)
    }

    /// Step once and return one agent's reward.
    pub fn reward(&mut self, state: &GameState, agent: AgentId) -> f32 {
        self.step(state)
            .get(&agent)
            .copied()
            .expect("detector omitted an agent")
    }

    /// Step through `states` and return one agent's reward per step.
    pub fn rewards(&mut self, states: &[GameState], agent: AgentId) -> Vec<f32> {
        states.iter().map(|s| self.reward(s, agent)).collect()
    }

    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn into_inner(self) -> D {
        self.detector
    }
}
