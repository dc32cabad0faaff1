//! Novelty play: turtling on the roof and air stalls.

use zenith_core::{AgentId, GameState};
use zenith_reward::{AgentRewards, Detector, StepContext};

use crate::memory::AgentMemory;
use crate::touch::TouchTracker;

const TURTLE_UP_Z: f32 = -0.8;
const TURTLE_POWER_SPEED: f32 = 1500.0;

/// Sliding on the roof (`up.z < -0.8` while `on_ground`).
///
/// 0.5 per step, replaced by 10 on a new touch, or 15 if the ball leaves
/// faster than 1500 uu/s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Turtle {
    touches: TouchTracker,
}

impl Turtle {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for Turtle {
    fn name(&self) -> &str {
        "turtle"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.touches.reset(agents, initial);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball_speed = ctx.ball().speed();

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let touched = self.touches.update(id, car);
            let turtling = car.on_ground && car.physics.up().z < TURTLE_UP_Z;
            let reward = match (turtling, touched) {
                (false, _) => 0.0,
                (true, false) => 0.5,
                (true, true) if ball_speed > TURTLE_POWER_SPEED => 15.0,
                (true, true) => 10.0,
            };
            rewards.insert(id, reward);
        }
        rewards
    }
}

const STALL_MIN_Z: f32 = 200.0;
const STALL_PAY_Z: f32 = 300.0;
const STALL_MAX_VZ: f32 = 100.0;
const STALL_CAP: f32 = 8.0;

/// Hanging in the air without boost.
///
/// Counts steps spent airborne above 200 uu. While above 300 uu, not
/// boosting, and with vertical speed under 100 uu/s, pays
/// `min(0.1 · frames, 8)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stall {
    frames: AgentMemory<u32>,
}

impl Stall {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for Stall {
    fn name(&self) -> &str {
        "stall"
    }

    fn reset(&mut self, agents: &[AgentId], _initial: &GameState) {
        self.frames.reset(agents, |_| 0);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let frames = self.frames.slot(id);
            let height = car.height();
            let reward = if !car.on_ground && height > STALL_MIN_Z {
                *frames += 1;
                let hanging = !car.is_boosting
                    && car.physics.linear_velocity.z.abs() < STALL_MAX_VZ
                    && height > STALL_PAY_Z;
                if hanging {
                    (0.1 * *frames as f32).min(STALL_CAP)
                } else {
                    0.0
                }
            } else {
                *frames = 0;
                0.0
            };
            rewards.insert(id, reward);
        }
        rewards
    }
}
