//! Landing and recovery detectors: wavedashes, chain dashes, half flips and
//! flip cancels.
//!
//! Wavedash fires on landing, the falling edge of "airborne". Chain dash
//! counts every fast grounded step. Half flip keeps the heading captured when the backflip
//! started and compares it with the heading at touchdown.

use zenith_core::{AgentId, GameState, Vec3};
use zenith_reward::{AgentRewards, Detector, StepContext};

use crate::memory::AgentMemory;

const DASH_SPEED: f32 = 1800.0;

// ── Wavedash ───────────────────────────────────────────────────────

const WAVEDASH_MIN_Z: f32 = 20.0;
const WAVEDASH_MAX_FRAMES: u32 = 20;

#[derive(Clone, Debug, Default, PartialEq)]
struct Hop {
    airborne: bool,
    frames: u32,
}

/// Landing after fewer than 20 airborne steps at more than 1800 uu/s
/// horizontal speed: 5.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Wavedash {
    hops: AgentMemory<Hop>,
}

impl Wavedash {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for Wavedash {
    fn name(&self) -> &str {
        "wavedash"
    }

    fn reset(&mut self, agents: &[AgentId], _initial: &GameState) {
        self.hops.reset(agents, |_| Hop::default());
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let hop = self.hops.slot(id);
            if !car.on_ground && car.height() > WAVEDASH_MIN_Z {
                hop.airborne = true;
                hop.frames += 1;
            }

            let mut reward = 0.0;
            if hop.airborne && car.on_ground {
                if hop.frames < WAVEDASH_MAX_FRAMES
                    && car.physics.horizontal_speed() > DASH_SPEED
                {
                    reward = 5.0;
                }
                *hop = Hop::default();
            }
            rewards.insert(id, reward);
        }
        rewards
    }
}

// ── Chain dash ─────────────────────────────────────────────────────

const CHAIN_WINDOW: u64 = 60;
const CHAIN_CAP: f32 = 12.0;

#[derive(Clone, Debug, Default, PartialEq)]
struct Chain {
    length: u32,
    last_dash: u64,
}

/// Fast grounded steps chained within 60 steps of each other.
///
/// Every grounded step above 1800 uu/s horizontal speed counts as a dash.
/// A dash less than 60 steps after the previous one extends the chain and
/// pays `min(2 · length, 12)`; otherwise the chain restarts at one and pays
/// nothing. The previous dash starts at step 0, so dashing right after
/// kickoff already extends a chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChainDash {
    steps: u64,
    chains: AgentMemory<Chain>,
}

impl ChainDash {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for ChainDash {
    fn name(&self) -> &str {
        "chain_dash"
    }

    fn reset(&mut self, agents: &[AgentId], _initial: &GameState) {
        self.steps = 0;
        self.chains.reset(agents, |_| Chain::default());
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        self.steps += 1;
        let now = self.steps;

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let chain = self.chains.slot(id);
            let mut reward = 0.0;
            if car.on_ground && car.physics.horizontal_speed() > DASH_SPEED {
                if now - chain.last_dash < CHAIN_WINDOW {
                    chain.length += 1;
                    reward = (2.0 * chain.length as f32).min(CHAIN_CAP);
                } else {
                    chain.length = 1;
                }
                chain.last_dash = now;
            }
            rewards.insert(id, reward);
        }
        rewards
    }
}

// ── Half flip ──────────────────────────────────────────────────────

const BACKFLIP_PITCH: f32 = -0.8;
const REVERSED_DOT: f32 = -0.7;

fn heading(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), yaw.sin(), 0.0)
}

/// Backflip (airborne with pitch below -0.8) followed by a landing facing
/// the opposite way (heading dot product below -0.7): 8.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HalfFlip {
    start_heading: AgentMemory<Option<Vec3>>,
}

impl HalfFlip {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for HalfFlip {
    fn name(&self) -> &str {
        "half_flip"
    }

    fn reset(&mut self, agents: &[AgentId], _initial: &GameState) {
        self.start_heading.reset(agents, |_| None);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let start = self.start_heading.slot(id);
            if !car.on_ground && car.physics.pitch() < BACKFLIP_PITCH && start.is_none() {
                *start = Some(heading(car.physics.yaw()));
            }

            let mut reward = 0.0;
            if car.on_ground {
                if let Some(initial) = start.take() {
                    if initial.dot(&heading(car.physics.yaw())) < REVERSED_DOT {
                        reward = 8.0;
                    }
                }
            }
            rewards.insert(id, reward);
        }
        rewards
    }
}

// ── Flip cancel ────────────────────────────────────────────────────

const FLIP_PITCH_RATE: f32 = 3.0;
const CANCELLED_PITCH_RATE: f32 = 1.0;
const MIN_CANCEL_PITCH: f32 = 0.3;
const MAX_CANCEL_PITCH: f32 = 1.3;

/// A pitch-rate burst that stops part way through.
///
/// Tracking starts when the airborne pitch rate exceeds 3 rad/s. When it
/// drops below 1 rad/s the pitch change since the start is checked: 7 if it
/// lies strictly between 0.3 and 1.3 rad. Touchdown abandons tracking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlipCancel {
    start_pitch: AgentMemory<Option<f32>>,
}

impl FlipCancel {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for FlipCancel {
    fn name(&self) -> &str {
        "flip_cancel"
    }

    fn reset(&mut self, agents: &[AgentId], _initial: &GameState) {
        self.start_pitch.reset(agents, |_| None);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let start = self.start_pitch.slot(id);
            let pitch = car.physics.pitch();
            let rate = car.physics.angular_velocity.y.abs();

            if rate > FLIP_PITCH_RATE && !car.on_ground && start.is_none() {
                *start = Some(pitch);
            }

            let mut reward = 0.0;
            if rate < CANCELLED_PITCH_RATE {
                if let Some(p0) = start.take() {
                    let change = (pitch - p0).abs();
                    if change > MIN_CANCEL_PITCH && change < MAX_CANCEL_PITCH {
                        reward = 7.0;
                    }
                }
            }
            if car.on_ground {
                *start = None;
            }
            rewards.insert(id, reward);
        }
        rewards
    }
}
