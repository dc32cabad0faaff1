//! Aerial detectors: fast aerials, flip resets, musty aerials, heli resets
//! and double taps.
//!
//! A "reset" is the step `has_flip` goes from false to true while the car
//! is high in the air, which in practice means all four wheels touched the
//! ball. Fast aerial and double tap drop their state on touchdown; heli
//! reset keeps its spin flag until it pays.

use zenith_core::{AgentId, GameState};
use zenith_reward::{AgentRewards, Detector, StepContext};

use crate::memory::AgentMemory;
use crate::touch::TouchTracker;

fn initial_has_flip(initial: &GameState, agent: AgentId) -> bool {
    initial.cars.get(&agent).map_or(true, |c| c.has_flip)
}

// ── Fast aerial ────────────────────────────────────────────────────

const FAST_AERIAL_MIN_Z: f32 = 100.0;
const FAST_AERIAL_VZ: f32 = 1000.0;
const FAST_AERIAL_WINDOW: u32 = 30;
const HIGH_BALL_Z: f32 = 600.0;
const HIGH_BALL_DIST: f32 = 500.0;

/// Rapid boosted climb right after leaving the ground.
///
/// Within the first 30 airborne steps above 100 uu, a boosting climb faster
/// than 1000 uu/s pays 2, or 4 when the ball is above 600 and within 500 uu.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FastAerial {
    airborne_frames: AgentMemory<u32>,
}

impl FastAerial {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for FastAerial {
    fn name(&self) -> &str {
        "fast_aerial"
    }

    fn reset(&mut self, agents: &[AgentId], _initial: &GameState) {
        self.airborne_frames.reset(agents, |_| 0);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let frames = self.airborne_frames.slot(id);
            let reward = if !car.on_ground && car.height() > FAST_AERIAL_MIN_Z {
                *frames += 1;
                let climbing = car.physics.linear_velocity.z > FAST_AERIAL_VZ && car.is_boosting;
                if climbing && *frames < FAST_AERIAL_WINDOW {
                    let toward_high_ball = ball.position.z > HIGH_BALL_Z
                        && car.distance_to(&ball.position) < HIGH_BALL_DIST;
                    if toward_high_ball {
                        4.0
                    } else {
                        2.0
                    }
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

// ── Flip reset ─────────────────────────────────────────────────────

const RESET_MIN_Z: f32 = 200.0;
const RESET_MAX_BALL_DIST: f32 = 250.0;

/// Flip regained above 200 uu while within 250 uu of the ball: 20.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlipReset {
    had_flip: AgentMemory<bool>,
}

impl FlipReset {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for FlipReset {
    fn name(&self) -> &str {
        "flip_reset"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.had_flip
            .reset(agents, |a| initial_has_flip(initial, a));
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let had_flip = self.had_flip.slot(id);
            let regained = !*had_flip && car.has_flip && car.height() > RESET_MIN_Z;
            let reward = if regained && car.distance_to(&ball.position) < RESET_MAX_BALL_DIST {
                20.0
            } else {
                0.0
            };
            *had_flip = car.has_flip;
            rewards.insert(id, reward);
        }
        rewards
    }
}

// ── Musty aerial ───────────────────────────────────────────────────

const MUSTY_MIN_Z: f32 = 200.0;
const MUSTY_MAX_PITCH: f32 = -0.5;

/// New touch above 200 uu with the nose pitched below -0.5 rad: 18.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MustyAerial {
    touches: TouchTracker,
}

impl MustyAerial {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for MustyAerial {
    fn name(&self) -> &str {
        "musty_aerial"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.touches.reset(agents, initial);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let touched = self.touches.update(id, car);
            let musty =
                touched && car.height() > MUSTY_MIN_Z && car.physics.pitch() < MUSTY_MAX_PITCH;
            rewards.insert(id, if musty { 18.0 } else { 0.0 });
        }
        rewards
    }
}

// ── Heli reset ─────────────────────────────────────────────────────

const HELI_MIN_Z: f32 = 200.0;
const HELI_MIN_SPIN: f32 = 5.0;

#[derive(Clone, Debug, Default, PartialEq)]
struct HeliState {
    had_flip: bool,
    high_spin: bool,
}

/// Flip regained after a fast spin (angular speed above 5 while above
/// 200 uu): 25.
///
/// The spin is remembered until a flip is regained, touchdowns included,
/// so a landing that restores the flip after a high spin also pays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeliReset {
    agents: AgentMemory<HeliState>,
}

impl HeliReset {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for HeliReset {
    fn name(&self) -> &str {
        "heli_reset"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.agents.reset(agents, |a| HeliState {
            had_flip: initial_has_flip(initial, a),
            high_spin: false,
        });
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let mem = self.agents.slot(id);
            if car.height() > HELI_MIN_Z && car.physics.spin() > HELI_MIN_SPIN {
                mem.high_spin = true;
            }

            let reward = if !mem.had_flip && car.has_flip && mem.high_spin {
                mem.high_spin = false;
                25.0
            } else {
                0.0
            };
            mem.had_flip = car.has_flip;
            rewards.insert(id, reward);
        }
        rewards
    }
}

// ── Double tap ─────────────────────────────────────────────────────

const TAP_BALL_Z: f32 = 300.0;
const TAP_CAR_Z: f32 = 200.0;

/// Second aerial touch (ball above 300, car above 200) without touching
/// down in between: 18.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DoubleTap {
    touches: TouchTracker,
    aerial_touches: AgentMemory<u32>,
}

impl DoubleTap {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for DoubleTap {
    fn name(&self) -> &str {
        "double_tap"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.touches.reset(agents, initial);
        self.aerial_touches.reset(agents, |_| 0);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball_z = ctx.ball().position.z;

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let touched = self.touches.update(id, car);
            let count = self.aerial_touches.slot(id);

            let reward = if touched && ball_z > TAP_BALL_Z && car.height() > TAP_CAR_Z {
                *count += 1;
                if *count >= 2 {
                    *count = 0;
                    18.0
                } else {
                    0.0
                }
            } else {
                0.0
            };
            if car.on_ground {
                *count = 0;
            }
            rewards.insert(id, reward);
        }
        rewards
    }
}
