//! Ball-control detectors: roof dribbles and flicks, bounce dribbles, and
//! air dribbles.
//!
//! Roof dribbles are recognised by an envelope around the car's roof. The
//! flick is the falling edge of that envelope: the step the ball leaves it,
//! scored by how much ball speed was gained and how far the car pitched.

use zenith_core::{AgentId, GameState};
use zenith_reward::{AgentRewards, Detector, StepContext};

use crate::memory::AgentMemory;
use crate::touch::TouchTracker;

// ── Advanced dribbling ─────────────────────────────────────────────

const ROOF_MIN_DZ: f32 = 80.0;
const ROOF_MAX_DZ: f32 = 250.0;
const ROOF_MAX_HORIZONTAL: f32 = 120.0;
const DRIBBLE_REWARD: f32 = 0.8;
const POWERSLIDE_DRIBBLE_REWARD: f32 = 1.5;
const FLICK_MIN_GAIN: f32 = 600.0;
const DELAYED_FLICK_FRAMES: u32 = 60;

/// Measurements taken on the step the ball leaves the roof.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlickEvent {
    /// Ball speed gained since the previous step.
    pub speed_gain: f32,
    /// Absolute pitch change since the previous step.
    pub pitch_change: f32,
    /// Consecutive steps the ball spent on the roof.
    pub dribble_frames: u32,
    /// The dribble used the handbrake at some point.
    pub powerslide: bool,
    /// Car height at release.
    pub car_height: f32,
    /// Car angular speed at release.
    pub spin: f32,
}

impl FlickEvent {
    /// Tiered flick value.
    ///
    /// The first chain picks the most specific matching flick: musty (15),
    /// 180° (12), 90° (10), 45° (8), delayed (11), powerslide (9), basic (6).
    /// Wavedash (13) and breezy/mawkzy (16) are then checked in that order
    /// and each overwrites whatever was chosen before, so the last matching
    /// check wins even when its value is lower.
    pub fn value(&self) -> f32 {
        let g = self.speed_gain;
        let p = self.pitch_change;

        let mut value = if p > 0.8 && g > 1500.0 {
            15.0
        } else if p > 0.6 && g > 1200.0 {
            12.0
        } else if p > 0.4 && g > 1000.0 {
            10.0
        } else if p > 0.2 && g > 800.0 {
            8.0
        } else if self.dribble_frames > DELAYED_FLICK_FRAMES {
            11.0
        } else if self.powerslide {
            9.0
        } else {
            6.0
        };

        if self.car_height < 30.0 && g > 1100.0 {
            value = 13.0;
        }
        if self.spin > 4.0 && g > 1300.0 {
            value = 16.0;
        }
        value
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct RoofDribble {
    on_car: bool,
    frames: u32,
    powerslide: bool,
    last_pitch: f32,
}

/// Roof dribbles and the flicks that end them.
///
/// While the ball sits in the roof envelope (`80 < dz < 250`, horizontal
/// distance `< 120`) pays 0.8 per step, or 1.5 with the handbrake held. On
/// the step it leaves, pays [`FlickEvent::value`] if the ball gained more
/// than 600 uu/s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdvancedDribbling {
    agents: AgentMemory<RoofDribble>,
    last_ball_speed: f32,
}

impl AdvancedDribbling {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for AdvancedDribbling {
    fn name(&self) -> &str {
        "advanced_dribbling"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.agents.reset(agents, |a| RoofDribble {
            last_pitch: initial.cars.get(&a).map_or(0.0, |c| c.physics.pitch()),
            ..RoofDribble::default()
        });
        self.last_ball_speed = initial.ball.speed();
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();
        let ball_speed = ball.speed();
        let gain = ball_speed - self.last_ball_speed;

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let mem = self.agents.slot(id);
            let pitch = car.physics.pitch();
            let offset = ball.position - car.physics.position;
            let in_envelope = offset.z > ROOF_MIN_DZ
                && offset.z < ROOF_MAX_DZ
                && offset.xy().norm() < ROOF_MAX_HORIZONTAL;

            let reward = if in_envelope {
                mem.on_car = true;
                mem.frames += 1;
                if car.handbrake {
                    mem.powerslide = true;
                    POWERSLIDE_DRIBBLE_REWARD
                } else {
                    DRIBBLE_REWARD
                }
            } else if mem.on_car {
                let flick = FlickEvent {
                    speed_gain: gain,
                    pitch_change: (pitch - mem.last_pitch).abs(),
                    dribble_frames: mem.frames,
                    powerslide: mem.powerslide,
                    car_height: car.height(),
                    spin: car.physics.spin(),
                };
                mem.on_car = false;
                mem.frames = 0;
                mem.powerslide = false;
                if gain > FLICK_MIN_GAIN {
                    flick.value()
                } else {
                    0.0
                }
            } else {
                0.0
            };

            mem.last_pitch = pitch;
            rewards.insert(id, reward);
        }

        self.last_ball_speed = ball_speed;
        rewards
    }
}

// ── Bounce dribble ─────────────────────────────────────────────────

const BOUNCE_CONTROL_DIST: f32 = 400.0;
const BOUNCE_MAX_BALL_Z: f32 = 200.0;
const BOUNCE_STEP: f32 = 0.5;
const BOUNCE_CAP: f32 = 5.0;

#[derive(Clone, Debug, Default, PartialEq)]
struct BounceControl {
    bounces: u32,
    controlling: bool,
}

/// Controlled bounces while staying within 400 uu of the ball.
///
/// Every step the low ball (below 200) is rising, both in velocity and in
/// height since the previous step, counts as a bounce. Each bounce while in
/// control adds 0.5, capped at 5, paid every step control lasts. Straying
/// beyond 400 uu drops the count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BounceDribble {
    agents: AgentMemory<BounceControl>,
    last_ball_z: f32,
}

impl BounceDribble {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for BounceDribble {
    fn name(&self) -> &str {
        "bounce_dribble"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.agents.reset(agents, |_| BounceControl::default());
        self.last_ball_z = initial.ball.position.z;
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();
        let z = ball.position.z;
        let vz = ball.linear_velocity.z;
        let bounced = z < BOUNCE_MAX_BALL_Z && vz > 0.0 && self.last_ball_z < z;

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let mem = self.agents.slot(id);
            let reward = if car.distance_to(&ball.position) < BOUNCE_CONTROL_DIST {
                if bounced {
                    mem.bounces += 1;
                    mem.controlling = true;
                }
                if mem.controlling {
                    (mem.bounces as f32 * BOUNCE_STEP).min(BOUNCE_CAP)
                } else {
                    0.0
                }
            } else {
                *mem = BounceControl::default();
                0.0
            };
            rewards.insert(id, reward);
        }

        self.last_ball_z = z;
        rewards
    }
}

// ── Air dribble ────────────────────────────────────────────────────

const AIR_BALL_Z: f32 = 200.0;
const AIR_CAR_Z: f32 = 150.0;
const AIR_MAX_DIST: f32 = 300.0;
const AIR_WALL_X: f32 = 3000.0;
const AIR_WALL_Y: f32 = 4000.0;
const AIR_TOUCH_STEP: f32 = 1.5;
const AIR_TOUCH_CAP: f32 = 10.0;
const WALL_MULTIPLIER: f32 = 1.8;

#[derive(Clone, Debug, Default, PartialEq)]
struct AirControl {
    active: bool,
    touches: u32,
    from_wall: bool,
}

/// Repeated touches carrying the ball through the air.
///
/// Inside the envelope (ball above 200, car above 150, within 300 uu) each
/// new touch counts; while active pays `min(1.5 × touches, 10)`, × 1.8 if
/// the dribble started near a wall. Leaving the envelope after two or more
/// touches pays a completion bonus of 5 (wall) or 3.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AirDribble {
    touches: TouchTracker,
    agents: AgentMemory<AirControl>,
}

impl AirDribble {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for AirDribble {
    fn name(&self) -> &str {
        "air_dribble"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.touches.reset(agents, initial);
        self.agents.reset(agents, |_| AirControl::default());
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let touched = self.touches.update(id, car);
            let mem = self.agents.slot(id);
            let pos = car.physics.position;
            let near_wall = pos.x.abs() > AIR_WALL_X || pos.y.abs() > AIR_WALL_Y;
            let in_envelope = ball.position.z > AIR_BALL_Z
                && pos.z > AIR_CAR_Z
                && car.distance_to(&ball.position) < AIR_MAX_DIST;

            let reward = if in_envelope {
                if touched {
                    mem.touches += 1;
                    mem.active = true;
                    if near_wall {
                        mem.from_wall = true;
                    }
                }
                if mem.active {
                    let base = (mem.touches as f32 * AIR_TOUCH_STEP).min(AIR_TOUCH_CAP);
                    if mem.from_wall {
                        base * WALL_MULTIPLIER
                    } else {
                        base
                    }
                } else {
                    0.0
                }
            } else {
                let bonus = match (mem.active && mem.touches >= 2, mem.from_wall) {
                    (true, true) => 5.0,
                    (true, false) => 3.0,
                    (false, _) => 0.0,
                };
                *mem = AirControl::default();
                bonus
            };
            rewards.insert(id, reward);
        }
        rewards
    }
}
