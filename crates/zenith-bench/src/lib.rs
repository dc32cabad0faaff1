//! Synthetic episodes and a toy transition engine for benchmarks and
//! examples.
//!
//! - [`SyntheticEngine`]: a crude kinematic [`TransitionEngine`] (throttle,
//!   steering, jumps, dodges, boost, gravity, ball bounces, touches and
//!   goals). Not a physics model; just enough motion to make the detector
//!   bank fire.
//! - [`synthetic_episode`]: a seeded episode of random lookup-table actions,
//!   one snapshot per decision step.
//!
//! Both are deterministic: the same seed always yields the same snapshots.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::f32::consts::FRAC_PI_2;

use indexmap::IndexMap;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use zenith_core::math::direction;
use zenith_core::{AgentId, ArenaConstants, CarState, GameState, Orientation, Team, Vec3};
use zenith_env::{ControllerState, LookupTable, TransitionEngine};

/// Seconds per physics tick.
pub const DT: f32 = 1.0 / 120.0;

const GRAVITY: f32 = 650.0;
const THROTTLE_ACCEL: f32 = 1600.0;
const BOOST_ACCEL: f32 = 991.0;
const BOOST_USE_PER_SECOND: f32 = 33.3;
const JUMP_SPEED: f32 = 500.0;
const DODGE_SPEED: f32 = 500.0;
const TURN_RATE: f32 = 2.5;
const AIR_RATE: f32 = 5.5;
const CAR_REST_Z: f32 = 17.0;
const BALL_RADIUS: f32 = 93.0;
const BALL_RESTITUTION: f32 = 0.6;
const TOUCH_DISTANCE: f32 = 170.0;
const GOAL_HALF_WIDTH: f32 = 893.0;
const GOAL_HEIGHT: f32 = 643.0;

const KICKOFF_SPOTS: [(f32, f32); 5] = [
    (-2048.0, -2560.0),
    (2048.0, -2560.0),
    (-256.0, -3840.0),
    (256.0, -3840.0),
    (0.0, -4608.0),
];

// ── SyntheticEngine ────────────────────────────────────────────────

/// Seeded toy engine. Blue agents are numbered first, then orange.
#[derive(Clone, Debug)]
pub struct SyntheticEngine {
    arena: ArenaConstants,
    rng: ChaCha8Rng,
    state: GameState,
    in_contact: IndexMap<AgentId, bool>,
}

impl SyntheticEngine {
    /// Engine on the standard arena.
    pub fn new(seed: u64) -> Self {
        Self::with_arena(seed, ArenaConstants::standard())
    }

    /// Engine on `arena`.
    pub fn with_arena(seed: u64, arena: ArenaConstants) -> Self {
        Self {
            arena,
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: GameState::new(Vec3::new(0.0, 0.0, BALL_RADIUS)),
            in_contact: IndexMap::new(),
        }
    }

    fn spawn(&mut self, team: Team, slot: usize) -> CarState {
        let (x, y) = KICKOFF_SPOTS[slot % KICKOFF_SPOTS.len()];
        let sign = team.attack_sign();
        let mut car = CarState::new(team);
        car.physics.position = Vec3::new(x * sign, y * sign, CAR_REST_Z);
        car.physics.orientation = Orientation::from_euler(0.0, FRAC_PI_2 * sign, 0.0);
        car.boost_amount = self.rng.random_range(30.0..40.0);
        car
    }

    fn respawn_ball(&mut self) {
        self.state.ball = Default::default();
        self.state.ball.position = Vec3::new(0.0, 0.0, BALL_RADIUS);
        self.state.ball.linear_velocity = Vec3::new(
            self.rng.random_range(-50.0..50.0),
            self.rng.random_range(-50.0..50.0),
            0.0,
        );
    }

    fn step_ball(&mut self) {
        let a = self.arena;
        let ball = &mut self.state.ball;
        ball.linear_velocity.z -= GRAVITY * DT;
        ball.position += ball.linear_velocity * DT;
        ball.angular_velocity *= 0.99;

        let p = &mut ball.position;
        let v = &mut ball.linear_velocity;
        if p.z < BALL_RADIUS {
            p.z = BALL_RADIUS;
            v.z = -v.z * BALL_RESTITUTION;
        }
        if p.z > a.ceiling_z - BALL_RADIUS {
            p.z = a.ceiling_z - BALL_RADIUS;
            v.z = -v.z.abs() * BALL_RESTITUTION;
        }
        if p.x.abs() > a.side_wall_x - BALL_RADIUS {
            p.x = p.x.signum() * (a.side_wall_x - BALL_RADIUS);
            v.x = -v.x * BALL_RESTITUTION;
        }
        let in_mouth = p.x.abs() < GOAL_HALF_WIDTH && p.z < GOAL_HEIGHT;
        if p.y.abs() > a.back_wall_y - BALL_RADIUS && !in_mouth {
            p.y = p.y.signum() * (a.back_wall_y - BALL_RADIUS);
            v.y = -v.y * BALL_RESTITUTION;
        }
        if p.y.abs() > a.back_wall_y + BALL_RADIUS {
            // Blue attacks +y.
            let scorer = if p.y > 0.0 { Team::Blue } else { Team::Orange };
            self.state.goal_scored = true;
            self.state.scoring_team = Some(scorer);
        }
    }

    fn touch_ball(&mut self) {
        for (&id, car) in self.state.cars.iter_mut() {
            let offset = self.state.ball.position - car.physics.position;
            let touching = !car.is_demoed && offset.norm() < TOUCH_DISTANCE;
            let was = self.in_contact.insert(id, touching).unwrap_or(false);
            if touching && !was {
                car.ball_touches += 1;
                let push = direction(&offset).unwrap_or_else(Vec3::z)
                    * (500.0 + 0.5 * car.physics.speed());
                let ball = &mut self.state.ball;
                ball.linear_velocity = car.physics.linear_velocity + push;
                ball.angular_velocity += car.physics.angular_velocity;
            }
        }
    }
}

fn step_car(car: &mut CarState, c: &ControllerState, arena: &ArenaConstants) {
    let e = car.physics.euler_angles();
    let (mut pitch, mut yaw, mut roll) = (e.pitch, e.yaw, e.roll);
    let p = &mut car.physics;

    if car.on_ground {
        yaw += c.steer * TURN_RATE * DT;
        let heading = Vec3::new(yaw.cos(), yaw.sin(), 0.0);
        let speed = p.linear_velocity.dot(&heading) + c.throttle * THROTTLE_ACCEL * DT;
        p.linear_velocity = heading * speed;
        p.angular_velocity = Vec3::new(0.0, 0.0, c.steer * TURN_RATE);
        if c.jump {
            p.linear_velocity.z = JUMP_SPEED;
            car.on_ground = false;
        }
    } else {
        pitch = (pitch + c.pitch * AIR_RATE * DT).clamp(-1.5, 1.5);
        yaw += c.yaw * AIR_RATE * DT;
        roll += c.roll * AIR_RATE * DT;
        p.angular_velocity = Vec3::new(c.roll, c.pitch, c.yaw) * AIR_RATE;
        if c.jump && car.has_flip {
            car.has_flip = false;
            p.linear_velocity += p.orientation.forward * DODGE_SPEED;
        }
        p.linear_velocity.z -= GRAVITY * DT;
    }

    car.is_boosting = c.boost && car.boost_amount > 0.0;
    if car.is_boosting {
        p.linear_velocity += p.orientation.forward * BOOST_ACCEL * DT;
        car.boost_amount = (car.boost_amount - BOOST_USE_PER_SECOND * DT).max(0.0);
    }
    let speed = p.linear_velocity.norm();
    if speed > arena.car_max_speed {
        p.linear_velocity *= arena.car_max_speed / speed;
    }
    car.handbrake = c.handbrake;

    p.position += p.linear_velocity * DT;
    p.position.x = p.position.x.clamp(-arena.side_wall_x, arena.side_wall_x);
    p.position.y = p.position.y.clamp(-arena.back_wall_y, arena.back_wall_y);
    p.position.z = p.position.z.min(arena.ceiling_z - CAR_REST_Z);
    if !car.on_ground && p.position.z <= CAR_REST_Z {
        p.position.z = CAR_REST_Z;
        p.linear_velocity.z = 0.0;
        car.on_ground = true;
        car.has_flip = true;
        pitch = 0.0;
        roll = 0.0;
    }
    p.orientation = Orientation::from_euler(pitch, yaw, roll);
}

impl TransitionEngine for SyntheticEngine {
    fn reset(&mut self, blue: usize, orange: usize) -> GameState {
        let tick = self.state.tick_count;
        self.state = GameState::new(Vec3::new(0.0, 0.0, BALL_RADIUS));
        self.state.tick_count = tick;
        self.respawn_ball();
        for slot in 0..blue {
            let car = self.spawn(Team::Blue, slot);
            self.state.cars.insert(AgentId(slot as u32), car);
        }
        for slot in 0..orange {
            let car = self.spawn(Team::Orange, slot);
            self.state.cars.insert(AgentId((blue + slot) as u32), car);
        }
        self.in_contact = self.state.cars.keys().map(|&id| (id, false)).collect();
        self.state.clone()
    }

    fn step(&mut self, controls: &IndexMap<AgentId, ControllerState>) -> GameState {
        if self.state.goal_scored {
            self.state.goal_scored = false;
            self.state.scoring_team = None;
            self.respawn_ball();
        }
        self.state.tick_count += 1;
        for (id, car) in self.state.cars.iter_mut() {
            let c = controls.get(id).copied().unwrap_or_default();
            step_car(car, &c, &self.arena);
        }
        self.touch_ball();
        self.step_ball();
        self.state.clone()
    }
}

// ── Synthetic episodes ─────────────────────────────────────────────

/// Initial snapshot plus one snapshot per decision step.
#[derive(Clone, Debug)]
pub struct SyntheticEpisode {
    /// Kickoff snapshot.
    pub initial: GameState,
    /// Snapshot after each decision step.
    pub states: Vec<GameState>,
}

impl SyntheticEpisode {
    /// Agents of the episode.
    pub fn agents(&self) -> Vec<AgentId> {
        self.initial.agent_ids()
    }
}

/// Play `steps` decision steps of random lookup-table actions, each held
/// for `repeat` ticks, with `team_size` cars per side.
pub fn synthetic_episode(
    seed: u64,
    team_size: usize,
    steps: usize,
    repeat: usize,
) -> SyntheticEpisode {
    let table = LookupTable::standard();
    let mut engine = SyntheticEngine::new(seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let initial = engine.reset(team_size, team_size);
    let agents = initial.agent_ids();

    let mut states = Vec::with_capacity(steps);
    let mut last = initial.clone();
    for _ in 0..steps {
        let controls: IndexMap<AgentId, ControllerState> = agents
            .iter()
            .map(|&a| (a, table.entries()[rng.random_range(0..table.len())]))
            .collect();
        for _ in 0..repeat.max(1) {
            last = engine.step(&controls);
        }
        states.push(last.clone());
    }
    SyntheticEpisode { initial, states }
}
