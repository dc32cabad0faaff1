//! Transition engines for environment tests.
//!
//! - [`IdleEngine`]: standard kickoff spawn, then nothing moves.
//! - [`ScriptedEngine`]: replays a fixed list of snapshots and records the
//!   controls it was given.

use std::f32::consts::FRAC_PI_2;

use indexmap::IndexMap;
use zenith_core::{AgentId, CarState, GameState, Orientation, Team, Vec3};
use zenith_env::{ControllerState, TransitionEngine};

/// Blue kickoff spots; orange uses the same spots mirrored through the
/// centre.
const KICKOFF_SPOTS: [(f32, f32); 5] = [
    (-2048.0, -2560.0),
    (2048.0, -2560.0),
    (-256.0, -3840.0),
    (256.0, -3840.0),
    (0.0, -4608.0),
];

/// Kickoff snapshot: blue agents first, then orange, ids counting from 0.
///
/// Teams larger than five wrap around the spots.
pub fn kickoff(blue: usize, orange: usize) -> GameState {
    let mut state = GameState::new(Vec3::new(0.0, 0.0, 93.0));
    let spawn = |team: Team, slot: usize| {
        let (x, y) = KICKOFF_SPOTS[slot % KICKOFF_SPOTS.len()];
        let sign = team.attack_sign();
        let mut car = CarState::new(team);
        car.physics.position = Vec3::new(x * sign, y * sign, 17.0);
        car.physics.orientation = Orientation::from_euler(0.0, FRAC_PI_2 * sign, 0.0);
        car
    };
    for slot in 0..blue {
        state
            .cars
            .insert(AgentId(slot as u32), spawn(Team::Blue, slot));
    }
    for slot in 0..orange {
        state
            .cars
            .insert(AgentId((blue + slot) as u32), spawn(Team::Orange, slot));
    }
    state
}

/// Spawns a kickoff and advances the tick counter by one per step.
#[derive(Clone, Debug, Default)]
pub struct IdleEngine {
    state: Option<GameState>,
    pub resets: usize,
    pub steps: usize,
}

impl IdleEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransitionEngine for IdleEngine {
    fn reset(&mut self, blue: usize, orange: usize) -> GameState {
        self.resets += 1;
        let state = kickoff(blue, orange);
        self.state = Some(state.clone());
        state
    }

    fn step(&mut self, _controls: &IndexMap<AgentId, ControllerState>) -> GameState {
        self.steps += 1;
        let state = self.state.get_or_insert_with(|| kickoff(0, 0));
        state.tick_count += 1;
        state.clone()
    }
}

/// Replays `frames` one per tick after returning `initial` on reset.
///
/// Once the script runs out, the last frame is repeated with its tick
/// counter advanced so `tick_count` never goes backwards.
#[derive(Clone, Debug)]
pub struct ScriptedEngine {
    initial: GameState,
    frames: Vec<GameState>,
    cursor: usize,
    last: Option<GameState>,
    /// Every control map received, across all episodes.
    pub received: Vec<IndexMap<AgentId, ControllerState>>,
    /// Team sizes requested by each reset.
    pub spawns: Vec<(usize, usize)>,
}

impl ScriptedEngine {
    pub fn new(initial: GameState, frames: Vec<GameState>) -> Self {
        Self {
            initial,
            frames,
            cursor: 0,
            last: None,
            received: Vec::new(),
            spawns: Vec::new(),
        }
    }

    /// Ticks replayed since the last reset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl TransitionEngine for ScriptedEngine {
    fn reset(&mut self, blue: usize, orange: usize) -> GameState {
        self.spawns.push((blue, orange));
        self.cursor = 0;
        self.last = Some(self.initial.clone());
        self.initial.clone()
    }

    fn step(&mut self, controls: &IndexMap<AgentId, ControllerState>) -> GameState {
        self.received.push(controls.clone());
        let next = match self.frames.get(self.cursor) {
            Some(frame) => frame.clone(),
            None => {
                let mut repeat = self.last.clone().unwrap_or_else(|| self.initial.clone());
                repeat.tick_count += 1;
                repeat
            }
        };
        self.cursor += 1;
        self.last = Some(next.clone());
        next
    }
}
