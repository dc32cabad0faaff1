//! Ceiling play: shots taken after dropping off the ceiling, and driving on
//! it.
//!
//! A car whose wheels are on the ceiling reports `on_ground == true`, so
//! "on the ceiling" is `on_ground` above [`CEILING_Z`].

use zenith_core::{AgentId, GameState};
use zenith_reward::{AgentRewards, Detector, StepContext};

use crate::memory::AgentMemory;
use crate::touch::TouchTracker;

/// Height above which the car counts as on the ceiling.
pub const CEILING_Z: f32 = 1900.0;

const SHOT_CAR_Z: f32 = 500.0;
const SHOT_BALL_Z: f32 = 400.0;
const SHOT_SPEED: f32 = 500.0;

/// New touch after leaving the ceiling, with the car above 500 and the ball
/// above 400.
///
/// Pays 15 when the ball then moves toward the opponent's goal faster than
/// 500 uu/s, else 8.
///
/// Only an airborne step above [`CEILING_Z`] records a visit. Any step with
/// wheels down forgets it, including a step still on the ceiling, so the
/// visit is the moment the car drops off.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CeilingShot {
    touches: TouchTracker,
    was_on_ceiling: AgentMemory<bool>,
}

impl CeilingShot {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Detector for CeilingShot {
    fn name(&self) -> &str {
        "ceiling_shot"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.touches.reset(agents, initial);
        self.was_on_ceiling.reset(agents, |_| false);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let touched = self.touches.update(id, car);
            let visited = self.was_on_ceiling.slot(id);
            let height = car.height();
            if height > CEILING_Z {
                *visited = true;
            }

            let mut reward = 0.0;
            if *visited && touched && height > SHOT_CAR_Z && ball.position.z > SHOT_BALL_Z {
                let toward_goal = ball.linear_velocity.y * car.team.attack_sign();
                reward = if toward_goal > SHOT_SPEED { 15.0 } else { 8.0 };
                *visited = false;
            }
            if car.on_ground {
                *visited = false;
            }
            rewards.insert(id, reward);
        }
        rewards
    }
}

const SHUFFLE_SPEED: f32 = 1200.0;

/// Driving on the ceiling: 4 per step above 1200 uu/s horizontal speed,
/// else 1.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CeilingShuffle;

impl CeilingShuffle {
    /// Build the detector.
    pub fn new() -> Self {
        Self
    }
}

impl Detector for CeilingShuffle {
    fn name(&self) -> &str {
        "ceiling_shuffle"
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        ctx.cars()
            .iter()
            .map(|&(id, car)| {
                let reward = if car.on_ground && car.height() > CEILING_Z {
                    if car.physics.horizontal_speed() > SHUFFLE_SPEED {
                        4.0
                    } else {
                        1.0
                    }
                } else {
                    0.0
                };
                (id, reward)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_test_utils::{CarBuilder, DetectorHarness, GameStateBuilder};

    const A: AgentId = AgentId(0);

    fn floor() -> GameState {
        GameStateBuilder::new().car(A, CarBuilder::blue()).build()
    }

    fn on_ceiling(speed: f32) -> GameState {
        GameStateBuilder::new()
            .car(
                A,
                CarBuilder::blue()
                    .position(0.0, 0.0, 2000.0)
                    .velocity(speed, 0.0, 0.0)
                    .upside_down(),
            )
            .build()
    }

    fn falling_touch(touches: u32, ball_vy: f32) -> GameState {
        GameStateBuilder::new()
            .ball_position(0.0, 1000.0, 900.0)
            .ball_velocity(0.0, ball_vy, 0.0)
            .car(
                A,
                CarBuilder::blue()
                    .position(0.0, 900.0, 1000.0)
                    .airborne()
                    .touches(touches),
            )
            .build()
    }

    fn dropping() -> GameState {
        GameStateBuilder::new()
            .car(
                A,
                CarBuilder::blue()
                    .position(0.0, 0.0, 1950.0)
                    .upside_down()
                    .airborne(),
            )
            .build()
    }

    #[test]
    fn shot_toward_goal_after_ceiling() {
        let mut h = DetectorHarness::new(CeilingShot::new(), &floor());
        assert_eq!(h.reward(&on_ceiling(0.0), A), 0.0);
        assert_eq!(h.reward(&dropping(), A), 0.0);
        assert_eq!(h.reward(&falling_touch(1, 2000.0), A), 15.0);
        // Visit consumed.
        assert_eq!(h.reward(&falling_touch(2, 2000.0), A), 0.0);
    }

    #[test]
    fn slow_ceiling_shot_is_basic() {
        let mut h = DetectorHarness::new(CeilingShot::new(), &floor());
        h.reward(&dropping(), A);
        assert_eq!(h.reward(&falling_touch(1, -300.0), A), 8.0);
    }

    #[test]
    fn wheels_on_ceiling_are_not_a_visit() {
        let mut h = DetectorHarness::new(CeilingShot::new(), &floor());
        h.reward(&on_ceiling(0.0), A);
        assert_eq!(h.reward(&falling_touch(1, 2000.0), A), 0.0);
    }

    #[test]
    fn floor_touchdown_forgets_ceiling() {
        let mut h = DetectorHarness::new(CeilingShot::new(), &floor());
        h.reward(&dropping(), A);
        h.reward(&floor(), A);
        assert_eq!(h.reward(&falling_touch(1, 2000.0), A), 0.0);
    }

    #[test]
    fn shuffle_pays_more_when_fast() {
        let mut h = DetectorHarness::new(CeilingShuffle::new(), &floor());
        assert_eq!(h.reward(&on_ceiling(500.0), A), 1.0);
        assert_eq!(h.reward(&on_ceiling(1500.0), A), 4.0);
        assert_eq!(h.reward(&floor(), A), 0.0);
    }
}
