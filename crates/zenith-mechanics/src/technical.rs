//! Technical touches and positioning: redirects, pinches and shadow
//! defence.

use zenith_core::math::direction;
use zenith_core::{AgentId, ArenaConstants, GameState, Vec3, EPSILON};
use zenith_reward::{AgentRewards, Detector, StepContext};

use crate::touch::TouchTracker;

// ── Redirect ───────────────────────────────────────────────────────

const REDIRECT_BALL_Z: f32 = 300.0;
const REDIRECT_CAR_Z: f32 = 200.0;
const REDIRECT_MIN_CHANGE: f32 = 0.4;
const MIN_TRACKED_SPEED: f32 = 10.0;

/// Aerial touch that turns the ball's direction of travel.
///
/// With `change = 1 - prev_dir · cur_dir`, a new touch (ball above 300,
/// car above 200) with `change > 0.4` pays
/// `10 · change · (1 + max(0, cur_dir · dir_to_opponent_goal))`.
///
/// The ball direction is remembered once per detector and only refreshed
/// while the ball moves faster than 10 uu/s. A ball that starts at rest has
/// a zero direction, so the first aerial touch after kickoff counts as a
/// full change.
#[derive(Clone, Debug, PartialEq)]
pub struct Redirect {
    arena: ArenaConstants,
    touches: TouchTracker,
    last_direction: Vec3,
}

impl Redirect {
    /// Build with the given arena geometry.
    pub fn new(arena: ArenaConstants) -> Self {
        Self {
            arena,
            touches: TouchTracker::default(),
            last_direction: Vec3::zeros(),
        }
    }
}

impl Detector for Redirect {
    fn name(&self) -> &str {
        "redirect"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.touches.reset(agents, initial);
        let velocity = initial.ball.linear_velocity;
        self.last_direction = velocity / (velocity.norm() + EPSILON);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();
        let speed = ball.speed();
        let current = if speed > MIN_TRACKED_SPEED {
            ball.linear_velocity / speed
        } else {
            self.last_direction
        };
        let aerial_ball = ball.position.z > REDIRECT_BALL_Z;

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let touched = self.touches.update(id, car);
            let mut reward = 0.0;
            if touched && aerial_ball && car.height() > REDIRECT_CAR_Z {
                let change = 1.0 - self.last_direction.dot(&current);
                if change > REDIRECT_MIN_CHANGE {
                    let goal = self.arena.opponent_goal(car.team);
                    let alignment = direction(&(goal - ball.position))
                        .map_or(0.0, |d| current.dot(&d).max(0.0));
                    reward = 10.0 * change * (1.0 + alignment);
                }
            }
            rewards.insert(id, reward);
        }

        self.last_direction = current;
        rewards
    }
}

// ── Pinch ──────────────────────────────────────────────────────────

const PINCH_MIN_GAIN: f32 = 1500.0;
const POST_Y: f32 = 4800.0;
const POST_MAX_X: f32 = 1000.0;
const PINCH_CEILING_Z: f32 = 1800.0;
const PINCH_WALL_X: f32 = 3800.0;
const PINCH_WALL_Y: f32 = 4800.0;
const PINCH_GROUND_Z: f32 = 200.0;

/// New touch that raises the ball's speed by more than 1500 uu/s.
///
/// Classified by where the ball is, first match wins: goal post 25,
/// ceiling 18, wall 15, ground 14, anywhere else 12.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pinch {
    touches: TouchTracker,
    last_ball_speed: f32,
}

impl Pinch {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a pinch with the ball at `pos`.
    pub fn value(pos: &Vec3) -> f32 {
        let near_post = pos.y.abs() > POST_Y && pos.x.abs() < POST_MAX_X;
        let near_wall = pos.x.abs() > PINCH_WALL_X || pos.y.abs() > PINCH_WALL_Y;
        if near_post {
            25.0
        } else if pos.z > PINCH_CEILING_Z {
            18.0
        } else if near_wall {
            15.0
        } else if pos.z < PINCH_GROUND_Z {
            14.0
        } else {
            12.0
        }
    }
}

impl Detector for Pinch {
    fn name(&self) -> &str {
        "pinch"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.touches.reset(agents, initial);
        self.last_ball_speed = initial.ball.speed();
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();
        let speed = ball.speed();
        let gain = speed - self.last_ball_speed;

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let touched = self.touches.update(id, car);
            let reward = if touched && gain > PINCH_MIN_GAIN {
                Self::value(&ball.position)
            } else {
                0.0
            };
            rewards.insert(id, reward);
        }

        self.last_ball_speed = speed;
        rewards
    }
}

// ── Shadow defence ─────────────────────────────────────────────────

const SHADOW_ALIGNMENT: f32 = 0.85;
const SHADOW_RETREAT_SPEED: f32 = 500.0;
const SHADOW_MAX_GOAL_DIST: f32 = 2000.0;

/// Retreating between the ball and the agent's own goal.
///
/// Pays 3 when the ball→car direction is within `acos(0.85)` of the
/// ball→goal direction, the car is moving toward its goal faster than
/// 500 uu/s, and it is within 2000 uu of the goal.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowDefense {
    arena: ArenaConstants,
}

impl ShadowDefense {
    /// Build with the given arena geometry.
    pub fn new(arena: ArenaConstants) -> Self {
        Self { arena }
    }
}

impl Detector for ShadowDefense {
    fn name(&self) -> &str {
        "shadow_defense"
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball().position;
        ctx.cars()
            .iter()
            .map(|&(id, car)| {
                let goal = self.arena.own_goal(car.team);
                let pos = car.physics.position;
                let shadowing = match (direction(&(goal - ball)), direction(&(pos - ball))) {
                    (Some(ball_to_goal), Some(ball_to_car)) => {
                        let car_to_goal = goal - pos;
                        let retreat = direction(&car_to_goal)
                            .map_or(0.0, |d| car.physics.linear_velocity.dot(&d));
                        ball_to_goal.dot(&ball_to_car) > SHADOW_ALIGNMENT
                            && retreat > SHADOW_RETREAT_SPEED
                            && car_to_goal.norm() < SHADOW_MAX_GOAL_DIST
                    }
                    _ => false,
                };
                (id, if shadowing { 3.0 } else { 0.0 })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_test_utils::{CarBuilder, DetectorHarness, GameStateBuilder};

    const A: AgentId = AgentId(0);

    // ── Redirect ───────────────────────────────────────────────

    fn ball_moving(vx: f32, vy: f32, touches: u32) -> GameState {
        GameStateBuilder::new()
            .ball_position(0.0, 0.0, 800.0)
            .ball_velocity(vx, vy, 0.0)
            .car(
                A,
                CarBuilder::blue()
                    .position(0.0, -100.0, 700.0)
                    .airborne()
                    .touches(touches),
            )
            .build()
    }

    #[test]
    fn right_angle_redirect_across_goal_line() {
        let initial = ball_moving(0.0, 1000.0, 0);
        let mut h = DetectorHarness::new(Redirect::new(ArenaConstants::standard()), &initial);
        // Turned 90° to +x: change 1, no alignment with +y goal.
        let r = h.reward(&ball_moving(1000.0, 0.0, 1), A);
        assert!((r - 10.0).abs() < 1e-4);
    }

    #[test]
    fn reversal_toward_goal_gets_alignment_bonus() {
        let initial = ball_moving(0.0, -1000.0, 0);
        let mut h = DetectorHarness::new(Redirect::new(ArenaConstants::standard()), &initial);
        let r = h.reward(&ball_moving(0.0, 1000.0, 1), A);

        let to_goal = direction(&Vec3::new(0.0, 6000.0, 100.0 - 800.0)).unwrap();
        let expected = 20.0 * (1.0 + to_goal.y);
        assert!((r - expected).abs() < 1e-3);
    }

    #[test]
    fn direction_change_without_touch_is_ignored() {
        let initial = ball_moving(0.0, 1000.0, 0);
        let mut h = DetectorHarness::new(Redirect::new(ArenaConstants::standard()), &initial);
        assert_eq!(h.reward(&ball_moving(1000.0, 0.0, 0), A), 0.0);
        // The direction was refreshed, so a touch that keeps it is not a redirect.
        assert_eq!(h.reward(&ball_moving(1000.0, 0.0, 1), A), 0.0);
    }

    #[test]
    fn first_touch_of_a_ball_at_rest_is_a_full_change() {
        let initial = ball_moving(0.0, 0.0, 0);
        let mut h = DetectorHarness::new(Redirect::new(ArenaConstants::standard()), &initial);
        // Zero direction before: change 1, moving along x has no alignment.
        let r = h.reward(&ball_moving(1000.0, 0.0, 1), A);
        assert!((r - 10.0).abs() < 1e-4);
    }

    #[test]
    fn slow_ball_keeps_the_last_direction() {
        let initial = ball_moving(0.0, 1000.0, 0);
        let mut h = DetectorHarness::new(Redirect::new(ArenaConstants::standard()), &initial);
        assert_eq!(h.reward(&ball_moving(5.0, 0.0, 0), A), 0.0);
        // Still compared against +y.
        let r = h.reward(&ball_moving(1000.0, 0.0, 1), A);
        assert!((r - 10.0).abs() < 1e-4);
    }

    // ── Pinch ──────────────────────────────────────────────────

    fn pinch_at(x: f32, y: f32, z: f32) -> f32 {
        let initial = GameStateBuilder::new()
            .ball_position(x, y, z)
            .car(A, CarBuilder::blue())
            .build();
        let hit = GameStateBuilder::new()
            .ball_position(x, y, z)
            .ball_velocity(0.0, 0.0, 2000.0)
            .car(A, CarBuilder::blue().touches(1))
            .build();
        DetectorHarness::new(Pinch::new(), &initial).reward(&hit, A)
    }

    #[test]
    fn pinch_location_tiers() {
        assert_eq!(pinch_at(0.0, 5000.0, 300.0), 25.0);
        assert_eq!(pinch_at(0.0, 0.0, 1900.0), 18.0);
        assert_eq!(pinch_at(3900.0, 0.0, 900.0), 15.0);
        assert_eq!(pinch_at(2000.0, 5000.0, 900.0), 15.0);
        assert_eq!(pinch_at(0.0, 0.0, 100.0), 14.0);
        assert_eq!(pinch_at(0.0, 0.0, 900.0), 12.0);
    }

    #[test]
    fn ordinary_hit_is_not_a_pinch() {
        let initial = GameStateBuilder::new().car(A, CarBuilder::blue()).build();
        let hit = GameStateBuilder::new()
            .ball_velocity(1400.0, 0.0, 0.0)
            .car(A, CarBuilder::blue().touches(1))
            .build();
        let mut h = DetectorHarness::new(Pinch::new(), &initial);
        assert_eq!(h.reward(&hit, A), 0.0);
    }

    // ── Shadow defence ─────────────────────────────────────────

    fn defending(car_y: f32, car_vy: f32) -> GameState {
        GameStateBuilder::new()
            .ball_position(0.0, -3000.0, 100.0)
            .car(
                A,
                CarBuilder::blue()
                    .position(0.0, car_y, 100.0)
                    .velocity(0.0, car_vy, 0.0),
            )
            .build()
    }

    #[test]
    fn retreating_goal_side_is_shadowing() {
        let s = defending(-4500.0, -1000.0);
        let mut h = DetectorHarness::new(ShadowDefense::new(ArenaConstants::standard()), &s);
        assert_eq!(h.reward(&s, A), 3.0);
    }

    #[test]
    fn ball_side_or_stationary_is_not() {
        let arena = ArenaConstants::standard();
        let ahead = defending(-2000.0, -1000.0);
        let mut h = DetectorHarness::new(ShadowDefense::new(arena), &ahead);
        assert_eq!(h.reward(&ahead, A), 0.0);
        assert_eq!(h.reward(&defending(-4500.0, 0.0), A), 0.0);
        // Too far from goal even though aligned.
        assert_eq!(h.reward(&defending(-3500.0, -1000.0), A), 0.0);
    }
}
