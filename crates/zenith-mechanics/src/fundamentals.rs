//! Dense shaping terms: approach the ball, face it, push it toward goal.
//!
//! These three are stateless and fire on almost every step. Each one
//! short-circuits to `0.0` when the distance it normalises by is below
//! [`EPSILON`](zenith_core::EPSILON).

use zenith_core::math::direction;
use zenith_core::{AgentId, ArenaConstants, GameState};
use zenith_reward::{AgentRewards, Detector, StepContext};

/// Car velocity toward the ball, normalised by the car speed cap.
///
/// `clip(v_car · dir_to_ball / car_max_speed, -1, 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityPlayerToBall {
    arena: ArenaConstants,
}

impl VelocityPlayerToBall {
    /// Build with the given arena limits.
    pub fn new(arena: ArenaConstants) -> Self {
        Self { arena }
    }
}

impl Detector for VelocityPlayerToBall {
    fn name(&self) -> &str {
        "velocity_player_to_ball"
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball().position;
        ctx.cars()
            .iter()
            .map(|&(id, car)| {
                let reward = direction(&(ball - car.physics.position)).map_or(0.0, |dir| {
                    (car.physics.linear_velocity.dot(&dir) / self.arena.car_max_speed)
                        .clamp(-1.0, 1.0)
                });
                (id, reward)
            })
            .collect()
    }
}

/// Alignment of the car's nose with the direction to the ball, floored at 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceBall;

impl FaceBall {
    /// Build the detector.
    pub fn new() -> Self {
        Self
    }
}

impl Detector for FaceBall {
    fn name(&self) -> &str {
        "face_ball"
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball().position;
        ctx.cars()
            .iter()
            .map(|&(id, car)| {
                let reward = direction(&(ball - car.physics.position))
                    .map_or(0.0, |dir| car.physics.forward().dot(&dir).max(0.0));
                (id, reward)
            })
            .collect()
    }
}

/// Ball velocity toward the goal the agent attacks, normalised by the ball
/// speed cap and floored at 0.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityBallToGoal {
    arena: ArenaConstants,
}

impl VelocityBallToGoal {
    /// Build with the given arena geometry.
    pub fn new(arena: ArenaConstants) -> Self {
        Self { arena }
    }
}

impl Detector for VelocityBallToGoal {
    fn name(&self) -> &str {
        "velocity_ball_to_goal"
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();
        ctx.cars()
            .iter()
            .map(|&(id, car)| {
                let goal = self.arena.opponent_goal(car.team);
                let reward = direction(&(goal - ball.position)).map_or(0.0, |dir| {
                    (ball.linear_velocity.dot(&dir) / self.arena.ball_max_speed).max(0.0)
                });
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

    #[test]
    fn approaching_ball_is_positive_and_clipped() {
        let arena = ArenaConstants::standard();
        let s = GameStateBuilder::new()
            .ball_position(1000.0, 0.0, 0.0)
            .car(A, CarBuilder::blue().velocity(1150.0, 0.0, 0.0))
            .build();
        let mut h = DetectorHarness::new(VelocityPlayerToBall::new(arena), &s);
        assert!((h.reward(&s, A) - 0.5).abs() < 1e-6);

        let fast = GameStateBuilder::from_state(&s)
            .car(A, CarBuilder::blue().velocity(-9000.0, 0.0, 0.0))
            .build();
        assert_eq!(h.reward(&fast, A), -1.0);
    }

    #[test]
    fn facing_away_is_zero() {
        let s = GameStateBuilder::new()
            .ball_position(-500.0, 0.0, 17.0)
            .car(A, CarBuilder::blue())
            .build();
        let mut h = DetectorHarness::new(FaceBall::new(), &s);
        assert_eq!(h.reward(&s, A), 0.0);

        let facing = GameStateBuilder::from_state(&s)
            .ball_position(500.0, 0.0, 0.0)
            .build();
        assert!((h.reward(&facing, A) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ball_toward_goal_depends_on_team() {
        let arena = ArenaConstants::standard();
        let s = GameStateBuilder::new()
            .ball_position(0.0, 0.0, 100.0)
            .ball_velocity(0.0, 3000.0, 0.0)
            .car(A, CarBuilder::blue())
            .car(AgentId(1), CarBuilder::orange())
            .build();
        let mut h = DetectorHarness::new(VelocityBallToGoal::new(arena), &s);
        let r = h.step(&s);
        assert!((r[&A] - 0.5).abs() < 1e-6);
        assert_eq!(r[&AgentId(1)], 0.0);
    }

    #[test]
    fn zero_distance_short_circuits() {
        let arena = ArenaConstants::standard();
        let s = GameStateBuilder::new()
            .ball_position(10.0, 20.0, 30.0)
            .car(
                A,
                CarBuilder::blue()
                    .position(10.0, 20.0, 30.0)
                    .velocity(500.0, 0.0, 0.0),
            )
            .build();
        let mut approach = DetectorHarness::new(VelocityPlayerToBall::new(arena), &s);
        let mut face = DetectorHarness::new(FaceBall::new(), &s);
        assert_eq!(approach.reward(&s, A), 0.0);
        assert_eq!(face.reward(&s, A), 0.0);
    }
}
