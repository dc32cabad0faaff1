//! Hard-hit detectors: powershots and backboard plays.
//!
//! Both gate on a new ball contact from the [`TouchTracker`]. The powershot
//! additionally compares the ball speed against the previous step's speed,
//! which is remembered once per detector (the ball is shared by all agents).

use zenith_core::{AgentId, ArenaConstants, CarState, GameState};
use zenith_reward::{AgentRewards, Detector, StepContext};

use crate::touch::TouchTracker;

// ── Powershot ──────────────────────────────────────────────────────

const POWERSHOT_MIN_GAIN: f32 = 800.0;
const POWERSHOT_COMBO_GAIN: f32 = 1200.0;
const WALL_X: f32 = 3500.0;
const WALL_Y: f32 = 4500.0;
const UPSIDE_DOWN_UP_Z: f32 = -0.5;
const AERIAL_HEIGHT: f32 = 300.0;
const GROUNDED_HEIGHT: f32 = 50.0;
const AIR_ROLL_SPIN: f32 = 3.0;

/// A new touch that raises the ball's speed by more than 800 uu/s.
///
/// Starts from a base of 5 and stacks bonuses for the contact style:
///
/// | Condition | Bonus |
/// |-----------|-------|
/// | on a wall (`|x| > 3500` or `|y| > 4500`) | +3 |
/// | upside down (`up.z < -0.5`) | +4 |
/// | air rolling (angular speed > 3) | +3.5 |
/// | aerial (height > 300) and not on a wall | +4 |
/// | grounded (height < 50) and not on a wall | +2 |
/// | upside down and air rolling, or aerial and air rolling with gain > 1200 | +5 |
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Powershot {
    touches: TouchTracker,
    last_ball_speed: f32,
}

impl Powershot {
    /// Build the detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiered value of a qualifying contact.
    pub fn value(car: &CarState, speed_gain: f32) -> f32 {
        let pos = car.physics.position;
        let on_wall = pos.x.abs() > WALL_X || pos.y.abs() > WALL_Y;
        let upside_down = car.physics.up().z < UPSIDE_DOWN_UP_Z;
        let aerial = pos.z > AERIAL_HEIGHT;
        let air_rolling = car.physics.spin() > AIR_ROLL_SPIN;

        let mut value = 5.0;
        if on_wall {
            value += 3.0;
        }
        if upside_down {
            value += 4.0;
        }
        if air_rolling {
            value += 3.5;
        }
        if aerial && !on_wall {
            value += 4.0;
        }
        if !aerial && !on_wall && pos.z < GROUNDED_HEIGHT {
            value += 2.0;
        }
        if (upside_down && air_rolling)
            || (aerial && air_rolling && speed_gain > POWERSHOT_COMBO_GAIN)
        {
            value += 5.0;
        }
        value
    }
}

impl Detector for Powershot {
    fn name(&self) -> &str {
        "powershot"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.touches.reset(agents, initial);
        self.last_ball_speed = initial.ball.speed();
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball_speed = ctx.ball().speed();
        let gain = ball_speed - self.last_ball_speed;

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let touched = self.touches.update(id, car);
            let reward = if touched && gain > POWERSHOT_MIN_GAIN {
                Self::value(car, gain)
            } else {
                0.0
            };
            rewards.insert(id, reward);
        }

        self.last_ball_speed = ball_speed;
        rewards
    }
}

// ── Backboard ──────────────────────────────────────────────────────

const BACKBOARD_BALL_Z: f32 = 500.0;
const BACKBOARD_BALL_Y: f32 = 4000.0;
const CLEAR_SPEED: f32 = 500.0;
const SHOT_SPEED: f32 = 800.0;

/// A new touch while the ball is high against a back wall.
///
/// Nearer the agent's own goal it is a clear: 8 when the ball leaves toward
/// the opponent at more than 500 uu/s, else 3. Nearer the opponent's goal it
/// is a shot: 10 above 800 uu/s, else 4.
#[derive(Clone, Debug, PartialEq)]
pub struct Backboard {
    arena: ArenaConstants,
    touches: TouchTracker,
}

impl Backboard {
    /// Build with the given arena geometry.
    pub fn new(arena: ArenaConstants) -> Self {
        Self {
            arena,
            touches: TouchTracker::default(),
        }
    }
}

impl Detector for Backboard {
    fn name(&self) -> &str {
        "backboard"
    }

    fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.touches.reset(agents, initial);
    }

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let ball = ctx.ball();
        let on_backboard =
            ball.position.z > BACKBOARD_BALL_Z && ball.position.y.abs() > BACKBOARD_BALL_Y;

        let mut rewards = AgentRewards::with_capacity(ctx.cars().len());
        for &(id, car) in ctx.cars() {
            let touched = self.touches.update(id, car);
            let reward = if touched && on_backboard {
                let own_y = self.arena.own_goal(car.team).y;
                let opp_y = self.arena.opponent_goal(car.team).y;
                let defensive = (ball.position.y - own_y).abs() < (ball.position.y - opp_y).abs();
                let toward_opponent = ball.linear_velocity.y * car.team.attack_sign();

                match (defensive, toward_opponent) {
                    (true, v) if v > CLEAR_SPEED => 8.0,
                    (true, _) => 3.0,
                    (false, v) if v > SHOT_SPEED => 10.0,
                    (false, _) => 4.0,
                }
            } else {
                0.0
            };
            rewards.insert(id, reward);
        }
        rewards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_test_utils::{CarBuilder, DetectorHarness, GameStateBuilder};

    const A: AgentId = AgentId(0);

    fn at_rest(car: CarBuilder) -> GameState {
        GameStateBuilder::new().car(A, car).build()
    }

    #[test]
    fn ground_powershot_scores_base_plus_ground() {
        let initial = at_rest(CarBuilder::blue());
        let hit = GameStateBuilder::new()
            .ball_velocity(0.0, 1000.0, 0.0)
            .car(A, CarBuilder::blue().touches(1))
            .build();
        let mut h = DetectorHarness::new(Powershot::new(), &initial);
        assert_eq!(h.reward(&hit, A), 7.0);
    }

    #[test]
    fn weak_touch_is_not_a_powershot() {
        let initial = at_rest(CarBuilder::blue());
        let tap = GameStateBuilder::new()
            .ball_velocity(0.0, 500.0, 0.0)
            .car(A, CarBuilder::blue().touches(1))
            .build();
        let mut h = DetectorHarness::new(Powershot::new(), &initial);
        assert_eq!(h.reward(&tap, A), 0.0);
    }

    #[test]
    fn speed_gain_without_touch_is_ignored() {
        let initial = at_rest(CarBuilder::blue());
        let fast = GameStateBuilder::new()
            .ball_velocity(0.0, 3000.0, 0.0)
            .car(A, CarBuilder::blue())
            .build();
        let mut h = DetectorHarness::new(Powershot::new(), &initial);
        assert_eq!(h.reward(&fast, A), 0.0);
    }

    #[test]
    fn upside_down_air_roll_combo() {
        let car = CarBuilder::blue()
            .position(0.0, 0.0, 600.0)
            .upside_down()
            .angular_velocity(4.0, 0.0, 0.0)
            .build();
        // 5 + 4 (upside down) + 3.5 (air roll) + 4 (aerial) + 5 (combo)
        assert_eq!(Powershot::value(&car, 900.0), 21.5);
    }

    #[test]
    fn wall_hit_skips_aerial_and_ground_bonus() {
        let car = CarBuilder::blue().position(3900.0, 0.0, 800.0).build();
        assert_eq!(Powershot::value(&car, 900.0), 8.0);
    }

    #[test]
    fn backboard_shot_and_clear() {
        let arena = ArenaConstants::standard();
        let initial = GameStateBuilder::new()
            .car(A, CarBuilder::blue())
            .car(AgentId(1), CarBuilder::orange())
            .build();
        let mut h = DetectorHarness::new(Backboard::new(arena), &initial);

        // Ball high on the orange back wall, moving back toward -y.
        let s = GameStateBuilder::new()
            .ball_position(0.0, 4800.0, 900.0)
            .ball_velocity(0.0, -1000.0, 0.0)
            .car(A, CarBuilder::blue().touches(1))
            .car(AgentId(1), CarBuilder::orange().touches(1))
            .build();
        let r = h.step(&s);
        // Blue is attacking that wall but the ball moves away from orange's goal.
        assert_eq!(r[&A], 4.0);
        // Orange is defending and the ball leaves toward blue's goal.
        assert_eq!(r[&AgentId(1)], 8.0);
    }

    #[test]
    fn backboard_resyncs_touches_off_the_wall() {
        let arena = ArenaConstants::standard();
        let initial = at_rest(CarBuilder::blue());
        let mut h = DetectorHarness::new(Backboard::new(arena), &initial);

        // Touch in midfield: not a backboard play, but the count is consumed.
        let midfield = GameStateBuilder::new()
            .car(A, CarBuilder::blue().touches(1))
            .build();
        assert_eq!(h.reward(&midfield, A), 0.0);

        // Ball later reaches the backboard with no new contact.
        let later = GameStateBuilder::new()
            .ball_position(0.0, 4800.0, 900.0)
            .car(A, CarBuilder::blue().touches(1))
            .build();
        assert_eq!(h.reward(&later, A), 0.0);
    }
}
