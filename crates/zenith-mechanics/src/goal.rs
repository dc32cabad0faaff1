//! Win/loss signal on a scoring step.

use zenith_core::{AgentId, GameState};
use zenith_reward::{AgentRewards, Detector, StepContext};

const SCORED: f32 = 10.0;
const CONCEDED: f32 = -10.0;

/// `+10` for every agent on the scoring team and `-10` for everyone else on
/// the step a goal is flagged; `0` on every other step.
///
/// The only detector whose raw output can be negative.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Goal;

impl Goal {
    /// Build the detector.
    pub fn new() -> Self {
        Self
    }
}

impl Detector for Goal {
    fn name(&self) -> &str {
        "goal"
    }

    fn reset(&mut self, _agents: &[AgentId], _initial: &GameState) {}

    fn step(&mut self, ctx: &StepContext<'_>) -> AgentRewards {
        let scorer = ctx.goal();
        ctx.cars()
            .iter()
            .map(|&(id, car)| {
                let reward = match scorer {
                    None => 0.0,
                    Some(team) if team == car.team => SCORED,
                    Some(_) => CONCEDED,
                };
                (id, reward)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_core::Team;
    use zenith_test_utils::{CarBuilder, DetectorHarness, GameStateBuilder};

    fn two_v_two() -> GameStateBuilder {
        GameStateBuilder::new()
            .car(AgentId(0), CarBuilder::blue())
            .car(AgentId(1), CarBuilder::blue())
            .car(AgentId(2), CarBuilder::orange())
            .car(AgentId(3), CarBuilder::orange())
    }

    #[test]
    fn blue_goal_splits_by_team() {
        let idle = two_v_two().build();
        let scored = two_v_two().goal(Team::Blue).build();
        let mut h = DetectorHarness::new(Goal::new(), &idle);

        let r = h.step(&scored);
        assert_eq!(r[&AgentId(0)], 10.0);
        assert_eq!(r[&AgentId(1)], 10.0);
        assert_eq!(r[&AgentId(2)], -10.0);
        assert_eq!(r[&AgentId(3)], -10.0);
    }

    #[test]
    fn no_goal_is_zero() {
        let idle = two_v_two().build();
        let mut h = DetectorHarness::new(Goal::new(), &idle);
        assert!(h.step(&idle).values().all(|&r| r == 0.0));
    }
}
