//! New-contact detection from the cumulative touch counter.
//!
//! `ball_touches` increments exactly once per discrete contact, while
//! position overlap can persist for several steps. Every "new touch" gate in
//! this crate goes through [`TouchTracker::update`], which re-synchronises
//! the stored count on every call. One increment is therefore reported
//! exactly once, whatever other conditions gate the reward.

use indexmap::IndexMap;
use zenith_core::{AgentId, CarState, GameState};

/// Last observed `ball_touches` per agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TouchTracker {
    last: IndexMap<AgentId, u32>,
}

impl TouchTracker {
    /// Seed every agent's count from the initial snapshot.
    ///
    /// Agents without a car start at zero.
    pub fn reset(&mut self, agents: &[AgentId], initial: &GameState) {
        self.last = agents
            .iter()
            .map(|&a| (a, initial.cars.get(&a).map_or(0, |c| c.ball_touches)))
            .collect();
    }

    /// Record the car's current count; true if it grew since the last call.
    ///
    /// An agent seen for the first time is seeded without reporting a touch.
    pub fn update(&mut self, agent: AgentId, car: &CarState) -> bool {
        let last = self.last.entry(agent).or_insert(car.ball_touches);
        let touched = car.ball_touches > *last;
        *last = car.ball_touches;
        touched
    }

    /// Last recorded count for `agent`.
    pub fn last(&self, agent: AgentId) -> Option<u32> {
        self.last.get(&agent).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_core::{Team, Vec3};

    fn car(touches: u32) -> CarState {
        CarState {
            ball_touches: touches,
            ..CarState::new(Team::Blue)
        }
    }

    #[test]
    fn increment_reported_once() {
        let mut t = TouchTracker::default();
        let mut initial = GameState::new(Vec3::zeros());
        initial.cars.insert(AgentId(0), car(3));
        t.reset(&[AgentId(0)], &initial);

        assert!(!t.update(AgentId(0), &car(3)));
        assert!(t.update(AgentId(0), &car(4)));
        assert!(!t.update(AgentId(0), &car(4)));
        assert!(!t.update(AgentId(0), &car(4)));
        assert!(t.update(AgentId(0), &car(6)));
        assert_eq!(t.last(AgentId(0)), Some(6));
    }

    #[test]
    fn unknown_agent_seeds_silently() {
        let mut t = TouchTracker::default();
        assert!(!t.update(AgentId(9), &car(12)));
        assert!(t.update(AgentId(9), &car(13)));
    }

    #[test]
    fn reset_seeds_from_snapshot() {
        let mut t = TouchTracker::default();
        let mut initial = GameState::new(Vec3::zeros());
        initial.cars.insert(AgentId(1), car(7));
        t.reset(&[AgentId(1), AgentId(2)], &initial);
        assert_eq!(t.last(AgentId(1)), Some(7));
        assert_eq!(t.last(AgentId(2)), Some(0));
    }
}
