//! The per-step world snapshot.
//!
//! A [`GameState`] is produced once per step by the transition engine and is
//! read-only to every detector for that step. Detectors never hold on to a
//! snapshot; anything they need next step is copied into their own memory.

use indexmap::IndexMap;

use crate::error::SnapshotError;
use crate::id::{AgentId, Team};
use crate::math::{horizontal_norm, EulerAngles, Orientation, Vec3};

/// Rigid-body state shared by the ball and the cars.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PhysicsState {
    /// Centre of mass, in uu.
    pub position: Vec3,
    /// Body basis.
    pub orientation: Orientation,
    /// Linear velocity, in uu/s.
    pub linear_velocity: Vec3,
    /// Angular velocity, in rad/s.
    pub angular_velocity: Vec3,
}

impl PhysicsState {
    /// A body at rest at `position` with the identity orientation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Height above the floor (`position.z`).
    pub fn height(&self) -> f32 {
        self.position.z
    }

    /// Linear speed.
    pub fn speed(&self) -> f32 {
        self.linear_velocity.norm()
    }

    /// Speed in the ground plane.
    pub fn horizontal_speed(&self) -> f32 {
        horizontal_norm(&self.linear_velocity)
    }

    /// Angular speed.
    pub fn spin(&self) -> f32 {
        self.angular_velocity.norm()
    }

    /// Euler angles of the body basis.
    pub fn euler_angles(&self) -> EulerAngles {
        self.orientation.euler_angles()
    }

    /// Pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.euler_angles().pitch
    }

    /// Yaw in radians.
    pub fn yaw(&self) -> f32 {
        self.euler_angles().yaw
    }

    /// Forward axis.
    pub fn forward(&self) -> Vec3 {
        self.orientation.forward
    }

    /// Roof axis.
    pub fn up(&self) -> Vec3 {
        self.orientation.up
    }
}

/// One car as seen in a snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarState {
    /// Side the car plays for.
    pub team: Team,
    /// Rigid-body state.
    pub physics: PhysicsState,
    /// All wheels in contact with a surface (floor, wall or ceiling).
    pub on_ground: bool,
    /// A flip or second jump is still available.
    pub has_flip: bool,
    /// Boost is being applied this step.
    pub is_boosting: bool,
    /// Handbrake (powerslide) is held.
    pub handbrake: bool,
    /// Cumulative ball contacts this episode. Monotonically non-decreasing;
    /// consumers must only look at the delta between consecutive snapshots.
    pub ball_touches: u32,
    /// Remaining boost, 0 to 100.
    pub boost_amount: f32,
    /// The car is demolished and waiting to respawn.
    pub is_demoed: bool,
}

impl CarState {
    /// A grounded car at rest at the origin with a flip available.
    pub fn new(team: Team) -> Self {
        Self {
            team,
            physics: PhysicsState::default(),
            on_ground: true,
            has_flip: true,
            is_boosting: false,
            handbrake: false,
            ball_touches: 0,
            boost_amount: 33.3,
            is_demoed: false,
        }
    }

    /// Height of the car (`physics.position.z`).
    pub fn height(&self) -> f32 {
        self.physics.height()
    }

    /// Distance from the car to `point`.
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        (point - self.physics.position).norm()
    }
}

/// Complete physical description of one simulation step.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Physics ticks elapsed since the transition engine started.
    pub tick_count: u64,
    /// A goal was scored on this step.
    pub goal_scored: bool,
    /// Team credited with the goal; required whenever `goal_scored` is set.
    pub scoring_team: Option<Team>,
    /// The ball.
    pub ball: PhysicsState,
    /// Every car, in a stable order.
    pub cars: IndexMap<AgentId, CarState>,
}

impl GameState {
    /// A snapshot with the ball at rest at `ball_position` and no cars.
    pub fn new(ball_position: Vec3) -> Self {
        Self {
            tick_count: 0,
            goal_scored: false,
            scoring_team: None,
            ball: PhysicsState::at(ball_position),
            cars: IndexMap::new(),
        }
    }

    /// Look up an agent's car.
    pub fn car(&self, agent: AgentId) -> Result<&CarState, SnapshotError> {
        self.cars
            .get(&agent)
            .ok_or(SnapshotError::MissingCar { agent })
    }

    /// Team credited with the goal on this step, if any.
    ///
    /// Fails when `goal_scored` is set without a scoring team.
    pub fn goal(&self) -> Result<Option<Team>, SnapshotError> {
        match (self.goal_scored, self.scoring_team) {
            (false, _) => Ok(None),
            (true, Some(team)) => Ok(Some(team)),
            (true, None) => Err(SnapshotError::MissingScoringTeam),
        }
    }

    /// Agent IDs in snapshot order.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.cars.keys().copied().collect()
    }

    /// Agents on `team`, in snapshot order.
    pub fn team_agents(&self, team: Team) -> impl Iterator<Item = AgentId> + '_ {
        self.cars
            .iter()
            .filter(move |(_, car)| car.team == team)
            .map(|(&id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_car_state() -> GameState {
        let mut s = GameState::new(Vec3::new(0.0, 0.0, 93.0));
        s.cars.insert(AgentId(0), CarState::new(Team::Blue));
        s.cars.insert(AgentId(1), CarState::new(Team::Orange));
        s
    }

    #[test]
    fn missing_car_is_reported() {
        let s = two_car_state();
        assert!(s.car(AgentId(0)).is_ok());
        assert_eq!(
            s.car(AgentId(9)),
            Err(SnapshotError::MissingCar { agent: AgentId(9) })
        );
    }

    #[test]
    fn goal_requires_scoring_team() {
        let mut s = two_car_state();
        assert_eq!(s.goal(), Ok(None));
        s.goal_scored = true;
        assert_eq!(s.goal(), Err(SnapshotError::MissingScoringTeam));
        s.scoring_team = Some(Team::Orange);
        assert_eq!(s.goal(), Ok(Some(Team::Orange)));
    }

    #[test]
    fn team_agents_filters_in_order() {
        let s = two_car_state();
        let blue: Vec<_> = s.team_agents(Team::Blue).collect();
        assert_eq!(blue, vec![AgentId(0)]);
        assert_eq!(s.agent_ids(), vec![AgentId(0), AgentId(1)]);
    }

    #[test]
    fn horizontal_speed_ignores_vertical() {
        let mut p = PhysicsState::default();
        p.linear_velocity = Vec3::new(3.0, 4.0, 100.0);
        assert!((p.horizontal_speed() - 5.0).abs() < 1e-6);
    }
}
