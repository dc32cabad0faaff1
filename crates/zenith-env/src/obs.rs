//! Team-relative observation encoding.
//!
//! Every agent sees the field from its own side: for orange agents the x and
//! y components of every vector are negated, which rotates the arena half a
//! turn about the z axis so both teams attack `+y`. Values are scaled by the
//! arena limits into roughly `[-1, 1]`.
//!
//! Layout per agent, with a fixed length for a given team size:
//!
//! ```text
//! ball (9) | self (19) | allies (19 × (team_size - 1)) | opponents (19 × team_size)
//! ```
//!
//! Missing cars are zero-padded.

use indexmap::IndexMap;
use zenith_core::{AgentId, ArenaConstants, CarState, GameState, SnapshotError, Team, Vec3};

/// Floats in the ball block: position, linear velocity, angular velocity.
pub const BALL_OBS_LEN: usize = 9;

/// Floats in one car block: position, forward, up, linear velocity,
/// angular velocity, boost, on_ground, has_flip, is_demoed.
pub const CAR_OBS_LEN: usize = 19;

/// Boost is reported on a 0 to 100 scale.
const BOOST_SCALE: f32 = 100.0;

/// Errors from encoding observations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ObsError {
    /// An agent has no car in the snapshot.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// A team fields more cars than the encoder has slots for.
    #[error("{team} has {count} cars, observation has room for {capacity}")]
    TooManyCars {
        /// The overfull team.
        team: Team,
        /// Cars on that team.
        count: usize,
        /// Slots available.
        capacity: usize,
    },
}

/// Builds fixed-length observations for a configured team size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObsEncoder {
    arena: ArenaConstants,
    team_size: usize,
}

impl ObsEncoder {
    /// Encoder for up to `team_size` cars per team.
    pub fn new(arena: ArenaConstants, team_size: usize) -> Self {
        Self { arena, team_size }
    }

    /// Length of every observation vector.
    pub fn obs_len(&self) -> usize {
        BALL_OBS_LEN + CAR_OBS_LEN * 2 * self.team_size
    }

    /// Encode one observation per agent, keyed in the order of `agents`.
    pub fn encode(
        &self,
        agents: &[AgentId],
        state: &GameState,
    ) -> Result<IndexMap<AgentId, Vec<f32>>, ObsError> {
        for team in [Team::Blue, Team::Orange] {
            let count = state.team_agents(team).count();
            if count > self.team_size {
                return Err(ObsError::TooManyCars {
                    team,
                    count,
                    capacity: self.team_size,
                });
            }
        }
        agents
            .iter()
            .map(|&agent| Ok((agent, self.encode_one(agent, state)?)))
            .collect()
    }

    fn encode_one(&self, agent: AgentId, state: &GameState) -> Result<Vec<f32>, ObsError> {
        let me = state.car(agent)?;
        let team = me.team;
        let mut obs = Vec::with_capacity(self.obs_len());

        let ball = &state.ball;
        push(&mut obs, team, &ball.position, &self.position_scale());
        push(&mut obs, team, &ball.linear_velocity, &self.linear_scale());
        push(&mut obs, team, &ball.angular_velocity, &self.angular_scale());

        self.push_car(&mut obs, team, me);

        let allies: Vec<&CarState> = state
            .cars
            .iter()
            .filter(|(id, car)| **id != agent && car.team == team)
            .map(|(_, car)| car)
            .collect();
        self.push_team(&mut obs, team, &allies, self.team_size.saturating_sub(1));

        let opponents: Vec<&CarState> = state
            .cars
            .values()
            .filter(|car| car.team != team)
            .collect();
        self.push_team(&mut obs, team, &opponents, self.team_size);

        Ok(obs)
    }

    fn push_team(&self, obs: &mut Vec<f32>, viewer: Team, cars: &[&CarState], slots: usize) {
        for car in cars.iter().take(slots) {
            self.push_car(obs, viewer, car);
        }
        let padding = slots.saturating_sub(cars.len()) * CAR_OBS_LEN;
        obs.extend(std::iter::repeat_n(0.0, padding));
    }

    fn push_car(&self, obs: &mut Vec<f32>, viewer: Team, car: &CarState) {
        let p = &car.physics;
        let unit = Vec3::repeat(1.0);
        push(obs, viewer, &p.position, &self.position_scale());
        push(obs, viewer, &p.forward(), &unit);
        push(obs, viewer, &p.up(), &unit);
        push(obs, viewer, &p.linear_velocity, &self.linear_scale());
        push(obs, viewer, &p.angular_velocity, &self.angular_scale());
        let flag = |v: bool| if v { 1.0 } else { 0.0 };
        obs.extend([
            car.boost_amount / BOOST_SCALE,
            flag(car.on_ground),
            flag(car.has_flip),
            flag(car.is_demoed),
        ]);
    }

    fn position_scale(&self) -> Vec3 {
        Vec3::new(
            self.arena.side_wall_x,
            self.arena.back_net_y,
            self.arena.ceiling_z,
        )
    }

    fn linear_scale(&self) -> Vec3 {
        Vec3::repeat(self.arena.car_max_speed)
    }

    fn angular_scale(&self) -> Vec3 {
        Vec3::repeat(self.arena.car_max_ang_vel)
    }
}

/// Append `v`, seen by `viewer` and divided component-wise by `scale`.
fn push(obs: &mut Vec<f32>, viewer: Team, v: &Vec3, scale: &Vec3) {
    let v = mirror(v, viewer);
    obs.extend(v.component_div(scale).iter().copied());
}

/// Rotate `v` into `team`'s frame.
fn mirror(v: &Vec3, team: Team) -> Vec3 {
    match team {
        Team::Blue => *v,
        Team::Orange => Vec3::new(-v.x, -v.y, v.z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_test_utils::{CarBuilder, GameStateBuilder};

    const B0: AgentId = AgentId(0);
    const O0: AgentId = AgentId(1);
    const B1: AgentId = AgentId(2);

    fn encoder(team_size: usize) -> ObsEncoder {
        ObsEncoder::new(ArenaConstants::standard(), team_size)
    }

    #[test]
    fn length_is_fixed_by_team_size() {
        assert_eq!(encoder(1).obs_len(), 9 + 2 * 19);
        assert_eq!(encoder(2).obs_len(), 9 + 4 * 19);

        // 1v1 on a 2v2 encoder is padded.
        let state = GameStateBuilder::new()
            .car(B0, CarBuilder::blue())
            .car(O0, CarBuilder::orange())
            .build();
        let obs = encoder(2).encode(&state.agent_ids(), &state).unwrap();
        assert!(obs.values().all(|o| o.len() == encoder(2).obs_len()));
        // Ally slot is all zeros.
        let ally = &obs[&B0][9 + 19..9 + 38];
        assert!(ally.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn orange_sees_a_mirrored_field() {
        let state = GameStateBuilder::new()
            .ball_position(1000.0, 2000.0, 300.0)
            .ball_velocity(100.0, -200.0, 50.0)
            .car(B0, CarBuilder::blue().position(-500.0, -3000.0, 17.0))
            .car(O0, CarBuilder::orange().position(500.0, 3000.0, 17.0))
            .build();
        let obs = encoder(1).encode(&state.agent_ids(), &state).unwrap();
        let blue = &obs[&B0];
        let orange = &obs[&O0];

        // Ball position and velocity.
        assert_eq!(blue[0], -orange[0]);
        assert_eq!(blue[1], -orange[1]);
        assert_eq!(blue[2], orange[2]);
        assert_eq!(blue[4], -orange[4]);
        assert!((blue[1] - 2000.0 / 6000.0).abs() < 1e-6);

        // The cars are placed symmetrically, so both see themselves and
        // their opponent at the same relative positions.
        let close = |a: &[f32], b: &[f32]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-6);
        assert!(close(&blue[9..12], &orange[9..12]));
        assert!(close(&blue[9 + 19..9 + 22], &orange[9 + 19..9 + 22]));
        assert!(blue[10] < 0.0);
    }

    #[test]
    fn self_block_precedes_allies() {
        let state = GameStateBuilder::new()
            .car(B0, CarBuilder::blue().position(100.0, 0.0, 17.0))
            .car(O0, CarBuilder::orange())
            .car(B1, CarBuilder::blue().position(200.0, 0.0, 17.0).boost(100.0))
            .build();
        let obs = encoder(2).encode(&[B0, O0, B1], &state).unwrap();
        assert!((obs[&B0][9] - 100.0 / 4096.0).abs() < 1e-6);
        assert!((obs[&B0][9 + 19] - 200.0 / 4096.0).abs() < 1e-6);
        assert!((obs[&B1][9] - 200.0 / 4096.0).abs() < 1e-6);
        assert_eq!(obs[&B1][9 + 15], 1.0);
    }

    #[test]
    fn flags_and_boost_are_encoded() {
        let state = GameStateBuilder::new()
            .car(
                B0,
                CarBuilder::blue()
                    .boost(50.0)
                    .airborne()
                    .has_flip(true)
                    .demoed(true),
            )
            .build();
        let obs = encoder(1).encode(&[B0], &state).unwrap();
        assert_eq!(&obs[&B0][9 + 15..9 + 19], &[0.5, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn overfull_team_is_rejected() {
        let state = GameStateBuilder::new()
            .car(B0, CarBuilder::blue())
            .car(B1, CarBuilder::blue())
            .build();
        assert_eq!(
            encoder(1).encode(&[B0], &state),
            Err(ObsError::TooManyCars {
                team: Team::Blue,
                count: 2,
                capacity: 1
            })
        );
    }

    #[test]
    fn missing_car_is_reported() {
        let state = GameStateBuilder::new().car(B0, CarBuilder::blue()).build();
        assert_eq!(
            encoder(1).encode(&[B0, O0], &state),
            Err(ObsError::Snapshot(SnapshotError::MissingCar { agent: O0 }))
        );
    }
}
