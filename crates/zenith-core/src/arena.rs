//! Field dimensions and normalisation limits.
//!
//! [`ArenaConstants`] is built once at environment construction and copied
//! into every detector that needs it. Nothing reads these values from global
//! state, so tests can run detectors against synthetic field dimensions.

use serde::Deserialize;

use crate::error::ArenaError;
use crate::id::Team;
use crate::math::Vec3;

/// Immutable arena geometry and speed limits.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArenaConstants {
    /// Distance from centre to either side wall along x. Default: 4096.
    pub side_wall_x: f32,
    /// Distance from centre to either back wall along y. Default: 5120.
    pub back_wall_y: f32,
    /// Distance from centre to the back of either net along y. Default: 6000.
    pub back_net_y: f32,
    /// Ceiling height. Default: 2044.
    pub ceiling_z: f32,
    /// Height of the point aimed at inside each goal. Default: 100.
    pub goal_target_z: f32,
    /// Car speed cap used for normalisation. Default: 2300.
    pub car_max_speed: f32,
    /// Ball speed cap used for normalisation. Default: 6000.
    pub ball_max_speed: f32,
    /// Car angular speed cap used for normalisation. Default: 5.5.
    pub car_max_ang_vel: f32,
}

impl ArenaConstants {
    /// Standard soccar arena.
    pub const fn standard() -> Self {
        Self {
            side_wall_x: 4096.0,
            back_wall_y: 5120.0,
            back_net_y: 6000.0,
            ceiling_z: 2044.0,
            goal_target_z: 100.0,
            car_max_speed: 2300.0,
            ball_max_speed: 6000.0,
            car_max_ang_vel: 5.5,
        }
    }

    /// Target point inside the goal `team` attacks.
    pub fn opponent_goal(&self, team: Team) -> Vec3 {
        Vec3::new(0.0, team.attack_sign() * self.back_net_y, self.goal_target_z)
    }

    /// Target point inside the goal `team` defends.
    pub fn own_goal(&self, team: Team) -> Vec3 {
        Vec3::new(0.0, -team.attack_sign() * self.back_net_y, self.goal_target_z)
    }

    /// Check that every dimension and limit is finite and positive.
    pub fn validate(&self) -> Result<(), ArenaError> {
        let checks = [
            ("side_wall_x", self.side_wall_x),
            ("back_wall_y", self.back_wall_y),
            ("back_net_y", self.back_net_y),
            ("ceiling_z", self.ceiling_z),
            ("car_max_speed", self.car_max_speed),
            ("ball_max_speed", self.ball_max_speed),
            ("car_max_ang_vel", self.car_max_ang_vel),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(ArenaError::NotPositive { name, value });
            }
        }
        if !self.goal_target_z.is_finite() {
            return Err(ArenaError::NotFinite {
                name: "goal_target_z",
                value: self.goal_target_z,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConstants {
    fn default() -> Self {
        Self::standard()
    }
}
