//! The closed set of mechanics and their canonical order.

use std::fmt;

use serde::{Deserialize, Serialize};
use zenith_core::ArenaConstants;
use zenith_reward::Detector;

use crate::aerial::{DoubleTap, FastAerial, FlipReset, HeliReset, MustyAerial};
use crate::ceiling::{CeilingShot, CeilingShuffle};
use crate::dribble::{AdvancedDribbling, AirDribble, BounceDribble};
use crate::fundamentals::{FaceBall, VelocityBallToGoal, VelocityPlayerToBall};
use crate::goal::Goal;
use crate::powershot::{Backboard, Powershot};
use crate::recovery::{ChainDash, FlipCancel, HalfFlip, Wavedash};
use crate::special::{Stall, Turtle};
use crate::technical::{Pinch, Redirect, ShadowDefense};

/// One recognised mechanic.
///
/// Serialises as the snake_case detector name, which is also the key used
/// in the `[weights]` configuration table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanicKind {
    /// [`VelocityPlayerToBall`]
    VelocityPlayerToBall,
    /// [`FaceBall`]
    FaceBall,
    /// [`VelocityBallToGoal`]
    VelocityBallToGoal,
    /// [`Powershot`]
    Powershot,
    /// [`Backboard`]
    Backboard,
    /// [`AdvancedDribbling`]
    AdvancedDribbling,
    /// [`BounceDribble`]
    BounceDribble,
    /// [`AirDribble`]
    AirDribble,
    /// [`FastAerial`]
    FastAerial,
    /// [`FlipReset`]
    FlipReset,
    /// [`MustyAerial`]
    MustyAerial,
    /// [`HeliReset`]
    HeliReset,
    /// [`CeilingShot`]
    CeilingShot,
    /// [`DoubleTap`]
    DoubleTap,
    /// [`Wavedash`]
    Wavedash,
    /// [`ChainDash`]
    ChainDash,
    /// [`HalfFlip`]
    HalfFlip,
    /// [`Redirect`]
    Redirect,
    /// [`Pinch`]
    Pinch,
    /// [`ShadowDefense`]
    ShadowDefense,
    /// [`FlipCancel`]
    FlipCancel,
    /// [`Turtle`]
    Turtle,
    /// [`Stall`]
    Stall,
    /// [`CeilingShuffle`]
    CeilingShuffle,
    /// [`Goal`]
    Goal,
}

impl MechanicKind {
    /// Every mechanic, in canonical combiner order.
    pub const ALL: [MechanicKind; 25] = [
        Self::VelocityPlayerToBall,
        Self::FaceBall,
        Self::VelocityBallToGoal,
        Self::Powershot,
        Self::Backboard,
        Self::AdvancedDribbling,
        Self::BounceDribble,
        Self::AirDribble,
        Self::FastAerial,
        Self::FlipReset,
        Self::MustyAerial,
        Self::HeliReset,
        Self::CeilingShot,
        Self::DoubleTap,
        Self::Wavedash,
        Self::ChainDash,
        Self::HalfFlip,
        Self::Redirect,
        Self::Pinch,
        Self::ShadowDefense,
        Self::FlipCancel,
        Self::Turtle,
        Self::Stall,
        Self::CeilingShuffle,
        Self::Goal,
    ];

    /// Detector name; matches [`Detector::name`] of the built detector.
    pub const fn name(self) -> &'static str {
        match self {
            Self::VelocityPlayerToBall => "velocity_player_to_ball",
            Self::FaceBall => "face_ball",
            Self::VelocityBallToGoal => "velocity_ball_to_goal",
            Self::Powershot => "powershot",
            Self::Backboard => "backboard",
            Self::AdvancedDribbling => "advanced_dribbling",
            Self::BounceDribble => "bounce_dribble",
            Self::AirDribble => "air_dribble",
            Self::FastAerial => "fast_aerial",
            Self::FlipReset => "flip_reset",
            Self::MustyAerial => "musty_aerial",
            Self::HeliReset => "heli_reset",
            Self::CeilingShot => "ceiling_shot",
            Self::DoubleTap => "double_tap",
            Self::Wavedash => "wavedash",
            Self::ChainDash => "chain_dash",
            Self::HalfFlip => "half_flip",
            Self::Redirect => "redirect",
            Self::Pinch => "pinch",
            Self::ShadowDefense => "shadow_defense",
            Self::FlipCancel => "flip_cancel",
            Self::Turtle => "turtle",
            Self::Stall => "stall",
            Self::CeilingShuffle => "ceiling_shuffle",
            Self::Goal => "goal",
        }
    }

    /// Weight in the standard table.
    pub const fn default_weight(self) -> f32 {
        match self {
            Self::VelocityPlayerToBall => 0.2,
            Self::FaceBall => 0.3,
            Self::VelocityBallToGoal => 6.0,
            Self::Powershot => 12.0,
            Self::Backboard => 10.0,
            Self::AdvancedDribbling => 15.0,
            Self::BounceDribble => 6.0,
            Self::AirDribble => 14.0,
            Self::FastAerial => 5.0,
            Self::FlipReset => 20.0,
            Self::MustyAerial => 18.0,
            Self::HeliReset => 25.0,
            Self::CeilingShot => 15.0,
            Self::DoubleTap => 18.0,
            Self::Wavedash => 5.0,
            Self::ChainDash => 8.0,
            Self::HalfFlip => 8.0,
            Self::Redirect => 12.0,
            Self::Pinch => 15.0,
            Self::ShadowDefense => 4.0,
            Self::FlipCancel => 7.0,
            Self::Turtle => 10.0,
            Self::Stall => 8.0,
            Self::CeilingShuffle => 6.0,
            Self::Goal => 30.0,
        }
    }

    /// Build a fresh detector for this mechanic.
    pub fn build(self, arena: ArenaConstants) -> Box<dyn Detector> {
        match self {
            Self::VelocityPlayerToBall => Box::new(VelocityPlayerToBall::new(arena)),
            Self::FaceBall => Box::new(FaceBall::new()),
            Self::VelocityBallToGoal => Box::new(VelocityBallToGoal::new(arena)),
            Self::Powershot => Box::new(Powershot::new()),
            Self::Backboard => Box::new(Backboard::new(arena)),
            Self::AdvancedDribbling => Box::new(AdvancedDribbling::new()),
            Self::BounceDribble => Box::new(BounceDribble::new()),
            Self::AirDribble => Box::new(AirDribble::new()),
            Self::FastAerial => Box::new(FastAerial::new()),
            Self::FlipReset => Box::new(FlipReset::new()),
            Self::MustyAerial => Box::new(MustyAerial::new()),
            Self::HeliReset => Box::new(HeliReset::new()),
            Self::CeilingShot => Box::new(CeilingShot::new()),
            Self::DoubleTap => Box::new(DoubleTap::new()),
            Self::Wavedash => Box::new(Wavedash::new()),
            Self::ChainDash => Box::new(ChainDash::new()),
            Self::HalfFlip => Box::new(HalfFlip::new()),
            Self::Redirect => Box::new(Redirect::new(arena)),
            Self::Pinch => Box::new(Pinch::new()),
            Self::ShadowDefense => Box::new(ShadowDefense::new(arena)),
            Self::FlipCancel => Box::new(FlipCancel::new()),
            Self::Turtle => Box::new(Turtle::new()),
            Self::Stall => Box::new(Stall::new()),
            Self::CeilingShuffle => Box::new(CeilingShuffle::new()),
            Self::Goal => Box::new(Goal::new()),
        }
    }
}

impl fmt::Display for MechanicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
