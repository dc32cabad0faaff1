//! Maneuver detectors for the Zenith reward engine.
//!
//! Each detector recognises one skill maneuver from the snapshot stream and
//! owns private per-agent memory. Detectors are grouped by family:
//!
//! | Module | Detectors |
//! |--------|-----------|
//! | [`fundamentals`] | [`VelocityPlayerToBall`], [`FaceBall`], [`VelocityBallToGoal`] |
//! | [`powershot`] | [`Powershot`], [`Backboard`] |
//! | [`dribble`] | [`AdvancedDribbling`], [`BounceDribble`], [`AirDribble`] |
//! | [`aerial`] | [`FastAerial`], [`FlipReset`], [`MustyAerial`], [`HeliReset`], [`DoubleTap`] |
//! | [`ceiling`] | [`CeilingShot`], [`CeilingShuffle`] |
//! | [`recovery`] | [`Wavedash`], [`ChainDash`], [`HalfFlip`], [`FlipCancel`] |
//! | [`technical`] | [`Redirect`], [`Pinch`], [`ShadowDefense`] |
//! | [`special`] | [`Turtle`], [`Stall`] |
//! | [`goal`] | [`Goal`] |
//!
//! [`MechanicKind`] enumerates the closed set in canonical combiner order,
//! and [`WeightTable`] maps every kind to its static weight.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aerial;
pub mod ceiling;
pub mod dribble;
pub mod fundamentals;
pub mod goal;
pub mod memory;
pub mod powershot;
pub mod recovery;
pub mod registry;
pub mod special;
pub mod technical;
pub mod touch;
pub mod weights;

pub use aerial::{DoubleTap, FastAerial, FlipReset, HeliReset, MustyAerial};
pub use ceiling::{CeilingShot, CeilingShuffle};
pub use dribble::{AdvancedDribbling, AirDribble, BounceDribble};
pub use fundamentals::{FaceBall, VelocityBallToGoal, VelocityPlayerToBall};
pub use goal::Goal;
pub use memory::AgentMemory;
pub use powershot::{Backboard, Powershot};
pub use recovery::{ChainDash, FlipCancel, HalfFlip, Wavedash};
pub use registry::MechanicKind;
pub use special::{Stall, Turtle};
pub use technical::{Pinch, Redirect, ShadowDefense};
pub use touch::TouchTracker;
pub use weights::{WeightError, WeightTable};
