//! Detector trait, step context, and reward combiner for Zenith.
//!
//! A [`Detector`] is a small stateful classifier that recognises one
//! maneuver from the snapshot stream. The [`RewardCombiner`] owns an ordered
//! list of `(detector, weight)` pairs, dispatches every validated
//! [`StepContext`] to each detector in turn, enforces the per-agent output
//! contract, and reduces the outputs into one weighted scalar per agent.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod combiner;
pub mod context;
pub mod detector;
pub mod metrics;

pub use combiner::{CombinedRewards, CombinerError, RewardCombiner, RewardError};
pub use context::StepContext;
pub use detector::{AgentRewards, Detector};
pub use metrics::{DetectorTally, EpisodeTally};
