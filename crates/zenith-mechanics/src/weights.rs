//! Static reward weights and the combiner factory.
//!
//! The table is plain data: changing a weight never touches detector code.
//! It is read once at environment construction and is immutable afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zenith_core::ArenaConstants;
use zenith_reward::{CombinerError, RewardCombiner};

use crate::registry::MechanicKind;

/// Errors from validating a weight table or building a combiner from it.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WeightError {
    /// The table has no entry for a mechanic.
    #[error("no weight configured for mechanic '{kind}'")]
    MissingWeight {
        /// The unconfigured mechanic.
        kind: MechanicKind,
    },

    /// A weight is NaN, infinite, or negative.
    #[error("mechanic '{kind}' has weight {weight} (must be finite and non-negative)")]
    InvalidWeight {
        /// Which mechanic.
        kind: MechanicKind,
        /// The rejected weight.
        weight: f32,
    },

    /// The combiner rejected the detector list.
    #[error(transparent)]
    Combiner(#[from] CombinerError),
}

/// Mechanic → weight mapping.
///
/// Deserialises from a flat table keyed by mechanic name. Unknown names are
/// rejected by the key type; missing names are caught by
/// [`validate`](Self::validate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    weights: IndexMap<MechanicKind, f32>,
}

impl WeightTable {
    /// Every mechanic at its [`default_weight`](MechanicKind::default_weight).
    pub fn standard() -> Self {
        Self {
            weights: MechanicKind::ALL
                .iter()
                .map(|&k| (k, k.default_weight()))
                .collect(),
        }
    }

    /// Weight for `kind`, if configured.
    pub fn get(&self, kind: MechanicKind) -> Option<f32> {
        self.weights.get(&kind).copied()
    }

    /// Replace one weight, returning the table for chaining.
    pub fn with_weight(mut self, kind: MechanicKind, weight: f32) -> Self {
        self.weights.insert(kind, weight);
        self
    }

    /// Drop the entry for `kind`.
    pub fn without(mut self, kind: MechanicKind) -> Self {
        self.weights.shift_remove(&kind);
        self
    }

    /// Configured `(kind, weight)` pairs, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (MechanicKind, f32)> + '_ {
        self.weights.iter().map(|(&k, &w)| (k, w))
    }

    /// Check that every mechanic has a finite, non-negative weight.
    pub fn validate(&self) -> Result<(), WeightError> {
        for kind in MechanicKind::ALL {
            let weight = self.get(kind).ok_or(WeightError::MissingWeight { kind })?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(WeightError::InvalidWeight { kind, weight });
            }
        }
        Ok(())
    }

    /// Build every detector in canonical order with its configured weight.
    pub fn build_combiner(&self, arena: ArenaConstants) -> Result<RewardCombiner, WeightError> {
        self.validate()?;
        let detectors = MechanicKind::ALL
            .iter()
            .map(|&kind| {
                let weight = self.get(kind).ok_or(WeightError::MissingWeight { kind })?;
                Ok((kind.build(arena), weight))
            })
            .collect::<Result<Vec<_>, WeightError>>()?;
        let combiner = RewardCombiner::new(detectors)?;
        debug!(mechanics = combiner.len(), "mechanic combiner built");
        Ok(combiner)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::standard()
    }
}
