//! Per-episode reward tallies.
//!
//! [`EpisodeTally`] accumulates, for every detector, how often it fired and
//! how much raw and weighted reward it paid out. The combiner logs the tally
//! when the next episode starts and then clears it.

use indexmap::IndexMap;

/// Accumulated output of one detector over an episode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectorTally {
    /// Number of `(step, agent)` pairs with a non-zero reward.
    pub fires: u64,
    /// Sum of unweighted rewards across all agents and steps.
    pub raw_sum: f64,
    /// Sum of weighted rewards across all agents and steps.
    pub weighted_sum: f64,
}

/// Tallies for every detector in a combiner, plus the step count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpisodeTally {
    steps: u64,
    detectors: IndexMap<String, DetectorTally>,
}

impl EpisodeTally {
    /// Create an empty tally with one slot per detector name, in order.
    pub fn new<'n>(names: impl IntoIterator<Item = &'n str>) -> Self {
        Self {
            steps: 0,
            detectors: names
                .into_iter()
                .map(|n| (n.to_string(), DetectorTally::default()))
                .collect(),
        }
    }

    /// Steps recorded since the last clear.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Tally for the detector at `index` in combiner order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &DetectorTally)> {
        self.detectors
            .get_index(index)
            .map(|(name, tally)| (name.as_str(), tally))
    }

    /// Tally for a detector by name.
    pub fn get(&self, name: &str) -> Option<&DetectorTally> {
        self.detectors.get(name)
    }

    /// All tallies, in combiner order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DetectorTally)> {
        self.detectors.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Sum of weighted rewards across every detector.
    pub fn weighted_total(&self) -> f64 {
        self.detectors.values().map(|t| t.weighted_sum).sum()
    }

    pub(crate) fn record_step(&mut self) {
        self.steps += 1;
    }

    pub(crate) fn record(&mut self, index: usize, raw: f32, weight: f32) {
        if let Some((_, tally)) = self.detectors.get_index_mut(index) {
            if raw != 0.0 {
                tally.fires += 1;
            }
            tally.raw_sum += f64::from(raw);
            tally.weighted_sum += f64::from(raw) * f64::from(weight);
        }
    }

    /// Zero every counter, keeping the detector slots.
    pub fn clear(&mut self) {
        self.steps = 0;
        for tally in self.detectors.values_mut() {
            *tally = DetectorTally::default();
        }
    }
}
