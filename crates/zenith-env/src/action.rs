//! Discrete action decoding.
//!
//! Policies pick one index per agent into a [`LookupTable`] of controller
//! states. [`RepeatAction`] turns those indices into the per-tick controls
//! the transition engine consumes, holding each choice for a fixed number
//! of physics ticks.

use std::fmt;

use indexmap::IndexMap;
use zenith_core::AgentId;

/// Errors from decoding agent actions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// An action index is outside the lookup table.
    #[error("agent {agent} chose action {index}, table has {len} entries")]
    UnknownIndex {
        /// The agent.
        agent: AgentId,
        /// The out-of-range index.
        index: usize,
        /// Table length.
        len: usize,
    },

    /// A repeat count of zero would produce no controls.
    #[error("action repeat must be at least 1")]
    ZeroRepeat,
}

// ── ControllerState ────────────────────────────────────────────────

/// Controller inputs for one car for one tick.
///
/// Analog axes are in `[-1, 1]`; buttons are pressed or not.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ControllerState {
    /// Forward/backward drive.
    pub throttle: f32,
    /// Left/right steering on the ground.
    pub steer: f32,
    /// Nose up/down in the air.
    pub pitch: f32,
    /// Nose left/right in the air.
    pub yaw: f32,
    /// Roll in the air.
    pub roll: f32,
    /// Jump button.
    pub jump: bool,
    /// Boost button.
    pub boost: bool,
    /// Handbrake (powerslide, or air roll while airborne).
    pub handbrake: bool,
}

impl ControllerState {
    /// Width of the flat array form.
    pub const LEN: usize = 8;

    /// Flat form: `[throttle, steer, pitch, yaw, roll, jump, boost, handbrake]`
    /// with buttons as 0.0 or 1.0.
    pub fn to_array(&self) -> [f32; Self::LEN] {
        let b = |v: bool| if v { 1.0 } else { 0.0 };
        [
            self.throttle,
            self.steer,
            self.pitch,
            self.yaw,
            self.roll,
            b(self.jump),
            b(self.boost),
            b(self.handbrake),
        ]
    }

    /// Inverse of [`to_array`](Self::to_array); a button is pressed above 0.5.
    pub fn from_array(values: [f32; Self::LEN]) -> Self {
        Self {
            throttle: values[0],
            steer: values[1],
            pitch: values[2],
            yaw: values[3],
            roll: values[4],
            jump: values[5] > 0.5,
            boost: values[6] > 0.5,
            handbrake: values[7] > 0.5,
        }
    }
}

// ── LookupTable ────────────────────────────────────────────────────

/// Indexed set of controller states.
#[derive(Clone, PartialEq)]
pub struct LookupTable {
    entries: Vec<ControllerState>,
}

impl LookupTable {
    /// Ground entries in [`standard`](Self::standard).
    pub const GROUND_ENTRIES: usize = 24;
    /// Aerial entries in [`standard`](Self::standard).
    pub const AERIAL_ENTRIES: usize = 66;

    /// The standard 90-entry table: 24 ground entries followed by 66 aerial
    /// entries.
    ///
    /// Ground entries cover throttle × steer × boost × handbrake, with boost
    /// only at full throttle; steer doubles as yaw. Aerial entries cover
    /// pitch × yaw × roll × jump × boost, skipping jump with yaw (a side
    /// flip is expressed through roll) and the no-input combinations, with
    /// handbrake held for directional jumps.
    pub fn standard() -> Self {
        const AXIS: [f32; 3] = [-1.0, 0.0, 1.0];
        const BUTTON: [bool; 2] = [false, true];
        let mut entries = Vec::with_capacity(Self::GROUND_ENTRIES + Self::AERIAL_ENTRIES);

        for throttle in AXIS {
            for steer in AXIS {
                for boost in BUTTON {
                    for handbrake in BUTTON {
                        if boost && throttle != 1.0 {
                            continue;
                        }
                        let drive = if throttle != 0.0 {
                            throttle
                        } else if boost {
                            1.0
                        } else {
                            0.0
                        };
                        entries.push(ControllerState {
                            throttle: drive,
                            steer,
                            pitch: 0.0,
                            yaw: steer,
                            roll: 0.0,
                            jump: false,
                            boost,
                            handbrake,
                        });
                    }
                }
            }
        }

        for pitch in AXIS {
            for yaw in AXIS {
                for roll in AXIS {
                    for jump in BUTTON {
                        for boost in BUTTON {
                            if jump && yaw != 0.0 {
                                continue;
                            }
                            if pitch == 0.0 && roll == 0.0 && !jump {
                                continue;
                            }
                            let directional = pitch != 0.0 || yaw != 0.0 || roll != 0.0;
                            entries.push(ControllerState {
                                throttle: if boost { 1.0 } else { 0.0 },
                                steer: yaw,
                                pitch,
                                yaw,
                                roll,
                                jump,
                                boost,
                                handbrake: jump && directional,
                            });
                        }
                    }
                }
            }
        }

        Self { entries }
    }

    /// Build a table from explicit entries.
    pub fn from_entries(entries: Vec<ControllerState>) -> Self {
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&ControllerState> {
        self.entries.get(index)
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[ControllerState] {
        &self.entries
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

// ── RepeatAction ───────────────────────────────────────────────────

/// Decodes indices and holds each decoded control for `repeats` ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct RepeatAction {
    table: LookupTable,
    repeats: usize,
}

impl RepeatAction {
    /// Wrap `table`, holding each decoded control for `repeats` ticks.
    pub fn new(table: LookupTable, repeats: usize) -> Result<Self, ActionError> {
        if repeats == 0 {
            return Err(ActionError::ZeroRepeat);
        }
        Ok(Self { table, repeats })
    }

    /// Ticks per decoded action.
    pub fn repeats(&self) -> usize {
        self.repeats
    }

    /// The wrapped table.
    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// One control map per tick, `repeats` ticks long.
    ///
    /// Every tick carries the same controls, keyed in the order of
    /// `actions`.
    pub fn decode(
        &self,
        actions: &IndexMap<AgentId, usize>,
    ) -> Result<Vec<IndexMap<AgentId, ControllerState>>, ActionError> {
        let controls = actions
            .iter()
            .map(|(&agent, &index)| {
                self.table
                    .get(index)
                    .map(|c| (agent, *c))
                    .ok_or(ActionError::UnknownIndex {
                        agent,
                        index,
                        len: self.table.len(),
                    })
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;
        Ok(vec![controls; self.repeats])
    }
}
