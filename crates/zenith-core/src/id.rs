//! Strongly-typed agent and team identifiers.

use indexmap::IndexMap;
use std::fmt;

/// Identifies one controlled car within an episode.
///
/// Agent sets may differ between episodes (variable team size), so an
/// `AgentId` is only meaningful together with the snapshot it indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Side a car plays for.
///
/// Blue defends the negative-y goal, orange the positive-y goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Team {
    /// Team 0, defends `-y`.
    Blue = 0,
    /// Team 1, defends `+y`.
    Orange = 1,
}

impl Team {
    /// Whether this is the orange team.
    pub fn is_orange(self) -> bool {
        self == Team::Orange
    }

    /// The other team.
    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Orange,
            Team::Orange => Team::Blue,
        }
    }

    /// Sign of the y axis pointing at the goal this team attacks.
    pub fn attack_sign(self) -> f32 {
        match self {
            Team::Blue => 1.0,
            Team::Orange => -1.0,
        }
    }

    /// Numeric team index (0 = blue, 1 = orange).
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Team {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Team::Blue),
            1 => Ok(Team::Orange),
            other => Err(other),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Blue => write!(f, "blue"),
            Team::Orange => write!(f, "orange"),
        }
    }
}

/// Per-agent boolean flags (termination or truncation), one entry per agent.
pub type AgentFlags = IndexMap<AgentId, bool>;
