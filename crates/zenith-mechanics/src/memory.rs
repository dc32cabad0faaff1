//! Per-agent detector memory.

use indexmap::IndexMap;
use zenith_core::AgentId;

/// One private state record per agent, rebuilt at every reset.
///
/// Lookups for an agent that was not part of the reset set create a fresh
/// default record instead of failing, so a detector stepped standalone
/// still returns a value for every agent it is asked about.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentMemory<S> {
    slots: IndexMap<AgentId, S>,
}

impl<S> AgentMemory<S> {
    /// Empty memory.
    pub fn new() -> Self {
        Self {
            slots: IndexMap::new(),
        }
    }

    /// Drop every record and create one per agent with `init`.
    pub fn reset(&mut self, agents: &[AgentId], mut init: impl FnMut(AgentId) -> S) {
        self.slots.clear();
        for &agent in agents {
            self.slots.insert(agent, init(agent));
        }
    }

    /// Read-only view of one agent's record.
    pub fn get(&self, agent: AgentId) -> Option<&S> {
        self.slots.get(&agent)
    }

    /// Number of agents with a record.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no agent has a record.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<S: Default> AgentMemory<S> {
    /// Mutable record for `agent`, created on first use.
    pub fn slot(&mut self, agent: AgentId) -> &mut S {
        self.slots.entry(agent).or_default()
    }
}

impl<S> Default for AgentMemory<S> {
    fn default() -> Self {
        Self::new()
    }
}
