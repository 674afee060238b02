//! Fleet sizing.

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of agents in a fleet.
///
/// Requests outside `1..=8` are clamped rather than rejected, so a size is
/// always valid once constructed. Eight is a deliberate ceiling: each agent
/// owns a full browser session, and the per-session memory cost makes larger
/// fleets counterproductive on a single host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct FleetSize(u32);

impl FleetSize {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 8;
    pub const DEFAULT: u32 = 3;

    /// Clamp `requested` into the supported range.
    pub fn new(requested: u32) -> Self {
        Self(requested.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Whether constructing from `requested` would change the value.
    pub fn clamps(requested: u32) -> bool {
        !(Self::MIN..=Self::MAX).contains(&requested)
    }

    /// Dense agent ids for this size: `1..=n`.
    pub fn agent_ids(self) -> impl Iterator<Item = AgentId> {
        (1..=self.0).map(AgentId::new)
    }
}

impl Default for FleetSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<u32> for FleetSize {
    fn from(requested: u32) -> Self {
        Self::new(requested)
    }
}

impl From<FleetSize> for u32 {
    fn from(size: FleetSize) -> Self {
        size.0
    }
}

impl fmt::Display for FleetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
