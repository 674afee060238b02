//! Agent identity and resource partitioning.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single agent within a fleet.
///
/// Ids are assigned densely from 1 and partition every per-agent resource:
/// the browser profile directory, the browser debug port, and the driver
/// control port. Two agents with distinct ids can never collide on any of
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(u32);

impl AgentId {
    /// Create an id. Callers assign ids densely starting at 1; see
    /// [`FleetSize::agent_ids`](crate::fleet::FleetSize::agent_ids).
    pub fn new(value: u32) -> Self {
        debug_assert!(value >= 1, "agent ids start at 1");
        Self(value)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Port reserved for this agent on top of a base port.
    ///
    /// Distinct ids yield distinct ports for the same base, which is the
    /// whole isolation story for network resources.
    pub fn offset_port(&self, base: u16) -> u16 {
        base + self.0 as u16
    }

    /// Directory name for this agent's isolated browser profile.
    pub fn profile_dir_name(&self) -> String {
        format!("roundtrip-profile-{}", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_port_is_base_plus_id() {
        assert_eq!(AgentId::new(1).offset_port(9222), 9223);
        assert_eq!(AgentId::new(8).offset_port(9222), 9230);
    }

    #[test]
    fn profile_dir_name_embeds_id() {
        assert_eq!(AgentId::new(4).profile_dir_name(), "roundtrip-profile-4");
    }

    #[test]
    fn distinct_ids_give_distinct_ports() {
        let ports: Vec<u16> = (1..=8).map(|i| AgentId::new(i).offset_port(9515)).collect();
        let mut deduped = ports.clone();
        deduped.dedup();
        assert_eq!(ports, deduped);
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&AgentId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
