//! Run outcome reporting.
//!
//! A [`FleetReport`] is assembled exactly once, after every agent worker has
//! returned (or been given up on). Totals are sums over per-agent tallies;
//! the per-agent breakdown stays visible so degraded runs are observable.

use crate::agent::AgentId;
use crate::cycle::CycleTally;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How one agent's run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Ran until cancellation and shut down cleanly.
    Stopped,
    /// Session acquisition failed; the agent never ran a cycle.
    SetupFailed,
    /// Initial navigation or readiness confirmation failed.
    NavigationFailed,
    /// The worker panicked; the tally is the last published snapshot.
    Crashed,
    /// Still busy when the shutdown grace window expired; forcibly stopped.
    /// The tally is the last published snapshot.
    Aborted,
}

impl AgentStatus {
    /// True only for a clean, cancellation-driven stop.
    pub fn is_clean(self) -> bool {
        matches!(self, AgentStatus::Stopped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Stopped => "stopped",
            AgentStatus::SetupFailed => "setup failed",
            AgentStatus::NavigationFailed => "navigation failed",
            AgentStatus::Crashed => "crashed",
            AgentStatus::Aborted => "aborted",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one agent's run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReport {
    pub id: AgentId,
    pub tally: CycleTally,
    pub status: AgentStatus,
}

impl AgentReport {
    pub fn new(id: AgentId, tally: CycleTally, status: AgentStatus) -> Self {
        Self { id, tally, status }
    }

    /// Report for an agent that never got past session setup.
    pub fn setup_failed(id: AgentId) -> Self {
        Self::new(id, CycleTally::default(), AgentStatus::SetupFailed)
    }
}

/// Aggregate outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetReport {
    pub agents: Vec<AgentReport>,
}

impl FleetReport {
    /// Assemble from per-agent reports, ordered by agent id.
    pub fn from_agents(mut agents: Vec<AgentReport>) -> Self {
        agents.sort_by_key(|report| report.id);
        Self { agents }
    }

    pub fn total_completed(&self) -> u64 {
        self.agents.iter().map(|report| report.tally.completed).sum()
    }

    pub fn total_failed(&self) -> u64 {
        self.agents.iter().map(|report| report.tally.failed).sum()
    }

    /// Agents that stopped cleanly.
    pub fn clean_stops(&self) -> usize {
        self.agents.iter().filter(|report| report.status.is_clean()).count()
    }
}
