//! Fleet progress port.
//!
//! Implementations live in the presentation layer (progress bars, plain
//! console lines). Callbacks carry value snapshots only; an observer
//! never gets a reference into an agent's live state.

use roundtrip_domain::{AgentId, AgentStatus, CycleStep, CycleTally, FleetSize};

/// Callbacks for fleet and agent progress.
pub trait FleetObserver: Send + Sync {
    /// Called once, before any agent is spawned.
    fn on_fleet_start(&self, size: FleetSize);

    /// Called when an agent's worker begins running.
    fn on_agent_start(&self, id: AgentId);

    /// Called when an agent has reached the target page and is about to
    /// start cycling.
    fn on_agent_on_target(&self, _id: AgentId) {}

    /// Called after each successful cycle, with the tally so far.
    fn on_cycle_complete(&self, id: AgentId, tally: CycleTally);

    /// Called after each failed cycle, with the failing step and the
    /// tally so far.
    fn on_cycle_fail(&self, id: AgentId, step: CycleStep, tally: CycleTally);

    /// Called when an agent reaches its terminal state.
    fn on_agent_stop(&self, id: AgentId, status: AgentStatus, tally: CycleTally);
}

/// No-op observer for quiet mode and tests.
pub struct NoObserver;

impl FleetObserver for NoObserver {
    fn on_fleet_start(&self, _size: FleetSize) {}
    fn on_agent_start(&self, _id: AgentId) {}
    fn on_cycle_complete(&self, _id: AgentId, _tally: CycleTally) {}
    fn on_cycle_fail(&self, _id: AgentId, _step: CycleStep, _tally: CycleTally) {}
    fn on_agent_stop(&self, _id: AgentId, _status: AgentStatus, _tally: CycleTally) {}
}
