//! Use cases: per-agent execution and fleet orchestration.

pub mod run_agent;
pub mod run_fleet;

pub use run_agent::RunAgent;
pub use run_fleet::RunFleet;
