//! Fleet sizing and aggregate reporting.

pub mod report;
pub mod size;

pub use report::{AgentReport, AgentStatus, FleetReport};
pub use size::FleetSize;
