//! Domain layer for roundtrip
//!
//! Core values and rules for running a fleet of concurrent page-interaction
//! agents: agent identity and resource partitioning, the agent lifecycle,
//! cycle accounting, fleet sizing, and aggregate reporting. This crate has
//! no dependencies on infrastructure or presentation concerns and does no
//! I/O.
//!
//! # Core Concepts
//!
//! - **Agent**: one independent worker driving one isolated browser session
//!   through repeated interaction cycles.
//! - **Cycle**: one attempt of the three-step sequence
//!   (activate -> submit -> return). All three must succeed, in order, for
//!   the cycle to count.
//! - **Fleet**: the bounded group of agents (1-8) run concurrently for one
//!   invocation, aggregated into a single report at the end.
//! - **Session**: an isolated browser context with its own profile
//!   directory and ports, derived from the agent id.

pub mod agent;
pub mod cycle;
pub mod error;
pub mod fleet;
pub mod session;
pub mod target;
pub mod validation;

// Re-export commonly used types
pub use agent::{AgentId, AgentPhase};
pub use cycle::{CycleStep, CycleTally};
pub use error::DomainError;
pub use fleet::{AgentReport, AgentStatus, FleetReport, FleetSize};
pub use session::{SessionProfile, WindowSize};
pub use target::TargetSpec;
pub use validation::{ConfigIssue, Severity, has_errors};
