//! Agent identity and lifecycle.

pub mod id;
pub mod phase;

pub use id::AgentId;
pub use phase::AgentPhase;
