//! Application layer for roundtrip
//!
//! Use cases and ports. [`RunAgent`] owns the per-agent lifecycle and the
//! cycle-retry loop; [`RunFleet`] spawns one worker per agent, joins them,
//! and aggregates the outcome. The ports describe everything the use cases
//! need from the outside world: page driving, time, progress reporting,
//! and structured event logging.
//!
//! Nothing in this crate talks to a real browser or the filesystem; those
//! concerns live behind the ports and are wired up by the binary.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::FleetParams;
pub use ports::{
    Clock, DriverError, ElementHandle, EventLog, FleetObserver, NoEventLog, NoObserver,
    PageDriver, PageSession, RunEvent, SystemClock,
};
pub use use_cases::{RunAgent, RunFleet};
