//! Port for structured run-event logging.
//!
//! This is separate from `tracing`-based diagnostics: tracing handles
//! human-readable messages, while this port captures the run as
//! machine-readable records (one JSON object per event).

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A structured run event.
///
/// Each event has a type string, a UTC timestamp, and a JSON payload with
/// event-specific fields.
pub struct RunEvent {
    /// Event type identifier (e.g. "cycle_completed", "agent_stopped").
    pub event_type: &'static str,
    /// When the event happened.
    pub at: DateTime<Utc>,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl RunEvent {
    /// Create a new event stamped with the current UTC time.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            at: Utc::now(),
            payload,
        }
    }
}

/// Port for recording run events to a structured log.
///
/// The `log` method is intentionally synchronous and non-fallible: losing
/// a log record must never disturb a running agent.
pub trait EventLog: Send + Sync {
    /// Record one event.
    fn log(&self, event: RunEvent);
}

/// No-op implementation for tests and when event logging is disabled.
pub struct NoEventLog;

impl EventLog for NoEventLog {
    fn log(&self, _event: RunEvent) {}
}
