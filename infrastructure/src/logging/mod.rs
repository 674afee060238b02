//! Logging infrastructure for structured run events.
//!
//! Provides [`JsonlEventLog`], a JSONL file writer that implements the
//! [`EventLog`](roundtrip_application::ports::EventLog) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlEventLog;
