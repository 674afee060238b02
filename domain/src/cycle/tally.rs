//! Per-agent cycle accounting.

use serde::{Deserialize, Serialize};

/// Counters for one agent's cycles.
///
/// `completed` grows by exactly one for each cycle whose three sub-steps all
/// succeeded in order; `failed` by exactly one for each cycle that broke at
/// any sub-step. Only the owning agent ever writes a tally; everyone else
/// sees copies (task return values or snapshots).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTally {
    pub completed: u64,
    pub failed: u64,
}

impl CycleTally {
    pub fn record_completed(&mut self) {
        self.completed += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    /// Total cycles attempted, successful or not.
    pub fn attempts(&self) -> u64 {
        self.completed + self.failed
    }
}
