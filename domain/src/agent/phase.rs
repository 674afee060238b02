//! Agent lifecycle phases.
//!
//! An agent moves through `Uninitialized -> SessionReady -> OnTarget ->
//! Cycling -> Stopped`. `Stopped` is additionally reachable from every
//! non-terminal phase, because setup and navigation failures terminate an
//! agent without it ever cycling.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    /// No session yet.
    Uninitialized,
    /// Isolated session acquired, target not loaded.
    SessionReady,
    /// Target page loaded and confirmed; ready to cycle.
    OnTarget,
    /// Running the interaction cycle loop.
    Cycling,
    /// Terminal. Session released (if one was ever acquired).
    Stopped,
}

impl AgentPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, AgentPhase::Stopped)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Forward progress is strictly ordered; `Stopped` is reachable from
    /// any non-terminal phase.
    pub fn can_advance_to(self, next: AgentPhase) -> bool {
        use AgentPhase::*;
        match (self, next) {
            (Uninitialized, SessionReady) | (SessionReady, OnTarget) | (OnTarget, Cycling) => true,
            (from, Stopped) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Checked transition.
    pub fn advance_to(self, next: AgentPhase) -> Result<AgentPhase, DomainError> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentPhase::Uninitialized => "uninitialized",
            AgentPhase::SessionReady => "session_ready",
            AgentPhase::OnTarget => "on_target",
            AgentPhase::Cycling => "cycling",
            AgentPhase::Stopped => "stopped",
        }
    }
}

impl fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
