//! Domain error types.

use thiserror::Error;

/// Errors produced by domain-level rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An agent attempted a lifecycle transition that is not allowed.
    #[error("invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_formats_both_phases() {
        let err = DomainError::InvalidTransition {
            from: "stopped".to_string(),
            to: "cycling".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid phase transition: stopped -> cycling"
        );
    }
}
