//! Configuration validation primitives.
//!
//! Validators return structured issues instead of failing on the first
//! problem, so the caller can log every warning and refuse to start only
//! when something is actually fatal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// A detected configuration issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Config key the issue refers to, e.g. `target.url`.
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

/// Whether any issue in `issues` is fatal.
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(ConfigIssue::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_severity_and_field() {
        let issue = ConfigIssue::error("target.url", "must not be empty");
        assert_eq!(issue.to_string(), "[error] target.url: must not be empty");
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let warnings = vec![ConfigIssue::warning("instances", "clamped to 8")];
        assert!(!has_errors(&warnings));

        let mixed = vec![
            ConfigIssue::warning("instances", "clamped to 8"),
            ConfigIssue::error("target.url", "must not be empty"),
        ];
        assert!(has_errors(&mixed));
    }
}
