//! Target page description.

use crate::validation::ConfigIssue;
use serde::{Deserialize, Serialize};

/// The page a fleet drives, and the selectors the interaction sequence
/// needs on it.
///
/// The target is fixed configuration: it ships with embedded defaults and
/// can be overridden from the config file, but it is never taken from the
/// command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSpec {
    pub url: String,
    /// Container whose presence marks the page as being in its base state.
    pub container: String,
    /// The selection control activated in the first sub-step.
    pub choice: String,
    /// The control that submits the selection.
    pub submit: String,
    /// The control that returns the page to its base state.
    pub back: String,
    /// Transient overlays dismissed before cycling starts. Best effort;
    /// selectors that never match cost one short wait each at startup.
    pub dismiss: Vec<String>,
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            url: "http://localhost:8350/demo/survey".to_string(),
            container: "form.survey-form".to_string(),
            choice: "input.survey-option".to_string(),
            submit: "button.survey-submit".to_string(),
            back: "a.survey-restart".to_string(),
            dismiss: vec![
                ".cookie-banner .accept".to_string(),
                ".modal-overlay .close".to_string(),
            ],
        }
    }
}

impl TargetSpec {
    /// Structural validation; selectors are not parsed, only checked for
    /// presence.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let required = [
            ("target.url", &self.url),
            ("target.container", &self.container),
            ("target.choice", &self.choice),
            ("target.submit", &self.submit),
            ("target.back", &self.back),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::error(field, "must not be empty"));
            }
        }
        if !self.url.trim().is_empty()
            && !self.url.starts_with("http://")
            && !self.url.starts_with("https://")
        {
            issues.push(ConfigIssue::error("target.url", "must be an http(s) URL"));
        }
        issues
    }
}
