//! The three ordered sub-steps of an interaction cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One sub-step of a cycle, in execution order.
///
/// A cycle succeeds only if all three succeed in order; the first failure
/// aborts the cycle and later steps are not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStep {
    /// Locate and activate the selection control.
    Activate,
    /// Submit the selection.
    Submit,
    /// Return the page to its base state.
    Return,
}

impl CycleStep {
    /// All steps, in execution order.
    pub const ALL: [CycleStep; 3] = [CycleStep::Activate, CycleStep::Submit, CycleStep::Return];

    pub fn as_str(self) -> &'static str {
        match self {
            CycleStep::Activate => "activate",
            CycleStep::Submit => "submit",
            CycleStep::Return => "return",
        }
    }
}

impl fmt::Display for CycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_activate_submit_return() {
        assert_eq!(
            CycleStep::ALL,
            [CycleStep::Activate, CycleStep::Submit, CycleStep::Return]
        );
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&CycleStep::Activate).unwrap(), "\"activate\"");
        let step: CycleStep = serde_json::from_str("\"return\"").unwrap();
        assert_eq!(step, CycleStep::Return);
    }
}
