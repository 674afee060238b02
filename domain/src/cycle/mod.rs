//! Interaction cycle vocabulary: sub-steps and per-agent tallies.

pub mod step;
pub mod tally;

pub use step::CycleStep;
pub use tally::CycleTally;
