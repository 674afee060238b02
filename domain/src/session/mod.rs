//! Session isolation values.

pub mod profile;

pub use profile::{SessionProfile, WindowSize};
