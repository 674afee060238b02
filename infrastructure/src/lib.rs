//! Infrastructure layer for roundtrip
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod webdriver;

// Re-export commonly used types
pub use config::{BROWSER_ENV_VAR, ConfigLoader, FileConfig};
pub use logging::JsonlEventLog;
pub use webdriver::{WebDriverError, WebDriverGateway};
