//! Configuration adapters
//!
//! TOML file structure plus the multi-source loader.

pub mod file_config;
pub mod loader;

pub use file_config::{
    FileConfig, FileDriverConfig, FileInstances, FileLogConfig, FileTimingConfig,
};
pub use loader::{BROWSER_ENV_VAR, ConfigLoader};
