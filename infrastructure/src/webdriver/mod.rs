//! WebDriver adapter
//!
//! Implements PageDriver over the W3C wire protocol against chromedriver.

pub mod client;
pub mod error;
pub mod gateway;
pub mod launcher;
pub mod protocol;
pub mod session;

pub use error::WebDriverError;
pub use gateway::WebDriverGateway;
