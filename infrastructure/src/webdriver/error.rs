//! Error types for the WebDriver adapter

use thiserror::Error;

/// Result type alias for WebDriver operations
pub type Result<T> = std::result::Result<T, WebDriverError>;

/// Errors that can occur when driving a browser over the WebDriver wire protocol
#[derive(Error, Debug)]
pub enum WebDriverError {
    #[error("failed to spawn chromedriver: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WebDriver error ({error}): {message}")]
    Protocol { error: String, message: String },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("chromedriver on port {port} not ready after {waited_ms}ms")]
    DriverUnavailable { port: u16, waited_ms: u64 },

    #[error("browser driver binary `{0}` not found on PATH")]
    BinaryNotFound(String),

    #[error("session already closed")]
    SessionClosed,
}

impl WebDriverError {
    /// Whether the remote end reported that no element matched a locator.
    ///
    /// "no such element" is an expected outcome for presence probes, not
    /// a failure of the wire protocol.
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, Self::Protocol { error, .. } if error == "no such element")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_element_is_recognized() {
        let err = WebDriverError::Protocol {
            error: "no such element".to_string(),
            message: "Unable to locate element".to_string(),
        };
        assert!(err.is_no_such_element());

        let other = WebDriverError::Protocol {
            error: "stale element reference".to_string(),
            message: "element is not attached".to_string(),
        };
        assert!(!other.is_no_such_element());
    }
}
