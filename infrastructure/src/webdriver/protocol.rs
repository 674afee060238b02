//! W3C WebDriver wire protocol types.
//!
//! This module defines the request and response structures exchanged with a
//! chromedriver instance over its local HTTP endpoint.
//!
//! # Protocol Overview
//!
//! - **Session**: `POST /session` opens a browser, `DELETE /session/{id}` closes it
//! - **Commands**: `POST /session/{id}/url`, `/element`, `/execute/sync`, ...
//! - **Envelope**: every response body is wrapped as `{"value": ...}`

use serde::{Deserialize, Serialize};

/// W3C-assigned key under which element references travel on the wire.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// CSS is the only locator strategy the adapter uses.
pub const CSS_SELECTOR: &str = "css selector";

/// Response envelope: the remote end wraps every payload in `value`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireResponse<T> {
    pub value: T,
}

/// Error payload carried inside the envelope on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct WireError {
    pub error: String,
    pub message: String,
}

/// `GET /status` payload, used to detect driver readiness after spawn.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverStatus {
    pub ready: bool,
    #[serde(default)]
    pub message: String,
}

/// `POST /session` request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewSessionRequest {
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    #[serde(rename = "alwaysMatch")]
    pub always_match: AlwaysMatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlwaysMatch {
    #[serde(rename = "browserName")]
    pub browser_name: String,
    #[serde(rename = "goog:chromeOptions")]
    pub chrome_options: ChromeOptions,
    pub timeouts: Timeouts,
}

/// Chrome launch configuration nested under `goog:chromeOptions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChromeOptions {
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
}

/// Session timeouts in milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct Timeouts {
    #[serde(rename = "pageLoad")]
    pub page_load: u64,
    pub script: u64,
    pub implicit: u64,
}

/// `POST /session` success payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCreated {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// `POST /session/{id}/url` request body.
#[derive(Debug, Clone, Serialize)]
pub struct NavigateRequest {
    pub url: String,
}

/// `POST /session/{id}/element` request body.
#[derive(Debug, Clone, Serialize)]
pub struct FindElementRequest {
    pub using: &'static str,
    pub value: String,
}

impl FindElementRequest {
    pub fn css(selector: &str) -> Self {
        Self {
            using: CSS_SELECTOR,
            value: selector.to_string(),
        }
    }
}

/// Element reference as it appears inside a response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub element_id: String,
}

/// `POST /session/{id}/execute/sync` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteScriptRequest {
    pub script: String,
    pub args: Vec<serde_json::Value>,
}

impl ExecuteScriptRequest {
    /// Script invocation with a single element argument, passed in the
    /// wire representation the remote end expects.
    pub fn with_element(script: &str, element_id: &str) -> Self {
        Self {
            script: script.to_string(),
            args: vec![serde_json::json!({ ELEMENT_KEY: element_id })],
        }
    }
}
