//! Page-interaction port.
//!
//! The use cases drive a page exclusively through this contract. Element
//! lookup and click mechanics are the adapter's business behind these
//! methods.

use async_trait::async_trait;
use roundtrip_domain::SessionProfile;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a page driver.
///
/// `Setup` and `Navigation` are terminal in their own lifecycle phases.
/// During cycling every variant has the same effect: the current cycle
/// fails and is retried after the failure delay.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// Session or subprocess acquisition failed.
    #[error("session setup failed: {0}")]
    Setup(String),

    /// Page load or readiness confirmation failed.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// No clickable element matched the selector within the wait budget.
    #[error("timed out waiting for `{selector}`")]
    WaitTimeout { selector: String },

    /// An element was found but could not be driven.
    #[error("interaction failed: {0}")]
    Interaction(String),
}

/// Opaque handle to a located element.
///
/// Valid until the page changes under it; a stale handle surfaces as
/// [`DriverError::Interaction`] on use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle(pub String);

/// Factory for isolated page sessions.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Open the isolated session described by `profile`.
    async fn open_session(
        &self,
        profile: &SessionProfile,
    ) -> Result<Box<dyn PageSession>, DriverError>;
}

/// One isolated page session, owned exclusively by a single agent.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Load `url` and wait for the page's minimal readiness. Subject to
    /// the page-load timeout fixed at session creation.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Wait until an element matching `selector` exists and is clickable,
    /// up to `timeout`.
    async fn wait_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, DriverError>;

    /// Activate a previously located element. Adapters may try more than
    /// one strategy internally; callers see a single success or failure.
    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Dismiss transient overlays matching `selectors`. Best effort and
    /// infallible; overlays that never appear cost one short wait each.
    async fn settle(&self, selectors: &[String]);

    /// Whether the container marking the page's base state is present.
    async fn on_target(&self, container: &str) -> bool;

    /// Release the session and every resource behind it. Idempotent, and
    /// safe to call while another operation is in flight (the operation
    /// aborts rather than waits).
    async fn close(&self);
}
