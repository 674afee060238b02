//! Browser session driving a live page over the wire protocol.

use super::client::WireClient;
use super::error::{Result, WebDriverError};
use super::launcher::DriverProcess;
use super::protocol::{ElementRef, ExecuteScriptRequest, FindElementRequest, NavigateRequest};
use async_trait::async_trait;
use roundtrip_application::ports::{DriverError, ElementHandle, PageSession};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const SETTLE_PAUSE: Duration = Duration::from_millis(200);

/// Clickability probe run against a located element. Mirrors the usual
/// "visible and enabled" definition without a second round of endpoints.
const INTERACTABLE_SCRIPT: &str = "const el = arguments[0]; \
     const rect = el.getBoundingClientRect(); \
     return !!(rect.width && rect.height) && !el.disabled;";

/// One browser session plus the chromedriver that owns it.
///
/// Closing tears down both. The teardown slot lives behind a mutex so
/// `close` stays idempotent and callable while another operation is in
/// flight; the in-flight wire call fails against the dead driver and
/// surfaces as that operation's error.
pub struct WebDriverSession {
    client: WireClient,
    resources: Mutex<Option<SessionResources>>,
    readiness_timeout: Duration,
}

struct SessionResources {
    session_id: String,
    driver: DriverProcess,
}

impl WebDriverSession {
    pub(super) fn new(
        client: WireClient,
        session_id: String,
        driver: DriverProcess,
        readiness_timeout: Duration,
    ) -> Self {
        Self {
            client,
            resources: Mutex::new(Some(SessionResources { session_id, driver })),
            readiness_timeout,
        }
    }

    #[cfg(test)]
    fn closed_for_tests() -> Self {
        Self {
            client: WireClient::new(1, Duration::from_secs(1)).unwrap(),
            resources: Mutex::new(None),
            readiness_timeout: Duration::from_secs(1),
        }
    }

    /// Snapshot the session id without holding the lock across a wire call.
    async fn session_id(&self) -> Result<String> {
        self.resources
            .lock()
            .await
            .as_ref()
            .map(|r| r.session_id.clone())
            .ok_or(WebDriverError::SessionClosed)
    }

    /// Locate one element, treating "no such element" as an ordinary
    /// absent outcome.
    async fn find(&self, session_id: &str, selector: &str) -> Result<Option<ElementRef>> {
        let path = format!("/session/{session_id}/element");
        match self
            .client
            .post::<_, ElementRef>(&path, &FindElementRequest::css(selector))
            .await
        {
            Ok(element) => Ok(Some(element)),
            Err(error) if error.is_no_such_element() => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn is_interactable(&self, session_id: &str, element_id: &str) -> Result<bool> {
        let path = format!("/session/{session_id}/execute/sync");
        let request = ExecuteScriptRequest::with_element(INTERACTABLE_SCRIPT, element_id);
        self.client.post(&path, &request).await
    }

    async fn click_element(&self, session_id: &str, element_id: &str) -> Result<()> {
        let path = format!("/session/{session_id}/element/{element_id}/click");
        let _: serde_json::Value = self.client.post(&path, &serde_json::json!({})).await?;
        Ok(())
    }

    async fn click_via_script(&self, session_id: &str, element_id: &str) -> Result<()> {
        let path = format!("/session/{session_id}/execute/sync");
        let request = ExecuteScriptRequest::with_element("arguments[0].click();", element_id);
        let _: serde_json::Value = self.client.post(&path, &request).await?;
        Ok(())
    }

    /// Block until the document body exists, bounding the gap between
    /// "navigation accepted" and "page actually interactable".
    async fn await_body(&self, session_id: &str) -> Result<()> {
        let deadline = Instant::now() + self.readiness_timeout;
        loop {
            if self.find(session_id, "body").await?.is_some() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(WebDriverError::UnexpectedResponse(
                    "document body never appeared".to_string(),
                ));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageSession for WebDriverSession {
    async fn navigate(&self, url: &str) -> std::result::Result<(), DriverError> {
        let run = async {
            let session_id = self.session_id().await?;
            let path = format!("/session/{session_id}/url");
            let _: serde_json::Value = self
                .client
                .post(
                    &path,
                    &NavigateRequest {
                        url: url.to_string(),
                    },
                )
                .await?;
            self.await_body(&session_id).await
        };
        run.await
            .map_err(|error| DriverError::Navigation(error.to_string()))
    }

    async fn wait_clickable(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> std::result::Result<ElementHandle, DriverError> {
        let session_id = self
            .session_id()
            .await
            .map_err(|error| DriverError::Interaction(error.to_string()))?;
        let deadline = Instant::now() + timeout;
        loop {
            let candidate = match self.find(&session_id, selector).await {
                Ok(found) => found,
                Err(error) => return Err(DriverError::Interaction(error.to_string())),
            };
            if let Some(element) = candidate {
                // A stale probe means the page moved under us; treat it
                // as "not clickable yet" and keep polling.
                match self.is_interactable(&session_id, &element.element_id).await {
                    Ok(true) => return Ok(ElementHandle(element.element_id)),
                    Ok(false) => {}
                    Err(WebDriverError::Protocol { .. }) => {}
                    Err(error) => return Err(DriverError::Interaction(error.to_string())),
                }
            }
            if Instant::now() >= deadline {
                return Err(DriverError::WaitTimeout {
                    selector: selector.to_string(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, element: &ElementHandle) -> std::result::Result<(), DriverError> {
        let session_id = self
            .session_id()
            .await
            .map_err(|error| DriverError::Interaction(error.to_string()))?;
        match self.click_element(&session_id, &element.0).await {
            Ok(()) => Ok(()),
            Err(WebDriverError::Protocol { error, message }) => {
                // Overlapping elements and off-viewport targets reject a
                // native click; a scripted click still lands.
                debug!(error, message, "native click rejected, retrying via script");
                self.click_via_script(&session_id, &element.0)
                    .await
                    .map_err(|error| DriverError::Interaction(error.to_string()))
            }
            Err(error) => Err(DriverError::Interaction(error.to_string())),
        }
    }

    async fn settle(&self, selectors: &[String]) {
        let Ok(session_id) = self.session_id().await else {
            return;
        };
        for selector in selectors {
            if let Ok(Some(element)) = self.find(&session_id, selector).await {
                debug!(selector, "dismissing overlay");
                if self
                    .click_element(&session_id, &element.element_id)
                    .await
                    .is_ok()
                {
                    tokio::time::sleep(SETTLE_PAUSE).await;
                }
            }
        }
    }

    async fn on_target(&self, container: &str) -> bool {
        let Ok(session_id) = self.session_id().await else {
            return false;
        };
        matches!(self.find(&session_id, container).await, Ok(Some(_)))
    }

    async fn close(&self) {
        let taken = self.resources.lock().await.take();
        if let Some(mut resources) = taken {
            let path = format!("/session/{}", resources.session_id);
            if let Err(error) = self.client.delete(&path).await {
                debug!(%error, "session delete during close failed");
            }
            resources.driver.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closed_session_refuses_navigation() {
        let session = WebDriverSession::closed_for_tests();
        let result = session.navigate("http://localhost:8350/demo/survey").await;
        match result {
            Err(DriverError::Navigation(message)) => assert!(message.contains("closed")),
            other => panic!("expected navigation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_session_refuses_waits() {
        let session = WebDriverSession::closed_for_tests();
        let result = session
            .wait_clickable("button.survey-submit", Duration::from_millis(10))
            .await;
        assert!(matches!(result, Err(DriverError::Interaction(_))));
    }

    #[tokio::test]
    async fn closed_session_is_off_target_and_settles_quietly() {
        let session = WebDriverSession::closed_for_tests();
        assert!(!session.on_target("form.survey-form").await);
        session.settle(&["div.overlay".to_string()]).await;
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let session = WebDriverSession::closed_for_tests();
        session.close().await;
        session.close().await;
    }
}
