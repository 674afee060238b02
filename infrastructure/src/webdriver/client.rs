//! Minimal HTTP client for the WebDriver wire protocol.
//!
//! One [`WireClient`] talks to one chromedriver instance on localhost.
//! It only knows the envelope rules; which endpoints exist and when to
//! call them is [`session`](super::session) and [`gateway`](super::gateway)
//! territory.

use super::error::{Result, WebDriverError};
use super::protocol::{DriverStatus, WireError, WireResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WireClient {
    http: reqwest::Client,
    base_url: String,
}

impl WireClient {
    /// Client for the chromedriver listening on `port`.
    ///
    /// `request_timeout` bounds every wire call and must exceed the
    /// session's page-load timeout, or navigation gets cut off at the
    /// transport instead of by the remote end.
    pub fn new(port: u16, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: format!("http://127.0.0.1:{port}"),
        })
    }

    /// `GET /status`, the readiness probe used right after spawn.
    pub async fn status(&self) -> Result<DriverStatus> {
        self.get("/status").await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.http.delete(self.url(path)).send().await?;
        let _: serde_json::Value = Self::decode(response).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let ok = response.status().is_success();
        let status = response.status();
        let bytes = response.bytes().await?;
        decode_body(ok, status.as_u16(), &bytes)
    }
}

/// Unwrap the `{"value": ...}` envelope, or map an error envelope to
/// [`WebDriverError::Protocol`].
fn decode_body<T: DeserializeOwned>(ok: bool, status: u16, body: &[u8]) -> Result<T> {
    if ok {
        let parsed: WireResponse<T> = serde_json::from_slice(body)?;
        return Ok(parsed.value);
    }
    match serde_json::from_slice::<WireResponse<WireError>>(body) {
        Ok(envelope) => Err(WebDriverError::Protocol {
            error: envelope.value.error,
            message: envelope.value.message,
        }),
        Err(_) => Err(WebDriverError::UnexpectedResponse(format!(
            "HTTP {status}: {}",
            String::from_utf8_lossy(body)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webdriver::protocol::ElementRef;

    #[test]
    fn success_envelope_unwraps_value() {
        let body = br#"{"value": {"ready": true, "message": "ChromeDriver ready"}}"#;
        let status: DriverStatus = decode_body(true, 200, body).unwrap();
        assert!(status.ready);
    }

    #[test]
    fn error_envelope_maps_to_protocol_error() {
        let body = br#"{"value": {"error": "no such element", "message": "Unable to locate element"}}"#;
        let result: Result<ElementRef> = decode_body(false, 404, body);
        match result {
            Err(WebDriverError::Protocol { error, .. }) => {
                assert_eq!(error, "no such element");
            }
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_error_body_is_preserved_verbatim() {
        let result: Result<ElementRef> = decode_body(false, 502, b"bad gateway");
        match result {
            Err(WebDriverError::UnexpectedResponse(text)) => {
                assert!(text.contains("502"));
                assert!(text.contains("bad gateway"));
            }
            other => panic!("expected unexpected-response error, got {other:?}"),
        }
    }

    #[test]
    fn urls_target_loopback() {
        let client = WireClient::new(9516, Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/status"), "http://127.0.0.1:9516/status");
    }
}
