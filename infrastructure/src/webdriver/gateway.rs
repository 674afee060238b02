//! [`PageDriver`] implementation backed by chromedriver.

use super::client::WireClient;
use super::error::{Result, WebDriverError};
use super::launcher::DriverProcess;
use super::protocol::{
    AlwaysMatch, Capabilities, ChromeOptions, NewSessionRequest, SessionCreated, Timeouts,
};
use super::session::WebDriverSession;
use async_trait::async_trait;
use roundtrip_application::ports::{DriverError, PageDriver, PageSession};
use roundtrip_domain::SessionProfile;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Margin added to the page-load timeout so the transport never cuts a
/// navigation off before the remote end can time it out properly.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(30);

const DEFAULT_DRIVER_BINARY: &str = "chromedriver";

/// Opens isolated browser sessions, one chromedriver process per call.
#[derive(Debug, Clone)]
pub struct WebDriverGateway {
    driver_binary: PathBuf,
    page_load_timeout: Duration,
    readiness_timeout: Duration,
}

impl WebDriverGateway {
    /// Resolve the driver binary up front so a missing install fails the
    /// whole run before any agent starts.
    pub fn new(driver_binary: Option<&Path>) -> Result<Self> {
        let requested = driver_binary.unwrap_or(Path::new(DEFAULT_DRIVER_BINARY));
        let resolved = which::which(requested)
            .map_err(|_| WebDriverError::BinaryNotFound(requested.display().to_string()))?;
        Ok(Self {
            driver_binary: resolved,
            page_load_timeout: Duration::from_secs(30),
            readiness_timeout: Duration::from_secs(10),
        })
    }

    pub fn with_page_load_timeout(mut self, timeout: Duration) -> Self {
        self.page_load_timeout = timeout;
        self
    }

    pub fn with_readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout = timeout;
        self
    }

    fn capabilities(profile: &SessionProfile, page_load_timeout: Duration) -> NewSessionRequest {
        let mut args = vec![
            format!("--user-data-dir={}", profile.user_data_dir.display()),
            format!("--remote-debugging-port={}", profile.debug_port),
            format!("--window-size={}", profile.window),
        ];
        if profile.headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }
        NewSessionRequest {
            capabilities: Capabilities {
                always_match: AlwaysMatch {
                    browser_name: "chrome".to_string(),
                    chrome_options: ChromeOptions {
                        args,
                        binary: profile
                            .browser_binary
                            .as_ref()
                            .map(|path| path.display().to_string()),
                    },
                    timeouts: Timeouts {
                        page_load: page_load_timeout.as_millis() as u64,
                        script: 30_000,
                        implicit: 0,
                    },
                },
            },
        }
    }

    async fn open_raw(&self, profile: &SessionProfile) -> Result<WebDriverSession> {
        let driver = DriverProcess::launch(&self.driver_binary, profile.control_port).await?;
        let client = WireClient::new(
            profile.control_port,
            self.page_load_timeout + REQUEST_TIMEOUT_MARGIN,
        )?;
        let request = Self::capabilities(profile, self.page_load_timeout);
        let created: SessionCreated = client.post("/session", &request).await?;
        info!(
            agent = %profile.agent,
            session = %created.session_id,
            port = driver.port(),
            "browser session created"
        );
        Ok(WebDriverSession::new(
            client,
            created.session_id,
            driver,
            self.readiness_timeout,
        ))
    }
}

#[async_trait]
impl PageDriver for WebDriverGateway {
    async fn open_session(
        &self,
        profile: &SessionProfile,
    ) -> std::result::Result<Box<dyn PageSession>, DriverError> {
        match self.open_raw(profile).await {
            Ok(session) => Ok(Box::new(session)),
            Err(error) => Err(DriverError::Setup(error.to_string())),
        }
    }
}
