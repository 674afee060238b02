//! chromedriver subprocess management.

use super::client::WireClient;
use super::error::{Result, WebDriverError};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::debug;

const READY_POLL: Duration = Duration::from_millis(250);
const READY_ATTEMPTS: u32 = 40;

/// A running chromedriver bound to one control port.
///
/// The process is killed on [`shutdown`](Self::shutdown) or drop; each
/// agent owns exactly one, so ports never need sharing.
#[derive(Debug)]
pub struct DriverProcess {
    child: Child,
    port: u16,
}

impl DriverProcess {
    /// Spawn `binary` on `port` and wait until its status endpoint
    /// reports ready.
    pub async fn launch(binary: &Path, port: u16) -> Result<Self> {
        debug!(binary = %binary.display(), port, "spawning chromedriver");

        let mut cmd = Command::new(binary);
        cmd.arg(format!("--port={port}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Linux: request kernel to send SIGTERM to child when parent dies.
        // This catches cases where Drop doesn't run (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let child = cmd.spawn()?;
        let mut process = Self { child, port };
        process.await_ready().await?;
        Ok(process)
    }

    async fn await_ready(&mut self) -> Result<()> {
        let probe = WireClient::new(self.port, Duration::from_secs(2))?;
        for _ in 0..READY_ATTEMPTS {
            if let Some(status) = self.child.try_wait()? {
                return Err(WebDriverError::UnexpectedResponse(format!(
                    "chromedriver on port {} exited early: {status}",
                    self.port
                )));
            }
            match probe.status().await {
                Ok(status) if status.ready => {
                    debug!(port = self.port, "chromedriver ready");
                    return Ok(());
                }
                _ => tokio::time::sleep(READY_POLL).await,
            }
        }
        Err(WebDriverError::DriverUnavailable {
            port: self.port,
            waited_ms: READY_POLL.as_millis() as u64 * u64::from(READY_ATTEMPTS),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Kill the process without waiting for it.
    pub fn shutdown(&mut self) {
        let _ = self.child.start_kill();
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn launch_reports_missing_binary() {
        let result = DriverProcess::launch(Path::new("/nonexistent/driver-binary"), 39131).await;
        assert!(matches!(result, Err(WebDriverError::Spawn(_))));
    }

    #[tokio::test]
    async fn launch_detects_early_exit() {
        // `true` ignores --port and exits immediately, so readiness
        // polling must notice the dead child instead of running out the
        // full attempt budget.
        let result = DriverProcess::launch(Path::new("/bin/true"), 39133).await;
        assert!(matches!(
            result,
            Err(WebDriverError::UnexpectedResponse(_))
        ));
    }
}
