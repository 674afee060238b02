//! Fleet execution parameters.

use roundtrip_domain::{AgentId, FleetSize, SessionProfile, WindowSize};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tunable parameters for one fleet run.
///
/// Defaults are the long-running production values: three agents, one
/// second between successful cycles, five seconds before retrying a failed
/// one, ten-second interaction waits, thirty-second page loads, and a
/// two-second shutdown grace window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetParams {
    pub size: FleetSize,
    /// Base browser debug port; agent `i` uses `base_port + i`.
    pub base_port: u16,
    /// Base WebDriver control port; agent `i` uses `driver_base_port + i`.
    pub driver_base_port: u16,
    /// Pause after a successful cycle.
    pub success_delay: Duration,
    /// Pause before retrying a failed cycle. Fixed: the retry policy has
    /// no backoff growth and no attempt cap.
    pub failure_delay: Duration,
    /// Wait budget for a single element lookup.
    pub step_timeout: Duration,
    pub page_load_timeout: Duration,
    /// How long shutdown waits for workers before abandoning them.
    pub grace_period: Duration,
    pub headless: bool,
    pub window: WindowSize,
    /// Browser binary override; system default when unset.
    pub browser_binary: Option<PathBuf>,
    /// Parent directory for the per-agent profile directories.
    pub profile_root: PathBuf,
}

impl Default for FleetParams {
    fn default() -> Self {
        Self {
            size: FleetSize::default(),
            base_port: 9222,
            driver_base_port: 9515,
            success_delay: Duration::from_secs(1),
            failure_delay: Duration::from_secs(5),
            step_timeout: Duration::from_secs(10),
            page_load_timeout: Duration::from_secs(30),
            grace_period: Duration::from_secs(2),
            headless: true,
            window: WindowSize::default(),
            browser_binary: None,
            profile_root: std::env::temp_dir(),
        }
    }
}

impl FleetParams {
    pub fn with_size(mut self, size: FleetSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_base_port(mut self, base_port: u16) -> Self {
        self.base_port = base_port;
        self
    }

    pub fn with_driver_base_port(mut self, driver_base_port: u16) -> Self {
        self.driver_base_port = driver_base_port;
        self
    }

    pub fn with_success_delay(mut self, delay: Duration) -> Self {
        self.success_delay = delay;
        self
    }

    pub fn with_failure_delay(mut self, delay: Duration) -> Self {
        self.failure_delay = delay;
        self
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn with_page_load_timeout(mut self, timeout: Duration) -> Self {
        self.page_load_timeout = timeout;
        self
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_window(mut self, window: WindowSize) -> Self {
        self.window = window;
        self
    }

    pub fn with_browser_binary(mut self, binary: Option<PathBuf>) -> Self {
        self.browser_binary = binary;
        self
    }

    pub fn with_profile_root(mut self, root: PathBuf) -> Self {
        self.profile_root = root;
        self
    }

    /// Session profile for one agent, fully namespaced by its id.
    pub fn profile_for(&self, agent: AgentId) -> SessionProfile {
        SessionProfile::derive(
            agent,
            &self.profile_root,
            self.base_port,
            self.driver_base_port,
        )
        .with_headless(self.headless)
        .with_window(self.window)
        .with_browser_binary(self.browser_binary.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_values() {
        let params = FleetParams::default();
        assert_eq!(params.size.get(), 3);
        assert_eq!(params.base_port, 9222);
        assert_eq!(params.driver_base_port, 9515);
        assert_eq!(params.success_delay, Duration::from_secs(1));
        assert_eq!(params.failure_delay, Duration::from_secs(5));
        assert_eq!(params.step_timeout, Duration::from_secs(10));
        assert_eq!(params.page_load_timeout, Duration::from_secs(30));
        assert_eq!(params.grace_period, Duration::from_secs(2));
        assert!(params.headless);
    }

    #[test]
    fn builders_chain() {
        let params = FleetParams::default()
            .with_size(FleetSize::new(5))
            .with_base_port(9300)
            .with_headless(false)
            .with_grace_period(Duration::from_millis(500));
        assert_eq!(params.size.get(), 5);
        assert_eq!(params.base_port, 9300);
        assert!(!params.headless);
        assert_eq!(params.grace_period, Duration::from_millis(500));
    }

    #[test]
    fn params_survive_serialization() {
        let params = FleetParams::default()
            .with_size(FleetSize::new(5))
            .with_failure_delay(Duration::from_millis(2_500));
        let json = serde_json::to_string(&params).unwrap();
        let back: FleetParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn profile_for_derives_everything_from_id() {
        let params = FleetParams::default()
            .with_profile_root(PathBuf::from("/var/tmp"))
            .with_browser_binary(Some(PathBuf::from("/opt/chromium/chrome")));
        let profile = params.profile_for(AgentId::new(3));
        assert_eq!(profile.debug_port, 9225);
        assert_eq!(profile.control_port, 9518);
        assert_eq!(profile.user_data_dir, PathBuf::from("/var/tmp/roundtrip-profile-3"));
        assert_eq!(profile.browser_binary, Some(PathBuf::from("/opt/chromium/chrome")));
        assert!(profile.headless);
    }
}
