//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use roundtrip_application::config::FleetParams;
use roundtrip_domain::{ConfigIssue, FleetSize, TargetSpec, WindowSize};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Number of agents to run
    pub instances: FileInstances,
    /// Page selectors and target URL (uses the domain type directly)
    pub target: TargetSpec,
    /// Browser and chromedriver settings
    pub driver: FileDriverConfig,
    /// Delays and timeouts
    pub timing: FileTimingConfig,
    /// Run-event log settings
    pub log: FileLogConfig,
}

/// Newtype so `instances = 12` survives deserialization verbatim and the
/// clamp can be reported as a validation warning instead of silently
/// rewriting the file value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileInstances(pub u32);

impl Default for FileInstances {
    fn default() -> Self {
        Self(FleetSize::DEFAULT)
    }
}

/// Raw `[driver]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDriverConfig {
    /// chromedriver binary; resolved on PATH when unset
    pub webdriver: Option<PathBuf>,
    /// Browser binary override passed through to chromedriver
    pub browser: Option<PathBuf>,
    /// Debugging ports are assigned as `base_port + agent id`
    pub base_port: u16,
    /// chromedriver control ports are assigned as `driver_base_port + agent id`
    pub driver_base_port: u16,
    pub headless: bool,
    pub window: WindowSize,
    /// Parent directory for per-agent profile directories
    pub profile_root: Option<PathBuf>,
}

impl Default for FileDriverConfig {
    fn default() -> Self {
        Self {
            webdriver: None,
            browser: None,
            base_port: 9222,
            driver_base_port: 9515,
            headless: true,
            window: WindowSize::default(),
            profile_root: None,
        }
    }
}

/// Raw `[timing]` section, all values in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimingConfig {
    /// Pause after a completed cycle
    pub success_delay_ms: u64,
    /// Pause after a failed cycle, before the retry
    pub failure_delay_ms: u64,
    /// Budget for each element wait inside a cycle
    pub step_timeout_ms: u64,
    /// Budget for a full page load
    pub page_load_timeout_ms: u64,
    /// How long shutdown waits for in-flight cycles before aborting
    pub grace_period_ms: u64,
}

impl Default for FileTimingConfig {
    fn default() -> Self {
        Self {
            success_delay_ms: 1_000,
            failure_delay_ms: 5_000,
            step_timeout_ms: 10_000,
            page_load_timeout_ms: 30_000,
            grace_period_ms: 2_000,
        }
    }
}

/// Raw `[log]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// JSONL run-event log path; disabled when unset
    pub events_file: Option<PathBuf>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Target URL and selector sanity
    /// 2. Instance count against the supported range
    /// 3. Port namespace collisions between browser and driver ports
    /// 4. Degenerate timing values
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.target.validate();

        if FleetSize::clamps(self.instances.0) {
            issues.push(ConfigIssue::warning(
                "instances",
                format!(
                    "{} is outside {}..={}, will run {} agents",
                    self.instances.0,
                    FleetSize::MIN,
                    FleetSize::MAX,
                    self.fleet_size().get()
                ),
            ));
        }

        let agents = self.fleet_size().get();
        for (field, base) in [
            ("driver.base_port", self.driver.base_port),
            ("driver.driver_base_port", self.driver.driver_base_port),
        ] {
            if u32::from(base) + agents > u32::from(u16::MAX) {
                issues.push(ConfigIssue::error(
                    field,
                    format!("{base} leaves no room for {agents} per-agent ports"),
                ));
            }
        }
        if port_ranges_overlap(self.driver.base_port, self.driver.driver_base_port, agents) {
            issues.push(ConfigIssue::error(
                "driver.driver_base_port",
                format!(
                    "driver ports {}..={} collide with debugging ports {}..={}",
                    u32::from(self.driver.driver_base_port) + 1,
                    u32::from(self.driver.driver_base_port) + agents,
                    u32::from(self.driver.base_port) + 1,
                    u32::from(self.driver.base_port) + agents,
                ),
            ));
        }

        if self.timing.step_timeout_ms == 0 {
            issues.push(ConfigIssue::warning(
                "timing.step_timeout_ms",
                "a zero step timeout makes every element wait fail immediately",
            ));
        }
        if self.timing.page_load_timeout_ms == 0 {
            issues.push(ConfigIssue::warning(
                "timing.page_load_timeout_ms",
                "a zero page-load timeout makes every navigation fail immediately",
            ));
        }

        issues
    }

    pub fn fleet_size(&self) -> FleetSize {
        FleetSize::new(self.instances.0)
    }

    /// Assemble the runtime parameters the fleet runs with.
    pub fn fleet_params(&self) -> FleetParams {
        let mut params = FleetParams::default()
            .with_size(self.fleet_size())
            .with_base_port(self.driver.base_port)
            .with_driver_base_port(self.driver.driver_base_port)
            .with_success_delay(Duration::from_millis(self.timing.success_delay_ms))
            .with_failure_delay(Duration::from_millis(self.timing.failure_delay_ms))
            .with_step_timeout(Duration::from_millis(self.timing.step_timeout_ms))
            .with_page_load_timeout(Duration::from_millis(self.timing.page_load_timeout_ms))
            .with_grace_period(Duration::from_millis(self.timing.grace_period_ms))
            .with_headless(self.driver.headless)
            .with_window(self.driver.window)
            .with_browser_binary(self.driver.browser.clone());
        if let Some(root) = &self.driver.profile_root {
            params = params.with_profile_root(root.clone());
        }
        params
    }

    pub fn target_spec(&self) -> TargetSpec {
        self.target.clone()
    }

    /// Render the effective configuration as TOML (for `--show-config`).
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Whether two port namespaces of `agents` consecutive ports (starting
/// one above each base) intersect.
fn port_ranges_overlap(base_a: u16, base_b: u16, agents: u32) -> bool {
    let (a, b) = (u32::from(base_a), u32::from(base_b));
    a < b + agents && b < a + agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtrip_domain::has_errors;

    #[test]
    fn defaults_are_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(FileInstances::default().0, 3);
        assert_eq!(config.fleet_size().get(), 3);
    }

    #[test]
    fn sections_deserialize_from_toml() {
        let toml_str = r#"
instances = 5

[target]
url = "http://localhost:9000/poll"
container = "div.poll"

[driver]
headless = false
base_port = 9300
window = { width = 1280, height = 800 }

[timing]
failure_delay_ms = 2500

[log]
events_file = "runs/events.jsonl"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.instances.0, 5);
        assert_eq!(config.target.url, "http://localhost:9000/poll");
        // Unset target fields keep their defaults.
        assert_eq!(config.target.submit, TargetSpec::default().submit);
        assert!(!config.driver.headless);
        assert_eq!(config.driver.base_port, 9300);
        assert_eq!(config.driver.window.width, 1280);
        assert_eq!(config.timing.failure_delay_ms, 2_500);
        assert_eq!(config.timing.success_delay_ms, 1_000);
        assert_eq!(
            config.log.events_file.as_deref(),
            Some(std::path::Path::new("runs/events.jsonl"))
        );
    }

    #[test]
    fn oversized_instance_count_warns_but_is_not_fatal() {
        let config: FileConfig = toml::from_str("instances = 12").unwrap();
        let issues = config.validate();
        assert!(!has_errors(&issues));
        let warning = issues.iter().find(|i| i.field == "instances").unwrap();
        assert!(warning.message.contains("outside 1..=8"));
        assert_eq!(config.fleet_size().get(), 8);
    }

    #[test]
    fn colliding_port_namespaces_are_an_error() {
        let toml_str = r#"
[driver]
base_port = 9515
driver_base_port = 9515
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(has_errors(&config.validate()));
    }

    #[test]
    fn port_range_must_fit_in_u16() {
        let config: FileConfig = toml::from_str("[driver]\nbase_port = 65533").unwrap();
        assert!(has_errors(&config.validate()));
    }

    #[test]
    fn fleet_params_carry_timing_and_driver_settings() {
        let toml_str = r#"
instances = 2

[driver]
browser = "/opt/chromium/chrome"
profile_root = "/var/tmp/agents"

[timing]
step_timeout_ms = 4000
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.fleet_params();
        assert_eq!(params.size.get(), 2);
        assert_eq!(params.step_timeout, Duration::from_millis(4_000));
        assert_eq!(
            params.browser_binary.as_deref(),
            Some(std::path::Path::new("/opt/chromium/chrome"))
        );
        assert_eq!(
            params.profile_root,
            std::path::PathBuf::from("/var/tmp/agents")
        );
    }

    #[test]
    fn rendered_toml_round_trips() {
        let config = FileConfig::default();
        let rendered = config.to_toml_string().unwrap();
        let reparsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.instances.0, config.instances.0);
        assert_eq!(reparsed.target.url, config.target.url);
    }
}
