//! Per-agent session isolation parameters.

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Browser window dimensions, formatted the way Chromium's
/// `--window-size` flag expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self { width: 1920, height: 1080 }
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.width, self.height)
    }
}

/// Everything needed to open one agent's isolated browser session.
///
/// All values derive from the agent id at construction time, so two agents
/// can never collide on a directory or a port. Isolation by construction,
/// no locking anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    pub agent: AgentId,
    /// Isolated browser user-data directory, namespaced by agent id.
    pub user_data_dir: PathBuf,
    /// Browser remote-debugging port (`base + id`).
    pub debug_port: u16,
    /// WebDriver server control port (`driver base + id`).
    pub control_port: u16,
    pub headless: bool,
    pub window: WindowSize,
    /// Browser binary override; system default when unset.
    pub browser_binary: Option<PathBuf>,
}

impl SessionProfile {
    /// Derive a profile for `agent` under `profile_root` with the given
    /// port bases.
    pub fn derive(
        agent: AgentId,
        profile_root: &std::path::Path,
        base_port: u16,
        driver_base_port: u16,
    ) -> Self {
        Self {
            agent,
            user_data_dir: profile_root.join(agent.profile_dir_name()),
            debug_port: agent.offset_port(base_port),
            control_port: agent.offset_port(driver_base_port),
            headless: true,
            window: WindowSize::default(),
            browser_binary: None,
        }
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn derive_namespaces_everything_by_id() {
        let profile = SessionProfile::derive(AgentId::new(2), Path::new("/tmp"), 9222, 9515);
        assert_eq!(profile.user_data_dir, PathBuf::from("/tmp/roundtrip-profile-2"));
        assert_eq!(profile.debug_port, 9224);
        assert_eq!(profile.control_port, 9517);
    }

    #[test]
    fn two_agents_share_nothing() {
        let root = Path::new("/tmp");
        let one = SessionProfile::derive(AgentId::new(1), root, 9222, 9515);
        let two = SessionProfile::derive(AgentId::new(2), root, 9222, 9515);
        assert_ne!(one.user_data_dir, two.user_data_dir);
        assert_ne!(one.debug_port, two.debug_port);
        assert_ne!(one.control_port, two.control_port);
    }

    #[test]
    fn window_size_formats_for_chromium() {
        assert_eq!(WindowSize::default().to_string(), "1920,1080");
        assert_eq!(WindowSize { width: 1280, height: 800 }.to_string(), "1280,800");
    }

    #[test]
    fn builders_override_defaults() {
        let profile = SessionProfile::derive(AgentId::new(1), Path::new("/tmp"), 9222, 9515)
            .with_headless(false)
            .with_browser_binary(Some(PathBuf::from("/usr/bin/chromium")));
        assert!(!profile.headless);
        assert_eq!(profile.browser_binary, Some(PathBuf::from("/usr/bin/chromium")));
    }
}
