//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Environment override for the browser binary, equivalent to setting
/// `driver.browser` in a config file.
pub const BROWSER_ENV_VAR: &str = "ROUNDTRIP_BROWSER";

const PROJECT_FILES: [&str; 2] = ["roundtrip.toml", ".roundtrip.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `ROUNDTRIP_BROWSER` environment variable
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./roundtrip.toml` or `./.roundtrip.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/roundtrip/roundtrip.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        // An explicit path the user typed must exist; file_exact makes a
        // typo a load error instead of a silent fallback to defaults.
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file_exact(path));
        }

        let mut config: FileConfig = figment.extract().map_err(Box::new)?;

        // Single env override, applied above every file source.
        if let Ok(browser) = std::env::var(BROWSER_ENV_VAR) {
            if !browser.is_empty() {
                config.driver.browser = Some(PathBuf::from(browser));
            }
        }

        Ok(config)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/roundtrip/roundtrip.toml if set,
    /// otherwise falls back to ~/.config/roundtrip/roundtrip.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("roundtrip").join("roundtrip.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {BROWSER_ENV_VAR} (browser binary only)");

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./roundtrip.toml or ./.roundtrip.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
