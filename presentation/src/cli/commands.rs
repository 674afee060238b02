//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the final run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary table
    Text,
    /// JSON report
    Json,
}

/// CLI arguments for roundtrip
#[derive(Parser, Debug)]
#[command(name = "roundtrip")]
#[command(author, version, about = "Runs a fleet of browser agents through repeated page cycles")]
#[command(long_about = r#"
Roundtrip opens one isolated browser per agent, navigates each to the
configured target page and drives it through the activate / submit /
return cycle until interrupted. Failed cycles are retried after a
delay; Ctrl-C stops every agent at its next cycle boundary and prints
a per-agent report.

Configuration files are loaded from (in priority order):
1. --config <path>       Explicit config file
2. ./roundtrip.toml      Project-level config
3. ~/.config/roundtrip/roundtrip.toml   Global config

Example:
  roundtrip
  roundtrip -n 5
  roundtrip -n 2 --output json --quiet
"#)]
pub struct Cli {
    /// Number of agents to run (clamped to 1..=8)
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub instances: Option<u32>,

    /// Output format for the final report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,
}
