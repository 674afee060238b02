//! CLI entrypoint for roundtrip
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use roundtrip_application::{
    EventLog, FleetObserver, NoEventLog, NoObserver, RunFleet, SystemClock,
};
use roundtrip_domain::{Severity, has_errors};
use roundtrip_infrastructure::config::FileInstances;
use roundtrip_infrastructure::{ConfigLoader, JsonlEventLog, WebDriverGateway};
use roundtrip_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        match cli.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"), // -vvv or more
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?
    };

    // CLI instance count overrides every file source; out-of-range
    // requests surface as a validation warning below.
    if let Some(requested) = cli.instances {
        config.instances = FileInstances(requested);
    }

    if cli.show_config {
        ConfigLoader::print_config_sources();
        println!();
        print!(
            "{}",
            config
                .to_toml_string()
                .context("failed to render configuration")?
        );
        return Ok(());
    }

    // Validate before anything heavyweight starts
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => error!("{issue}"),
            Severity::Warning => warn!("{issue}"),
        }
    }
    if has_errors(&issues) {
        bail!("configuration is invalid");
    }

    let params = config.fleet_params();
    let target = config.target_spec();

    // === Dependency Injection ===
    let events: Arc<dyn EventLog> = match &config.log.events_file {
        Some(path) => match JsonlEventLog::new(path) {
            Some(log) => {
                info!("writing run events to {}", log.path().display());
                Arc::new(log)
            }
            None => Arc::new(NoEventLog),
        },
        None => Arc::new(NoEventLog),
    };

    // Resolving the driver binary here makes a missing chromedriver a
    // startup error instead of a per-agent setup failure.
    let gateway = WebDriverGateway::new(config.driver.webdriver.as_deref())
        .context("webdriver preflight failed")?
        .with_page_load_timeout(params.page_load_timeout)
        .with_readiness_timeout(params.step_timeout);

    let observer: Arc<dyn FleetObserver> = if cli.quiet {
        Arc::new(NoObserver)
    } else if cli.verbose > 0 {
        // Spinner redraws fight with log lines, so verbose runs get the
        // plain reporter.
        Arc::new(SimpleProgress)
    } else {
        Arc::new(ProgressReporter::new())
    };

    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    info!("starting {} agents against {}", params.size, target.url);

    let fleet = RunFleet::new(
        Arc::new(gateway),
        Arc::new(SystemClock),
        observer,
        events,
        params,
        target,
        cancellation,
    );
    let report = fleet.execute().await;

    let rendered = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{rendered}");

    // An interrupted run still exits 0; only pre-agent failures above
    // carry a non-zero code.
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { info!("received Ctrl+C, stopping agents at their next cycle boundary"); }
        _ = terminate => { info!("received SIGTERM, stopping agents at their next cycle boundary"); }
    }
}
