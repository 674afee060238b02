//! Progress reporting for fleet execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use roundtrip_application::ports::FleetObserver;
use roundtrip_domain::{AgentId, AgentStatus, CycleStep, CycleTally, FleetSize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Reports fleet progress with one live spinner line per agent
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<AgentId, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn agent_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap()
    }

    fn tally_text(tally: CycleTally) -> String {
        format!("{} completed, {} failed", tally.completed, tally.failed)
    }

    fn with_bar(&self, id: AgentId, apply: impl FnOnce(&ProgressBar)) {
        if let Some(bar) = self.bars.lock().unwrap().get(&id) {
            apply(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetObserver for ProgressReporter {
    fn on_fleet_start(&self, _size: FleetSize) {}

    fn on_agent_start(&self, id: AgentId) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(Self::agent_style());
        bar.set_prefix(format!("agent {id}"));
        bar.set_message("starting browser...");
        bar.enable_steady_tick(Duration::from_millis(120));
        self.bars.lock().unwrap().insert(id, bar);
    }

    fn on_agent_on_target(&self, id: AgentId) {
        self.with_bar(id, |bar| bar.set_message("on target"));
    }

    fn on_cycle_complete(&self, id: AgentId, tally: CycleTally) {
        self.with_bar(id, |bar| bar.set_message(Self::tally_text(tally)));
    }

    fn on_cycle_fail(&self, id: AgentId, step: CycleStep, tally: CycleTally) {
        self.with_bar(id, |bar| {
            bar.set_message(format!(
                "{} ({})",
                format!("{step} failed, retrying").red(),
                Self::tally_text(tally)
            ));
        });
    }

    fn on_agent_stop(&self, id: AgentId, status: AgentStatus, tally: CycleTally) {
        if let Some(bar) = self.bars.lock().unwrap().remove(&id) {
            let label = match status {
                AgentStatus::Stopped => status.as_str().green(),
                AgentStatus::Aborted => status.as_str().yellow(),
                _ => status.as_str().red(),
            };
            bar.finish_with_message(format!("{label} ({})", Self::tally_text(tally)));
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Lines interleave cleanly with tracing output, so this is the reporter
/// used when verbose logging is on.
pub struct SimpleProgress;

impl FleetObserver for SimpleProgress {
    fn on_fleet_start(&self, size: FleetSize) {
        println!("{} starting {} agents", "->".cyan(), size);
    }

    fn on_agent_start(&self, id: AgentId) {
        println!("  agent {id}: starting browser");
    }

    fn on_agent_on_target(&self, id: AgentId) {
        println!("  agent {id}: on target");
    }

    fn on_cycle_complete(&self, id: AgentId, tally: CycleTally) {
        println!(
            "  {} agent {id}: cycle done ({})",
            "v".green(),
            ProgressReporter::tally_text(tally)
        );
    }

    fn on_cycle_fail(&self, id: AgentId, step: CycleStep, tally: CycleTally) {
        println!(
            "  {} agent {id}: {step} failed ({})",
            "x".red(),
            ProgressReporter::tally_text(tally)
        );
    }

    fn on_agent_stop(&self, id: AgentId, status: AgentStatus, tally: CycleTally) {
        println!(
            "  agent {id}: {status} ({})",
            ProgressReporter::tally_text(tally)
        );
    }
}
