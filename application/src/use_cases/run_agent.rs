//! Per-agent execution: session lifecycle plus the cycle-retry loop.
//!
//! One [`RunAgent`] instance drives one agent from `Uninitialized` to
//! `Stopped`. Every failure mode folds into the returned [`AgentReport`];
//! the only thing that stops a healthy agent is cancellation.

use crate::config::FleetParams;
use crate::ports::{
    Clock, DriverError, EventLog, FleetObserver, PageDriver, PageSession, RunEvent,
};
use roundtrip_domain::{
    AgentId, AgentPhase, AgentReport, AgentStatus, CycleStep, CycleTally, SessionProfile,
    TargetSpec,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Where a cycle broke, and why.
#[derive(Debug)]
struct CycleFailure {
    step: CycleStep,
    error: DriverError,
}

/// Runs one agent: session setup, navigation to the target, then the
/// unbounded cycle-retry loop until cancellation.
pub struct RunAgent<D: PageDriver> {
    driver: Arc<D>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn FleetObserver>,
    events: Arc<dyn EventLog>,
    params: FleetParams,
    target: TargetSpec,
    cancellation: CancellationToken,
}

impl<D: PageDriver> RunAgent<D> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        driver: Arc<D>,
        clock: Arc<dyn Clock>,
        observer: Arc<dyn FleetObserver>,
        events: Arc<dyn EventLog>,
        params: FleetParams,
        target: TargetSpec,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            driver,
            clock,
            observer,
            events,
            params,
            target,
            cancellation,
        }
    }

    /// Drive one agent to completion.
    ///
    /// `snapshots` receives the tally after every cycle so the fleet can
    /// still account for this agent if it has to be abandoned mid-flight.
    pub async fn execute(
        &self,
        profile: SessionProfile,
        snapshots: watch::Sender<CycleTally>,
    ) -> AgentReport {
        let id = profile.agent;
        let mut phase = AgentPhase::Uninitialized;

        self.observer.on_agent_start(id);
        self.events.log(RunEvent::new(
            "agent_started",
            json!({
                "agent": id,
                "debug_port": profile.debug_port,
                "control_port": profile.control_port,
            }),
        ));

        let session = match self.driver.open_session(&profile).await {
            Ok(session) => session,
            Err(driver_error) => {
                error!(agent = %id, error = %driver_error, "session setup failed");
                return self.finish(id, CycleTally::default(), AgentStatus::SetupFailed);
            }
        };
        enter_phase(id, &mut phase, AgentPhase::SessionReady);

        if let Err(driver_error) = self.go_on_target(session.as_ref()).await {
            error!(agent = %id, error = %driver_error, "could not reach target page");
            session.close().await;
            enter_phase(id, &mut phase, AgentPhase::Stopped);
            return self.finish(id, CycleTally::default(), AgentStatus::NavigationFailed);
        }
        enter_phase(id, &mut phase, AgentPhase::OnTarget);
        self.observer.on_agent_on_target(id);
        self.events.log(RunEvent::new(
            "agent_on_target",
            json!({ "agent": id, "url": self.target.url }),
        ));

        info!(agent = %id, url = %self.target.url, "starting cycle loop");
        enter_phase(id, &mut phase, AgentPhase::Cycling);
        let tally = self.cycle_loop(id, session.as_ref(), &snapshots).await;

        session.close().await;
        enter_phase(id, &mut phase, AgentPhase::Stopped);
        info!(
            agent = %id,
            completed = tally.completed,
            failed = tally.failed,
            "agent stopped"
        );
        self.finish(id, tally, AgentStatus::Stopped)
    }

    /// Load the target and confirm the page is in its base state,
    /// re-navigating once if the expected container is missing.
    async fn go_on_target(&self, session: &dyn PageSession) -> Result<(), DriverError> {
        session.navigate(&self.target.url).await?;
        session.settle(&self.target.dismiss).await;
        if !session.on_target(&self.target.container).await {
            debug!(container = %self.target.container, "base container missing, reloading");
            session.navigate(&self.target.url).await?;
            session.settle(&self.target.dismiss).await;
            if !session.on_target(&self.target.container).await {
                return Err(DriverError::Navigation(format!(
                    "container `{}` not found after reload",
                    self.target.container
                )));
            }
        }
        Ok(())
    }

    /// The unbounded retry loop. Cancellation is honored only here, at
    /// cycle boundaries; a cycle in flight always runs to its own end.
    async fn cycle_loop(
        &self,
        id: AgentId,
        session: &dyn PageSession,
        snapshots: &watch::Sender<CycleTally>,
    ) -> CycleTally {
        let mut tally = CycleTally::default();
        while !self.cancellation.is_cancelled() {
            match self.run_cycle(session).await {
                Ok(()) => {
                    tally.record_completed();
                    let _ = snapshots.send(tally);
                    debug!(agent = %id, completed = tally.completed, "cycle completed");
                    self.observer.on_cycle_complete(id, tally);
                    self.events.log(RunEvent::new(
                        "cycle_completed",
                        json!({
                            "agent": id,
                            "completed": tally.completed,
                            "failed": tally.failed,
                        }),
                    ));
                    self.pause(self.params.success_delay).await;
                }
                Err(failure) => {
                    tally.record_failed();
                    let _ = snapshots.send(tally);
                    warn!(
                        agent = %id,
                        step = %failure.step,
                        error = %failure.error,
                        "cycle failed, retrying after delay"
                    );
                    self.observer.on_cycle_fail(id, failure.step, tally);
                    self.events.log(RunEvent::new(
                        "cycle_failed",
                        json!({
                            "agent": id,
                            "step": failure.step,
                            "error": failure.error.to_string(),
                            "completed": tally.completed,
                            "failed": tally.failed,
                        }),
                    ));
                    self.pause(self.params.failure_delay).await;
                }
            }
        }
        tally
    }

    /// One attempt of the three-step sequence. The first failing step
    /// aborts the attempt; later steps are not tried.
    async fn run_cycle(&self, session: &dyn PageSession) -> Result<(), CycleFailure> {
        self.run_step(session, CycleStep::Activate, &self.target.choice)
            .await?;
        self.run_step(session, CycleStep::Submit, &self.target.submit)
            .await?;
        self.run_step(session, CycleStep::Return, &self.target.back)
            .await?;
        Ok(())
    }

    async fn run_step(
        &self,
        session: &dyn PageSession,
        step: CycleStep,
        selector: &str,
    ) -> Result<(), CycleFailure> {
        let element = session
            .wait_clickable(selector, self.params.step_timeout)
            .await
            .map_err(|error| CycleFailure { step, error })?;
        session
            .click(&element)
            .await
            .map_err(|error| CycleFailure { step, error })?;
        Ok(())
    }

    /// Inter-cycle pause, cut short by cancellation. Either way no new
    /// cycle starts once the token has fired.
    async fn pause(&self, delay: Duration) {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {}
            _ = self.clock.sleep(delay) => {}
        }
    }

    fn finish(&self, id: AgentId, tally: CycleTally, status: AgentStatus) -> AgentReport {
        self.events.log(RunEvent::new(
            "agent_stopped",
            json!({
                "agent": id,
                "status": status,
                "completed": tally.completed,
                "failed": tally.failed,
            }),
        ));
        self.observer.on_agent_stop(id, status, tally);
        AgentReport::new(id, tally, status)
    }
}

/// Advance the lifecycle, logging the new phase. Transitions are
/// hard-wired by the caller; an invalid one indicates a logic bug and is
/// logged instead of advancing.
fn enter_phase(agent: AgentId, phase: &mut AgentPhase, next: AgentPhase) {
    match phase.advance_to(next) {
        Ok(entered) => {
            *phase = entered;
            debug!(agent = %agent, phase = %entered, "entered phase");
        }
        Err(domain_error) => {
            warn!(agent = %agent, error = %domain_error, "refused phase transition");
        }
    }
}
