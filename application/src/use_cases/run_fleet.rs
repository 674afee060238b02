//! Fleet orchestration: one worker task per agent, join, aggregate.
//!
//! The fleet spawns exactly one task per agent (no queuing), then collects
//! their reports as they finish. Cancellation starts a grace window; when
//! it expires the remaining workers are aborted and reported from their
//! last published tally snapshot. The aggregate report is assembled once,
//! after the collection loop ends, never from live counters.

use crate::config::FleetParams;
use crate::ports::{Clock, EventLog, FleetObserver, PageDriver, RunEvent};
use crate::use_cases::run_agent::RunAgent;
use roundtrip_domain::{AgentId, AgentReport, AgentStatus, CycleTally, FleetReport, TargetSpec};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{self, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Runs a whole fleet to completion and aggregates the outcome.
pub struct RunFleet<D: PageDriver + 'static> {
    driver: Arc<D>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn FleetObserver>,
    events: Arc<dyn EventLog>,
    params: FleetParams,
    target: TargetSpec,
    cancellation: CancellationToken,
}

impl<D: PageDriver + 'static> RunFleet<D> {
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

    /// Run every agent and return the aggregate report.
    ///
    /// Returns normally on cancellation too; only the per-agent statuses
    /// say how each worker ended.
    pub async fn execute(&self) -> FleetReport {
        let size = self.params.size;
        info!(instances = size.get(), url = %self.target.url, "starting fleet");
        self.observer.on_fleet_start(size);
        self.events.log(RunEvent::new(
            "fleet_started",
            json!({ "instances": size.get(), "url": self.target.url }),
        ));

        let mut join_set: JoinSet<AgentReport> = JoinSet::new();
        let mut task_agents: HashMap<task::Id, AgentId> = HashMap::new();
        let mut snapshots: HashMap<AgentId, watch::Receiver<CycleTally>> = HashMap::new();

        for id in size.agent_ids() {
            let profile = self.params.profile_for(id);
            let (tally_tx, tally_rx) = watch::channel(CycleTally::default());
            snapshots.insert(id, tally_rx);

            let agent = RunAgent::new(
                Arc::clone(&self.driver),
                Arc::clone(&self.clock),
                Arc::clone(&self.observer),
                Arc::clone(&self.events),
                self.params.clone(),
                self.target.clone(),
                self.cancellation.clone(),
            );
            let handle = join_set.spawn(async move { agent.execute(profile, tally_tx).await });
            task_agents.insert(handle.id(), id);
        }

        let reports = self.collect(join_set, &task_agents, &snapshots).await;
        let report = FleetReport::from_agents(reports);

        info!(
            completed = report.total_completed(),
            failed = report.total_failed(),
            "fleet finished"
        );
        self.events.log(RunEvent::new(
            "fleet_finished",
            json!({
                "total_completed": report.total_completed(),
                "total_failed": report.total_failed(),
                "agents": report.agents,
            }),
        ));
        report
    }

    /// Join workers. Once cancellation fires, keep joining for the grace
    /// window, then abort whatever is left.
    async fn collect(
        &self,
        mut join_set: JoinSet<AgentReport>,
        task_agents: &HashMap<task::Id, AgentId>,
        snapshots: &HashMap<AgentId, watch::Receiver<CycleTally>>,
    ) -> Vec<AgentReport> {
        let mut reports = Vec::with_capacity(task_agents.len());

        // Until done or cancelled.
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => break,
                joined = join_set.join_next() => match joined {
                    Some(result) => {
                        if let Some(report) = self.report_from_join(result, task_agents, snapshots) {
                            reports.push(report);
                        }
                    }
                    None => return reports,
                },
            }
        }

        // Cancelled: grant the grace window.
        info!(grace = ?self.params.grace_period, "cancellation received, draining workers");
        let grace = self.clock.sleep(self.params.grace_period);
        tokio::pin!(grace);
        loop {
            tokio::select! {
                biased;
                _ = &mut grace => {
                    warn!("grace window expired, aborting remaining workers");
                    break;
                }
                joined = join_set.join_next() => match joined {
                    Some(result) => {
                        if let Some(report) = self.report_from_join(result, task_agents, snapshots) {
                            reports.push(report);
                        }
                    }
                    None => return reports,
                },
            }
        }

        // Abandoned workers surface as aborted joins; report them from
        // their last snapshot.
        join_set.abort_all();
        while let Some(result) = join_set.join_next().await {
            if let Some(report) = self.report_from_join(result, task_agents, snapshots) {
                reports.push(report);
            }
        }
        reports
    }

    fn report_from_join(
        &self,
        result: Result<AgentReport, JoinError>,
        task_agents: &HashMap<task::Id, AgentId>,
        snapshots: &HashMap<AgentId, watch::Receiver<CycleTally>>,
    ) -> Option<AgentReport> {
        match result {
            Ok(report) => Some(report),
            Err(join_error) => {
                let Some(&id) = task_agents.get(&join_error.id()) else {
                    error!(%join_error, "join result from unknown worker task");
                    return None;
                };
                let tally = snapshots.get(&id).map(|rx| *rx.borrow()).unwrap_or_default();
                let status = if join_error.is_cancelled() {
                    warn!(agent = %id, "worker abandoned after grace window");
                    AgentStatus::Aborted
                } else {
                    error!(agent = %id, %join_error, "worker crashed");
                    AgentStatus::Crashed
                };
                Some(AgentReport::new(id, tally, status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{
        DriverError, ElementHandle, NoEventLog, PageSession,
    };
    use async_trait::async_trait;
    use roundtrip_domain::{CycleStep, FleetSize, SessionProfile};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Mocks ====================

    #[derive(Clone, Copy, PartialEq)]
    enum StepPlan {
        Ok,
        Fail,
        Hang,
        Panic,
    }

    struct AgentScript {
        /// Consumed per wait; when exhausted, `fallback` applies forever.
        waits: Mutex<VecDeque<StepPlan>>,
        fallback: StepPlan,
        fail_open: bool,
        /// Cancelled the moment a `Hang` step starts, so shutdown tests
        /// can fire while a cycle is provably in flight.
        cancel_on_hang: Option<CancellationToken>,
    }

    impl AgentScript {
        fn succeeding() -> Self {
            Self {
                waits: Mutex::new(VecDeque::new()),
                fallback: StepPlan::Ok,
                fail_open: false,
                cancel_on_hang: None,
            }
        }

        fn failing_waits() -> Self {
            Self {
                fallback: StepPlan::Fail,
                ..Self::succeeding()
            }
        }

        fn failing_open() -> Self {
            Self {
                fail_open: true,
                ..Self::succeeding()
            }
        }

        fn panicking() -> Self {
            Self {
                fallback: StepPlan::Panic,
                ..Self::succeeding()
            }
        }

        fn hanging_after_one_cycle(token: CancellationToken) -> Self {
            Self {
                waits: Mutex::new(VecDeque::from(vec![StepPlan::Ok; 3])),
                fallback: StepPlan::Hang,
                cancel_on_hang: Some(token),
                ..Self::succeeding()
            }
        }
    }

    struct ScriptedSession {
        script: Arc<AgentScript>,
    }

    #[async_trait]
    impl PageSession for ScriptedSession {
        async fn navigate(&self, _url: &str) -> Result<(), DriverError> {
            Ok(())
        }

        async fn wait_clickable(
            &self,
            selector: &str,
            _timeout: Duration,
        ) -> Result<ElementHandle, DriverError> {
            let plan = self
                .script
                .waits
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(self.script.fallback);
            match plan {
                StepPlan::Ok => Ok(ElementHandle(selector.to_string())),
                StepPlan::Fail => Err(DriverError::WaitTimeout {
                    selector: selector.to_string(),
                }),
                StepPlan::Hang => {
                    if let Some(token) = &self.script.cancel_on_hang {
                        token.cancel();
                    }
                    std::future::pending::<()>().await;
                    unreachable!("pending future resolved");
                }
                StepPlan::Panic => panic!("scripted worker panic"),
            }
        }

        async fn click(&self, _element: &ElementHandle) -> Result<(), DriverError> {
            Ok(())
        }

        async fn settle(&self, _selectors: &[String]) {}

        async fn on_target(&self, _container: &str) -> bool {
            true
        }

        async fn close(&self) {}
    }

    #[derive(Default)]
    struct ScriptedDriver {
        scripts: HashMap<u32, Arc<AgentScript>>,
        seen_profiles: Mutex<Vec<SessionProfile>>,
    }

    impl ScriptedDriver {
        fn with_script(mut self, agent: u32, script: AgentScript) -> Self {
            self.scripts.insert(agent, Arc::new(script));
            self
        }
    }

    #[async_trait]
    impl PageDriver for ScriptedDriver {
        async fn open_session(
            &self,
            profile: &SessionProfile,
        ) -> Result<Box<dyn PageSession>, DriverError> {
            self.seen_profiles.lock().unwrap().push(profile.clone());
            let script = self
                .scripts
                .get(&profile.agent.get())
                .cloned()
                .unwrap_or_else(|| Arc::new(AgentScript::succeeding()));
            if script.fail_open {
                return Err(DriverError::Setup("no driver for this agent".to_string()));
            }
            Ok(Box::new(ScriptedSession { script }))
        }
    }

    /// Near-instant sleeps, except the grace window which never elapses.
    /// Keeps cycle pacing free while making "wait out the grace period" an
    /// explicit choice of the test.
    struct HoldGraceClock {
        grace: Duration,
    }

    #[async_trait]
    impl Clock for HoldGraceClock {
        async fn sleep(&self, duration: Duration) {
            if duration == self.grace {
                std::future::pending::<()>().await;
            }
            tokio::task::yield_now().await;
        }
    }

    /// Every sleep yields once and returns, the grace window included.
    struct InstantClock;

    #[async_trait]
    impl Clock for InstantClock {
        async fn sleep(&self, _duration: Duration) {
            tokio::task::yield_now().await;
        }
    }

    /// Cancels the token once every `(agent, min_attempts)` threshold is
    /// reached, using only the snapshots the callbacks carry.
    struct CancelWhenObserver {
        token: CancellationToken,
        thresholds: Vec<(u32, u64)>,
        tallies: Mutex<HashMap<u32, CycleTally>>,
    }

    impl CancelWhenObserver {
        fn new(token: CancellationToken, thresholds: Vec<(u32, u64)>) -> Self {
            Self {
                token,
                thresholds,
                tallies: Mutex::new(HashMap::new()),
            }
        }

        fn note(&self, id: AgentId, tally: CycleTally) {
            if self.thresholds.is_empty() {
                return;
            }
            let mut tallies = self.tallies.lock().unwrap();
            tallies.insert(id.get(), tally);
            let all_reached = self.thresholds.iter().all(|(agent, min_attempts)| {
                tallies
                    .get(agent)
                    .is_some_and(|tally| tally.attempts() >= *min_attempts)
            });
            if all_reached {
                self.token.cancel();
            }
        }
    }

    impl FleetObserver for CancelWhenObserver {
        fn on_fleet_start(&self, _size: FleetSize) {}
        fn on_agent_start(&self, _id: AgentId) {}
        fn on_cycle_complete(&self, id: AgentId, tally: CycleTally) {
            self.note(id, tally);
        }
        fn on_cycle_fail(&self, id: AgentId, _step: CycleStep, tally: CycleTally) {
            self.note(id, tally);
        }
        fn on_agent_stop(&self, _id: AgentId, _status: AgentStatus, _tally: CycleTally) {}
    }

    // ==================== Helpers ====================

    fn params(size: u32) -> FleetParams {
        FleetParams::default().with_size(FleetSize::new(size))
    }

    fn fleet(
        driver: ScriptedDriver,
        clock: Arc<dyn Clock>,
        token: CancellationToken,
        thresholds: Vec<(u32, u64)>,
        size: u32,
    ) -> (RunFleet<ScriptedDriver>, Arc<ScriptedDriver>) {
        let driver = Arc::new(driver);
        let observer = Arc::new(CancelWhenObserver::new(token.clone(), thresholds));
        let run = RunFleet::new(
            Arc::clone(&driver),
            clock,
            observer,
            Arc::new(NoEventLog),
            params(size),
            TargetSpec::default(),
            token,
        );
        (run, driver)
    }

    fn agent_report<'a>(report: &'a FleetReport, id: u32) -> &'a AgentReport {
        report
            .agents
            .iter()
            .find(|agent| agent.id.get() == id)
            .expect("agent missing from report")
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn spawns_one_isolated_session_per_agent() {
        let token = CancellationToken::new();
        let (run, driver) = fleet(
            ScriptedDriver::default(),
            Arc::new(HoldGraceClock { grace: Duration::from_secs(2) }),
            token,
            vec![(1, 1), (2, 1), (3, 1)],
            3,
        );
        let report = run.execute().await;

        assert_eq!(report.agents.len(), 3);
        let profiles = driver.seen_profiles.lock().unwrap().clone();
        assert_eq!(profiles.len(), 3);

        let mut debug_ports: Vec<u16> = profiles.iter().map(|p| p.debug_port).collect();
        debug_ports.sort_unstable();
        assert_eq!(debug_ports, vec![9223, 9224, 9225]);

        let mut control_ports: Vec<u16> = profiles.iter().map(|p| p.control_port).collect();
        control_ports.sort_unstable();
        assert_eq!(control_ports, vec![9516, 9517, 9518]);

        let mut dirs: Vec<_> = profiles.iter().map(|p| p.user_data_dir.clone()).collect();
        dirs.sort();
        dirs.dedup();
        assert_eq!(dirs.len(), 3, "profile directories must not collide");
    }

    #[tokio::test]
    async fn aggregates_independent_tallies() {
        let token = CancellationToken::new();
        let driver = ScriptedDriver::default()
            .with_script(1, AgentScript::failing_waits())
            .with_script(2, AgentScript::succeeding());
        let (run, _driver) = fleet(
            driver,
            Arc::new(HoldGraceClock { grace: Duration::from_secs(2) }),
            token,
            vec![(1, 2), (2, 2)],
            2,
        );
        let report = run.execute().await;

        let first = agent_report(&report, 1);
        assert_eq!(first.tally.completed, 0);
        assert!(first.tally.failed >= 2);
        assert_eq!(first.status, AgentStatus::Stopped);

        let second = agent_report(&report, 2);
        assert!(second.tally.completed >= 2);
        assert_eq!(second.tally.failed, 0);
        assert_eq!(second.status, AgentStatus::Stopped);

        let completed_sum: u64 = report.agents.iter().map(|a| a.tally.completed).sum();
        let failed_sum: u64 = report.agents.iter().map(|a| a.tally.failed).sum();
        assert_eq!(report.total_completed(), completed_sum);
        assert_eq!(report.total_failed(), failed_sum);
    }

    #[tokio::test]
    async fn setup_failure_stays_contained_to_its_agent() {
        let token = CancellationToken::new();
        let driver = ScriptedDriver::default().with_script(2, AgentScript::failing_open());
        let (run, _driver) = fleet(
            driver,
            Arc::new(HoldGraceClock { grace: Duration::from_secs(2) }),
            token,
            vec![(1, 1), (3, 1)],
            3,
        );
        let report = run.execute().await;

        let unlucky = agent_report(&report, 2);
        assert_eq!(unlucky.status, AgentStatus::SetupFailed);
        assert_eq!(unlucky.tally.attempts(), 0);

        for id in [1, 3] {
            let sibling = agent_report(&report, id);
            assert_eq!(sibling.status, AgentStatus::Stopped);
            assert!(sibling.tally.completed >= 1);
        }
    }

    #[tokio::test]
    async fn panicking_worker_is_reported_crashed_and_isolated() {
        let token = CancellationToken::new();
        let driver = ScriptedDriver::default().with_script(1, AgentScript::panicking());
        let (run, _driver) = fleet(
            driver,
            Arc::new(HoldGraceClock { grace: Duration::from_secs(2) }),
            token,
            vec![(2, 1)],
            2,
        );
        let report = run.execute().await;

        assert_eq!(agent_report(&report, 1).status, AgentStatus::Crashed);
        let sibling = agent_report(&report, 2);
        assert_eq!(sibling.status, AgentStatus::Stopped);
        assert!(sibling.tally.completed >= 1);
    }

    #[tokio::test]
    async fn grace_expiry_aborts_in_flight_worker_with_last_snapshot() {
        let token = CancellationToken::new();
        let driver = ScriptedDriver::default()
            .with_script(1, AgentScript::hanging_after_one_cycle(token.clone()));
        let (run, _driver) = fleet(driver, Arc::new(InstantClock), token, vec![], 1);
        let report = run.execute().await;

        let abandoned = agent_report(&report, 1);
        assert_eq!(abandoned.status, AgentStatus::Aborted);
        assert_eq!(abandoned.tally.completed, 1);
        assert_eq!(report.total_completed(), 1);
    }
}
