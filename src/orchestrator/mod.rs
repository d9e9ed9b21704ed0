//! Run orchestrator - the state machine driving one application run.
//!
//! A [`RunOrchestrator`] owns one background worker task per run. The worker
//! discovers the ordered job list, drives each item through the applicator,
//! and updates the shared [`StatusBoard`](crate::state::StatusBoard) and
//! [`LogSink`](crate::state::LogSink) that observers poll. Control operations
//! (pause/resume/stop/skip) run concurrently on other tasks and communicate
//! with the worker through the [`PauseGate`] and [`ControlChannel`].
//!
//! # Concurrency contract
//!
//! - The worker is the sole mutator of the progress counters; control
//!   operations only change the lifecycle state and signal the gate/queue.
//! - Pause takes effect at the top of a loop iteration, never mid-item.
//! - `stop` opens the gate in the same critical section that sets
//!   `Completed`, so a paused worker is guaranteed to unblock and observe the
//!   terminal state within one iteration.

mod control;

pub use control::{ControlChannel, ControlCommand, InvalidCommand, PauseGate};

use crate::models::{LogCategory, RunState, RunStatus, SearchCriteria};
use crate::services::{ApplyOutcome, JobApplicator, JobDiscovery};
use crate::state::{LogSink, RunEvent, StatusBoard};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Synchronous rejections reported to callers of [`RunOrchestrator::start`]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("a run is already active")]
    AlreadyRunning,

    #[error("search criteria must include a job title")]
    EmptyCriteria,
}

/// Orchestrates one application run over a discovered job list.
///
/// Constructed once and reused across runs; `start` resets the status and
/// log, so there is exactly one live status/log pair at a time. Worker
/// failures never surface to callers directly: they are reported through the
/// `Failed` state and the run log.
pub struct RunOrchestrator {
    status: StatusBoard,
    log: LogSink,
    controls: Arc<ControlChannel>,
    gate: Arc<PauseGate>,
    discovery: Arc<dyn JobDiscovery>,
    applicator: Arc<dyn JobApplicator>,
    job_delay: Duration,

    /// Handle of the current worker; held across start() so concurrent
    /// starts serialize and the previous worker is awaited before reset
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RunOrchestrator {
    pub fn new(
        log: LogSink,
        discovery: Arc<dyn JobDiscovery>,
        applicator: Arc<dyn JobApplicator>,
    ) -> Self {
        Self {
            status: StatusBoard::new(),
            log,
            controls: Arc::new(ControlChannel::new()),
            gate: Arc::new(PauseGate::new()),
            discovery,
            applicator,
            job_delay: Duration::ZERO,
            worker: Mutex::new(None),
        }
    }

    /// Delay inserted between processed jobs (the live backend paces
    /// applications; tests leave this at zero)
    pub fn with_job_delay(mut self, job_delay: Duration) -> Self {
        self.job_delay = job_delay;
        self
    }

    /// Start a new run.
    ///
    /// Resets the status and log, then spawns the background worker. Rejects
    /// blank criteria and refuses to start while a run is active; if the
    /// previous run just ended, its worker is awaited first so the reset
    /// cannot race a still-exiting task.
    pub async fn start(&self, criteria: SearchCriteria) -> Result<RunStatus, OrchestratorError> {
        if criteria.is_blank() {
            return Err(OrchestratorError::EmptyCriteria);
        }

        let mut worker = self.worker.lock().await;

        if self.status.state().is_active() {
            return Err(OrchestratorError::AlreadyRunning);
        }

        if let Some(previous) = worker.take() {
            let _ = previous.await;
        }

        self.status.reset();
        self.log.reset();
        // Commands queued against the previous run are stale input
        self.controls.drain_pending();
        self.gate.open();

        self.status.set_state(RunState::Running);
        self.log.append(
            LogCategory::Info,
            format!(
                "Starting automated job search for '{}' positions",
                criteria.job_title
            ),
        );

        let task = Worker {
            status: self.status.clone(),
            log: self.log.clone(),
            controls: Arc::clone(&self.controls),
            gate: Arc::clone(&self.gate),
            discovery: Arc::clone(&self.discovery),
            applicator: Arc::clone(&self.applicator),
            job_delay: self.job_delay,
        };
        *worker = Some(tokio::spawn(task.run(criteria)));

        Ok(self.status.snapshot())
    }

    /// Apply a control command and return the resulting status snapshot.
    ///
    /// Commands the current state does not admit are no-ops; the caller
    /// still gets the current snapshot back.
    pub fn control(&self, command: ControlCommand) -> RunStatus {
        match command {
            ControlCommand::Pause => {
                let gate = &self.gate;
                if self
                    .status
                    .transition_with(&[RunState::Running], RunState::Paused, || gate.close())
                    .is_some()
                {
                    self.log.append(LogCategory::Info, "Automation paused by user");
                }
            }
            ControlCommand::Resume => {
                let gate = &self.gate;
                if self
                    .status
                    .transition_with(&[RunState::Paused], RunState::Running, || gate.open())
                    .is_some()
                {
                    self.log.append(LogCategory::Info, "Automation resumed by user");
                }
            }
            ControlCommand::Stop => {
                // Opening the gate in the same critical section guarantees a
                // paused worker unblocks into the terminal state
                let gate = &self.gate;
                if self
                    .status
                    .transition_with(
                        &[RunState::Running, RunState::Paused],
                        RunState::Completed,
                        || gate.open(),
                    )
                    .is_some()
                {
                    self.log.append(LogCategory::Info, "Stop requested by user");
                }
            }
            ControlCommand::Skip => {
                if self.status.state().is_active() {
                    self.controls.enqueue(ControlCommand::Skip);
                    self.log.append(LogCategory::Warning, "Skip requested by user");
                }
            }
        }

        self.status.snapshot()
    }

    /// Current status snapshot; always succeeds
    pub fn status(&self) -> RunStatus {
        self.status.snapshot()
    }

    /// Full ordered log snapshot; always succeeds
    pub fn logs(&self) -> Vec<crate::models::LogEntry> {
        self.log.snapshot()
    }

    /// Subscribe to status change events (push-style observation)
    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.status.subscribe()
    }
}

/// The background worker for one run; all fields are cheap shared handles.
struct Worker {
    status: StatusBoard,
    log: LogSink,
    controls: Arc<ControlChannel>,
    gate: Arc<PauseGate>,
    discovery: Arc<dyn JobDiscovery>,
    applicator: Arc<dyn JobApplicator>,
    job_delay: Duration,
}

impl Worker {
    async fn run(self, criteria: SearchCriteria) {
        if let Err(err) = self.process(&criteria).await {
            tracing::error!("run aborted: {err:#}");
            self.log
                .append(LogCategory::Error, format!("Automation error: {err:#}"));
            self.status.update(|status| {
                status.state = RunState::Failed;
                status.clear_current_job();
            });
        }
    }

    /// The worker loop. Per-item failures are absorbed here; any `Err`
    /// escaping this function is an infrastructure fault that fails the run.
    async fn process(&self, criteria: &SearchCriteria) -> anyhow::Result<()> {
        let items = self
            .discovery
            .discover(criteria)
            .await
            .context("job discovery failed")?;

        if items.is_empty() {
            self.log
                .append(LogCategory::Error, "No job listings found. Automation failed.");
            self.status.set_state(RunState::Failed);
            return Ok(());
        }

        self.status.set_total(items.len());
        self.log
            .append(LogCategory::Info, format!("Found {} jobs to apply for", items.len()));

        // Each queued Skip consumes exactly one subsequent item
        let mut pending_skips: usize = 0;

        for item in &items {
            if self.status.state().is_terminal() {
                self.log.append(LogCategory::Info, "Automation stopped by user");
                break;
            }

            if self.status.state() == RunState::Paused {
                self.log.append(LogCategory::Info, "Automation paused");
                self.gate.wait_until_open().await;
                if self.status.state().is_terminal() {
                    self.log.append(LogCategory::Info, "Automation stopped by user");
                    break;
                }
                self.log.append(LogCategory::Info, "Automation resumed");
            }

            for command in self.controls.drain_pending() {
                if command == ControlCommand::Skip {
                    pending_skips += 1;
                }
            }

            if pending_skips > 0 {
                pending_skips -= 1;
                self.log.append(
                    LogCategory::Warning,
                    format!("Skipping \"{}\" as requested", item.title),
                );
                self.status.record_failed();
                continue;
            }

            self.status.set_current_job(item);

            match self.applicator.apply(item).await {
                Ok(ApplyOutcome::Submitted) => {
                    self.status.record_completed();
                    self.log.append(
                        LogCategory::Success,
                        format!("Successfully applied to \"{}\"", item.title),
                    );
                }
                Ok(ApplyOutcome::Rejected(reason)) => {
                    self.status.record_failed();
                    self.log.append(LogCategory::Error, reason);
                    self.log.append(
                        LogCategory::Error,
                        format!("Failed to apply to \"{}\"", item.title),
                    );
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("applying to \"{}\" aborted", item.title));
                }
            }

            self.status.clear_current_job();

            if !self.job_delay.is_zero() {
                tokio::time::sleep(self.job_delay).await;
            }
        }

        // Only a natural finish moves Running to Completed; an external stop
        // already set the terminal state
        if self
            .status
            .transition(&[RunState::Running], RunState::Completed)
            .is_some()
        {
            self.log.append(
                LogCategory::Success,
                "Automation process completed successfully",
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::application::MockJobApplicator;
    use crate::services::discovery::{DiscoveryError, MockJobDiscovery};
    use crate::models::JobItem;

    async fn wait_until(orchestrator: &RunOrchestrator, pred: impl Fn(&RunStatus) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if pred(&orchestrator.status()) {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    fn listings(count: u64) -> Vec<JobItem> {
        (1..=count)
            .map(|id| JobItem::new(id, format!("Role {id}"), format!("https://example.com/{id}")))
            .collect()
    }

    #[tokio::test]
    async fn test_blank_criteria_rejected_without_state_change() {
        let mut discovery = MockJobDiscovery::new();
        discovery.expect_discover().never();

        let orchestrator = RunOrchestrator::new(
            LogSink::new(),
            Arc::new(discovery),
            Arc::new(MockJobApplicator::new()),
        );

        let err = orchestrator.start(SearchCriteria::new("  ")).await.unwrap_err();
        assert_eq!(err, OrchestratorError::EmptyCriteria);
        assert_eq!(orchestrator.status().state, RunState::Idle);
        assert!(orchestrator.logs().is_empty());
    }

    #[tokio::test]
    async fn test_discovery_fault_fails_run() {
        let mut discovery = MockJobDiscovery::new();
        discovery
            .expect_discover()
            .returning(|_| Err(DiscoveryError::Backend("linkedin unreachable".to_string())));

        let orchestrator = RunOrchestrator::new(
            LogSink::new(),
            Arc::new(discovery),
            Arc::new(MockJobApplicator::new()),
        );

        orchestrator
            .start(SearchCriteria::new("Backend Developer"))
            .await
            .unwrap();
        wait_until(&orchestrator, |s| s.state == RunState::Failed).await;

        let logs = orchestrator.logs();
        assert!(
            logs.iter()
                .any(|e| e.category == LogCategory::Error && e.message.contains("linkedin unreachable"))
        );
    }

    #[tokio::test]
    async fn test_applicator_fault_fails_run_mid_list() {
        let mut discovery = MockJobDiscovery::new();
        discovery.expect_discover().returning(|_| Ok(listings(3)));

        let mut applicator = MockJobApplicator::new();
        applicator.expect_apply().returning(|item| {
            if item.id == 2 {
                Err(crate::services::ApplyError::SessionLost(
                    "chrome crashed".to_string(),
                ))
            } else {
                Ok(ApplyOutcome::Submitted)
            }
        });

        let orchestrator =
            RunOrchestrator::new(LogSink::new(), Arc::new(discovery), Arc::new(applicator));

        orchestrator.start(SearchCriteria::new("QA Engineer")).await.unwrap();
        wait_until(&orchestrator, |s| s.state == RunState::Failed).await;

        let status = orchestrator.status();
        assert_eq!(status.jobs_completed, 1);
        assert!(status.current_job_id.is_none());
    }

    #[tokio::test]
    async fn test_natural_completion() {
        let mut discovery = MockJobDiscovery::new();
        discovery.expect_discover().returning(|_| Ok(listings(2)));

        let mut applicator = MockJobApplicator::new();
        applicator
            .expect_apply()
            .times(2)
            .returning(|_| Ok(ApplyOutcome::Submitted));

        let orchestrator =
            RunOrchestrator::new(LogSink::new(), Arc::new(discovery), Arc::new(applicator));

        orchestrator.start(SearchCriteria::new("DevOps")).await.unwrap();
        wait_until(&orchestrator, |s| s.state.is_terminal()).await;

        let status = orchestrator.status();
        assert_eq!(status.state, RunState::Completed);
        assert_eq!(status.jobs_total, 2);
        assert_eq!(status.jobs_completed, 2);
        assert_eq!(status.jobs_failed, 0);
    }

    #[tokio::test]
    async fn test_control_is_noop_when_idle() {
        let orchestrator = RunOrchestrator::new(
            LogSink::new(),
            Arc::new(MockJobDiscovery::new()),
            Arc::new(MockJobApplicator::new()),
        );

        let status = orchestrator.control(ControlCommand::Pause);
        assert_eq!(status.state, RunState::Idle);
        let status = orchestrator.control(ControlCommand::Stop);
        assert_eq!(status.state, RunState::Idle);
        let status = orchestrator.control(ControlCommand::Skip);
        assert_eq!(status.state, RunState::Idle);
        assert!(orchestrator.logs().is_empty());
    }
}
