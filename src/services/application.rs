use crate::models::{CandidateProfile, JobItem, LogCategory};
use crate::state::LogSink;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result of performing one application.
///
/// `Rejected` is an expected per-item failure: it is counted and logged but
/// never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Submitted,
    Rejected(String),
}

/// Infrastructure faults while applying; these abort the run
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("browser session lost: {0}")]
    SessionLost(String),

    #[error("application timed out after {0:?}")]
    Timeout(Duration),
}

/// Performs the actual application for one job item.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobApplicator: Send + Sync {
    async fn apply(&self, item: &JobItem) -> Result<ApplyOutcome, ApplyError>;
}

/// Deterministic applicator stand-in used by the demo binary.
///
/// Mirrors the development backend: narrates page loading and form filling
/// into the run log and rejects every item whose id is a multiple of 5
/// ("No Apply button found").
pub struct SimulatedApplicator {
    log: LogSink,
    candidate: CandidateProfile,
    pacing: Duration,
}

impl SimulatedApplicator {
    pub fn new(log: LogSink, candidate: CandidateProfile) -> Self {
        Self {
            log,
            candidate,
            pacing: Duration::from_millis(250),
        }
    }

    /// Delay between narrated steps; tests use `Duration::ZERO`.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    async fn step(&self) {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
    }
}

#[async_trait]
impl JobApplicator for SimulatedApplicator {
    async fn apply(&self, item: &JobItem) -> Result<ApplyOutcome, ApplyError> {
        self.log
            .append(LogCategory::Info, format!("Applying to: {}", item.link));
        self.log
            .append(LogCategory::Info, format!("Job title: {}", item.title));

        self.log.append(LogCategory::Info, "Loading job page...");
        self.step().await;

        self.log
            .append(LogCategory::Info, "Checking application options...");
        self.log
            .append(LogCategory::Search, "Searching for 'Apply' button...");
        self.step().await;

        if item.id % 5 == 0 {
            return Ok(ApplyOutcome::Rejected(
                "No Apply button found or application form error".to_string(),
            ));
        }

        self.log.append(LogCategory::Success, "Found Easy Apply button");
        self.log.append(LogCategory::Info, "Filling application form...");
        self.step().await;
        self.log.append(
            LogCategory::Success,
            format!("Filled personal information for {}", self.candidate.full_name),
        );
        self.log.append(
            LogCategory::Success,
            format!("Resume uploaded successfully ({})", self.candidate.resume_path),
        );

        Ok(ApplyOutcome::Submitted)
    }
}
