use crate::models::{JobItem, LogCategory, SearchCriteria};
use crate::state::LogSink;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that abort a run during discovery
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("search backend unavailable: {0}")]
    Backend(String),

    #[error("discovery timed out after {0:?}")]
    Timeout(Duration),
}

/// Produces the ordered job list for a run.
///
/// The returned order is the processing order; implementations must preserve
/// it. An empty result is valid output (the orchestrator fails the run), an
/// `Err` is an infrastructure fault.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobDiscovery: Send + Sync {
    async fn discover(&self, criteria: &SearchCriteria) -> Result<Vec<JobItem>, DiscoveryError>;
}

/// Deterministic discovery stand-in used by the demo binary.
///
/// Mirrors the development backend: narrates the browser launch and LinkedIn
/// search into the run log, then yields `listing_count` job items with
/// sequential ids.
pub struct SimulatedDiscovery {
    log: LogSink,
    listing_count: usize,
    pacing: Duration,
}

impl SimulatedDiscovery {
    pub fn new(log: LogSink) -> Self {
        Self {
            log,
            listing_count: 8,
            pacing: Duration::from_millis(250),
        }
    }

    pub fn with_listing_count(mut self, listing_count: usize) -> Self {
        self.listing_count = listing_count;
        self
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
impl JobDiscovery for SimulatedDiscovery {
    async fn discover(&self, criteria: &SearchCriteria) -> Result<Vec<JobItem>, DiscoveryError> {
        self.log.append(LogCategory::Info, "Launching Chrome browser...");
        self.step().await;
        self.log.append(LogCategory::Info, "Chrome launched successfully");

        self.log
            .append(LogCategory::Search, "Navigating to LinkedIn jobs page...");
        self.step().await;
        self.log
            .append(LogCategory::Success, "LinkedIn jobs page opened successfully");

        self.log.append(
            LogCategory::Info,
            format!("Searching for '{}' positions...", criteria.job_title),
        );
        self.step().await;
        self.log
            .append(LogCategory::Success, "Search completed. Found job listings.");

        let items = (1..=self.listing_count as u64)
            .map(|id| {
                JobItem::new(
                    id,
                    format!("{} at Company {}", criteria.job_title, id),
                    format!("https://linkedin.com/jobs/view/job-{id}"),
                )
            })
            .collect();

        Ok(items)
    }
}
