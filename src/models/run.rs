use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::JobItem;

/// Lifecycle state of an application run.
///
/// The transition graph is owned by
/// [`RunOrchestrator`](crate::orchestrator::RunOrchestrator):
///
/// ```text
/// Idle --start--> Running <--resume/pause--> Paused
/// {Running, Paused} --stop / exhausted--> Completed
/// {Running, Paused} --error / empty discovery--> Failed
/// ```
///
/// `Completed` and `Failed` are terminal until the next `start`, which
/// re-enters `Idle` implicitly as part of the status reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Completed,
    Failed,
}

impl RunState {
    /// A run is active while its worker may still process items.
    pub fn is_active(self) -> bool {
        matches!(self, RunState::Running | RunState::Paused)
    }

    /// Terminal states admit no transition except a new `start`.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Mutable snapshot of run progress.
///
/// Exactly one instance is live at a time; it is reset when a run starts and
/// mutated only through [`StatusBoard`](crate::state::StatusBoard) so that
/// concurrent observers always see a consistent copy.
///
/// Serializes with the JSON keys the monitoring frontend polls:
/// `{"status", "jobsTotal", "jobsCompleted", "jobsFailed", "currentJobId",
/// "currentJobTitle"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    #[serde(rename = "status")]
    pub state: RunState,

    pub jobs_total: usize,
    pub jobs_completed: usize,
    pub jobs_failed: usize,

    /// Identity of the job currently being applied to, absent when idle or
    /// between items.
    pub current_job_id: Option<u64>,
    pub current_job_title: Option<String>,
}

impl Default for RunStatus {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
            jobs_total: 0,
            jobs_completed: 0,
            jobs_failed: 0,
            current_job_id: None,
            current_job_title: None,
        }
    }
}

impl RunStatus {
    /// Number of items accounted for so far (completed or failed).
    pub fn jobs_processed(&self) -> usize {
        self.jobs_completed + self.jobs_failed
    }

    /// Reset to the `Idle`/zero state at the start of a new run.
    pub fn reset(&mut self) {
        *self = RunStatus::default();
    }

    /// Mark `job` as the item currently being processed.
    pub fn set_current_job(&mut self, job: &JobItem) {
        self.current_job_id = Some(job.id);
        self.current_job_title = Some(job.title.clone());
    }

    /// Clear the current-item markers between items.
    pub fn clear_current_job(&mut self) {
        self.current_job_id = None;
        self.current_job_title = None;
    }
}
