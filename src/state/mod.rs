// Shared run state
//
// This module provides the StatusBoard which wraps RunStatus with thread-safe
// access using Arc<RwLock<T>> and emits change events for push-style
// observers, plus the LogSink holding the append-only run log.

mod log;

pub use log::LogSink;

use crate::models::{JobItem, RunState, RunStatus};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when the run status is modified
///
/// These events are emitted to notify interested parties (a TUI or a
/// server-sent-events transport) about status changes without requiring them
/// to poll. Polling observers use [`StatusBoard::snapshot`] instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunEvent {
    /// The run lifecycle state has changed
    StateChanged { from: RunState, to: RunState },

    /// Progress counters have been updated
    ProgressUpdated {
        completed: usize,
        failed: usize,
        total: usize,
    },

    /// The item currently being processed has changed
    CurrentJobChanged {
        job_id: Option<u64>,
        job_title: Option<String>,
    },
}

/// Thread-safe run status accessor with event emission
///
/// This is the central status component of a run. It:
/// - Provides thread-safe access to [`RunStatus`] via `Arc<RwLock<T>>`
/// - Detects status changes and emits [`RunEvent`]s
/// - Offers compare-state-and-set transitions so control operations and the
///   worker never race each other into an invalid state
///
/// All mutators and [`snapshot()`](Self::snapshot) are mutually exclusive
/// with respect to each other: observers never see a torn update spanning
/// multiple fields.
pub struct StatusBoard {
    status: Arc<RwLock<RunStatus>>,

    /// Broadcast channel for emitting status change events
    event_tx: broadcast::Sender<RunEvent>,
}

impl StatusBoard {
    /// Create a new StatusBoard in the `Idle` state
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            status: Arc::new(RwLock::new(RunStatus::default())),
            event_tx,
        }
    }

    /// Get a consistent point-in-time copy of the current status
    pub fn snapshot(&self) -> RunStatus {
        self.status.read().unwrap().clone()
    }

    /// Execute a function with read access to the status
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RunStatus) -> R,
    {
        let status = self.status.read().unwrap();
        f(&status)
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.read(|s| s.state)
    }

    /// Update the status and emit change events
    ///
    /// This is the primary way to modify the status. It captures the old
    /// status, applies the update function, diffs the two, and emits the
    /// appropriate events.
    ///
    /// # Returns
    /// The events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<RunEvent>
    where
        F: FnOnce(&mut RunStatus),
    {
        let mut status = self.status.write().unwrap();
        let old = status.clone();

        update_fn(&mut status);

        let events = Self::detect_changes(&old, &status);
        for event in &events {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.event_tx.send(event.clone());
        }

        events
    }

    /// Subscribe to status change events
    ///
    /// Returns a receiver that will get notified of all future changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.event_tx.subscribe()
    }

    /// Transition to `to` if the current state is one of `allowed`
    ///
    /// # Returns
    /// The previous state when the transition was applied, `None` otherwise
    pub fn transition(&self, allowed: &[RunState], to: RunState) -> Option<RunState> {
        self.transition_with(allowed, to, || {})
    }

    /// Transition to `to` if the current state is one of `allowed`, running
    /// `on_apply` while the write lock is still held
    ///
    /// The side effect executes atomically with the state change, so a
    /// control operation can close or open the pause gate without any window
    /// in which the worker could observe the new state with the old gate
    /// position.
    pub fn transition_with<F>(&self, allowed: &[RunState], to: RunState, on_apply: F) -> Option<RunState>
    where
        F: FnOnce(),
    {
        let mut previous = None;
        self.update(|status| {
            if allowed.contains(&status.state) {
                previous = Some(status.state);
                status.state = to;
                on_apply();
            }
        });
        previous
    }

    fn detect_changes(old: &RunStatus, new: &RunStatus) -> Vec<RunEvent> {
        let mut events = Vec::new();

        if old.state != new.state {
            events.push(RunEvent::StateChanged {
                from: old.state,
                to: new.state,
            });
        }

        if old.jobs_completed != new.jobs_completed
            || old.jobs_failed != new.jobs_failed
            || old.jobs_total != new.jobs_total
        {
            events.push(RunEvent::ProgressUpdated {
                completed: new.jobs_completed,
                failed: new.jobs_failed,
                total: new.jobs_total,
            });
        }

        if old.current_job_id != new.current_job_id || old.current_job_title != new.current_job_title {
            events.push(RunEvent::CurrentJobChanged {
                job_id: new.current_job_id,
                job_title: new.current_job_title.clone(),
            });
        }

        events
    }

    // Convenience mutators used by the orchestrator and its worker

    /// Reset to `Idle`/zero at the start of a new run
    pub fn reset(&self) -> Vec<RunEvent> {
        self.update(|status| status.reset())
    }

    /// Set the lifecycle state unconditionally
    pub fn set_state(&self, state: RunState) -> Vec<RunEvent> {
        self.update(|status| status.state = state)
    }

    /// Record the total number of discovered items
    pub fn set_total(&self, total: usize) -> Vec<RunEvent> {
        self.update(|status| status.jobs_total = total)
    }

    /// Mark `job` as the item currently being processed
    pub fn set_current_job(&self, job: &JobItem) -> Vec<RunEvent> {
        self.update(|status| status.set_current_job(job))
    }

    /// Clear the current-item markers between items
    pub fn clear_current_job(&self) -> Vec<RunEvent> {
        self.update(|status| status.clear_current_job())
    }

    /// Count one item as successfully completed
    pub fn record_completed(&self) -> Vec<RunEvent> {
        self.update(|status| status.jobs_completed += 1)
    }

    /// Count one item as failed (application rejected or skipped)
    pub fn record_failed(&self) -> Vec<RunEvent> {
        self.update(|status| status.jobs_failed += 1)
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

// Make StatusBoard cloneable for sharing with the worker task
impl Clone for StatusBoard {
    fn clone(&self) -> Self {
        Self {
            status: Arc::clone(&self.status),
            event_tx: self.event_tx.clone(),
        }
    }
}
