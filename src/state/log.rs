use crate::models::{LogCategory, LogEntry};
use chrono::Utc;
use std::sync::{Arc, Mutex};

struct LogInner {
    entries: Vec<LogEntry>,
    next_id: u64,
}

/// Append-only, monotonically-ID'd run log.
///
/// Ids start at 1 and increase by exactly 1 per append; [`reset`](Self::reset)
/// clears the sequence and restarts the counter (called only at run start).
/// Handles are cheap clones sharing one sequence, so the worker, control
/// operations, and collaborator services all append to the same log.
///
/// Every appended message is also mirrored to `tracing` at the matching
/// level, so the operational log file carries the run narrative too.
pub struct LogSink {
    inner: Arc<Mutex<LogInner>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogInner {
                entries: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Append an entry, assigning the next id and timestamping at call time.
    ///
    /// # Returns
    /// A copy of the appended entry
    pub fn append(&self, category: LogCategory, message: impl Into<String>) -> LogEntry {
        let message = message.into();

        match category {
            LogCategory::Error => tracing::error!("{message}"),
            LogCategory::Warning => tracing::warn!("{message}"),
            _ => tracing::info!("{message}"),
        }

        let mut inner = self.inner.lock().unwrap();
        let entry = LogEntry {
            id: inner.next_id,
            category,
            message,
            timestamp: Utc::now(),
        };
        inner.next_id += 1;
        inner.entries.push(entry.clone());
        entry
    }

    /// Clear the sequence and reset the id counter to 1.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
        inner.next_id = 1;
    }

    /// Consistent, immutable copy of all entries at call time.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.inner.lock().unwrap().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LogSink {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
