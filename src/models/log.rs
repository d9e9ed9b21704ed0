use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a run log entry.
///
/// Serialized lowercase under the JSON key `type`, matching what the
/// monitoring frontend renders (`info`, `search`, `success`, `warning`,
/// `error`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Info,
    Search,
    Success,
    Warning,
    Error,
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogCategory::Info => "info",
            LogCategory::Search => "search",
            LogCategory::Success => "success",
            LogCategory::Warning => "warning",
            LogCategory::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// One entry in the append-only run log.
///
/// Ids are assigned by [`LogSink`](crate::state::LogSink): strictly
/// increasing by 1, starting at 1, restarting at 1 on each new run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,

    #[serde(rename = "type")]
    pub category: LogCategory,

    pub message: String,

    /// UTC instant captured when the entry was appended.
    pub timestamp: DateTime<Utc>,
}
