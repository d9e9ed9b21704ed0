use serde::{Deserialize, Serialize};

/// One discrete unit of work: a job posting to apply to.
///
/// Produced by a [`JobDiscovery`](crate::services::JobDiscovery)
/// implementation; the order of the discovered sequence is the processing
/// order and must be preserved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobItem {
    pub id: u64,
    pub title: String,
    pub link: String,
}

impl JobItem {
    pub fn new(id: u64, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Search criteria handed to discovery when a run starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub job_title: String,
}

impl SearchCriteria {
    pub fn new(job_title: impl Into<String>) -> Self {
        Self {
            job_title: job_title.into(),
        }
    }

    /// Criteria without a usable job title are rejected before a run starts.
    pub fn is_blank(&self) -> bool {
        self.job_title.trim().is_empty()
    }
}
