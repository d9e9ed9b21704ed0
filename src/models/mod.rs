//! Data models for the AutoApply runner.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`RunStatus`] / [`RunState`]: the progress snapshot observers poll
//! - [`LogEntry`] / [`LogCategory`]: entries in the append-only run log
//! - [`JobItem`] / [`SearchCriteria`]: units of work and how they are discovered
//! - [`UserConfig`] / [`CandidateProfile`]: user preferences loaded from YAML
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Serializable**: status and log types use the JSON keys the monitoring
//!   frontend expects (`jobsTotal`, `currentJobId`, ...); config types persist
//!   as YAML
//! - **Cloneable**: [`RunStatus`] is wrapped in `Arc<RwLock<>>` by
//!   [`StatusBoard`](crate::state::StatusBoard) for thread-safe access
//! - **Consistent**: status updates go through `StatusBoard` so observers
//!   never see a torn snapshot

pub mod config;
pub mod job;
pub mod log;
pub mod run;

pub use config::{CandidateProfile, RunnerSettings, UserConfig};
pub use job::{JobItem, SearchCriteria};
pub use log::{LogCategory, LogEntry};
pub use run::{RunState, RunStatus};
