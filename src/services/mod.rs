//! Services module - collaborators the run orchestrator drives.
//!
//! The orchestrator core treats discovery and application as opaque
//! capabilities behind traits, so real automation backends (a headless
//! browser, a job-board API client) and the simulated backends used for
//! development plug in interchangeably.
//!
//! # Components
//!
//! - [`JobDiscovery`]: produces the ordered job list for a run from
//!   [`SearchCriteria`](crate::models::SearchCriteria). Failures are
//!   [`DiscoveryError`]s and abort the run.
//! - [`JobApplicator`]: performs one application. Expected per-item failures
//!   are reported as [`ApplyOutcome::Rejected`] and never abort the run; only
//!   infrastructure faults surface as [`ApplyError`]s.
//! - [`SimulatedDiscovery`] / [`SimulatedApplicator`]: deterministic stand-ins
//!   mirroring the development backend, writing their step-by-step narrative
//!   to the run's [`LogSink`](crate::state::LogSink).
//!
//! # Design Philosophy
//!
//! The services layer is designed to be:
//! - **Framework-agnostic**: no transport or UI dependencies, only domain logic
//! - **Async**: all operations use tokio and may block on I/O
//! - **Testable**: traits are object-safe and mockable

pub mod application;
pub mod discovery;

pub use application::{ApplyError, ApplyOutcome, JobApplicator, SimulatedApplicator};
pub use discovery::{DiscoveryError, JobDiscovery, SimulatedDiscovery};
