// AutoApply - Automated Job Application Runner
//
// This is the library crate containing the run orchestrator, its shared
// status/log state, and the collaborator traits for job discovery and
// application. The binary crate (main.rs) provides a demo driver wired to
// the simulated collaborators.

pub mod config;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{
    CandidateProfile, JobItem, LogCategory, LogEntry, RunState, RunStatus, SearchCriteria,
    UserConfig,
};
pub use orchestrator::{ControlCommand, InvalidCommand, OrchestratorError, RunOrchestrator};
pub use state::{LogSink, RunEvent, StatusBoard};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
