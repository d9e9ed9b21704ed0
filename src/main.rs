//! AutoApply - Automated Job Application Runner
//!
//! Demo driver for the run orchestrator. It initializes:
//! - Logging infrastructure (rotating file logs + console output)
//! - A tokio runtime for the background worker
//! - Configuration loading ([`ConfigManager`])
//! - A [`RunOrchestrator`] wired to the simulated discovery/application
//!   backends
//!
//! It then starts one run for the job title given on the command line and
//! prints status events until the run reaches a terminal state. The pause,
//! resume, stop, and skip operations are exposed programmatically on
//! [`RunOrchestrator::control`]; a transport layer (HTTP or TUI) would call
//! them from its own handlers.

use anyhow::{Result, bail};
use autoapply::models::CandidateProfile;
use autoapply::services::{SimulatedApplicator, SimulatedDiscovery};
use autoapply::state::RunEvent;
use autoapply::{APP_NAME, ConfigManager, LogSink, RunOrchestrator, SearchCriteria, VERSION};
use std::sync::Arc;

fn main() -> Result<()> {
    let job_title: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if job_title.trim().is_empty() {
        bail!("usage: autoapply <job title>");
    }

    let config_manager = ConfigManager::new("AutoApply Data")?;
    let user_config = config_manager.load_user_config()?;
    let settings = user_config.settings.clone();

    let _guard = autoapply::logging::setup_logging_with_console(
        "logs",
        "autoapply",
        settings.debug_mode,
        false,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("autoapply-worker")
        .build()?;

    let log = LogSink::new();
    let candidate = CandidateProfile::from_settings(&settings);
    let discovery =
        Arc::new(SimulatedDiscovery::new(log.clone()).with_listing_count(settings.listing_count));
    let applicator = Arc::new(SimulatedApplicator::new(log.clone(), candidate));

    let orchestrator = RunOrchestrator::new(log, discovery, applicator)
        .with_job_delay(settings.job_delay());

    runtime.block_on(run_once(&orchestrator, &job_title))?;

    // Dump the run log the way the monitoring frontend would render it
    for entry in orchestrator.logs() {
        println!(
            "[{}] {:>7}  {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.category.to_string(),
            entry.message
        );
    }

    let status = orchestrator.status();
    println!(
        "Run finished: {} ({} applied, {} failed of {})",
        status.state, status.jobs_completed, status.jobs_failed, status.jobs_total
    );

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    Ok(())
}

async fn run_once(orchestrator: &RunOrchestrator, job_title: &str) -> Result<()> {
    let mut events = orchestrator.subscribe();
    orchestrator.start(SearchCriteria::new(job_title)).await?;

    // Follow status events until the run reaches a terminal state
    while let Ok(event) = events.recv().await {
        match event {
            RunEvent::StateChanged { to, .. } if to.is_terminal() => break,
            RunEvent::ProgressUpdated {
                completed,
                failed,
                total,
            } => {
                tracing::debug!("progress: {completed} applied, {failed} failed of {total}");
            }
            _ => {}
        }
    }

    Ok(())
}
