//! Command implementations for the CLI
//!
//! - chat: interactive chat session with run logging
//! - projects: list and create projects
//! - dashboard: run metrics for a project
//! - config: configuration display and validation
//! - test: configuration and store connectivity check

pub mod chat;
pub mod config;
pub mod dashboard;
pub mod projects;
pub mod test;

use anyhow::Result;
use colored::Colorize;
use llm_tracker::{
    app::Tracker,
    config::Config,
    error::{AppError, StartupFailure},
    models::records::Project,
};

/// Print an error that stops startup, with remediation steps
pub fn report_startup_failure(err: &AppError) {
    let failure = StartupFailure::classify(err);
    for line in failure.remediation() {
        eprintln!("{}", line.red());
    }
    eprintln!("  {}", err.to_string().dimmed());
}

/// Connect to the store and make sure a project exists
pub async fn bootstrap(cfg: &Config) -> Result<(Tracker, Vec<Project>)> {
    let tracker = Tracker::connect(&cfg.store).map_err(startup_failed)?;
    let projects = tracker.start().await.map_err(startup_failed)?;
    Ok((tracker, projects))
}

fn startup_failed(err: AppError) -> anyhow::Error {
    report_startup_failure(&err);
    anyhow::Error::new(err).context("Startup failed")
}

/// Pick the project named by `requested`, or the oldest one
pub fn select_project(projects: &[Project], requested: Option<&str>) -> Result<Project> {
    match requested {
        Some(id) => projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown project id: {}", id)),
        None => projects
            .first()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No projects available")),
    }
}
