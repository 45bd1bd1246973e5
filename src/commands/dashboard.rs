use anyhow::Result;
use llm_tracker::{config::Config, dashboard::Dashboard};
use tracing::info;

use super::{bootstrap, select_project};

/// Execute the dashboard command
///
/// A failure to read the run history is shown in the output rather than
/// returned as an error.
pub async fn execute(cfg: &Config, project: Option<String>, limit: usize, full: bool) -> Result<()> {
    let (tracker, projects) = bootstrap(cfg).await?;
    let project = select_project(&projects, project.as_deref())?;

    info!(project_id = %project.id, "Loading dashboard");
    let dashboard = Dashboard::load(&tracker.runs, &project.id, &project.name).await;
    print!("{}", dashboard.render(limit, full));

    Ok(())
}
