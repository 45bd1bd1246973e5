use anyhow::Result;
use colored::Colorize;
use llm_tracker::config::Config;
use tracing::info;

use super::bootstrap;

/// Execute the test command
///
/// Connects to the store and runs the default-project bootstrap, the same
/// checks a chat session performs on start.
pub async fn execute(cfg: &Config) -> Result<()> {
    println!("{}", "Testing configuration...".yellow());
    info!("Checking store connectivity");

    let (tracker, projects) = bootstrap(cfg).await?;

    println!("{}", "✓ Store test successful".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  {}: {}", "Store".cyan(), tracker.store.backend_name());
    println!("  {}: {}", "Projects".cyan(), projects.len());
    for (idx, project) in projects.iter().enumerate() {
        println!("    {}. {} ({})", idx + 1, project.name, project.id.dimmed());
    }
    println!();
    println!("  {}: {}", "Ollama".cyan(), cfg.model.base_url);
    println!(
        "  {}: {}",
        "Default model".cyan(),
        cfg.model.default_model
    );

    info!("Store check completed successfully");
    Ok(())
}
