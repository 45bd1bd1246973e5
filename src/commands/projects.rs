use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use llm_tracker::config::Config;

use super::bootstrap;

/// Execute the projects list command
pub async fn list(cfg: &Config) -> Result<()> {
    let (tracker, _) = bootstrap(cfg).await?;
    let projects = tracker.projects.list_projects().await?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("NAME").fg(Color::Cyan),
        Cell::new("CREATED").fg(Color::Cyan),
    ]);
    for project in &projects {
        table.add_row(vec![
            Cell::new(&project.id),
            Cell::new(&project.name),
            Cell::new(project.created_at.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }

    println!("{}", table);
    println!("{} project(s)", projects.len());
    Ok(())
}

/// Execute the projects create command
pub async fn create(cfg: &Config, name: &str) -> Result<()> {
    let (tracker, _) = bootstrap(cfg).await?;
    let project = tracker.projects.create_project(name).await?;

    println!("{}", "✓ Project created".green());
    println!("  {}: {}", "ID".cyan(), project.id);
    println!("  {}: {}", "Name".cyan(), project.name);
    Ok(())
}
