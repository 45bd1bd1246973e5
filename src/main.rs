use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use llm_tracker::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();
    let command = args.get_command();

    if let cli::Commands::Version = command {
        println!("LLM Tracker v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cfg = match config::load_config(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            commands::report_startup_failure(&e);
            anyhow::bail!(e);
        }
    };

    init_tracing(&cfg.logging.level);

    // Dispatch to appropriate command handler
    match command {
        cli::Commands::Chat { project, model } => {
            commands::chat::execute(&cfg, project, model).await?;
        }
        cli::Commands::Projects { action } => match action {
            cli::ProjectCommands::List => commands::projects::list(&cfg).await?,
            cli::ProjectCommands::Create { name } => commands::projects::create(&cfg, &name).await?,
        },
        cli::Commands::Dashboard {
            project,
            limit,
            full,
        } => {
            commands::dashboard::execute(&cfg, project, limit, full).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&cfg)?,
            cli::ConfigCommands::Validate => commands::config::validate(&cfg, &args.config)?,
        },
        cli::Commands::Test => {
            commands::test::execute(&cfg).await?;
        }
        cli::Commands::Version => {}
    }

    Ok(())
}
