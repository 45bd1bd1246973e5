use anyhow::Result;
use colored::Colorize;
use llm_tracker::{
    config::{Config, StoreBackend},
    logging::SensitiveApiKey,
};
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration with secrets masked
pub fn show(cfg: &Config) -> Result<()> {
    info!("Displaying configuration");

    let sanitized = sanitize_secrets(cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", toml::to_string_pretty(&sanitized)?);

    Ok(())
}

/// Execute the config validate command
///
/// Loading already validated the configuration; this prints a summary.
pub fn validate(cfg: &Config, path: &Path) -> Result<()> {
    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  Config file: {}{}",
        path.display(),
        if path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!("  Store backend: {}", backend_name(cfg.store.backend));
    if cfg.store.backend == StoreBackend::Supabase {
        println!("  Store URL: {}", cfg.store.url);
    }
    println!("  Ollama: {}", cfg.model.base_url);
    println!(
        "  Models: {} (default: {})",
        cfg.model.available_models.join(", "),
        cfg.model.default_model
    );

    info!("Configuration validation successful");
    Ok(())
}

fn backend_name(backend: StoreBackend) -> &'static str {
    match backend {
        StoreBackend::Supabase => "supabase",
        StoreBackend::Memory => "memory",
    }
}

/// Mask secrets in configuration for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    sanitized.store.api_key = SensitiveApiKey::new(&cfg.store.api_key).to_string();
    sanitized
}
