use clap::{Parser, Subcommand};
use llm_tracker::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tracker", version, about = "Chat with a local model and track every run")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat {
        /// Project id to log runs into (defaults to the oldest project)
        #[arg(short, long)]
        project: Option<String>,

        /// Model to chat with (defaults to model.default_model)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Project management commands
    Projects {
        #[command(subcommand)]
        action: ProjectCommands,
    },

    /// Show run metrics for a project
    Dashboard {
        /// Project id (defaults to the oldest project)
        #[arg(short, long)]
        project: Option<String>,

        /// Number of recent runs to list
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Print full prompt and response text of the listed runs
        #[arg(long)]
        full: bool,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Check configuration and store connectivity
    Test,

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommands {
    /// List all projects, oldest first
    List,

    /// Create a new project
    Create {
        /// Project name
        name: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate configuration
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Chat if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat {
            project: None,
            model: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_chat() {
        let cli = Cli {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            command: None,
        };

        match cli.get_command() {
            Commands::Chat { project, model } => {
                assert!(project.is_none());
                assert!(model.is_none());
            }
            _ => panic!("Expected Chat command"),
        }
    }

    #[test]
    fn test_cli_parsing_chat_with_model() {
        let args = vec!["tracker", "chat", "--model", "llama3"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Chat { model, .. } => assert_eq!(model.as_deref(), Some("llama3")),
            _ => panic!("Expected Chat command"),
        }
    }

    #[test]
    fn test_cli_parsing_projects_create() {
        let args = vec!["tracker", "projects", "create", "My Evals"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Projects {
                action: ProjectCommands::Create { name },
            } => assert_eq!(name, "My Evals"),
            _ => panic!("Expected Projects Create command"),
        }
    }

    #[test]
    fn test_cli_parsing_dashboard_defaults() {
        let args = vec!["tracker", "--config", "other.toml", "dashboard"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));

        match cli.get_command() {
            Commands::Dashboard { project, limit, full } => {
                assert!(project.is_none());
                assert_eq!(limit, 20);
                assert!(!full);
            }
            _ => panic!("Expected Dashboard command"),
        }
    }
}
