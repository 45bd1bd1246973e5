//! Interactive chat session
//!
//! Plain lines are questions for the model; lines starting with `/` are
//! session commands.

use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use llm_tracker::{
    app::Tracker,
    config::Config,
    dashboard::Dashboard,
    metrics::DEFAULT_RECENT_LIMIT,
    models::records::Project,
    providers::{LanguageModel, OllamaClient},
    session::{InteractionSession, RecordOutcome, SessionState},
};

use super::{bootstrap, select_project};

const HELP: &str = "\
Commands:
  /clear            clear the conversation (logged runs are kept)
  /projects         list projects
  /project <id>     switch project
  /new <name>       create a project and switch to it
  /model <name>     switch model
  /history          show the conversation so far
  /dashboard        show run metrics for the current project
  /help             show this help
  /exit             quit";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Question(String),
    Clear,
    Exit,
    Projects,
    SelectProject(String),
    NewProject(String),
    Model(String),
    History,
    Dashboard,
    Help,
    Empty,
    Unknown(String),
}

pub fn parse_input(line: &str) -> ChatInput {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }

    let Some(command) = line.strip_prefix('/') else {
        return ChatInput::Question(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match (name, arg.is_empty()) {
        ("clear", _) => ChatInput::Clear,
        ("exit" | "quit", _) => ChatInput::Exit,
        ("projects", _) => ChatInput::Projects,
        ("project", false) => ChatInput::SelectProject(arg.to_string()),
        ("new", false) => ChatInput::NewProject(arg.to_string()),
        ("model", false) => ChatInput::Model(arg.to_string()),
        ("history", _) => ChatInput::History,
        ("dashboard", _) => ChatInput::Dashboard,
        ("help", _) => ChatInput::Help,
        _ => ChatInput::Unknown(line.to_string()),
    }
}

/// Execute the chat command
pub async fn execute(cfg: &Config, project: Option<String>, model: Option<String>) -> Result<()> {
    let (tracker, projects) = bootstrap(cfg).await?;
    let mut project = select_project(&projects, project.as_deref())?;

    let model_name = model.unwrap_or_else(|| cfg.model.default_model.clone());
    if !cfg.model.available_models.contains(&model_name) {
        anyhow::bail!(
            "Unknown model '{}'. Available: {}",
            model_name,
            cfg.model.available_models.join(", ")
        );
    }

    let llm: Arc<dyn LanguageModel> = Arc::new(OllamaClient::new(&cfg.model));
    let session = InteractionSession::new(llm, tracker.runs.clone());
    let mut state = SessionState::new(model_name, Some(project.id.clone()));

    info!(project_id = %project.id, model = %state.model_name, "Chat session started");
    println!("{}", "Ollama Experiment Tracker".green().bold());
    print_status(&project, &state);
    println!("{}", "Type /help for commands.".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            ChatInput::Empty => {}
            ChatInput::Exit => break,
            ChatInput::Help => println!("{}", HELP),
            ChatInput::Clear => {
                state.clear();
                println!("{}", "Conversation cleared.".yellow());
            }
            ChatInput::History => {
                if state.context().trim().is_empty() {
                    println!("{}", "No conversation yet.".dimmed());
                } else {
                    println!("{}", state.context().trim_start());
                }
            }
            ChatInput::Projects => list_projects(&tracker, &project).await,
            ChatInput::SelectProject(id) => match tracker.projects.find(&id).await {
                Ok(Some(found)) => {
                    project = found;
                    state.project_id = Some(project.id.clone());
                    print_status(&project, &state);
                }
                Ok(None) => println!("{}", format!("Unknown project id: {}", id).red()),
                Err(e) => println!("{}", format!("Could not load projects: {}", e).red()),
            },
            ChatInput::NewProject(name) => match tracker.projects.create_project(&name).await {
                Ok(created) => {
                    project = created;
                    state.project_id = Some(project.id.clone());
                    println!("{}", format!("Created project '{}'", project.name).green());
                    print_status(&project, &state);
                }
                Err(e) => println!("{}", e.to_string().red()),
            },
            ChatInput::Model(name) => {
                if cfg.model.available_models.contains(&name) {
                    state.model_name = name;
                    print_status(&project, &state);
                } else {
                    println!(
                        "{}",
                        format!(
                            "Unknown model '{}'. Available: {}",
                            name,
                            cfg.model.available_models.join(", ")
                        )
                        .red()
                    );
                }
            }
            ChatInput::Dashboard => {
                let dashboard = Dashboard::load(&tracker.runs, &project.id, &project.name).await;
                println!("{}", dashboard.render(DEFAULT_RECENT_LIMIT, false));
            }
            ChatInput::Unknown(input) => {
                println!("{}", format!("Unknown command: {} (try /help)", input).red());
            }
            ChatInput::Question(question) => {
                println!("{}", "Generating...".dimmed());
                match session.submit(&mut state, &question).await {
                    Ok(interaction) => {
                        println!("{} {}", "AI:".green().bold(), interaction.answer);
                        println!("{}", format!("({:.2}s)", interaction.latency).dimmed());
                        if let RecordOutcome::Failed(e) = &interaction.record {
                            println!("{}", format!("Run not logged: {}", e).yellow());
                        }
                    }
                    Err(e) => println!("{}", format!("Model call failed: {}", e).red()),
                }
            }
        }
    }

    info!("Chat session ended");
    Ok(())
}

fn print_status(project: &Project, state: &SessionState) {
    println!(
        "{} {} ({})  {} {}",
        "Project:".cyan(),
        project.name,
        project.id.dimmed(),
        "Model:".cyan(),
        state.model_name
    );
}

async fn list_projects(tracker: &Tracker, current: &Project) {
    match tracker.projects.list_projects().await {
        Ok(projects) => {
            for p in projects {
                let marker = if p.id == current.id { "*" } else { " " };
                println!("{} {}  {}", marker, p.id, p.name);
            }
        }
        Err(e) => println!("{}", format!("Could not load projects: {}", e).red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions() {
        assert_eq!(
            parse_input("  What is Rust?  "),
            ChatInput::Question("What is Rust?".to_string())
        );
        assert_eq!(parse_input("   "), ChatInput::Empty);
    }

    #[test]
    fn test_parse_bare_words_are_questions() {
        assert_eq!(parse_input("exit"), ChatInput::Question("exit".to_string()));
        assert_eq!(parse_input("clear"), ChatInput::Question("clear".to_string()));
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse_input("/clear"), ChatInput::Clear);
        assert_eq!(parse_input("/exit"), ChatInput::Exit);
        assert_eq!(parse_input("/quit"), ChatInput::Exit);
        assert_eq!(parse_input("/history"), ChatInput::History);
        assert_eq!(parse_input("/dashboard"), ChatInput::Dashboard);
        assert_eq!(parse_input("/help"), ChatInput::Help);
        assert_eq!(parse_input("/projects"), ChatInput::Projects);
    }

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(
            parse_input("/new   Prompt experiments "),
            ChatInput::NewProject("Prompt experiments".to_string())
        );
        assert_eq!(parse_input("/model llama3"), ChatInput::Model("llama3".to_string()));
        assert_eq!(
            parse_input("/project 1b2c"),
            ChatInput::SelectProject("1b2c".to_string())
        );
    }

    #[test]
    fn test_parse_missing_argument_is_unknown() {
        assert_eq!(parse_input("/model"), ChatInput::Unknown("/model".to_string()));
        assert_eq!(parse_input("/new  "), ChatInput::Unknown("/new".to_string()));
        assert_eq!(parse_input("/frobnicate"), ChatInput::Unknown("/frobnicate".to_string()));
    }
}
