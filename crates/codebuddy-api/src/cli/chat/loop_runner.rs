//! Main chat loop orchestration.
//!
//! One `TutorSession` lives for the duration of the loop. Each question is
//! processed under a spinner, then the assistant turn is rendered with its
//! image link and any notices.

use std::path::PathBuf;

use console::style;

use codebuddy_core::session::TutorSession;
use codebuddy_types::chat::MessageRole;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;
use crate::cli::ask::write_answer;
use crate::cli::{print_startup_issues, thinking_spinner};
use crate::state::AppState;

const PREVIEW_CHARS: usize = 100;

/// Run the interactive tutor until the learner exits.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let mut session = TutorSession::new();
    let renderer = ChatRenderer::new();

    print_welcome_banner(
        &state.config.llm.provider.to_string(),
        &state.config.llm.model,
        session.suggestions(),
    );
    print_startup_issues(&state.issues);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep asking.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::History => print_history(&session),
                ChatCommand::Export(path) => export_last_answer(state, &session, path).await,
                ChatCommand::Unknown(name) => println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                ),
            }
            continue;
        }

        let question = commands::pick_suggestion(&text, &session)
            .map(str::to_string)
            .unwrap_or(text);

        let spinner = thinking_spinner();
        let result = state.processor.process(&mut session, &question).await;
        spinner.finish_and_clear();

        match result {
            Ok(report) => renderer.print_turn(&report.assistant_turn),
            Err(e) => {
                tracing::error!(error = %e, "prompt processing failed");
                eprintln!("\n  {} {e}\n", style("!").red().bold());
            }
        }
    }

    Ok(())
}

fn print_history(session: &TutorSession) {
    println!();
    if session.transcript.is_empty() {
        println!("  {}", style("Nothing asked yet.").dim());
    }
    for turn in session.transcript.turns() {
        let label = match turn.role {
            MessageRole::User => style("You").green().bold(),
            _ if turn.is_error() => style("Error").red().bold(),
            _ => style("CodeBuddy").cyan().bold(),
        };
        println!("  {label} {}", preview(&turn.content));
    }
    println!();
}

/// First line of `content`, cut to a fixed number of characters.
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.chars().count() > PREVIEW_CHARS {
        let cut: String = first_line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}

async fn export_last_answer(state: &AppState, session: &TutorSession, path: Option<String>) {
    let Some(answer) = session.last_answer.as_deref().filter(|_| session.can_export()) else {
        println!(
            "\n  {}\n",
            style("Ask a question to generate an answer you can export.").dim()
        );
        return;
    };

    let path = path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&state.config.export.file_name));
    match write_answer(&path, answer).await {
        Ok(()) => println!(
            "\n  {} Saved {}\n",
            style("📄").bold(),
            style(path.display()).cyan()
        ),
        Err(e) => println!("\n  {} Export failed: {e}\n", style("!").red().bold()),
    }
}
