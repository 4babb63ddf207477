//! Slash command parsing for the chat loop.

use console::style;

use codebuddy_core::session::TutorSession;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Clear the terminal screen.
    Clear,
    Exit,
    /// Show the questions and answers so far.
    History,
    /// Save the last answer; the path defaults to the configured file name.
    Export(Option<String>),
    Unknown(String),
}

/// Parse user input as a slash command. `None` when it isn't one.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts
        .get(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/history" => Some(ChatCommand::History),
        "/export" | "/save" => Some(ChatCommand::Export(arg)),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// A bare `1`..`3` picks a starter suggestion while nothing has been asked.
pub fn pick_suggestion(input: &str, session: &TutorSession) -> Option<&'static str> {
    let index: usize = input.trim().parse().ok()?;
    index
        .checked_sub(1)
        .and_then(|i| session.suggestions().get(i))
        .copied()
}

pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}           {}", style("/help").cyan(), "Show this help message");
    println!("  {}        {}", style("/history").cyan(), "Show the questions and answers so far");
    println!("  {} {}", style("/export [path]").cyan(), "Save the last answer (PDF, or HTML for .html)");
    println!("  {}          {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}           {}", style("/exit").cyan(), "End the session");
    println!();
    println!("  {}", style("Before your first question, 1-3 picks a suggestion.").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebuddy_types::chat::Turn;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/CLS"), Some(ChatCommand::Clear));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
    }

    #[test]
    fn test_parse_export_with_and_without_path() {
        assert_eq!(parse("/export"), Some(ChatCommand::Export(None)));
        assert_eq!(parse("/export   "), Some(ChatCommand::Export(None)));
        assert_eq!(
            parse("/export notes/joins.html"),
            Some(ChatCommand::Export(Some("notes/joins.html".to_string())))
        );
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("What are SQL Joins?"), None);
        assert_eq!(parse("/bogus"), Some(ChatCommand::Unknown("/bogus".to_string())));
    }

    #[test]
    fn test_pick_suggestion_only_on_empty_transcript() {
        let mut session = TutorSession::new();
        assert_eq!(pick_suggestion("2", &session), Some("What are SQL Joins?"));
        assert_eq!(pick_suggestion("0", &session), None);
        assert_eq!(pick_suggestion("4", &session), None);
        assert_eq!(pick_suggestion("recursion", &session), None);

        session.transcript.push(Turn::user("hi")).unwrap();
        assert_eq!(pick_suggestion("1", &session), None);
    }
}
