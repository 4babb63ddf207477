//! Server-rendered tutor page.
//!
//! One minijinja template (`templates/page.html`, auto-escaped by extension).
//! Turn bodies are markdown rendered to HTML by the export module, which
//! escapes any raw HTML, so they are inserted with `| safe`.

use minijinja::{Environment, context};
use serde::Serialize;
use uuid::Uuid;

use codebuddy_core::session::TutorSession;
use codebuddy_infra::export::markdown_to_html;
use codebuddy_types::chat::{MessageRole, Turn, TurnImage};

const PAGE_TEMPLATE: &str = include_str!("../../templates/page.html");

#[derive(Debug, Serialize)]
struct TurnView<'a> {
    role: &'static str,
    is_error: bool,
    html: String,
    image: Option<&'a TurnImage>,
    notices: &'a [String],
}

impl<'a> TurnView<'a> {
    fn from_turn(turn: &'a Turn) -> Self {
        Self {
            role: match turn.role {
                MessageRole::User => "user",
                _ => "assistant",
            },
            is_error: turn.is_error(),
            html: markdown_to_html(&turn.content),
            image: turn.image.as_ref(),
            notices: &turn.notices,
        }
    }
}

#[derive(Debug, Serialize)]
struct SuggestionView {
    index: usize,
    text: &'static str,
}

/// Labels shown in the About box.
#[derive(Debug, Clone)]
pub struct PageInfo {
    pub provider: String,
    pub model: String,
}

/// Holds the compiled page template.
pub struct PageRenderer {
    env: Environment<'static>,
    info: PageInfo,
}

impl PageRenderer {
    pub fn new(info: PageInfo) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("page.html", PAGE_TEMPLATE)?;
        Ok(Self { env, info })
    }

    /// Render the full page for one session.
    ///
    /// `pdf_ready` says whether the last answer has a rendered PDF; the PDF
    /// control is shown only then.
    pub fn render(
        &self,
        session_id: Uuid,
        session: &TutorSession,
        pdf_ready: bool,
        errors: &[String],
    ) -> Result<String, minijinja::Error> {
        let turns: Vec<TurnView<'_>> = session
            .transcript
            .turns()
            .iter()
            .map(TurnView::from_turn)
            .collect();
        let suggestions: Vec<SuggestionView> = session
            .suggestions()
            .iter()
            .copied()
            .enumerate()
            .map(|(index, text)| SuggestionView { index, text })
            .collect();

        self.env.get_template("page.html")?.render(context! {
            session_id => session_id.to_string(),
            turns => turns,
            suggestions => suggestions,
            can_export => session.can_export(),
            pdf_ready => pdf_ready && session.can_export(),
            errors => errors,
            provider => &self.info.provider,
            model => &self.info.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> PageRenderer {
        PageRenderer::new(PageInfo {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_empty_session_shows_suggestions_and_no_export() {
        let session = TutorSession::new();
        let html = renderer().render(session.id, &session, false, &[]).unwrap();
        assert!(html.contains("🤖 CodeBuddy - Your AI Coding Tutor"));
        assert!(html.contains("Get started by asking a question below or trying one of these suggestions!"));
        assert!(html.contains("What are SQL Joins?"));
        assert!(html.contains("Explain recursion with an example"));
        assert!(html.contains("Ask a question to generate an answer you can export."));
        assert!(!html.contains("📄 Export Last Answer as PDF"));
        assert!(html.contains("ℹ️ About CodeBuddy"));
        assert!(html.contains("Ask me any coding topic you"));
    }

    #[test]
    fn test_answered_session_shows_turns_and_export() {
        let mut session = TutorSession::new();
        session.transcript.push(Turn::user("What are SQL Joins?")).unwrap();
        session
            .transcript
            .push(
                Turn::answer("### 🧠 Concept Summary\nJoins <b>combine</b> rows.")
                    .with_image(Some(TurnImage::for_query("https://img/j.jpg", "sql joins diagram"))),
            )
            .unwrap();
        session.last_answer = Some("### 🧠 Concept Summary".to_string());

        let html = renderer().render(session.id, &session, true, &[]).unwrap();
        assert!(html.contains("<h3>🧠 Concept Summary</h3>"));
        assert!(html.contains("&lt;b&gt;combine&lt;/b&gt;"));
        assert!(html.contains("<img src="));
        assert!(html.contains("j.jpg"));
        assert!(html.contains("Image for: sql joins diagram"));
        assert!(html.contains("📄 Export Last Answer as PDF"));
        assert!(!html.contains("trying one of these suggestions"));
        assert!(html.contains(r#"id="latest""#));
    }

    #[test]
    fn test_failed_pdf_hides_pdf_control() {
        let mut session = TutorSession::new();
        session.transcript.push(Turn::user("q")).unwrap();
        session.transcript.push(Turn::answer("### Summary")).unwrap();
        session.last_answer = Some("### Summary".to_string());

        let html = renderer().render(session.id, &session, false, &[]).unwrap();
        assert!(!html.contains("📄 Export Last Answer as PDF"));
        assert!(html.contains("This answer could not be converted to PDF."));
        assert!(html.contains("export.html"));
    }

    #[test]
    fn test_error_turn_and_banner() {
        let mut session = TutorSession::new();
        session.transcript.push(Turn::user("hi")).unwrap();
        session
            .transcript
            .push(Turn::error("An error occurred: authentication failed"))
            .unwrap();
        let errors = vec!["GOOGLE_API_KEY not found.".to_string()];

        let html = renderer().render(session.id, &session, false, &errors).unwrap();
        assert!(html.contains("turn assistant error"));
        assert!(html.contains("An error occurred: authentication failed"));
        assert!(html.contains("GOOGLE_API_KEY not found."));
        assert!(html.contains("Ask a question to generate an answer you can export."));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut session = TutorSession::new();
        session
            .transcript
            .push(Turn::user("<script>alert(1)</script>"))
            .unwrap();
        let html = renderer().render(session.id, &session, false, &[]).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
    }
}
