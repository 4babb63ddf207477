//! One-shot question answering: `codebuddy ask "<question>"`.

use std::path::Path;

use anyhow::Context;
use console::style;

use codebuddy_core::session::TutorSession;
use codebuddy_infra::export::{export_html_document, render_pdf_blocking};

use super::chat::renderer::ChatRenderer;
use super::{print_startup_issues, thinking_spinner};
use crate::state::AppState;

/// Ask one question, print the answer, and optionally write exports.
pub async fn run_ask(
    state: &AppState,
    question: &str,
    pdf: Option<&Path>,
    html: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    if !json {
        print_startup_issues(&state.issues);
    }

    let mut session = TutorSession::new();
    let spinner = (!json).then(thinking_spinner);
    let result = state.processor.process(&mut session, question).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        ChatRenderer::new().print_turn(&report.assistant_turn);
    }

    if report.assistant_turn.is_error() {
        anyhow::bail!("no answer was produced");
    }

    let Some(answer) = session.last_answer.as_deref() else {
        return Ok(());
    };
    for path in [pdf, html].into_iter().flatten() {
        write_answer(path, answer).await?;
        if !json {
            println!(
                "  {} Saved {}",
                style("📄").bold(),
                style(path.display()).cyan()
            );
        }
    }

    Ok(())
}

/// Write `markdown` to `path`, as HTML for `.html`/`.htm` and PDF otherwise.
pub async fn write_answer(path: &Path, markdown: &str) -> anyhow::Result<()> {
    let is_html = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));

    let bytes = if is_html {
        export_html_document(markdown)?.into_bytes()
    } else {
        render_pdf_blocking(markdown.to_string()).await?
    };

    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "answer exported");
    Ok(())
}
