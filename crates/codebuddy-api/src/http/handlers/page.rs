//! Server-rendered page routes.
//!
//! Forms post back and redirect (303) to the session page, so a reload never
//! resubmits a prompt. Unknown or malformed session ids on the page itself
//! send the browser back to `/` for a fresh session.

use axum::Form;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use codebuddy_types::tutor::SUGGESTIONS;

use super::{export, find_session};
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(default)]
    pub prompt: String,
}

fn session_page(id: &uuid::Uuid) -> String {
    format!("/s/{id}")
}

/// GET / - Start a session and redirect to it.
pub async fn index(State(state): State<AppState>) -> Redirect {
    let (id, _) = state.sessions.create();
    Redirect::to(&session_page(&id))
}

/// GET /s/{id} - Render the tutor page.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok((uuid, session)) = find_session(&state, &id) else {
        return Ok(Redirect::to("/").into_response());
    };

    let mut guard = session.lock().await;
    let pdf_ready = if guard.can_export() {
        match export::ensure_pdf(&mut guard).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(session_id = %uuid, error = ?e, "pdf export unavailable");
                false
            }
        }
    } else {
        false
    };
    let html = state
        .pages
        .render(uuid, &guard, pdf_ready, &state.error_messages())
        .map_err(|e| AppError::Internal(format!("template error: {e}")))?;
    Ok(Html(html).into_response())
}

/// POST /s/{id}/prompt - Submit the chat input.
pub async fn submit_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PromptForm>,
) -> Result<Redirect, AppError> {
    let Ok((uuid, session)) = find_session(&state, &id) else {
        return Ok(Redirect::to("/"));
    };

    if form.prompt.trim().is_empty() {
        return Ok(Redirect::to(&session_page(&uuid)));
    }

    let mut guard = session.lock().await;
    state.processor.process(&mut guard, &form.prompt).await?;
    Ok(Redirect::to(&format!("{}#latest", session_page(&uuid))))
}

/// POST /s/{id}/suggest/{index} - Ask one of the starter prompts.
pub async fn submit_suggestion(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Redirect, AppError> {
    let (uuid, session) = find_session(&state, &id)?;
    let prompt = SUGGESTIONS
        .get(index)
        .ok_or_else(|| AppError::Validation(format!("No suggestion at index {index}")))?;

    let mut guard = session.lock().await;
    if !guard.transcript.is_empty() {
        return Err(AppError::Conflict(
            "Suggestions are only available before the first question".to_string(),
        ));
    }
    state.processor.process(&mut guard, prompt).await?;
    Ok(Redirect::to(&format!("{}#latest", session_page(&uuid))))
}

/// GET /s/{id}/export.pdf - Download the last answer as PDF.
pub async fn export_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (_, session) = find_session(&state, &id)?;
    export::pdf_download(&session, &state.config.export.file_name).await
}

/// GET /s/{id}/export.html - Download the last answer as HTML.
pub async fn export_html(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (_, session) = find_session(&state, &id)?;
    export::html_download(&session, &state.config.export.file_name).await
}
