//! JSON API handlers for tutor sessions.
//!
//! Mirrors the page routes for programmatic clients: create a session, ask
//! questions, read the transcript, and download the last answer.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use codebuddy_core::session::TutorSession;
use codebuddy_types::tutor::TurnReport;

use super::{export, find_session};
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub message: String,
}

/// A session plus what the UI can offer next.
#[derive(Debug, Serialize)]
struct SessionView<'a> {
    #[serde(flatten)]
    session: &'a TutorSession,
    suggestions: &'static [&'static str],
    can_export: bool,
}

fn session_json(session: &TutorSession) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(SessionView {
        session,
        suggestions: session.suggestions(),
        can_export: session.can_export(),
    })
    .map_err(|e| AppError::Internal(format!("Failed to serialize session: {e}")))
}

fn session_href(id: &uuid::Uuid) -> String {
    format!("/api/v1/sessions/{id}")
}

/// POST /api/v1/sessions - Create a session.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let (id, session) = state.sessions.create();
    let data = session_json(&*session.lock().await)?;

    let elapsed = start.elapsed().as_millis() as u64;
    let href = session_href(&id);
    let resp = ApiResponse::success(data, request_id, elapsed)
        .with_link("self", href.clone())
        .with_link("prompt", format!("{href}/prompt"));
    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/sessions/{id} - Transcript and export state.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let (uuid, session) = find_session(&state, &id)?;
    let guard = session.lock().await;
    let data = session_json(&guard)?;

    let elapsed = start.elapsed().as_millis() as u64;
    let mut resp = ApiResponse::success(data, request_id, elapsed)
        .with_link("self", session_href(&uuid));
    if guard.can_export() {
        resp = resp.with_link("export", format!("{}/export", session_href(&uuid)));
    }
    Ok(Json(resp))
}

/// DELETE /api/v1/sessions/{id} - Forget a session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let (uuid, _) = find_session(&state, &id)?;
    state.sessions.remove(&uuid);
    tracing::info!(session_id = %uuid, "session deleted");

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true, "id": uuid }),
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/sessions/{id}/prompt - Ask a question.
///
/// Model and image failures are reported inside the returned turn, so this
/// succeeds whenever the prompt was non-blank.
pub async fn send_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PromptRequest>,
) -> Result<Json<ApiResponse<TurnReport>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let (uuid, session) = find_session(&state, &id)?;
    let mut guard = session.lock().await;
    let report = state.processor.process(&mut guard, &body.message).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let mut resp = ApiResponse::success(report, request_id, elapsed)
        .with_link("session", session_href(&uuid));
    if guard.can_export() {
        resp = resp.with_link("export", format!("{}/export", session_href(&uuid)));
    }
    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/export - The last answer as PDF.
pub async fn export_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (_, session) = find_session(&state, &id)?;
    export::pdf_download(&session, &state.config.export.file_name).await
}
