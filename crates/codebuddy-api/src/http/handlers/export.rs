//! Answer downloads shared by the page routes and the JSON API.

use std::sync::Arc;

use axum::http::header;
use axum::response::{IntoResponse, Response};

use codebuddy_core::session::{SharedSession, TutorSession};
use codebuddy_infra::export::{PDF_MIME, export_html_document, render_pdf_blocking};

use crate::http::error::AppError;

/// Copy the last answer out of the session.
async fn last_answer(session: &SharedSession) -> Result<String, AppError> {
    let guard = session.lock().await;
    if !guard.can_export() {
        return Err(AppError::NothingToExport);
    }
    Ok(guard.last_answer.clone().unwrap_or_default())
}

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{file_name}\"")
}

/// PDF of the last answer, rendered once per answer and cached on the session.
pub async fn ensure_pdf(session: &mut TutorSession) -> Result<Arc<Vec<u8>>, AppError> {
    if !session.can_export() {
        return Err(AppError::NothingToExport);
    }
    if let Some(bytes) = session.cached_export() {
        return Ok(bytes);
    }

    let markdown = session.last_answer.clone().unwrap_or_default();
    let bytes = Arc::new(render_pdf_blocking(markdown.clone()).await?);
    session.export_cache = Some((markdown, bytes.clone()));
    Ok(bytes)
}

/// The last answer as a PDF attachment.
pub async fn pdf_download(session: &SharedSession, file_name: &str) -> Result<Response, AppError> {
    let bytes = {
        let mut guard = session.lock().await;
        ensure_pdf(&mut guard).await?
    };

    Ok((
        [
            (header::CONTENT_TYPE, PDF_MIME.to_string()),
            (header::CONTENT_DISPOSITION, attachment(file_name)),
        ],
        bytes.as_ref().clone(),
    )
        .into_response())
}

/// The last answer as a standalone HTML attachment.
pub async fn html_download(session: &SharedSession, file_name: &str) -> Result<Response, AppError> {
    let markdown = last_answer(session).await?;
    let document = export_html_document(&markdown)?;
    let html_name = std::path::Path::new(file_name)
        .with_extension("html")
        .to_string_lossy()
        .into_owned();

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&html_name)),
        ],
        document,
    )
        .into_response())
}
