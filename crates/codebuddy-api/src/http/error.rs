//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use codebuddy_types::error::{ExportError, ProcessError};

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// No session with this id.
    NotFound(String),
    /// The session has no answer to export yet.
    NothingToExport,
    Validation(String),
    /// The request is not allowed in the session's current state.
    Conflict(String),
    /// Rendering the export failed.
    Export(String),
    Internal(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session '{id}' not found"),
            ),
            AppError::NothingToExport => (
                StatusCode::NOT_FOUND,
                "NOTHING_TO_EXPORT",
                "Ask a question to generate an answer you can export.".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Export(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl From<ProcessError> for AppError {
    fn from(e: ProcessError) -> Self {
        match e {
            ProcessError::EmptyPrompt => AppError::Validation(e.to_string()),
            ProcessError::Transcript(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Empty => AppError::NothingToExport,
            ExportError::Render(msg) => AppError::Export(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }

        let body = ApiResponse::error(code, &message, uuid::Uuid::now_v7().to_string());
        let mut response = body.into_response();
        *response.status_mut() = status;
        response
    }
}
