use thiserror::Error;

use crate::llm::MessageRole;

/// Errors raised when appending to a transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("turn content must not be empty")]
    EmptyContent,

    #[error("out-of-order turn: expected {expected}, got {actual}")]
    OutOfOrder {
        expected: MessageRole,
        actual: MessageRole,
    },
}

/// Errors from processing a single user prompt.
///
/// Completion failures are not represented here: they become error turns.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("transcript error: {0}")]
    Transcript(#[from] TranscriptError),
}

/// Errors from converting an answer into a downloadable document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("pdf rendering failed: {0}")]
    Render(String),
}
