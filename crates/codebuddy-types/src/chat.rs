//! Transcript and turn types for CodeBuddy.
//!
//! A transcript is an append-only log of turns that alternates
//! user -> assistant. It lives only as long as its session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TranscriptError;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Whether an assistant turn carries an answer or a surfaced failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    #[default]
    Answer,
    Error,
}

/// An illustrative image attached to an assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnImage {
    pub url: String,
    pub caption: String,
}

impl TurnImage {
    /// Build the image attachment for a search phrase, captioned `Image for: <phrase>`.
    pub fn for_query(url: impl Into<String>, query: &str) -> Self {
        Self {
            url: url.into(),
            caption: format!("Image for: {query}"),
        }
    }
}

/// A single message in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub kind: TurnKind,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<TurnImage>,
    /// User-visible warnings raised while producing this turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into(), TurnKind::Answer)
    }

    pub fn answer(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content.into(), TurnKind::Answer)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content.into(), TurnKind::Error)
    }

    fn new(role: MessageRole, content: String, kind: TurnKind) -> Self {
        Self {
            role,
            content,
            kind,
            created_at: Utc::now(),
            image: None,
            notices: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: Option<TurnImage>) -> Self {
        self.image = image;
        self
    }

    pub fn with_notices(mut self, notices: Vec<String>) -> Self {
        self.notices = notices;
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == TurnKind::Error
    }
}

/// Append-only conversation log.
///
/// Enforces two invariants on every append: content is non-empty after
/// trimming, and roles alternate starting with the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn, rejecting empty content and out-of-order roles.
    pub fn push(&mut self, turn: Turn) -> Result<(), TranscriptError> {
        if turn.content.trim().is_empty() {
            return Err(TranscriptError::EmptyContent);
        }

        let expected = self.expected_role();
        if turn.role != expected {
            return Err(TranscriptError::OutOfOrder {
                expected,
                actual: turn.role,
            });
        }

        self.turns.push(turn);
        Ok(())
    }

    /// The role the next appended turn must have.
    pub fn expected_role(&self) -> MessageRole {
        match self.turns.last() {
            Some(last) if last.role == MessageRole::User => MessageRole::Assistant,
            _ => MessageRole::User,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
